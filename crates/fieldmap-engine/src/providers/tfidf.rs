//! TF-IDF vector similarity over the combined field-name corpus.
//!
//! Used by the semantic provider when no embedding backend answers. Runs
//! entirely in-process and never fails: names without usable terms simply
//! score 0 against everything.

use std::collections::{BTreeMap, BTreeSet};

use crate::matrix::SimilarityMatrix;
use crate::utils::{is_stopword, split_words};

type TermVector<'a> = BTreeMap<&'a str, f64>;

/// Computes cosine similarity of TF-IDF vectors between every source and
/// target name. The document corpus is all sources followed by all targets.
pub fn tfidf_similarity(sources: &[&str], targets: &[&str]) -> SimilarityMatrix {
    let documents: Vec<Vec<String>> = sources
        .iter()
        .chain(targets)
        .map(|name| terms(name))
        .collect();
    let idf = inverse_document_frequency(&documents);
    let vectors: Vec<TermVector<'_>> = documents
        .iter()
        .map(|doc| weighted_vector(doc, &idf))
        .collect();

    let (source_vectors, target_vectors) = vectors.split_at(sources.len());
    SimilarityMatrix::from_fn(sources.len(), targets.len(), |i, j| {
        dot(&source_vectors[i], &target_vectors[j])
    })
}

/// Unigrams and adjacent bigrams of the name's words, with stop words and
/// single characters removed, plus the words run together as one compound
/// term so `first_name` and `firstName` share a term.
fn terms(name: &str) -> Vec<String> {
    let all_words = split_words(name);
    let compound = (all_words.len() > 1).then(|| all_words.concat());
    let words: Vec<String> = all_words
        .into_iter()
        .filter(|word| word.chars().count() >= 2 && !is_stopword(word))
        .collect();
    let bigrams: Vec<String> = words
        .windows(2)
        .map(|pair| format!("{} {}", pair[0], pair[1]))
        .collect();
    words.into_iter().chain(bigrams).chain(compound).collect()
}

/// Smoothed IDF: `ln((1 + n) / (1 + df)) + 1`.
fn inverse_document_frequency(documents: &[Vec<String>]) -> TermVector<'_> {
    let mut document_frequency: BTreeMap<&str, usize> = BTreeMap::new();
    for doc in documents {
        let unique: BTreeSet<&str> = doc.iter().map(String::as_str).collect();
        for term in unique {
            *document_frequency.entry(term).or_insert(0) += 1;
        }
    }
    let n = documents.len() as f64;
    document_frequency
        .into_iter()
        .map(|(term, df)| (term, ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0))
        .collect()
}

/// L2-normalized TF-IDF weights for one document.
fn weighted_vector<'a>(doc: &'a [String], idf: &TermVector<'_>) -> TermVector<'a> {
    let mut counts: TermVector<'a> = BTreeMap::new();
    for term in doc {
        *counts.entry(term.as_str()).or_insert(0.0) += 1.0;
    }
    let mut vector: TermVector<'a> = counts
        .into_iter()
        .map(|(term, count)| (term, count * idf.get(term).copied().unwrap_or(1.0)))
        .collect();
    let norm = vector.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm > f64::EPSILON {
        for weight in vector.values_mut() {
            *weight /= norm;
        }
    }
    vector
}

fn dot(a: &TermVector<'_>, b: &TermVector<'_>) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small
        .iter()
        .filter_map(|(term, weight)| large.get(*term).map(|other| weight * other))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_only_differences_score_one() {
        let matrix = tfidf_similarity(&["FirstName", "EmailAddress"], &["firstname", "emailaddress"]);
        assert!((matrix.get(0, 0) - 1.0).abs() < 1e-9);
        assert!((matrix.get(1, 1) - 1.0).abs() < 1e-9);
        assert_eq!(matrix.get(0, 1), 0.0);
    }

    #[test]
    fn separated_and_joined_names_share_the_compound_term() {
        let matrix = tfidf_similarity(&["first_name"], &["firstName", "lastName"]);
        assert!(matrix.get(0, 0) > 0.0);
        assert_eq!(matrix.get(0, 1), 0.0);
    }

    #[test]
    fn stop_words_are_ignored() {
        assert_eq!(
            terms("date_of_birth"),
            vec!["date", "birth", "date birth", "dateofbirth"]
        );
        assert_eq!(terms("x"), Vec::<String>::new());
    }

    #[test]
    fn names_without_terms_score_zero() {
        let matrix = tfidf_similarity(&["_", "x"], &["x", "email"]);
        assert!(matrix.has_shape(2, 2));
        assert_eq!(matrix.row(0), &[0.0, 0.0]);
        assert_eq!(matrix.row(1), &[0.0, 0.0]);
        assert!(matrix.row(0).iter().all(|score| score.is_sign_positive()));
    }

    #[test]
    fn empty_inputs_give_empty_matrix() {
        let matrix = tfidf_similarity(&[], &["email"]);
        assert!(matrix.has_shape(0, 1));
    }
}

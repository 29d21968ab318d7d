//! Pluggable similarity providers.
//!
//! Each provider turns two name lists into a [`SimilarityMatrix`]. The engine
//! accepts any set of providers with distinct [`ProviderKind`]s; the
//! [`build_providers`] factory instantiates the built-in ones from a
//! [`MatcherConfig`].

pub mod lexical;
pub mod rules;
pub mod semantic;
pub mod tfidf;

use std::fmt;
use std::sync::Arc;

use fieldmap_model::MatchingStrategy;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::MatcherConfig;
use crate::matrix::SimilarityMatrix;

pub use lexical::LexicalProvider;
pub use rules::RuleBasedProvider;
pub use semantic::{DeadlineEmbedder, SemanticProvider, TextEmbedder};
pub use tfidf::tfidf_similarity;

/// The similarity signal a provider computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Lexical,
    Semantic,
    RuleBased,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 3] = [
        ProviderKind::Lexical,
        ProviderKind::Semantic,
        ProviderKind::RuleBased,
    ];

    /// Tie-break rank when two providers report the same raw score.
    /// Higher wins.
    pub const fn priority(&self) -> u8 {
        match self {
            ProviderKind::RuleBased => 2,
            ProviderKind::Semantic => 1,
            ProviderKind::Lexical => 0,
        }
    }

    /// Strategy tag recorded when this provider dominates a score.
    pub const fn strategy(&self) -> MatchingStrategy {
        match self {
            ProviderKind::Lexical => MatchingStrategy::Fuzzy,
            ProviderKind::Semantic => MatchingStrategy::Semantic,
            ProviderKind::RuleBased => MatchingStrategy::RuleBased,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Lexical => "lexical",
            ProviderKind::Semantic => "semantic",
            ProviderKind::RuleBased => "rule_based",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Computes pairwise similarity between source and target field names.
///
/// `matrix.get(i, j)` estimates how well `sources[i]` matches `targets[j]`.
/// Implementations must not panic on unusual input; a pair they cannot score
/// should score 0.
pub trait SimilarityProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    fn compute_matrix(&self, sources: &[&str], targets: &[&str]) -> SimilarityMatrix;
}

/// Instantiates the built-in providers enabled in `config`.
///
/// The semantic provider is created whenever semantic matching is enabled;
/// without an embedder it scores with the TF-IDF fallback alone.
pub fn build_providers(
    config: &MatcherConfig,
    embedder: Option<Arc<dyn TextEmbedder>>,
) -> Vec<Box<dyn SimilarityProvider>> {
    let mut providers: Vec<Box<dyn SimilarityProvider>> = Vec::new();
    if config.enable_fuzzy_matching {
        providers.push(Box::new(LexicalProvider::new()));
    }
    if config.enable_semantic_matching {
        let provider = match embedder {
            Some(embedder) => SemanticProvider::with_embedder(embedder),
            None => SemanticProvider::statistical(),
        };
        providers.push(Box::new(provider));
    }
    if config.enable_rule_based {
        providers.push(Box::new(RuleBasedProvider::new()));
    }
    providers
}

/// Scores every pair with `score`, computing source rows in parallel.
///
/// Rows are collected in source order, so the result does not depend on
/// scheduling.
pub(crate) fn pairwise_matrix<F>(sources: &[&str], targets: &[&str], score: F) -> SimilarityMatrix
where
    F: Fn(&str, &str) -> f64 + Sync,
{
    let rows: Vec<Vec<f64>> = sources
        .par_iter()
        .map(|source| targets.iter().map(|target| score(source, target)).collect())
        .collect();
    SimilarityMatrix::from_rows(rows, targets.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_respects_enable_flags() {
        let config = MatcherConfig::default().with_provider(ProviderKind::Semantic, false);
        let kinds: Vec<ProviderKind> = build_providers(&config, None)
            .iter()
            .map(|p| p.kind())
            .collect();
        assert_eq!(kinds, vec![ProviderKind::Lexical, ProviderKind::RuleBased]);
    }

    #[test]
    fn priority_orders_rule_semantic_lexical() {
        assert!(ProviderKind::RuleBased.priority() > ProviderKind::Semantic.priority());
        assert!(ProviderKind::Semantic.priority() > ProviderKind::Lexical.priority());
    }

    #[test]
    fn pairwise_matrix_keeps_row_order() {
        let sources = ["a", "bb", "ccc"];
        let targets = ["x", "yy"];
        let matrix = pairwise_matrix(&sources, &targets, |s, t| {
            (s.len() * 10 + t.len()) as f64 / 100.0
        });
        assert_eq!(matrix.row(0), &[0.11, 0.12]);
        assert_eq!(matrix.row(2), &[0.31, 0.32]);
    }
}

//! Fuzzy string-distance similarity.
//!
//! Combines three case-insensitive metrics built on the normalized Indel
//! similarity from `rapidfuzz`: the plain ratio, the best-substring
//! (partial) ratio, and the token-order-independent ratio.

use rapidfuzz::fuzz;

use super::{ProviderKind, SimilarityProvider, pairwise_matrix};
use crate::matrix::SimilarityMatrix;
use crate::utils::fold_name;

const RATIO_WEIGHT: f64 = 0.4;
const PARTIAL_WEIGHT: f64 = 0.3;
const TOKEN_SORT_WEIGHT: f64 = 0.3;

/// Lexical similarity provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalProvider;

impl LexicalProvider {
    pub fn new() -> Self {
        Self
    }

    /// Scores one pair of names.
    pub fn score(&self, source: &str, target: &str) -> f64 {
        let source = fold_name(source);
        let target = fold_name(target);
        RATIO_WEIGHT * ratio(&source, &target)
            + PARTIAL_WEIGHT * partial_ratio(&source, &target)
            + TOKEN_SORT_WEIGHT * token_sort_ratio(&source, &target)
    }
}

impl SimilarityProvider for LexicalProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Lexical
    }

    fn compute_matrix(&self, sources: &[&str], targets: &[&str]) -> SimilarityMatrix {
        pairwise_matrix(sources, targets, |source, target| self.score(source, target))
    }
}

/// Normalized edit similarity of two strings.
pub fn ratio(a: &str, b: &str) -> f64 {
    fuzz::ratio(a.chars(), b.chars())
}

/// Best [`ratio`] of the shorter string against every equally long window
/// of the longer one.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (shorter, longer) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if shorter.is_empty() {
        return if longer.is_empty() { 1.0 } else { 0.0 };
    }
    let width = shorter.len();
    let mut best = 0.0_f64;
    for window in longer.windows(width) {
        let score = fuzz::ratio(shorter.iter().copied(), window.iter().copied());
        if score > best {
            best = score;
            if best >= 1.0 {
                break;
            }
        }
    }
    best
}

/// [`ratio`] after sorting the whitespace-separated tokens of both strings.
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

fn sorted_tokens(raw: &str) -> String {
    let mut tokens: Vec<&str> = raw.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

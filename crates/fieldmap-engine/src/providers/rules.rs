//! Rule-based similarity from a canonical table of field-name patterns.
//!
//! A pair scores the maximum of:
//! - 1.0 on case-insensitive equality,
//! - 0.9 when both names match the two sides of a known pattern pair,
//! - 0.7 when one name contains the other,
//! - 0.8 times the Jaccard overlap of whitespace-separated words.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use super::{ProviderKind, SimilarityProvider, pairwise_matrix};
use crate::matrix::SimilarityMatrix;
use crate::utils::fold_name;

const EXACT_SCORE: f64 = 1.0;
const PATTERN_SCORE: f64 = 0.9;
const SUBSTRING_SCORE: f64 = 0.7;
const WORD_OVERLAP_SCALE: f64 = 0.8;

/// Canonical (source, target) regex pairs for common form fields.
const CANONICAL_PATTERNS: &[(&str, &str)] = &[
    // Names
    (r"(first|given).*name", r"(first|given).*name"),
    (r"(last|family|sur).*name", r"(last|family|sur).*name"),
    (r"full.*name", r"(full|complete).*name"),
    // Contact
    (r"email.*address", r"email"),
    (r"phone.*number", r"phone"),
    (r"mobile.*number", r"(mobile|cell)"),
    // Address parts
    (r"street.*address", r"(street|address)"),
    (r"city", r"city"),
    (r"state", r"state"),
    (r"zip.*code", r"(zip|postal)"),
    // Date of birth
    (r"birth.*date", r"(birth|dob)"),
    (r"date.*birth", r"(birth|dob)"),
    // Financial
    (r"salary", r"(salary|income)"),
    (r"amount", r"amount"),
];

static DEFAULT_PATTERNS: LazyLock<Vec<FieldPattern>> = LazyLock::new(|| {
    CANONICAL_PATTERNS
        .iter()
        .filter_map(|(source, target)| FieldPattern::new(source, target).ok())
        .collect()
});

/// A pair of regexes; a source/target pair matches when each name matches
/// its side. Patterns are applied to lowercased names and are unanchored.
#[derive(Debug, Clone)]
pub struct FieldPattern {
    source: Regex,
    target: Regex,
}

impl FieldPattern {
    pub fn new(source: &str, target: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            source: Regex::new(source)?,
            target: Regex::new(target)?,
        })
    }

    pub fn matches(&self, source: &str, target: &str) -> bool {
        self.source.is_match(source) && self.target.is_match(target)
    }
}

/// Rule-based similarity provider.
#[derive(Debug, Clone)]
pub struct RuleBasedProvider {
    patterns: Vec<FieldPattern>,
}

impl Default for RuleBasedProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleBasedProvider {
    /// Creates a provider with the canonical pattern table.
    pub fn new() -> Self {
        Self {
            patterns: DEFAULT_PATTERNS.clone(),
        }
    }

    /// Creates a provider with the canonical table followed by `extra`.
    pub fn with_patterns(extra: impl IntoIterator<Item = FieldPattern>) -> Self {
        let mut provider = Self::new();
        provider.patterns.extend(extra);
        provider
    }

    pub fn patterns(&self) -> &[FieldPattern] {
        &self.patterns
    }

    /// Scores one pair of names.
    pub fn score(&self, source: &str, target: &str) -> f64 {
        let source = fold_name(source);
        let target = fold_name(target);
        if source == target {
            return EXACT_SCORE;
        }

        let mut score: f64 = 0.0;
        if self.patterns.iter().any(|p| p.matches(&source, &target)) {
            score = score.max(PATTERN_SCORE);
        }
        if source.contains(target.as_str()) || target.contains(source.as_str()) {
            score = score.max(SUBSTRING_SCORE);
        }
        score.max(WORD_OVERLAP_SCALE * word_jaccard(&source, &target))
    }
}

impl SimilarityProvider for RuleBasedProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::RuleBased
    }

    fn compute_matrix(&self, sources: &[&str], targets: &[&str]) -> SimilarityMatrix {
        pairwise_matrix(sources, targets, |source, target| self.score(source, target))
    }
}

fn word_jaccard(a: &str, b: &str) -> f64 {
    let a: BTreeSet<&str> = a.split_whitespace().collect();
    let b: BTreeSet<&str> = b.split_whitespace().collect();
    let union = a.union(&b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(&b).count() as f64 / union as f64
}

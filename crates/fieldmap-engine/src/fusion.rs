//! Fusion of per-provider similarity scores into one confidence value.
//!
//! ```text
//! confidence = Σ w_p · s_p / Σ w_p + 0.1 · type_bonus      (clamped to [0, 1])
//! ```
//!
//! Only active providers take part in both sums. With no active provider,
//! or a zero total weight, every pair scores 0.

use fieldmap_model::{FieldType, clamp_unit};

use crate::config::MatcherConfig;
use crate::providers::ProviderKind;

/// Scale applied to the type bonus before it is added.
pub const TYPE_BONUS_SCALE: f64 = 0.1;
/// Bonus when both sides declare the same type.
pub const SAME_TYPE_BONUS: f64 = 0.2;

/// Loosely compatible type pairs, checked in both directions.
const TYPE_COMPATIBILITY: &[(FieldType, FieldType, f64)] = &[
    (FieldType::Text, FieldType::Name, 0.1),
    (FieldType::Text, FieldType::Address, 0.1),
    (FieldType::Number, FieldType::Currency, 0.15),
    (FieldType::Text, FieldType::Email, 0.1),
    (FieldType::Text, FieldType::Phone, 0.1),
];

/// Bonus for the declared types of a source/target pair.
pub fn type_bonus(source: FieldType, target: FieldType) -> f64 {
    if source == target {
        return SAME_TYPE_BONUS;
    }
    TYPE_COMPATIBILITY
        .iter()
        .find(|(a, b, _)| (*a == source && *b == target) || (*a == target && *b == source))
        .map_or(0.0, |(_, _, bonus)| *bonus)
}

/// Weighted combination of provider scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreFusion {
    lexical: f64,
    semantic: f64,
    rule_based: f64,
}

impl ScoreFusion {
    pub fn new(config: &MatcherConfig) -> Self {
        Self {
            lexical: config.weight(ProviderKind::Lexical),
            semantic: config.weight(ProviderKind::Semantic),
            rule_based: config.weight(ProviderKind::RuleBased),
        }
    }

    pub fn weight(&self, kind: ProviderKind) -> f64 {
        match kind {
            ProviderKind::Lexical => self.lexical,
            ProviderKind::Semantic => self.semantic,
            ProviderKind::RuleBased => self.rule_based,
        }
    }

    /// Fuses the raw scores of the active providers for one pair.
    pub fn fuse(&self, signals: &[(ProviderKind, f64)], type_bonus: f64) -> f64 {
        let (weighted, total) = signals
            .iter()
            .fold((0.0, 0.0), |(weighted, total), (kind, score)| {
                let weight = self.weight(*kind);
                (weighted + weight * clamp_unit(*score), total + weight)
            });
        if total <= 0.0 {
            return 0.0;
        }
        clamp_unit(weighted / total + TYPE_BONUS_SCALE * type_bonus)
    }
}

//! Mapping types produced by the matching engine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::field::FieldType;

/// Which similarity signal dominated a mapping's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchingStrategy {
    Exact,
    Fuzzy,
    Semantic,
    RuleBased,
    MlClassification,
    Hybrid,
}

impl MatchingStrategy {
    pub const ALL: [MatchingStrategy; 6] = [
        MatchingStrategy::Exact,
        MatchingStrategy::Fuzzy,
        MatchingStrategy::Semantic,
        MatchingStrategy::RuleBased,
        MatchingStrategy::MlClassification,
        MatchingStrategy::Hybrid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchingStrategy::Exact => "exact",
            MatchingStrategy::Fuzzy => "fuzzy",
            MatchingStrategy::Semantic => "semantic",
            MatchingStrategy::RuleBased => "rule_based",
            MatchingStrategy::MlClassification => "ml_classification",
            MatchingStrategy::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for MatchingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchingStrategy {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        MatchingStrategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == normalized)
            .ok_or_else(|| ModelError::UnknownStrategy(s.to_string()))
    }
}

/// Raw per-signal scores behind a fused confidence.
///
/// A signal that was not active for the call is `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub lexical: Option<f64>,
    pub semantic: Option<f64>,
    pub rule_based: Option<f64>,
    /// Type compatibility bonus before the fusion scale factor.
    pub type_bonus: f64,
}

impl ScoreBreakdown {
    /// Human-readable explanation of the score.
    pub fn explain(&self) -> String {
        let signals = [
            ("Lexical", self.lexical),
            ("Semantic", self.semantic),
            ("Rule", self.rule_based),
        ];
        let mut parts: Vec<String> = signals
            .iter()
            .filter_map(|(name, value)| value.map(|v| format!("{name}: {:.0}%", v * 100.0)))
            .collect();
        if self.type_bonus > 0.0 {
            parts.push(format!("Type bonus: {:.2}", self.type_bonus));
        }
        parts.join("; ")
    }
}

/// Details recorded alongside a mapping for explainability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MappingMetadata {
    /// Declared type of the source field.
    pub source_type: FieldType,
    /// Declared type of the target field.
    pub target_type: FieldType,
    pub breakdown: ScoreBreakdown,
}

/// A scored correspondence from a source field to a target field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Source field name from the extracted document.
    pub source_field: String,
    /// Target field name from the destination schema.
    pub target_field: String,
    /// Fused confidence (0.0 to 1.0).
    pub confidence: f64,
    /// Inferred semantic type for the mapped value.
    pub field_type: FieldType,
    /// Dominant signal behind the score.
    pub strategy: MatchingStrategy,
    #[serde(default)]
    pub metadata: MappingMetadata,
}

impl FieldMapping {
    /// Creates a mapping with empty metadata. The confidence is clamped to [0, 1].
    pub fn new(
        source_field: impl Into<String>,
        target_field: impl Into<String>,
        confidence: f64,
        field_type: FieldType,
        strategy: MatchingStrategy,
    ) -> Self {
        Self {
            source_field: source_field.into(),
            target_field: target_field.into(),
            confidence: clamp_unit(confidence),
            field_type,
            strategy,
            metadata: MappingMetadata::default(),
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: MappingMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Clamps a score into [0, 1], mapping NaN and negative zero to 0.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() || value <= 0.0 {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

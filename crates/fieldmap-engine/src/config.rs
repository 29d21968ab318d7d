//! Engine configuration.
//!
//! Options not present in a configuration document fall back to their
//! defaults and unrecognized keys are ignored. Values are checked by
//! [`MatcherConfig::validate`] before the engine accepts them; nothing is
//! silently clamped into range.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::providers::ProviderKind;

/// Default candidate floor.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.7;
/// Default final-selection floor.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.6;
pub const DEFAULT_FUZZY_WEIGHT: f64 = 0.3;
pub const DEFAULT_SEMANTIC_WEIGHT: f64 = 0.4;
pub const DEFAULT_RULE_WEIGHT: f64 = 0.3;
/// Default per-source candidate cap.
pub const DEFAULT_MAX_SUGGESTIONS: usize = 5;

/// Scoring configuration for [`crate::FieldMapper`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Minimum fused confidence for a pair to become a candidate.
    pub similarity_threshold: f64,
    /// Minimum fused confidence for a source's best candidate to be returned.
    pub confidence_threshold: f64,
    pub enable_semantic_matching: bool,
    pub enable_fuzzy_matching: bool,
    pub enable_rule_based: bool,
    pub fuzzy_ratio_weight: f64,
    pub semantic_weight: f64,
    pub rule_weight: f64,
    /// Maximum number of ranked candidates kept per source field.
    pub max_suggestions: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            enable_semantic_matching: true,
            enable_fuzzy_matching: true,
            enable_rule_based: true,
            fuzzy_ratio_weight: DEFAULT_FUZZY_WEIGHT,
            semantic_weight: DEFAULT_SEMANTIC_WEIGHT,
            rule_weight: DEFAULT_RULE_WEIGHT,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
        }
    }
}

impl MatcherConfig {
    /// Parses a JSON configuration document and validates it.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(text).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks thresholds, weights, and the candidate cap.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_threshold("similarity_threshold", self.similarity_threshold)?;
        check_threshold("confidence_threshold", self.confidence_threshold)?;
        check_weight("fuzzy_ratio_weight", self.fuzzy_ratio_weight)?;
        check_weight("semantic_weight", self.semantic_weight)?;
        check_weight("rule_weight", self.rule_weight)?;
        if self.max_suggestions == 0 {
            return Err(ConfigError::ZeroSuggestions);
        }
        let enabled: Vec<ProviderKind> = ProviderKind::ALL
            .into_iter()
            .filter(|kind| self.is_enabled(*kind))
            .collect();
        if !enabled.is_empty() && enabled.iter().map(|kind| self.weight(*kind)).sum::<f64>() == 0.0
        {
            return Err(ConfigError::ZeroTotalWeight);
        }
        Ok(())
    }

    /// Fusion weight configured for a provider kind.
    pub fn weight(&self, kind: ProviderKind) -> f64 {
        match kind {
            ProviderKind::Lexical => self.fuzzy_ratio_weight,
            ProviderKind::Semantic => self.semantic_weight,
            ProviderKind::RuleBased => self.rule_weight,
        }
    }

    pub fn is_enabled(&self, kind: ProviderKind) -> bool {
        match kind {
            ProviderKind::Lexical => self.enable_fuzzy_matching,
            ProviderKind::Semantic => self.enable_semantic_matching,
            ProviderKind::RuleBased => self.enable_rule_based,
        }
    }

    #[must_use]
    pub fn with_similarity_threshold(mut self, value: f64) -> Self {
        self.similarity_threshold = value;
        self
    }

    #[must_use]
    pub fn with_confidence_threshold(mut self, value: f64) -> Self {
        self.confidence_threshold = value;
        self
    }

    /// Sets both floors at once.
    #[must_use]
    pub fn with_thresholds(self, similarity: f64, confidence: f64) -> Self {
        self.with_similarity_threshold(similarity)
            .with_confidence_threshold(confidence)
    }

    #[must_use]
    pub fn with_provider(mut self, kind: ProviderKind, enabled: bool) -> Self {
        match kind {
            ProviderKind::Lexical => self.enable_fuzzy_matching = enabled,
            ProviderKind::Semantic => self.enable_semantic_matching = enabled,
            ProviderKind::RuleBased => self.enable_rule_based = enabled,
        }
        self
    }

    #[must_use]
    pub fn with_weight(mut self, kind: ProviderKind, weight: f64) -> Self {
        match kind {
            ProviderKind::Lexical => self.fuzzy_ratio_weight = weight,
            ProviderKind::Semantic => self.semantic_weight = weight,
            ProviderKind::RuleBased => self.rule_weight = weight,
        }
        self
    }

    #[must_use]
    pub fn with_max_suggestions(mut self, value: usize) -> Self {
        self.max_suggestions = value;
        self
    }
}

fn check_threshold(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ThresholdOutOfRange { name, value })
    }
}

fn check_weight(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidWeight { name, value })
    }
}

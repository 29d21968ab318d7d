//! Mapping reports.

use std::cmp::Ordering;

use fieldmap_model::FieldMapping;

use crate::resolve::ConflictRecord;

/// Full result of a mapping run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappingReport {
    /// Final mappings, in source input order.
    pub mappings: Vec<FieldMapping>,
    /// Source fields without a surviving mapping, in input order.
    pub unmapped_sources: Vec<String>,
    /// Targets that more than one source competed for.
    pub conflicts: Vec<ConflictRecord>,
}

impl MappingReport {
    /// Mappings at or above `min_confidence`, e.g. to split auto-accepted
    /// mappings from ones that need review.
    #[must_use]
    pub fn at_least(&self, min_confidence: f64) -> Vec<&FieldMapping> {
        self.mappings
            .iter()
            .filter(|m| m.confidence >= min_confidence)
            .collect()
    }

    #[must_use]
    pub fn min_confidence(&self) -> Option<f64> {
        self.mappings
            .iter()
            .map(|m| m.confidence)
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
    }

    #[must_use]
    pub fn max_confidence(&self) -> Option<f64> {
        self.mappings
            .iter()
            .map(|m| m.confidence)
            .max_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
    }

    #[must_use]
    pub fn mean_confidence(&self) -> Option<f64> {
        if self.mappings.is_empty() {
            return None;
        }
        let sum: f64 = self.mappings.iter().map(|m| m.confidence).sum();
        Some(sum / self.mappings.len() as f64)
    }

    /// Looks up the target chosen for a source field.
    #[must_use]
    pub fn target_for(&self, source: &str) -> Option<&str> {
        self.mappings
            .iter()
            .find(|m| m.source_field == source)
            .map(|m| m.target_field.as_str())
    }
}

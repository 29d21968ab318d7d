//! Many-to-one conflict resolution.
//!
//! When several source fields pick the same target, only the mapping with
//! the highest confidence survives. Equal confidences keep the mapping that
//! appears first in the input. Survivors keep their input order, so
//! resolving an already resolved list returns it unchanged.

use std::collections::BTreeMap;

use fieldmap_model::FieldMapping;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Diagnostic for one target claimed by more than one source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictRecord {
    /// Contested target field.
    pub target: String,
    /// Source field whose mapping was kept.
    pub kept: String,
    /// Confidence of the kept mapping.
    pub kept_confidence: f64,
    /// Source fields whose mappings were dropped, in input order.
    pub discarded: Vec<String>,
}

/// Outcome of conflict resolution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// Surviving mappings; each target appears at most once.
    pub mappings: Vec<FieldMapping>,
    pub conflicts: Vec<ConflictRecord>,
}

/// Collapses mappings that share a target down to the most confident one.
pub fn resolve_conflicts(mappings: Vec<FieldMapping>) -> Resolution {
    let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    let mut first_seen: Vec<&str> = Vec::new();
    for (idx, mapping) in mappings.iter().enumerate() {
        let members = groups.entry(mapping.target_field.as_str()).or_default();
        if members.is_empty() {
            first_seen.push(mapping.target_field.as_str());
        }
        members.push(idx);
    }

    let mut keep = vec![false; mappings.len()];
    let mut conflicts = Vec::new();
    for target in first_seen {
        let Some(members) = groups.get(target) else {
            continue;
        };
        let Some(winner) = members
            .iter()
            .copied()
            .reduce(|best, idx| {
                if mappings[idx].confidence > mappings[best].confidence {
                    idx
                } else {
                    best
                }
            })
        else {
            continue;
        };
        keep[winner] = true;

        if members.len() > 1 {
            let discarded: Vec<String> = members
                .iter()
                .filter(|idx| **idx != winner)
                .map(|idx| mappings[*idx].source_field.clone())
                .collect();
            let record = ConflictRecord {
                target: target.to_string(),
                kept: mappings[winner].source_field.clone(),
                kept_confidence: mappings[winner].confidence,
                discarded,
            };
            warn!(
                target = %record.target,
                kept = %record.kept,
                confidence = record.kept_confidence,
                discarded = ?record.discarded,
                "resolved mapping conflict"
            );
            conflicts.push(record);
        }
    }

    let mappings = mappings
        .into_iter()
        .zip(keep)
        .filter_map(|(mapping, kept)| kept.then_some(mapping))
        .collect();
    Resolution {
        mappings,
        conflicts,
    }
}

#[cfg(test)]
mod tests {
    use fieldmap_model::{FieldType, MatchingStrategy};

    use super::*;

    fn mapping(source: &str, target: &str, confidence: f64) -> FieldMapping {
        FieldMapping::new(
            source,
            target,
            confidence,
            FieldType::Text,
            MatchingStrategy::Fuzzy,
        )
    }

    #[test]
    fn keeps_highest_confidence() {
        let resolution = resolve_conflicts(vec![
            mapping("doc_field1", "form_field", 0.8),
            mapping("doc_field2", "form_field", 0.7),
        ]);
        assert_eq!(resolution.mappings.len(), 1);
        assert_eq!(resolution.mappings[0].source_field, "doc_field1");
        assert_eq!(resolution.mappings[0].confidence, 0.8);
        assert_eq!(
            resolution.conflicts,
            vec![ConflictRecord {
                target: "form_field".to_string(),
                kept: "doc_field1".to_string(),
                kept_confidence: 0.8,
                discarded: vec!["doc_field2".to_string()],
            }]
        );
    }

    #[test]
    fn later_higher_confidence_wins() {
        let resolution = resolve_conflicts(vec![
            mapping("a", "t", 0.6),
            mapping("b", "t", 0.9),
            mapping("c", "t", 0.7),
        ]);
        assert_eq!(resolution.mappings.len(), 1);
        assert_eq!(resolution.mappings[0].source_field, "b");
        assert_eq!(resolution.conflicts[0].discarded, vec!["a", "c"]);
    }

    #[test]
    fn ties_keep_earliest_source() {
        let resolution = resolve_conflicts(vec![mapping("x", "t", 0.75), mapping("y", "t", 0.75)]);
        assert_eq!(resolution.mappings[0].source_field, "x");
    }

    #[test]
    fn unique_targets_pass_through_in_order() {
        let input = vec![mapping("b", "t2", 0.7), mapping("a", "t1", 0.9)];
        let resolution = resolve_conflicts(input.clone());
        assert_eq!(resolution.mappings, input);
        assert!(resolution.conflicts.is_empty());
    }

    #[test]
    fn resolution_is_idempotent() {
        let once = resolve_conflicts(vec![
            mapping("a", "t1", 0.7),
            mapping("b", "t1", 0.8),
            mapping("c", "t2", 0.9),
        ]);
        let twice = resolve_conflicts(once.mappings.clone());
        assert_eq!(twice.mappings, once.mappings);
        assert!(twice.conflicts.is_empty());
    }

    #[test]
    fn empty_input_is_empty() {
        assert_eq!(resolve_conflicts(Vec::new()), Resolution::default());
    }
}

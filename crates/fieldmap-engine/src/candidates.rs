//! Candidate generation: fused scoring, floor filtering, and ranking of the
//! targets for each source field.

use fieldmap_model::{
    FieldMapping, MappingMetadata, MatchingStrategy, ScoreBreakdown, SourceField, TargetField,
};

use crate::fusion::{ScoreFusion, type_bonus};
use crate::inference::infer_field_type;
use crate::matrix::SimilarityMatrix;
use crate::providers::ProviderKind;

/// Raw scores closer than this are treated as equal.
pub const TIE_TOLERANCE: f64 = 1e-9;
/// A dominant provider ahead of the runner-up by less than this (but more
/// than [`TIE_TOLERANCE`]) is reported as [`MatchingStrategy::Hybrid`].
pub const HYBRID_MARGIN: f64 = 0.01;

/// One similarity matrix per active provider, in provider order.
pub type ProviderMatrices = Vec<(ProviderKind, SimilarityMatrix)>;

/// Picks the strategy tag for a pair from its raw provider scores.
///
/// The highest raw score wins; equal scores go to the provider with the
/// higher [`ProviderKind::priority`]. A winner within [`HYBRID_MARGIN`] of
/// the runner-up is tagged `Hybrid`. Without any signal the tag is `Exact`.
pub fn dominant_strategy(signals: &[(ProviderKind, f64)]) -> MatchingStrategy {
    let Some(mut best) = signals.first().copied() else {
        return MatchingStrategy::Exact;
    };
    for &(kind, score) in &signals[1..] {
        let ahead = score > best.1 + TIE_TOLERANCE;
        let tied = (score - best.1).abs() <= TIE_TOLERANCE;
        if ahead || (tied && kind.priority() > best.0.priority()) {
            best = (kind, score);
        }
    }
    let runner_up = signals
        .iter()
        .filter(|(kind, _)| *kind != best.0)
        .map(|(_, score)| *score)
        .fold(None, |acc: Option<f64>, score| {
            Some(acc.map_or(score, |a| a.max(score)))
        });
    if let Some(runner_up) = runner_up {
        let margin = best.1 - runner_up;
        if margin > TIE_TOLERANCE && margin < HYBRID_MARGIN {
            return MatchingStrategy::Hybrid;
        }
    }
    best.0.strategy()
}

/// Scores source/target pairs and ranks the candidates of each source.
#[derive(Debug, Clone, Copy)]
pub struct CandidateGenerator {
    fusion: ScoreFusion,
    similarity_threshold: f64,
    max_suggestions: usize,
}

impl CandidateGenerator {
    pub fn new(fusion: ScoreFusion, similarity_threshold: f64, max_suggestions: usize) -> Self {
        Self {
            fusion,
            similarity_threshold,
            max_suggestions,
        }
    }

    /// Builds the mapping for pair (`i`, `j`) without applying any floor.
    pub fn score_pair(
        &self,
        matrices: &[(ProviderKind, SimilarityMatrix)],
        i: usize,
        j: usize,
        source: &SourceField,
        target: &TargetField,
    ) -> FieldMapping {
        let signals: Vec<(ProviderKind, f64)> = matrices
            .iter()
            .map(|(kind, matrix)| (*kind, matrix.get(i, j)))
            .collect();
        let bonus = type_bonus(source.declared_type, target.declared_type);
        let confidence = self.fusion.fuse(&signals, bonus);

        let mut breakdown = ScoreBreakdown {
            type_bonus: bonus,
            ..ScoreBreakdown::default()
        };
        for (kind, score) in &signals {
            match kind {
                ProviderKind::Lexical => breakdown.lexical = Some(*score),
                ProviderKind::Semantic => breakdown.semantic = Some(*score),
                ProviderKind::RuleBased => breakdown.rule_based = Some(*score),
            }
        }

        FieldMapping::new(
            source.name.clone(),
            target.name.clone(),
            confidence,
            infer_field_type(source, target),
            dominant_strategy(&signals),
        )
        .with_metadata(MappingMetadata {
            source_type: source.declared_type,
            target_type: target.declared_type,
            breakdown,
        })
    }

    /// Ranked candidates for source `i`: pairs at or above the similarity
    /// floor, highest confidence first, capped at `max_suggestions`.
    ///
    /// Equal confidences keep target input order.
    pub fn candidates(
        &self,
        matrices: &[(ProviderKind, SimilarityMatrix)],
        i: usize,
        source: &SourceField,
        targets: &[TargetField],
    ) -> Vec<FieldMapping> {
        let mut candidates: Vec<FieldMapping> = targets
            .iter()
            .enumerate()
            .map(|(j, target)| self.score_pair(matrices, i, j, source, target))
            .filter(|mapping| mapping.confidence >= self.similarity_threshold)
            .collect();
        candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        candidates.truncate(self.max_suggestions);
        candidates
    }
}

#[cfg(test)]
mod tests {
    use fieldmap_model::FieldType;

    use super::*;
    use crate::config::MatcherConfig;

    fn generator(similarity_threshold: f64, max_suggestions: usize) -> CandidateGenerator {
        CandidateGenerator::new(
            ScoreFusion::new(&MatcherConfig::default()),
            similarity_threshold,
            max_suggestions,
        )
    }

    fn single_row(kind: ProviderKind, row: Vec<f64>) -> ProviderMatrices {
        let cols = row.len();
        vec![(kind, SimilarityMatrix::from_rows(vec![row], cols))]
    }

    #[test]
    fn no_signals_is_exact() {
        assert_eq!(dominant_strategy(&[]), MatchingStrategy::Exact);
    }

    #[test]
    fn highest_raw_score_dominates() {
        let signals = [
            (ProviderKind::Lexical, 0.95),
            (ProviderKind::Semantic, 0.40),
            (ProviderKind::RuleBased, 0.90),
        ];
        assert_eq!(dominant_strategy(&signals), MatchingStrategy::Fuzzy);
    }

    #[test]
    fn exact_ties_follow_priority() {
        let signals = [
            (ProviderKind::Lexical, 1.0),
            (ProviderKind::Semantic, 1.0),
            (ProviderKind::RuleBased, 1.0),
        ];
        assert_eq!(dominant_strategy(&signals), MatchingStrategy::RuleBased);
        let signals = [(ProviderKind::Lexical, 0.8), (ProviderKind::Semantic, 0.8)];
        assert_eq!(dominant_strategy(&signals), MatchingStrategy::Semantic);
    }

    #[test]
    fn near_ties_are_hybrid() {
        let signals = [(ProviderKind::Lexical, 0.805), (ProviderKind::RuleBased, 0.8)];
        assert_eq!(dominant_strategy(&signals), MatchingStrategy::Hybrid);
    }

    #[test]
    fn single_provider_is_never_hybrid() {
        let signals = [(ProviderKind::Semantic, 0.3)];
        assert_eq!(dominant_strategy(&signals), MatchingStrategy::Semantic);
    }

    #[test]
    fn candidates_are_filtered_sorted_and_capped() {
        let source = SourceField::new("src", FieldType::Text);
        let targets: Vec<TargetField> = ["a", "b", "c", "d"]
            .iter()
            .map(|name| TargetField::new(*name, FieldType::Text))
            .collect();
        // Same-type bonus adds 0.02 to each score.
        let matrices = single_row(ProviderKind::Lexical, vec![0.5, 0.9, 0.7, 0.8]);

        let ranked = generator(0.7, 2).candidates(&matrices, 0, &source, &targets);
        let names: Vec<&str> = ranked.iter().map(|m| m.target_field.as_str()).collect();
        assert_eq!(names, vec!["b", "d"]);
        assert!((ranked[0].confidence - 0.92).abs() < 1e-9);
    }

    #[test]
    fn equal_confidences_keep_target_order() {
        let source = SourceField::named("src");
        let targets = vec![TargetField::named("first"), TargetField::named("second")];
        let matrices = single_row(ProviderKind::RuleBased, vec![0.8, 0.8]);
        let ranked = generator(0.0, 5).candidates(&matrices, 0, &source, &targets);
        assert_eq!(ranked[0].target_field, "first");
        assert_eq!(ranked[1].target_field, "second");
    }

    #[test]
    fn score_pair_records_breakdown() {
        let source = SourceField::new("amount", FieldType::Number);
        let target = TargetField::new("total", FieldType::Currency);
        let matrices = single_row(ProviderKind::RuleBased, vec![0.7]);
        let mapping = generator(0.0, 5).score_pair(&matrices, 0, 0, &source, &target);
        assert_eq!(mapping.metadata.breakdown.rule_based, Some(0.7));
        assert_eq!(mapping.metadata.breakdown.lexical, None);
        assert_eq!(mapping.metadata.breakdown.type_bonus, 0.15);
        assert_eq!(mapping.field_type, FieldType::Currency);
        assert_eq!(mapping.strategy, MatchingStrategy::RuleBased);
        assert!((mapping.confidence - 0.715).abs() < 1e-9);
    }
}

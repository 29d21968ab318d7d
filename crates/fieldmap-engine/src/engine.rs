//! Mapping engine entry point.

use std::collections::BTreeSet;
use std::sync::Arc;

use fieldmap_model::{FieldMapping, SourceField, TargetField};
use tracing::{debug, info, warn};

use crate::candidates::{CandidateGenerator, ProviderMatrices};
use crate::config::MatcherConfig;
use crate::error::{ConfigError, EngineError, Result};
use crate::fusion::ScoreFusion;
use crate::matrix::SimilarityMatrix;
use crate::providers::{ProviderKind, SimilarityProvider, TextEmbedder, build_providers};
use crate::report::MappingReport;
use crate::resolve::resolve_conflicts;

/// Engine for mapping source document fields to target schema fields.
///
/// Every active provider scores all source/target name pairs; the scores
/// are fused into one confidence per pair, filtered by the similarity
/// floor, and ranked. The best candidate of each source that also clears
/// the confidence floor goes through conflict resolution, so each target
/// is assigned at most once.
///
/// The engine keeps no state between calls besides its configuration and
/// providers.
///
/// # Example
///
/// ```ignore
/// use fieldmap_engine::{FieldMapper, MatcherConfig};
/// use fieldmap_model::{FieldType, SourceField, TargetField};
///
/// let mapper = FieldMapper::new(MatcherConfig::default())?;
/// let mappings = mapper.map_fields(
///     &[SourceField::new("first_name", FieldType::Name)],
///     &[TargetField::new("firstName", FieldType::Name)],
/// );
/// ```
pub struct FieldMapper {
    config: MatcherConfig,
    generator: CandidateGenerator,
    providers: Vec<Box<dyn SimilarityProvider>>,
}

impl FieldMapper {
    /// Creates an engine with the built-in providers enabled in `config`.
    ///
    /// Semantic matching, when enabled, uses the TF-IDF similarity.
    pub fn new(config: MatcherConfig) -> Result<Self> {
        let providers = build_providers(&config, None);
        Self::with_providers(config, providers)
    }

    /// Creates an engine whose semantic provider consults `embedder`.
    pub fn with_embedder(config: MatcherConfig, embedder: Arc<dyn TextEmbedder>) -> Result<Self> {
        let providers = build_providers(&config, Some(embedder));
        Self::with_providers(config, providers)
    }

    /// Creates an engine from a caller-supplied provider set.
    ///
    /// The providers replace the `enable_*` switches; fusion weights still
    /// come from `config`. At most one provider per kind is accepted.
    pub fn with_providers(
        config: MatcherConfig,
        providers: Vec<Box<dyn SimilarityProvider>>,
    ) -> Result<Self> {
        config.validate()?;
        let mut kinds = BTreeSet::new();
        for provider in &providers {
            if !kinds.insert(provider.kind()) {
                return Err(EngineError::DuplicateProvider(provider.kind()));
            }
        }
        let total_weight: f64 = kinds.iter().map(|kind| config.weight(*kind)).sum();
        if !kinds.is_empty() && total_weight <= 0.0 {
            return Err(ConfigError::ZeroTotalWeight.into());
        }

        let generator = CandidateGenerator::new(
            ScoreFusion::new(&config),
            config.similarity_threshold,
            config.max_suggestions,
        );
        Ok(Self {
            config,
            generator,
            providers,
        })
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Kinds of the active providers, in evaluation order.
    pub fn provider_kinds(&self) -> Vec<ProviderKind> {
        self.providers.iter().map(|p| p.kind()).collect()
    }

    /// Maps source fields to target fields.
    ///
    /// Returns at most one mapping per source and per target, in source
    /// input order. Empty inputs produce an empty result.
    pub fn map_fields(&self, sources: &[SourceField], targets: &[TargetField]) -> Vec<FieldMapping> {
        self.map_with_report(sources, targets).mappings
    }

    /// Maps source fields and reports unmapped sources and conflicts.
    pub fn map_with_report(&self, sources: &[SourceField], targets: &[TargetField]) -> MappingReport {
        let unmapped_all = || sources.iter().map(|s| s.name.clone()).collect();
        if sources.is_empty() || targets.is_empty() {
            return MappingReport {
                unmapped_sources: unmapped_all(),
                ..MappingReport::default()
            };
        }

        let matrices = self.compute_matrices(sources, targets);
        let mut best = Vec::new();
        for (i, source) in sources.iter().enumerate() {
            let candidates = self.generator.candidates(&matrices, i, source, targets);
            match candidates.into_iter().next() {
                Some(top) if top.confidence >= self.config.confidence_threshold => {
                    best.push(top);
                }
                Some(top) => debug!(
                    source = %source.name,
                    target = %top.target_field,
                    confidence = top.confidence,
                    "best candidate below confidence threshold"
                ),
                None => debug!(source = %source.name, "no candidate above similarity threshold"),
            }
        }

        let resolution = resolve_conflicts(best);
        for mapping in &resolution.mappings {
            info!(
                source = %mapping.source_field,
                target = %mapping.target_field,
                confidence = mapping.confidence,
                strategy = %mapping.strategy,
                "mapped field"
            );
        }

        let mapped: BTreeSet<&str> = resolution
            .mappings
            .iter()
            .map(|m| m.source_field.as_str())
            .collect();
        let unmapped_sources = sources
            .iter()
            .filter(|s| !mapped.contains(s.name.as_str()))
            .map(|s| s.name.clone())
            .collect();

        MappingReport {
            mappings: resolution.mappings,
            unmapped_sources,
            conflicts: resolution.conflicts,
        }
    }

    /// Ranked candidates for one source field, before the confidence floor
    /// and conflict resolution.
    pub fn suggest(&self, source: &SourceField, targets: &[TargetField]) -> Vec<FieldMapping> {
        if targets.is_empty() {
            return Vec::new();
        }
        let sources = std::slice::from_ref(source);
        let matrices = self.compute_matrices(sources, targets);
        self.generator.candidates(&matrices, 0, source, targets)
    }

    /// Scores a single pair without applying any floor.
    pub fn score_pair(&self, source: &SourceField, target: &TargetField) -> FieldMapping {
        let sources = std::slice::from_ref(source);
        let targets = std::slice::from_ref(target);
        let matrices = self.compute_matrices(sources, targets);
        self.generator.score_pair(&matrices, 0, 0, source, target)
    }

    /// Runs every provider over the name lists, one after another. Each
    /// provider parallelizes its own rows.
    fn compute_matrices(&self, sources: &[SourceField], targets: &[TargetField]) -> ProviderMatrices {
        let source_names: Vec<&str> = sources.iter().map(|s| s.name.as_str()).collect();
        let target_names: Vec<&str> = targets.iter().map(|t| t.name.as_str()).collect();
        self.providers
            .iter()
            .map(|provider| {
                let kind = provider.kind();
                let matrix = provider.compute_matrix(&source_names, &target_names);
                if matrix.has_shape(source_names.len(), target_names.len()) {
                    debug!(provider = %kind, rows = matrix.rows(), cols = matrix.cols(), "computed similarity matrix");
                    (kind, matrix)
                } else {
                    warn!(
                        provider = %kind,
                        rows = matrix.rows(),
                        cols = matrix.cols(),
                        "provider returned a matrix of the wrong shape, scoring it as zero"
                    );
                    (kind, SimilarityMatrix::zeros(source_names.len(), target_names.len()))
                }
            })
            .collect()
    }
}

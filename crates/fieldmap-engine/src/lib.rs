//! Field mapping engine.
//!
//! Matches the fields of a source document to the fields of a target form
//! schema by fusing several similarity signals into one confidence score.
//!
//! # Module Organization
//!
//! - [`providers`]: Similarity providers (lexical, semantic, rule-based) and the provider seam
//! - [`fusion`]: Weighted score fusion and declared-type bonus
//! - [`candidates`]: Per-source candidate ranking and strategy tagging
//! - [`resolve`]: Many-to-one conflict resolution
//! - [`engine`]: [`FieldMapper`] entry point
//! - [`report`]: Mapping reports
//! - [`validate`]: Post-mapping value validation
//!
//! # Example
//!
//! ```ignore
//! use fieldmap_engine::{FieldMapper, MatcherConfig};
//! use fieldmap_model::{FieldType, SourceField, TargetField};
//!
//! let mapper = FieldMapper::new(MatcherConfig::default())?;
//! let report = mapper.map_with_report(
//!     &[SourceField::new("applicant_email", FieldType::Email)],
//!     &[TargetField::new("email", FieldType::Email)],
//! );
//! assert_eq!(report.target_for("applicant_email"), Some("email"));
//! ```

#![deny(unsafe_code)]

pub mod candidates;
pub mod config;
pub mod engine;
pub mod error;
pub mod fusion;
pub mod inference;
pub mod matrix;
pub mod providers;
pub mod report;
pub mod resolve;
pub mod utils;
pub mod validate;

pub use candidates::{CandidateGenerator, HYBRID_MARGIN, TIE_TOLERANCE, dominant_strategy};
pub use config::MatcherConfig;
pub use engine::FieldMapper;
pub use error::{ConfigError, EmbedError, EngineError, Result};
pub use fusion::{ScoreFusion, type_bonus};
pub use inference::{infer_field_type, infer_from_name};
pub use matrix::SimilarityMatrix;
pub use providers::{
    DeadlineEmbedder, LexicalProvider, ProviderKind, RuleBasedProvider, SemanticProvider,
    SimilarityProvider, TextEmbedder, build_providers,
};
pub use report::MappingReport;
pub use resolve::{ConflictRecord, Resolution, resolve_conflicts};
pub use validate::{validate, validate_mapping, validate_value};

//! Data model for field mapping: source and target fields, field types,
//! matching strategies, and the mappings the engine produces.

pub mod error;
pub mod field;
pub mod mapping;

pub use error::{ModelError, Result};
pub use field::{FieldType, SourceField, TargetField};
pub use mapping::{
    FieldMapping, MappingMetadata, MatchingStrategy, ScoreBreakdown, clamp_unit,
};

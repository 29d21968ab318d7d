//! Error types for the matching engine.

use std::time::Duration;

use thiserror::Error;

use crate::providers::ProviderKind;

/// Invalid engine configuration, rejected before any scoring happens.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A threshold lies outside [0, 1] or is not a number.
    #[error("{name} must be within [0, 1], got {value}")]
    ThresholdOutOfRange { name: &'static str, value: f64 },

    /// A fusion weight is negative or not finite.
    #[error("{name} must be a finite non-negative weight, got {value}")]
    InvalidWeight { name: &'static str, value: f64 },

    /// Every enabled provider carries a zero weight.
    #[error("enabled similarity providers have a total weight of zero")]
    ZeroTotalWeight,

    /// The candidate cap would discard every candidate.
    #[error("max_suggestions must be at least 1")]
    ZeroSuggestions,

    /// Configuration text could not be parsed.
    #[error("invalid configuration document: {0}")]
    Parse(String),
}

/// Failure reported by an embedding collaborator.
///
/// Never escapes the semantic provider; every variant triggers the
/// statistical fallback.
#[derive(Debug, Error)]
pub enum EmbedError {
    /// The backend is not loaded or cannot be reached.
    #[error("embedding backend unavailable: {0}")]
    Unavailable(String),

    /// The backend did not answer within the configured deadline.
    #[error("embedding request timed out after {0:?}")]
    Timeout(Duration),

    /// The backend returned a different number of vectors than requested.
    #[error("embedding backend returned {actual} vectors for {expected} inputs")]
    ShapeMismatch { expected: usize, actual: usize },

    /// Any other backend failure.
    #[error("embedding backend failed: {0}")]
    Backend(#[from] anyhow::Error),
}

/// Errors raised while constructing a [`crate::FieldMapper`].
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Two injected providers claim the same signal.
    #[error("more than one {0} similarity provider was supplied")]
    DuplicateProvider(ProviderKind),
}

pub type Result<T> = std::result::Result<T, EngineError>;

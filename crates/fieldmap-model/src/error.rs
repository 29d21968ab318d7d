use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("unknown field type: {0}")]
    UnknownFieldType(String),
    #[error("unknown matching strategy: {0}")]
    UnknownStrategy(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;

//! Error types for topic tracking.

use crate::types::TopicId;
use thiserror::Error;

/// Main error type for topic operations.
#[derive(Debug, Error)]
pub enum TopicError {
    #[error("Invalid topic ID: {topic} (valid range is 1..={total})")]
    InvalidTopicId { topic: TopicId, total: u32 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Corruption detected: {0}")]
    Corruption(String),

    #[error("Invalid script call: {0}")]
    Script(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for TopicError {
    fn from(e: serde_json::Error) -> Self {
        TopicError::Serialization(e.to_string())
    }
}

/// Result type for topic operations.
pub type Result<T> = std::result::Result<T, TopicError>;

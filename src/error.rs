//! Error types for the feed engine.

use thiserror::Error;

use crate::events::publisher::PublishError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeedError {
    #[error("Store error: {0}")]
    StoreError(String),
    #[error("Publish error: {0}")]
    PublishError(String),
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Scheduler error: {0}")]
    SchedulerError(String),
}

impl FeedError {
    /// Convenience constructor for store-layer failures
    pub fn store(msg: impl Into<String>) -> Self {
        Self::StoreError(msg.into())
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(error: serde_json::Error) -> Self {
        FeedError::SerializationError(format!("JSON serialization error: {error}"))
    }
}

impl From<config::ConfigError> for FeedError {
    fn from(error: config::ConfigError) -> Self {
        FeedError::ConfigurationError(error.to_string())
    }
}

impl From<PublishError> for FeedError {
    fn from(error: PublishError) -> Self {
        FeedError::PublishError(error.to_string())
    }
}

pub type FeedResult<T> = std::result::Result<T, FeedError>;

use core::result::Result as CoreResult;
use std::io::Error as IoError;

use reqwest::Error as ReqwestError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Result type for core operations.
pub type Result<T> = CoreResult<T, Error>;

/// Errors that can occur across the stadsgids libraries.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// An HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] ReqwestError),

    /// JSON serialization or deserialization failed.
    #[error("JSON serialization error: {0}")]
    Json(#[from] SerdeJsonError),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The knowledge base could not be loaded.
    #[error("Corpus load failed: {0}")]
    CorpusLoad(String),

    /// The knowledge base loaded but contained no usable documents.
    #[error("Corpus contains no documents")]
    EmptyCorpus,

    /// The embedding backend failed or returned an unusable response.
    #[error("Embedding backend error: {0}")]
    EmbeddingBackend(String),

    /// An external call exceeded its deadline.
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// A general error not covered by other variants.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Determines whether this error leaves the service in a retryable state.
    ///
    /// Initialization failures (corpus missing, embedding backend down) are
    /// always recoverable: the external dependency may come back, so a later
    /// request should attempt initialization again.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::CorpusLoad(_)
                | Self::EmptyCorpus
                | Self::EmbeddingBackend(_)
                | Self::Timeout(_)
                | Self::Http(_)
        )
    }
}

//! Core types and error handling for the stadsgids assistant.
//!
//! This crate provides the shared data model, error taxonomy, and
//! environment-based configuration used across the stadsgids workspace.
#![cfg_attr(
    test,
    allow(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::missing_panics_doc,
        reason = "Test allows"
    )
)]

/// Environment-based configuration.
pub mod config;
/// Error types and result definitions.
pub mod error;
/// Core data types for documents, embeddings, and replies.
pub mod types;

pub use config::{RetrievalConfig, ServiceConfig, TransitConfig};
pub use error::{Error, Result};
pub use types::{Document, Embedding, RetrievalReply};

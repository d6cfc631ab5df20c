//! Embedding-based retrieval over the municipal services knowledge base.
//!
//! The engine loads a small fixed corpus, embeds it once through an
//! [`EmbeddingProvider`], and answers each query by cosine similarity
//! against the cached corpus embeddings.
#![cfg_attr(
    test,
    allow(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::missing_panics_doc,
        reason = "Test allows"
    )
)]

pub mod corpus;
pub mod embedding;
pub mod ranking;
mod service;

#[cfg(test)]
pub use embedding::FakeEmbeddingClient;
pub use embedding::{EmbeddingClient, EmbeddingProvider};
pub use service::RetrievalService;

//! Embedding provider abstraction and the Ollama-backed client.

mod client;

pub use client::{EmbeddingClient, EmbeddingProvider, OllamaEmbeddingClient};

#[cfg(test)]
pub use client::FakeEmbeddingClient;

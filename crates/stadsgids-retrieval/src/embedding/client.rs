//! Embedding generation through an Ollama-served model.

use std::future::Future;
use std::time::Duration;

use ollama_rs::Ollama;
use ollama_rs::generation::embeddings::request::GenerateEmbeddingsRequest;
use stadsgids_core::{Embedding, Error, Result, RetrievalConfig};
use tokio::time::timeout;

/// Trait for generating embeddings from text.
///
/// Implementations convert whatever the backend returns into the canonical
/// [`Embedding`] type before it leaves this boundary; nothing downstream
/// ever sees a provider-native vector.
pub trait EmbeddingProvider: Send + Sync {
    /// Ensure the embedding backend is reachable and the model is present.
    ///
    /// # Errors
    /// Returns an error if the backend cannot be reached or the model is missing
    fn ensure_backend_available(&self) -> impl Future<Output = Result<()>> + Send;

    /// Generate an embedding for a single text.
    ///
    /// # Errors
    /// Returns an error if embedding generation fails or times out
    fn embed(&self, text: &str) -> impl Future<Output = Result<Embedding>> + Send;

    /// Embed multiple texts in one batch, index-aligned with the input.
    ///
    /// # Errors
    /// Returns an error if any embedding generation fails or times out
    fn embed_batch(
        &self,
        texts: Vec<String>,
    ) -> impl Future<Output = Result<Vec<Embedding>>> + Send;
}

/// Ollama embedding client.
pub struct OllamaEmbeddingClient {
    ollama: Ollama,
    model: String,
    deadline: Duration,
}

impl OllamaEmbeddingClient {
    /// Create a client from retrieval configuration.
    pub fn new(config: &RetrievalConfig) -> Self {
        Self {
            ollama: Ollama::new(config.ollama_host.clone(), 11434),
            model: config.embedding_model.clone(),
            deadline: config.embed_timeout,
        }
    }

    /// Widen a provider-native response into canonical embeddings.
    ///
    /// The count must match the request exactly: a response that is not
    /// index-aligned with its input is unusable for ranking.
    fn normalize(raw: Vec<Vec<f32>>, expected: usize) -> Result<Vec<Embedding>> {
        if raw.len() != expected {
            return Err(Error::EmbeddingBackend(format!(
                "expected {expected} embeddings, backend returned {}",
                raw.len()
            )));
        }

        Ok(raw
            .into_iter()
            .map(|vector| vector.into_iter().map(f64::from).collect())
            .collect())
    }

    /// Run a backend call under the configured deadline.
    async fn with_deadline<T, F>(&self, operation: &str, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>> + Send,
    {
        match timeout(self.deadline, call).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout(format!(
                "{operation} exceeded {:?}",
                self.deadline
            ))),
        }
    }

    async fn request_embeddings(&self, texts: Vec<String>) -> Result<Vec<Embedding>> {
        let expected = texts.len();
        let request = GenerateEmbeddingsRequest::new(self.model.clone(), texts.into());

        let response = self
            .ollama
            .generate_embeddings(request)
            .await
            .map_err(|backend_error| {
                Error::EmbeddingBackend(format!("embedding generation failed: {backend_error}"))
            })?;

        Self::normalize(response.embeddings, expected)
    }
}

impl EmbeddingProvider for OllamaEmbeddingClient {
    async fn ensure_backend_available(&self) -> Result<()> {
        let models = self
            .with_deadline("model listing", async {
                self.ollama.list_local_models().await.map_err(|error| {
                    Error::EmbeddingBackend(format!("failed to connect to Ollama: {error}"))
                })
            })
            .await?;

        let model_available = models.iter().any(|model| model.name.contains(&self.model));
        if !model_available {
            return Err(Error::EmbeddingBackend(format!(
                "embedding model '{}' not found; run: ollama pull {}",
                self.model, self.model
            )));
        }

        Ok(())
    }

    async fn embed(&self, text: &str) -> Result<Embedding> {
        let embeddings = self
            .with_deadline("query embedding", self.request_embeddings(vec![text.to_owned()]))
            .await?;

        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| Error::EmbeddingBackend("no embeddings returned".to_owned()))
    }

    async fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Embedding>> {
        if texts.is_empty() {
            return Ok(Vec::default());
        }

        self.with_deadline("batch embedding", self.request_embeddings(texts))
            .await
    }
}

/// Default embedding client type.
pub type EmbeddingClient = OllamaEmbeddingClient;

/// Test-only fake embedding provider (deterministic, hash-based).
///
/// Content-sensitive: identical texts map to identical vectors, so a query
/// equal to a document's content scores 1.0 against it.
#[cfg(test)]
pub struct FakeEmbeddingClient;

#[cfg(test)]
impl EmbeddingProvider for FakeEmbeddingClient {
    async fn ensure_backend_available(&self) -> Result<()> {
        Ok(())
    }

    async fn embed(&self, text: &str) -> Result<Embedding> {
        Ok(Self::fake_embedding(text))
    }

    async fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Embedding>> {
        Ok(texts.iter().map(|text| Self::fake_embedding(text)).collect())
    }
}

#[cfg(test)]
impl FakeEmbeddingClient {
    /// Generate a deterministic 384-dim vector from a hash of the text.
    pub fn fake_embedding(text: &str) -> Embedding {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash as _, Hasher as _};

        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let hash = hasher.finish();

        let mut vector = Vec::with_capacity(384);
        for idx in 0..384 {
            let value = ((hash.wrapping_add(idx as u64)) % 1000) as f64 / 1000.0;
            vector.push(value);
        }
        vector
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_widens_and_checks_count() {
        let raw = vec![vec![0.5_f32, 0.25], vec![1.0, 0.0]];
        let embeddings =
            OllamaEmbeddingClient::normalize(raw, 2).expect("aligned response normalizes");
        assert_eq!(embeddings.len(), 2);
        assert!((embeddings[0][0] - 0.5).abs() < f64::EPSILON);

        let short = OllamaEmbeddingClient::normalize(vec![vec![0.5_f32]], 2);
        assert!(short.is_err(), "count mismatch must be rejected");
    }

    #[tokio::test]
    async fn fake_embeddings_are_deterministic() {
        let client = FakeEmbeddingClient;
        let first = client.embed("waste collection").await.expect("embed");
        let second = client.embed("waste collection").await.expect("embed");
        assert_eq!(first, second);
        assert_eq!(first.len(), 384);

        let other = client.embed("library hours").await.expect("embed");
        assert_ne!(first, other);
    }

    #[tokio::test]
    async fn fake_batch_is_index_aligned() {
        let client = FakeEmbeddingClient;
        let batch = client
            .embed_batch(vec!["a".to_owned(), "b".to_owned()])
            .await
            .expect("batch");
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0], client.embed("a").await.expect("embed"));
        assert_eq!(batch[1], client.embed("b").await.expect("embed"));
    }
}

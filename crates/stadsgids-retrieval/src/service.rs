//! Retrieval service owning the corpus state machine.

use std::path::PathBuf;

use stadsgids_core::{Document, Embedding, Error, Result, RetrievalConfig, RetrievalReply};
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::corpus::load_corpus;
use crate::embedding::{EmbeddingClient, EmbeddingProvider};
use crate::ranking;

/// Reply when the corpus or embedding backend is unavailable.
const UNAVAILABLE_MESSAGE: &str =
    "The knowledge base is currently unavailable. Please try again later.";
/// Reply when a single query fails after the service is ready.
const QUERY_FAILED_MESSAGE: &str =
    "Your question could not be processed right now. Please try again later.";
/// Reply when ranking produced no comparable scores.
const NOTHING_RELEVANT_MESSAGE: &str =
    "I couldn't find any relevant information in the knowledge base.";
/// Reply when the best match falls below the configured threshold.
const WEAK_MATCH_MESSAGE: &str = "I found some related information, but I'm not sure it \
     directly answers your question. Could you please rephrase?";

/// Process-wide corpus state.
///
/// Either fully populated (`ready`, documents and embeddings index-aligned)
/// or fully empty. Never partially populated: initialization failures reset
/// it wholesale so the next request can retry from a clean slate.
#[derive(Default)]
struct CorpusState {
    documents: Vec<Document>,
    embeddings: Vec<Embedding>,
    ready: bool,
}

impl CorpusState {
    fn reset(&mut self) {
        self.documents = Vec::default();
        self.embeddings = Vec::default();
        self.ready = false;
    }

    fn install(&mut self, documents: Vec<Document>, embeddings: Vec<Embedding>) {
        self.documents = documents;
        self.embeddings = embeddings;
        self.ready = true;
    }
}

/// Answers natural-language questions by retrieving the single most
/// relevant knowledge base document.
///
/// Initialization is lazy: the first query (or the first query after a
/// failure) loads the corpus and embeds it in one batch. The write lock
/// makes that transition a critical section; once ready, queries only take
/// the read lock.
pub struct RetrievalService<E: EmbeddingProvider = EmbeddingClient> {
    client: E,
    corpus_path: PathBuf,
    min_score: Option<f64>,
    state: RwLock<CorpusState>,
}

impl<E: EmbeddingProvider> RetrievalService<E> {
    /// Create a service with a custom embedding provider.
    pub fn with_provider(config: &RetrievalConfig, client: E) -> Self {
        Self {
            client,
            corpus_path: config.corpus_path.clone(),
            min_score: config.min_score,
            state: RwLock::new(CorpusState::default()),
        }
    }
}

impl RetrievalService<EmbeddingClient> {
    /// Create a service backed by the default Ollama client.
    pub fn new(config: &RetrievalConfig) -> Self {
        Self::with_provider(config, EmbeddingClient::new(config))
    }
}

impl<E: EmbeddingProvider> RetrievalService<E> {
    /// Answer a single query.
    ///
    /// Infallible by contract: every failure becomes an error reply with a
    /// fixed human-readable message, while the underlying cause goes to the
    /// log. Nothing here may crash the process.
    pub async fn answer(&self, query: &str) -> RetrievalReply {
        if let Err(init_error) = self.ensure_ready().await {
            warn!("Retrieval backend unavailable: {init_error}");
            return RetrievalReply::error(UNAVAILABLE_MESSAGE);
        }

        let query_embedding = match self.client.embed(query).await {
            Ok(embedding) => embedding,
            Err(embed_error) => {
                error!("Query embedding failed: {embed_error}");
                return RetrievalReply::error(QUERY_FAILED_MESSAGE);
            }
        };

        let state = self.state.read().await;
        let Some((best_index, best_score)) = ranking::rank(&query_embedding, &state.embeddings)
        else {
            // Cannot occur once ready, but a degenerate ranking is a soft
            // miss, never an error.
            warn!("No comparable scores despite ready state");
            return RetrievalReply::success(NOTHING_RELEVANT_MESSAGE);
        };

        let best = &state.documents[best_index];
        info!(
            "Best match: '{}' (index: {best_index}, score: {best_score:.4})",
            best.title
        );

        if let Some(threshold) = self.min_score
            && best_score < threshold
        {
            info!("Score {best_score:.4} below threshold {threshold:.4}");
            return RetrievalReply::success(WEAK_MATCH_MESSAGE);
        }

        RetrievalReply::success(best.content.clone())
    }

    /// Whether the corpus is loaded and embedded.
    pub async fn is_ready(&self) -> bool {
        self.state.read().await.ready
    }

    /// Number of documents currently held, zero when not ready.
    pub async fn document_count(&self) -> usize {
        self.state.read().await.documents.len()
    }

    /// Drive the state machine to `Ready`, or leave it cleanly reset.
    ///
    /// Racing first-requests serialize on the write lock; the re-check
    /// after acquisition turns redundant attempts into no-ops.
    ///
    /// # Errors
    /// Returns an error if the corpus cannot be loaded or embedded
    async fn ensure_ready(&self) -> Result<()> {
        if self.state.read().await.ready {
            return Ok(());
        }

        let mut state = self.state.write().await;
        if state.ready {
            return Ok(());
        }

        match self.initialize().await {
            Ok((documents, embeddings)) => {
                info!(
                    "Retrieval engine ready: {} documents embedded",
                    documents.len()
                );
                state.install(documents, embeddings);
                Ok(())
            }
            Err(init_error) => {
                state.reset();
                Err(init_error)
            }
        }
    }

    /// Load and embed the corpus in one pass.
    ///
    /// # Errors
    /// Returns an error if the corpus is empty or the backend fails,
    /// leaving nothing behind for the caller to install
    async fn initialize(&self) -> Result<(Vec<Document>, Vec<Embedding>)> {
        info!("Initializing retrieval engine...");

        let documents = load_corpus(&self.corpus_path);
        if documents.is_empty() {
            return Err(Error::EmptyCorpus);
        }

        self.client.ensure_backend_available().await?;

        let contents: Vec<String> = documents
            .iter()
            .map(|document| document.content.clone())
            .collect();
        let embeddings = self.client.embed_batch(contents).await?;

        if embeddings.len() != documents.len() {
            return Err(Error::EmbeddingBackend(format!(
                "embedded {} of {} documents",
                embeddings.len(),
                documents.len()
            )));
        }

        if let Some(first) = embeddings.first() {
            let dimension = first.len();
            if dimension == 0
                || embeddings
                    .iter()
                    .any(|embedding| embedding.len() != dimension)
            {
                return Err(Error::EmbeddingBackend(
                    "backend returned inconsistent embedding dimensions".to_owned(),
                ));
            }
        }

        info!(
            "Computed {} embeddings for {} documents",
            embeddings.len(),
            documents.len()
        );
        Ok((documents, embeddings))
    }
}

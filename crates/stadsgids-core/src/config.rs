//! Configuration for the retrieval service and the transit proxy.
//!
//! Everything is read from environment variables with fallback defaults so
//! deployments can be reconfigured without a config file on disk.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Complete service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Retrieval engine configuration
    pub retrieval: RetrievalConfig,
    /// Transit proxy configuration
    pub transit: TransitConfig,
}

impl ServiceConfig {
    /// Build the full configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            retrieval: RetrievalConfig::from_env(),
            transit: TransitConfig::from_env(),
        }
    }
}

/// Configuration for the embedding retrieval engine.
#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    /// Path to the knowledge base JSON file
    pub corpus_path: PathBuf,
    /// Ollama host serving the embedding model
    pub ollama_host: String,
    /// Embedding model name
    pub embedding_model: String,
    /// Deadline for a single embedding call
    pub embed_timeout: Duration,
    /// Optional minimum similarity for a confident answer.
    ///
    /// `None` (the default) returns the best match however weak it is, so
    /// even an unrelated corpus entry is surfaced as if authoritative. Set
    /// `STADSGIDS_MIN_SCORE` to opt into the softer "not sure" reply below
    /// the threshold.
    pub min_score: Option<f64>,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            corpus_path: PathBuf::from("data/gent_services.json"),
            ollama_host: "http://localhost:11434".to_owned(),
            embedding_model: "nomic-embed-text".to_owned(),
            embed_timeout: Duration::from_secs(30),
            min_score: None,
        }
    }
}

impl RetrievalConfig {
    /// Get retrieval configuration from environment variables with fallback defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            corpus_path: env::var("STADSGIDS_CORPUS")
                .map_or(defaults.corpus_path, PathBuf::from),
            ollama_host: env::var("OLLAMA_HOST").unwrap_or(defaults.ollama_host),
            embedding_model: env::var("EMBEDDING_MODEL").unwrap_or(defaults.embedding_model),
            embed_timeout: env::var("STADSGIDS_EMBED_TIMEOUT_SECS")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .map_or(defaults.embed_timeout, Duration::from_secs),
            min_score: env::var("STADSGIDS_MIN_SCORE")
                .ok()
                .and_then(|raw| raw.parse().ok()),
        }
    }
}

/// Configuration for the De Lijn transit proxy.
#[derive(Debug, Clone)]
pub struct TransitConfig {
    /// Subscription key for the De Lijn open data API
    pub api_key: Option<String>,
    /// Base URL of the De Lijn API
    pub base_url: String,
    /// Service area used to scope disruption and schedule lookups
    pub area: String,
    /// Deadline for a single upstream request
    pub request_timeout: Duration,
}

impl Default for TransitConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.delijn.be/v1".to_owned(),
            area: "Gent".to_owned(),
            request_timeout: Duration::from_secs(15),
        }
    }
}

impl TransitConfig {
    /// Get transit configuration from environment variables with fallback defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: env::var("DE_LIJN_API_KEY").ok().filter(|key| !key.is_empty()),
            base_url: env::var("DE_LIJN_API_BASE_URL").unwrap_or(defaults.base_url),
            area: env::var("DE_LIJN_AREA").unwrap_or(defaults.area),
            request_timeout: defaults.request_timeout,
        }
    }
}

//! Knowledge base loading and validation.

use std::fs;
use std::path::Path;

use serde_json::from_str;
use stadsgids_core::{Document, Error, Result};
use tracing::{error, info};

/// Load the knowledge base from a JSON file.
///
/// Failure is fail-soft by contract: every problem (missing file, malformed
/// JSON, invalid record) is logged and collapses to an empty vector, which
/// callers treat as "no corpus available". A corrupted corpus degrades the
/// service, it must never crash it.
pub fn load_corpus(path: &Path) -> Vec<Document> {
    match try_load(path) {
        Ok(documents) => {
            info!(
                "Loaded {} documents from {}",
                documents.len(),
                path.display()
            );
            documents
        }
        Err(load_error) => {
            error!("{load_error}");
            Vec::default()
        }
    }
}

/// Read and validate the corpus file.
///
/// The file must contain a list of `{title, content}` records. Validation
/// is all-or-nothing: a single record with a missing or blank field rejects
/// the entire corpus rather than silently serving a partial one.
///
/// # Errors
/// Returns `Error::CorpusLoad` describing the first problem encountered
fn try_load(path: &Path) -> Result<Vec<Document>> {
    let raw = fs::read_to_string(path).map_err(|io_error| {
        Error::CorpusLoad(format!(
            "knowledge base file not found at {}: {io_error}",
            path.display()
        ))
    })?;

    let documents: Vec<Document> = from_str(&raw).map_err(|parse_error| {
        Error::CorpusLoad(format!(
            "could not decode knowledge base JSON from {}: {parse_error}",
            path.display()
        ))
    })?;

    if let Some(bad) = documents.iter().position(|document| !document.is_complete()) {
        return Err(Error::CorpusLoad(format!(
            "invalid record at index {bad} in {}: expected non-empty 'title' and 'content'",
            path.display()
        )));
    }

    Ok(documents)
}

use serde::{Deserialize, Serialize};

/// A single embedding vector.
///
/// Double precision throughout: embeddings run to several hundred
/// dimensions and rank order must not drift from accumulated rounding.
pub type Embedding = Vec<f64>;

/// One knowledge base entry. Identity is its position in the loaded
/// sequence, stable for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub content: String,
}

impl Document {
    pub fn new<T: Into<String>, C: Into<String>>(title: T, content: C) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// A document is usable only when both fields carry actual text.
    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty() && !self.content.trim().is_empty()
    }
}

/// Reply returned for a single retrieval query.
///
/// Serializes to the external contract:
/// `{"status":"success","answer":…}` or
/// `{"status":"error","error_message":…}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RetrievalReply {
    /// The query was answered (possibly with a soft "nothing relevant" text).
    Success {
        /// Content of the best-matching document, or a fallback message.
        answer: String,
    },
    /// The query could not be processed.
    Error {
        /// Human-readable description; never contains internal causes.
        error_message: String,
    },
}

impl RetrievalReply {
    pub fn success<T: Into<String>>(answer: T) -> Self {
        Self::Success {
            answer: answer.into(),
        }
    }

    pub fn error<T: Into<String>>(message: T) -> Self {
        Self::Error {
            error_message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

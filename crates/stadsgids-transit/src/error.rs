use thiserror::Error;

/// Failures while proxying a transit lookup, each mapped to an HTTP-style
/// status code and a user-facing message.
///
/// The `Display` text IS the user-facing message; raw upstream bodies are
/// logged by the client and never appear here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitError {
    /// The subscription key is absent from the server configuration.
    #[error("API key is not configured on the server.")]
    MissingApiKey,

    /// The caller did not satisfy the parameter contract.
    #[error("{0}")]
    MissingParameter(String),

    /// The upstream request exceeded its deadline.
    #[error("The request to the De Lijn transport API timed out.")]
    Timeout,

    /// The upstream host could not be reached at all.
    #[error("Could not connect to the De Lijn transport API.")]
    Connect,

    /// The upstream answered with a non-success HTTP status.
    #[error("{message}")]
    Upstream {
        /// Upstream HTTP status, passed through to the caller.
        status: u16,
        /// Condition-specific user-facing message.
        message: String,
    },

    /// The upstream body could not be decoded.
    #[error("Received an unreadable response from the De Lijn transport API.")]
    MalformedPayload,
}

impl TransitError {
    /// HTTP-style status code for the boundary reply.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingApiKey => 500,
            Self::MissingParameter(_) => 400,
            Self::Timeout => 504,
            Self::Connect | Self::MalformedPayload => 502,
            Self::Upstream { status, .. } => *status,
        }
    }

    /// Build the upstream-error variant for a given status code.
    ///
    /// `subject` names what was being fetched ("disruption", "schedule")
    /// and only appears in the generic fallback message.
    pub fn for_status(status: u16, subject: &str) -> Self {
        let message = match status {
            401 | 403 => {
                "Authentication failed with the De Lijn API. Please check the configured API key."
                    .to_owned()
            }
            429 => "Rate limit exceeded for the De Lijn API. Please try again later.".to_owned(),
            _ if status >= 500 => {
                "The De Lijn API seems to be having temporary issues. Please try again later."
                    .to_owned()
            }
            _ => format!("Could not retrieve {subject} data from De Lijn (Error {status})."),
        };

        Self::Upstream { status, message }
    }
}

//! Error types for the vision client.

use serde::Deserialize;

/// Result type for all client operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error body returned by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    /// The error name/type identifier.
    pub name: String,
    /// Human-readable message.
    pub message: String,
}

/// Unified error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP client/connection errors
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing errors
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Non-success response from the server
    #[error("server error: {status}{}", body.as_ref().map(|b| format!(" - {}", b.message)).unwrap_or_default())]
    Api {
        /// HTTP status code.
        status: u16,
        /// Parsed error body, when the server sent one.
        body: Option<ErrorBody>,
    },
}

impl Error {
    /// Returns true when the server judged the request invalid.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Api { status, .. } if (400..500).contains(status))
    }
}

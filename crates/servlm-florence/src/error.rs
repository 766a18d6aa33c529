//! Error types for the Florence-2 runtime client.

/// Result type for all operations in this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Unified error type for Florence-2 runtime operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP client/connection errors
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization errors when sending or receiving data
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Runtime API error response
    #[error("Runtime API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Invalid configuration
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl Error {
    /// Creates an API error.
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

impl From<Error> for servlm_core::Error {
    fn from(error: Error) -> Self {
        let core = match &error {
            Error::Http(source) if source.is_timeout() => servlm_core::Error::timeout(),
            Error::Http(source) if source.is_connect() => servlm_core::Error::network_error(),
            Error::Http(_) => servlm_core::Error::network_error(),
            Error::Serialization(_) => servlm_core::Error::serialization(),
            Error::UrlParse(_) | Error::InvalidConfig { .. } => {
                servlm_core::Error::configuration()
            }
            Error::ApiError { status, .. } if *status == 503 => {
                servlm_core::Error::service_unavailable()
            }
            Error::ApiError { .. } => servlm_core::Error::model_inference(),
        };
        core.with_message(error.to_string()).with_source(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_map_to_inference_failures() {
        let core: servlm_core::Error = Error::api_error(500, "generation failed").into();
        assert!(core.is_server_error());

        let core: servlm_core::Error = Error::api_error(503, "loading weights").into();
        assert!(core.is_retryable());
    }
}

//! HTTP error responses.
//!
//! Maps core error kinds onto status codes: validation failures are the
//! caller's to fix (4xx), inference and transport failures surface as
//! gateway-style errors (5xx).

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use servlm_core::ErrorKind;

/// Serialized error body.
#[must_use = "error responses do nothing unless serialized"]
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// The error name/type identifier
    pub name: &'static str,
    /// User-friendly error message safe for client display
    pub message: String,
    /// HTTP status code (not serialized in JSON)
    #[serde(skip)]
    pub status: StatusCode,
}

impl ErrorResponse {
    fn status_for(kind: ErrorKind) -> StatusCode {
        match kind {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::UnsupportedFormat => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ErrorKind::ModelInference | ErrorKind::NetworkError => StatusCode::BAD_GATEWAY,
            ErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ErrorKind::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::Serialization | ErrorKind::Configuration | ErrorKind::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<servlm_core::Error> for ErrorResponse {
    fn from(error: servlm_core::Error) -> Self {
        Self {
            name: error.kind_str(),
            message: error.to_string(),
            status: Self::status_for(error.kind()),
        }
    }
}

impl From<servlm_image::Error> for ErrorResponse {
    fn from(error: servlm_image::Error) -> Self {
        Self {
            name: "invalid_image",
            message: error.to_string(),
            status: StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}

//! Error types for image encoding and decoding.

use thiserror::Error as ThisError;

/// Type alias for Results with our custom Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while encoding or decoding images.
#[derive(Debug, ThisError)]
pub enum Error {
    /// The base64 payload could not be decoded.
    #[error("invalid base64 image payload")]
    Base64(#[from] base64::DecodeError),

    /// The decoded bytes are not a readable image.
    #[error("failed to decode image")]
    Decode(#[from] image::ImageError),

    /// The image format could not be determined.
    #[error("unrecognized image format")]
    UnknownFormat,
}

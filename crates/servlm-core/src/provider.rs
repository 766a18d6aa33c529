//! The inference-adapter seam.
//!
//! The actual vision-language model lives behind [`VisionProvider`]. The
//! core only requires a single operation: run the model on an image with a
//! resolved control token (plus optional free text) and hand back the raw
//! output mapping for normalization.

use std::sync::Arc;

use bytes::Bytes;

use crate::error::Result;
use crate::health::ServiceHealth;
use crate::normalize::RawModelOutput;
use crate::token::ControlToken;

/// Type alias for a boxed, shareable provider.
pub type BoxedProvider = Arc<dyn VisionProvider>;

/// Image handed to the inference adapter.
#[derive(Debug, Clone)]
pub struct ImageInput {
    /// Encoded image bytes.
    pub data: Bytes,
    /// MIME type of the image.
    pub mime_type: String,
}

impl ImageInput {
    /// Creates a new image input.
    pub fn new(data: impl Into<Bytes>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Returns the size of the encoded image in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Core trait for vision-language inference.
///
/// Implementations wrap one concrete model. Calls are synchronous from the
/// caller's point of view and may take seconds; the core imposes no timeout
/// or retry policy of its own.
#[async_trait::async_trait]
pub trait VisionProvider: Send + Sync {
    /// The identifier of the model this provider serves.
    fn model_id(&self) -> &str;

    /// Runs generation for the given control token.
    ///
    /// `text_input` is the free text appended after the token, used by
    /// token modes that accept one (e.g. open-vocabulary detection
    /// targets). Deterministic under the provider's greedy decoding policy.
    async fn infer(
        &self,
        image: &ImageInput,
        token: ControlToken,
        text_input: Option<&str>,
    ) -> Result<RawModelOutput>;

    /// Reports the health of the underlying model service.
    async fn health_check(&self) -> Result<ServiceHealth>;
}

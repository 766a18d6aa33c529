//! Mock inference provider for testing.
//!
//! Returns canned payloads keyed by the control token it is invoked with,
//! in the same raw shapes the real model emits, so the full
//! resolve → infer → normalize path can be exercised without a model
//! runtime.
//!
//! # Feature Flag
//!
//! This module is only available when the `mock` feature is enabled:
//!
//! ```toml
//! [dev-dependencies]
//! servlm-core = { version = "...", features = ["mock"] }
//! ```

use serde_json::json;

use crate::error::Result;
use crate::health::ServiceHealth;
use crate::normalize::RawModelOutput;
use crate::provider::{ImageInput, VisionProvider};
use crate::token::ControlToken;

/// Configuration for the mock provider.
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Model identifier the mock reports.
    pub model_id: String,
    /// Caption text returned for caption-family tokens.
    pub caption_text: String,
    /// Transcript returned for the plain OCR token.
    pub ocr_text: String,
    /// Label attached to detection boxes and OCR regions.
    pub label: String,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            model_id: "mock/vision-model".into(),
            caption_text: "a cat sitting on a windowsill".into(),
            ocr_text: "hello world".into(),
            label: "cat".into(),
        }
    }
}

/// Mock vision provider.
#[derive(Debug, Default, Clone)]
pub struct MockProvider {
    config: MockConfig,
}

impl MockProvider {
    /// Creates a mock provider with the given configuration.
    pub fn new(config: MockConfig) -> Self {
        Self { config }
    }

    fn payload_for(&self, token: ControlToken) -> serde_json::Value {
        match token.as_str() {
            "<CAPTION>" | "<DETAILED_CAPTION>" | "<MORE_DETAILED_CAPTION>" => {
                json!(self.config.caption_text)
            }
            "<DENSE_REGION_CAPTION>" | "<OD>" | "<OPEN_VOCABULARY_DETECTION>" => json!({
                "bboxes": [[4.0, 8.0, 128.0, 96.0]],
                "labels": [self.config.label],
            }),
            "<OCR>" => json!(self.config.ocr_text),
            "<OCR_WITH_REGION>" => json!({
                "quad_boxes": [[4.0, 8.0, 60.0, 8.0, 60.0, 24.0, 4.0, 24.0]],
                "labels": [self.config.ocr_text],
            }),
            _ => json!(null),
        }
    }
}

#[async_trait::async_trait]
impl VisionProvider for MockProvider {
    fn model_id(&self) -> &str {
        &self.config.model_id
    }

    async fn infer(
        &self,
        _image: &ImageInput,
        token: ControlToken,
        _text_input: Option<&str>,
    ) -> Result<RawModelOutput> {
        let mut output = RawModelOutput::new();
        output.insert(token.as_str().to_owned(), self.payload_for(token));
        Ok(output)
    }

    async fn health_check(&self) -> Result<ServiceHealth> {
        Ok(ServiceHealth::healthy())
    }
}

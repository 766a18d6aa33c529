//! Florence-2 provider implementation.
//!
//! Implements the [`VisionProvider`] trait on top of [`FlorenceClient`].
//! The model prompt is the control token immediately followed by the free
//! text, when the token mode takes one.

use std::time::Instant;

use servlm_core::{ControlToken, ImageInput, RawModelOutput, ServiceHealth, VisionProvider};

use crate::TRACING_TARGET_PROVIDER;
use crate::client::FlorenceClient;

/// Florence-2 vision provider.
#[derive(Debug, Clone)]
pub struct FlorenceProvider {
    client: FlorenceClient,
    model_id: String,
}

impl FlorenceProvider {
    /// Creates a new provider for the given model identifier.
    pub fn new(client: FlorenceClient, model_id: impl Into<String>) -> Self {
        Self {
            client,
            model_id: model_id.into(),
        }
    }

    /// Returns a reference to the underlying runtime client.
    pub fn client(&self) -> &FlorenceClient {
        &self.client
    }
}

/// Formats the model prompt from a control token and optional free text.
fn format_prompt(token: ControlToken, text_input: Option<&str>) -> String {
    format!("{}{}", token.as_str(), text_input.unwrap_or_default())
}

#[async_trait::async_trait]
impl VisionProvider for FlorenceProvider {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn infer(
        &self,
        image: &ImageInput,
        token: ControlToken,
        text_input: Option<&str>,
    ) -> servlm_core::Result<RawModelOutput> {
        let prompt = format_prompt(token, text_input);
        let start = Instant::now();

        tracing::debug!(
            target: TRACING_TARGET_PROVIDER,
            model = %self.model_id,
            token = token.as_str(),
            image_bytes = image.size(),
            "running generation"
        );

        let output = self
            .client
            .generate(&prompt, &image.data, &image.mime_type)
            .await
            .map_err(servlm_core::Error::from)?;

        tracing::debug!(
            target: TRACING_TARGET_PROVIDER,
            model = %self.model_id,
            elapsed_ms = start.elapsed().as_millis() as u64,
            entries = output.len(),
            "generation finished"
        );

        Ok(output)
    }

    async fn health_check(&self) -> servlm_core::Result<ServiceHealth> {
        let start = Instant::now();
        match self.client.health_check().await {
            Ok(()) => Ok(ServiceHealth::healthy().with_response_time(start.elapsed())),
            Err(error) => Ok(ServiceHealth::unhealthy(error.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use servlm_core::{Task, resolve_token};

    use super::*;

    #[test]
    fn prompt_is_token_plus_free_text() {
        let token = resolve_token(Task::Detection, Some("a cat"), None).unwrap();
        assert_eq!(
            format_prompt(token, Some("a cat")),
            "<OPEN_VOCABULARY_DETECTION>a cat"
        );

        let token = resolve_token(Task::Caption, None, None).unwrap();
        assert_eq!(format_prompt(token, None), "<CAPTION>");
    }
}

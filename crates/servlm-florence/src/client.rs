//! Florence-2 runtime client.
//!
//! The model weights and generation loop live in a separate runtime
//! process; this client speaks its small HTTP API. The runtime's generate
//! endpoint runs tokenize → generate → post-process and answers with the
//! parsed output mapping keyed by control token, which is exactly the raw
//! shape the normalizer consumes.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use derive_builder::Builder;
use reqwest::{Client as HttpClient, ClientBuilder};
use serde::{Deserialize, Serialize};
use servlm_core::RawModelOutput;
use url::Url;

use crate::TRACING_TARGET_CLIENT;
use crate::error::{Error, Result};

/// Configuration for the Florence-2 runtime client.
///
/// Generation parameters mirror the model's reference settings: greedy
/// beam-search decoding so output is deterministic for a fixed input.
#[derive(Debug, Clone, Builder)]
#[builder(
    name = "FlorenceBuilder",
    pattern = "owned",
    setter(into, strip_option, prefix = "with"),
    build_fn(validate = "Self::validate_config")
)]
pub struct FlorenceConfig {
    /// Base URL of the model runtime
    #[builder(setter(custom), default = "FlorenceConfig::default_base_url()")]
    pub base_url: Url,
    /// Request timeout duration; generation can take seconds
    #[builder(default = "Duration::from_secs(120)")]
    pub timeout: Duration,
    /// Connection timeout duration
    #[builder(default = "Duration::from_secs(10)")]
    pub connect_timeout: Duration,
    /// Upper bound on generated tokens
    #[builder(default = "2048")]
    pub max_new_tokens: u32,
    /// Beam width for decoding
    #[builder(default = "3")]
    pub num_beams: u32,
    /// User agent string for requests
    #[builder(default = "FlorenceConfig::default_user_agent()")]
    pub user_agent: String,
}

impl Default for FlorenceConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            timeout: Duration::from_secs(120),
            connect_timeout: Duration::from_secs(10),
            max_new_tokens: 2048,
            num_beams: 3,
            user_agent: Self::default_user_agent(),
        }
    }
}

impl FlorenceConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> FlorenceBuilder {
        FlorenceBuilder::default()
    }

    fn default_base_url() -> Url {
        "http://127.0.0.1:8100".parse().expect("valid default URL")
    }

    fn default_user_agent() -> String {
        format!("servlm-florence/{}", env!("CARGO_PKG_VERSION"))
    }
}

impl FlorenceBuilder {
    /// Sets the base URL of the model runtime.
    pub fn with_base_url(mut self, url: &str) -> Result<Self> {
        self.base_url = Some(
            url.parse()
                .map_err(|e| Error::invalid_config(format!("invalid base URL '{url}': {e}")))?,
        );
        Ok(self)
    }

    fn validate_config(&self) -> std::result::Result<(), String> {
        if let Some(timeout) = &self.timeout {
            if timeout.as_secs() == 0 {
                return Err("timeout must be greater than 0".to_string());
            }
        }

        if let Some(max_new_tokens) = &self.max_new_tokens {
            if *max_new_tokens == 0 {
                return Err("max_new_tokens must be greater than 0".to_string());
            }
        }

        if let Some(num_beams) = &self.num_beams {
            if *num_beams == 0 {
                return Err("num_beams must be greater than 0".to_string());
            }
        }

        Ok(())
    }
}

/// Request body for the runtime's generate endpoint.
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    /// Full model prompt: control token plus optional free text.
    prompt: &'a str,
    /// Base64-encoded image bytes.
    image: String,
    /// MIME type of the image.
    mime_type: &'a str,
    max_new_tokens: u32,
    num_beams: u32,
}

/// Response body of the runtime's generate endpoint.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    /// Parsed output keyed by control token.
    results: RawModelOutput,
}

/// Client for a Florence-2 model runtime.
#[derive(Debug, Clone)]
pub struct FlorenceClient {
    http_client: HttpClient,
    config: FlorenceConfig,
}

impl FlorenceClient {
    /// Creates a new runtime client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: FlorenceConfig) -> Result<Self> {
        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            base_url = %config.base_url,
            "creating Florence runtime client"
        );

        let http_client = ClientBuilder::new()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Creates a client with default configuration against the given URL.
    pub fn with_defaults(base_url: impl AsRef<str>) -> Result<Self> {
        let config = FlorenceConfig::builder()
            .with_base_url(base_url.as_ref())?
            .build()
            .map_err(|e| Error::invalid_config(e.to_string()))?;
        Self::new(config)
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &FlorenceConfig {
        &self.config
    }

    /// Runs one generation pass and returns the parsed output mapping.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures or non-success runtime
    /// responses.
    pub async fn generate(
        &self,
        prompt: &str,
        image_data: &[u8],
        mime_type: &str,
    ) -> Result<RawModelOutput> {
        let url = self.config.base_url.join("generate")?;

        let body = GenerateRequest {
            prompt,
            image: STANDARD.encode(image_data),
            mime_type,
            max_new_tokens: self.config.max_new_tokens,
            num_beams: self.config.num_beams,
        };

        let response = self.http_client.post(url).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());

            tracing::error!(
                target: TRACING_TARGET_CLIENT,
                status,
                message,
                "generation request failed"
            );

            return Err(Error::api_error(status, message));
        }

        let parsed: GenerateResponse = response.json().await?;
        Ok(parsed.results)
    }

    /// Performs a health check against the runtime.
    pub async fn health_check(&self) -> Result<()> {
        let url = self.config.base_url.join("health")?;
        let response = self.http_client.get(url).send().await?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            Err(Error::api_error(status, message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_applies_defaults() {
        let config = FlorenceConfig::builder().build().unwrap();
        assert_eq!(config.max_new_tokens, 2048);
        assert_eq!(config.num_beams, 3);
        assert_eq!(config.timeout, Duration::from_secs(120));
    }

    #[test]
    fn builder_rejects_zero_beams() {
        let result = FlorenceConfig::builder().with_num_beams(0u32).build();
        assert!(result.is_err());
    }

    #[test]
    fn builder_rejects_bad_url() {
        assert!(FlorenceConfig::builder().with_base_url("not a url").is_err());
    }
}

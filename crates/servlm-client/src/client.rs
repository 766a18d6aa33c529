//! Vision client implementation.

use std::time::Duration;

use reqwest::{Client as HttpClient, ClientBuilder};
use servlm_core::{CaptionFormat, CaptionOptions, OcrOptions, Task};
use url::Url;

use crate::TRACING_TARGET;
use crate::error::{Error, ErrorBody, Result};
use crate::types::{VisionRequest, VisionResponse};

/// Configuration for the vision client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the servlm server.
    pub base_url: Url,
    /// Request timeout; inference can take seconds.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".parse().expect("valid default URL"),
            timeout: Duration::from_secs(120),
            user_agent: format!("servlm-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Sets the server base URL.
    pub fn with_base_url(mut self, url: &str) -> Result<Self> {
        self.base_url = url.parse()?;
        Ok(self)
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Client for a running servlm server.
#[derive(Debug, Clone)]
pub struct VisionClient {
    http_client: HttpClient,
    config: ClientConfig,
}

impl VisionClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http_client = ClientBuilder::new()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Creates a client with default configuration against the given URL.
    pub fn with_defaults(base_url: impl AsRef<str>) -> Result<Self> {
        let config = ClientConfig::default().with_base_url(base_url.as_ref())?;
        Self::new(config)
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sends a vision request.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures or non-success server
    /// responses; the server's error body is attached when present.
    pub async fn vision(&self, request: &VisionRequest) -> Result<VisionResponse> {
        let url = self.config.base_url.join("vision")?;

        tracing::debug!(
            target: TRACING_TARGET,
            task = ?request.task,
            model = ?request.model,
            "sending vision request"
        );

        let response = self.http_client.post(url).json(request).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.json::<ErrorBody>().await.ok();
            return Err(Error::Api { status, body });
        }

        Ok(response.json().await?)
    }

    /// Captions an image.
    pub async fn caption(&self, image: impl Into<String>, format: CaptionFormat) -> Result<VisionResponse> {
        self.vision(
            &VisionRequest::new(image)
                .with_task(Task::Caption)
                .with_options(CaptionOptions { format }),
        )
        .await
    }

    /// Reads text out of an image.
    pub async fn ocr(&self, image: impl Into<String>, polys: bool) -> Result<VisionResponse> {
        self.vision(
            &VisionRequest::new(image)
                .with_task(Task::Ocr)
                .with_options(OcrOptions { polys }),
        )
        .await
    }

    /// Detects objects in an image.
    ///
    /// With a prompt, detection runs in open-vocabulary mode and the prompt
    /// names the targets to locate.
    pub async fn detect(
        &self,
        image: impl Into<String>,
        prompt: Option<&str>,
    ) -> Result<VisionResponse> {
        let mut request = VisionRequest::new(image).with_task(Task::Detection);
        if let Some(prompt) = prompt {
            request = request.with_prompt(prompt);
        }
        self.vision(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_points_at_localhost() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url.as_str(), "http://127.0.0.1:8000/");
        assert_eq!(config.timeout, Duration::from_secs(120));
    }

    #[test]
    fn bad_base_url_is_rejected() {
        assert!(ClientConfig::default().with_base_url("not a url").is_err());
    }
}

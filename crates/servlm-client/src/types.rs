//! Wire types shared with the server.

use serde::{Deserialize, Serialize};
use servlm_core::{NormalizedResults, Task, TaskOptions};

/// A vision request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionRequest {
    /// Caller-chosen request identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Model selector.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Requested task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<Task>,
    /// Task options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<TaskOptions>,
    /// Base64-encoded image, optionally a `data:` URL.
    pub image: String,
    /// Free-text prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

impl VisionRequest {
    /// Creates a request for the given base64 image.
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            id: None,
            model: None,
            task: None,
            options: None,
            image: image.into(),
            prompt: None,
        }
    }

    /// Sets the request identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Selects a model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the task.
    pub fn with_task(mut self, task: Task) -> Self {
        self.task = Some(task);
        self
    }

    /// Sets the task options.
    pub fn with_options(mut self, options: impl Into<TaskOptions>) -> Self {
        self.options = Some(options.into());
        self
    }

    /// Sets the free-text prompt.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }
}

/// A vision response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionResponse {
    /// Request identifier, echoed or generated.
    pub id: String,
    /// The model that served the request.
    pub model: String,
    /// Normalized results keyed by task.
    pub results: NormalizedResults,
    /// Metadata of the decoded input image.
    pub image: ImageMetadata,
}

/// Basic metadata of the decoded input image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

#[cfg(test)]
mod tests {
    use servlm_core::OcrOptions;

    use super::*;

    #[test]
    fn request_serializes_without_absent_fields() {
        let request = VisionRequest::new("aGk=");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({"image": "aGk="}));
    }

    #[test]
    fn request_builder_sets_fields() {
        let request = VisionRequest::new("aGk=")
            .with_task(Task::Ocr)
            .with_options(OcrOptions { polys: true })
            .with_model("florence-2-base");

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["task"], "ocr");
        assert_eq!(json["options"], serde_json::json!({"polys": true}));
        assert_eq!(json["model"], "florence-2-base");
    }

    #[test]
    fn response_round_trips() {
        let json = serde_json::json!({
            "id": "req-1",
            "model": "florence-2-base",
            "results": {"ocr": {"text": "hello"}},
            "image": {"width": 640, "height": 480},
        });
        let response: VisionResponse = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(response.results.ocr.as_ref().unwrap().text.as_deref(), Some("hello"));
        assert_eq!(serde_json::to_value(&response).unwrap(), json);
    }
}

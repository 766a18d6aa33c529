//! Request types for the vision endpoint.

use serde::{Deserialize, Serialize};
use servlm_core::{Task, TaskOptions};

/// A vision request.
///
/// `image` is a base64 string, optionally a `data:` URL. `task` defaults to
/// captioning when omitted. `model` selects a registered provider and
/// defaults to the registry's default model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionRequest {
    /// Caller-chosen request identifier; generated when omitted.
    #[serde(default)]
    pub id: Option<String>,
    /// Model selector.
    #[serde(default)]
    pub model: Option<String>,
    /// Requested task.
    #[serde(default)]
    pub task: Option<Task>,
    /// Task options.
    #[serde(default)]
    pub options: Option<TaskOptions>,
    /// Base64-encoded image.
    pub image: String,
    /// Free-text prompt; only valid for token modes that accept one.
    #[serde(default)]
    pub prompt: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_request_deserializes() {
        let request: VisionRequest = serde_json::from_str(r#"{"image": "aGk="}"#).unwrap();
        assert!(request.task.is_none());
        assert!(request.model.is_none());
        assert!(request.options.is_none());
    }

    #[test]
    fn full_request_round_trips() {
        let json = serde_json::json!({
            "id": "req-1",
            "model": "florence-2-base",
            "task": "ocr",
            "options": {"polys": true},
            "image": "aGk=",
            "prompt": null,
        });
        let request: VisionRequest = serde_json::from_value(json).unwrap();
        assert_eq!(request.task, Some(Task::Ocr));
        assert_eq!(
            request.options.and_then(|o| o.as_ocr().map(|o| o.polys)),
            Some(true)
        );
    }
}

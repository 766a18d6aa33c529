//! Normalized result shapes.
//!
//! The model's raw output differs in key names and payload layout between
//! tasks and versions; these are the three uniform shapes every response is
//! mapped onto before leaving the serving layer.

use serde::{Deserialize, Serialize};

use crate::geometry::{BoundingBox, Polygon};
use crate::task::Task;

/// Result of a caption task.
///
/// Exactly one of `text` and `boxes` is populated: plain captioning yields
/// text, dense region captioning yields labeled boxes.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionResult {
    /// Generated caption text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Region captions for the dense format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boxes: Option<Vec<BoundingBox>>,
}

impl CaptionResult {
    /// Creates a plain-text caption result.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            boxes: None,
        }
    }

    /// Creates a dense-region caption result.
    pub fn boxes(boxes: Vec<BoundingBox>) -> Self {
        Self {
            text: None,
            boxes: Some(boxes),
        }
    }
}

/// Result of an OCR task.
///
/// `text` and `polys` are mutually exclusive per response: a plain
/// transcript or a list of located text regions.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrResult {
    /// Recognized text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Located text regions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polys: Option<Vec<Polygon>>,
}

impl OcrResult {
    /// Creates a plain-transcript OCR result.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            polys: None,
        }
    }

    /// Creates a region-polygon OCR result.
    pub fn polys(polys: Vec<Polygon>) -> Self {
        Self {
            text: None,
            polys: Some(polys),
        }
    }
}

/// Result of a detection task.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// Detected objects.
    pub boxes: Vec<BoundingBox>,
}

impl DetectionResult {
    /// Creates a detection result from a list of boxes.
    pub fn new(boxes: Vec<BoundingBox>) -> Self {
        Self { boxes }
    }
}

/// The normalized result mapping: at most one result per task.
///
/// Serializes as an object keyed by task name, e.g.
/// `{"detection": {"boxes": [...]}}`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedResults {
    /// Caption result, if the raw output contained a caption-family token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<CaptionResult>,
    /// Detection result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detection: Option<DetectionResult>,
    /// OCR result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocr: Option<OcrResult>,
}

impl NormalizedResults {
    /// Returns true when no task produced a result.
    pub fn is_empty(&self) -> bool {
        self.caption.is_none() && self.detection.is_none() && self.ocr.is_none()
    }

    /// Returns the number of populated task results.
    pub fn len(&self) -> usize {
        [
            self.caption.is_some(),
            self.detection.is_some(),
            self.ocr.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }

    /// Returns the tasks that produced a result.
    pub fn tasks(&self) -> Vec<Task> {
        let mut tasks = Vec::new();
        if self.caption.is_some() {
            tasks.push(Task::Caption);
        }
        if self.detection.is_some() {
            tasks.push(Task::Detection);
        }
        if self.ocr.is_some() {
            tasks.push(Task::Ocr);
        }
        tasks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_keyed_by_task_name() {
        let results = NormalizedResults {
            ocr: Some(OcrResult::text("hello world")),
            ..Default::default()
        };

        let json = serde_json::to_value(&results).unwrap();
        assert_eq!(json, serde_json::json!({"ocr": {"text": "hello world"}}));
    }

    #[test]
    fn empty_results_serialize_to_empty_object() {
        let results = NormalizedResults::default();
        assert!(results.is_empty());
        assert_eq!(results.len(), 0);
        assert_eq!(
            serde_json::to_value(&results).unwrap(),
            serde_json::json!({})
        );
    }

    #[test]
    fn tasks_reports_populated_results() {
        let results = NormalizedResults {
            caption: Some(CaptionResult::text("a cat")),
            detection: Some(DetectionResult::default()),
            ..Default::default()
        };
        assert_eq!(results.tasks(), vec![Task::Caption, Task::Detection]);
    }
}

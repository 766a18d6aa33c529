//! Raw model output normalization.
//!
//! The model reports results as a mapping from the control token it ran
//! with to a task-specific payload whose shape (and some key names) vary
//! between tasks and model versions. [`normalize`] converts that mapping
//! into the uniform [`NormalizedResults`] schema.
//!
//! The normalizer is deliberately lenient: entries it cannot interpret
//! (unknown tokens, payloads with an unexpected shape) are dropped rather
//! than rejected, so a model version that grows new capabilities does not
//! break existing callers. Validation belongs to the resolver, before
//! inference runs; nothing here ever fails.

use serde_json::{Map, Value};

use crate::geometry::{BoundingBox, Polygon};
use crate::result::{CaptionResult, DetectionResult, NormalizedResults, OcrResult};
use crate::task::Task;
use crate::token::token_to_task;

/// Raw, model-specific output: control-token string to payload.
///
/// Produced per request by the inference adapter and consumed immediately;
/// never persisted.
pub type RawModelOutput = Map<String, Value>;

/// Candidate keys for the label array of box-carrying payloads, tried in
/// priority order. Older model revisions emitted `bboxes_labels` where newer
/// ones emit `labels`; accepting both is a compatibility shim, kept until
/// the old shape is retired.
pub const LABEL_KEYS: &[&str] = &["labels", "bboxes_labels"];

/// Maps raw model output onto the uniform result schema.
///
/// Unknown tokens are dropped silently. When several tokens map to the same
/// task (not expected in normal operation), the last entry wins. Pure
/// transformation; calling it twice on the same input yields equal results.
pub fn normalize(raw: &RawModelOutput) -> NormalizedResults {
    let mut results = NormalizedResults::default();

    for (token, payload) in raw {
        let Some(task) = token_to_task(token) else {
            tracing::debug!(
                target: crate::TRACING_TARGET_NORMALIZE,
                token = %token,
                "dropping payload for unrecognized token"
            );
            continue;
        };

        match task {
            Task::Detection => {
                if let Some(boxes) = extract_boxes(payload, "bboxes") {
                    results.detection = Some(DetectionResult::new(boxes));
                }
            }
            Task::Ocr => {
                if let Some(text) = payload.as_str() {
                    results.ocr = Some(OcrResult::text(text));
                } else if let Some(polys) = extract_polys(payload, "quad_boxes") {
                    results.ocr = Some(OcrResult::polys(polys));
                }
            }
            Task::Caption => {
                if let Some(boxes) = extract_boxes(payload, "bboxes") {
                    results.caption = Some(CaptionResult::boxes(boxes));
                } else if let Some(text) = payload.as_str() {
                    results.caption = Some(CaptionResult::text(text));
                }
            }
        }
    }

    results
}

/// Returns the label array of a payload, trying [`LABEL_KEYS`] in order.
fn labels_of(payload: &Map<String, Value>) -> Option<&Vec<Value>> {
    LABEL_KEYS
        .iter()
        .find_map(|key| payload.get(*key))
        .and_then(Value::as_array)
}

fn as_label(value: &Value) -> Option<String> {
    value.as_str().map(str::to_owned)
}

/// Zips a payload's coordinate array under `key` with its label array into
/// bounding boxes. Entries that are not four numbers are skipped.
fn extract_boxes(payload: &Value, key: &str) -> Option<Vec<BoundingBox>> {
    let object = payload.as_object()?;
    let coords = object.get(key)?.as_array()?;
    let labels = labels_of(object)?;

    let boxes = coords
        .iter()
        .zip(labels)
        .filter_map(|(xyxy, label)| {
            let corners: Vec<f64> = xyxy.as_array()?.iter().filter_map(Value::as_f64).collect();
            let xyxy: [f64; 4] = corners.try_into().ok()?;
            let mut bbox = BoundingBox::new(xyxy);
            bbox.label = as_label(label);
            Some(bbox)
        })
        .collect();

    Some(boxes)
}

/// Zips a payload's flat coordinate lists under `key` with its label array
/// into polygons.
fn extract_polys(payload: &Value, key: &str) -> Option<Vec<Polygon>> {
    let object = payload.as_object()?;
    let coords = object.get(key)?.as_array()?;
    let labels = labels_of(object)?;

    let polys = coords
        .iter()
        .zip(labels)
        .filter_map(|(points, label)| {
            let points: Vec<f64> = points.as_array()?.iter().filter_map(Value::as_f64).collect();
            let mut poly = Polygon::new(points);
            poly.label = as_label(label);
            Some(poly)
        })
        .collect();

    Some(polys)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn raw(value: Value) -> RawModelOutput {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn detection_boxes_zip_with_labels() {
        let results = normalize(&raw(json!({
            "<OD>": {"bboxes": [[0.0, 0.0, 1.0, 1.0]], "labels": ["cat"]}
        })));

        let detection = results.detection.unwrap();
        assert_eq!(detection.boxes.len(), 1);
        assert_eq!(detection.boxes[0].xyxy, [0.0, 0.0, 1.0, 1.0]);
        assert_eq!(detection.boxes[0].label.as_deref(), Some("cat"));
        assert!(results.caption.is_none());
        assert!(results.ocr.is_none());
    }

    #[test]
    fn detection_accepts_legacy_label_key() {
        let results = normalize(&raw(json!({
            "<OD>": {"bboxes": [[1.0, 2.0, 3.0, 4.0]], "bboxes_labels": ["dog"]}
        })));

        let detection = results.detection.unwrap();
        assert_eq!(detection.boxes[0].label.as_deref(), Some("dog"));
    }

    #[test]
    fn preferred_label_key_wins_over_legacy() {
        let results = normalize(&raw(json!({
            "<OD>": {
                "bboxes": [[1.0, 2.0, 3.0, 4.0]],
                "labels": ["new"],
                "bboxes_labels": ["old"],
            }
        })));

        let detection = results.detection.unwrap();
        assert_eq!(detection.boxes[0].label.as_deref(), Some("new"));
    }

    #[test]
    fn ocr_string_payload_is_text() {
        let results = normalize(&raw(json!({"<OCR>": "hello world"})));

        let ocr = results.ocr.unwrap();
        assert_eq!(ocr.text.as_deref(), Some("hello world"));
        assert!(ocr.polys.is_none());
    }

    #[test]
    fn ocr_quad_boxes_become_polygons() {
        let results = normalize(&raw(json!({
            "<OCR_WITH_REGION>": {
                "quad_boxes": [[0.0, 0.0, 10.0, 0.0, 10.0, 5.0, 0.0, 5.0]],
                "labels": ["hello"],
            }
        })));

        let ocr = results.ocr.unwrap();
        assert!(ocr.text.is_none());
        let polys = ocr.polys.unwrap();
        assert_eq!(polys.len(), 1);
        assert_eq!(polys[0].points.len(), 8);
        assert_eq!(polys[0].label.as_deref(), Some("hello"));
    }

    #[test]
    fn caption_string_payload_is_text() {
        let results = normalize(&raw(json!({"<CAPTION>": "a cat on a mat"})));
        assert_eq!(
            results.caption.unwrap().text.as_deref(),
            Some("a cat on a mat")
        );
    }

    #[test]
    fn dense_caption_payload_becomes_boxes() {
        let results = normalize(&raw(json!({
            "<DENSE_REGION_CAPTION>": {
                "bboxes": [[0.0, 0.0, 5.0, 5.0], [5.0, 5.0, 9.0, 9.0]],
                "labels": ["a red chair", "a wooden table"],
            }
        })));

        let caption = results.caption.unwrap();
        assert!(caption.text.is_none());
        assert_eq!(caption.boxes.unwrap().len(), 2);
    }

    #[test]
    fn unknown_tokens_are_dropped() {
        let results = normalize(&raw(json!({"<UNKNOWN_TOKEN>": "x"})));
        assert!(results.is_empty());
    }

    #[test]
    fn malformed_payloads_are_dropped_not_errors() {
        // Detection payload with labels but no coordinates, OCR payload of an
        // unexpected shape: both dropped under the lenient policy.
        let results = normalize(&raw(json!({
            "<OD>": {"labels": ["cat"]},
            "<OCR>": {"unexpected": true},
        })));
        assert!(results.is_empty());
    }

    #[test]
    fn short_label_list_truncates_boxes() {
        let results = normalize(&raw(json!({
            "<OD>": {
                "bboxes": [[0.0, 0.0, 1.0, 1.0], [1.0, 1.0, 2.0, 2.0]],
                "labels": ["cat"],
            }
        })));
        assert_eq!(results.detection.unwrap().boxes.len(), 1);
    }

    #[test]
    fn non_quad_box_entries_are_skipped() {
        let results = normalize(&raw(json!({
            "<OD>": {
                "bboxes": [[0.0, 0.0, 1.0], [1.0, 1.0, 2.0, 2.0]],
                "labels": ["bad", "good"],
            }
        })));
        let detection = results.detection.unwrap();
        assert_eq!(detection.boxes.len(), 1);
        assert_eq!(detection.boxes[0].label.as_deref(), Some("good"));
    }

    #[test]
    fn normalization_is_idempotent() {
        let input = raw(json!({
            "<OD>": {"bboxes": [[0.0, 0.0, 1.0, 1.0]], "labels": ["cat"]},
            "<OCR>": "hello",
        }));
        assert_eq!(normalize(&input), normalize(&input));
    }

    #[test]
    fn multiple_tokens_one_task_last_write_wins() {
        // Map iteration yields "<CAPTION>" before "<DETAILED_CAPTION>".
        let mut input = RawModelOutput::new();
        input.insert("<CAPTION>".into(), json!("first"));
        input.insert("<DETAILED_CAPTION>".into(), json!("second"));

        let results = normalize(&input);
        assert_eq!(results.caption.unwrap().text.as_deref(), Some("second"));
    }
}

//! The task registry: which operations the serving stack understands and the
//! per-task option payloads that refine them.
//!
//! Tasks are the abstract request vocabulary exposed to clients; the mapping
//! from a task (plus options) to the control token a concrete model expects
//! lives in [`crate::token`].

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// An operation the vision-language stack can perform.
///
/// The set is fixed at compile time; requests naming anything else are
/// rejected during deserialization or via [`Task::parse`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Task {
    /// Describe the image in natural language.
    Caption,
    /// Locate objects in the image.
    Detection,
    /// Read text out of the image.
    Ocr,
}

impl Task {
    /// Parses a task from its wire name.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the supported set when the string
    /// is not a known task.
    pub fn parse(name: &str) -> crate::Result<Self> {
        name.parse().map_err(|_| {
            crate::Error::validation().with_message(format!(
                "task {name:?} is not supported, should be one of caption, detection, ocr"
            ))
        })
    }
}

/// Requested level of detail for a caption.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CaptionFormat {
    /// One short sentence.
    #[default]
    Short,
    /// A more detailed description.
    Medium,
    /// A full-paragraph description.
    Long,
    /// Region-level captions with bounding boxes per described subject.
    Dense,
}

/// Options for caption requests.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaptionOptions {
    /// Caption detail level.
    #[serde(default)]
    pub format: CaptionFormat,
}

/// Options for OCR requests.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OcrOptions {
    /// Return text regions as polygons instead of a plain transcript.
    #[serde(default)]
    pub polys: bool,
}

/// Per-task option payload, tagged by shape.
///
/// Detection intentionally has no options arm: its behavior varies only on
/// the presence of a free-text prompt, which switches closed-vocabulary
/// detection to open-vocabulary detection.
///
/// The arms deny unknown fields so that `{"polys": true}` can never be
/// mistaken for caption options during untagged deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskOptions {
    /// Caption options.
    Caption(CaptionOptions),
    /// OCR options.
    Ocr(OcrOptions),
}

impl TaskOptions {
    /// Returns the caption options if this is the caption arm.
    pub fn as_caption(&self) -> Option<&CaptionOptions> {
        match self {
            Self::Caption(options) => Some(options),
            Self::Ocr(_) => None,
        }
    }

    /// Returns the OCR options if this is the OCR arm.
    pub fn as_ocr(&self) -> Option<&OcrOptions> {
        match self {
            Self::Caption(_) => None,
            Self::Ocr(options) => Some(options),
        }
    }
}

impl From<CaptionOptions> for TaskOptions {
    fn from(options: CaptionOptions) -> Self {
        Self::Caption(options)
    }
}

impl From<OcrOptions> for TaskOptions {
    fn from(options: OcrOptions) -> Self {
        Self::Ocr(options)
    }
}

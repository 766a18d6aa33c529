#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for token resolution.
pub const TRACING_TARGET_TOKEN: &str = "servlm_core::token";

/// Tracing target for result normalization.
pub const TRACING_TARGET_NORMALIZE: &str = "servlm_core::normalize";

mod error;
mod health;

pub mod geometry;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod normalize;
pub mod provider;
pub mod result;
pub mod task;
pub mod token;

// Re-export key types for convenience
pub use error::{BoxedError, Error, ErrorKind, Result};
pub use geometry::{BoundingBox, Polygon};
pub use health::{ServiceHealth, ServiceStatus};
pub use normalize::{RawModelOutput, normalize};
pub use provider::{BoxedProvider, ImageInput, VisionProvider};
pub use result::{CaptionResult, DetectionResult, NormalizedResults, OcrResult};
pub use task::{CaptionFormat, CaptionOptions, OcrOptions, Task, TaskOptions};
pub use token::{ControlToken, resolve_token, token_to_task};

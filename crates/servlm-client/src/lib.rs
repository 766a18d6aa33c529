#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for client operations.
pub const TRACING_TARGET: &str = "servlm_client";

mod client;
mod error;
mod types;

pub use crate::client::{ClientConfig, VisionClient};
pub use crate::error::{Error, ErrorBody, Result};
pub use crate::types::{ImageMetadata, VisionRequest, VisionResponse};

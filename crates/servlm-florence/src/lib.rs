#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for runtime client operations.
pub const TRACING_TARGET_CLIENT: &str = "servlm_florence::client";

/// Tracing target for provider operations.
pub const TRACING_TARGET_PROVIDER: &str = "servlm_florence::provider";

mod client;
mod error;
mod provider;

pub use crate::client::{FlorenceBuilder, FlorenceClient, FlorenceConfig};
pub use crate::error::{Error, Result};
pub use crate::provider::FlorenceProvider;

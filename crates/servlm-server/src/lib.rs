#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for request handling.
pub const TRACING_TARGET_HANDLER: &str = "servlm_server::handler";

pub mod handler;
mod registry;
mod state;

pub use crate::handler::router;
pub use crate::registry::ModelRegistry;
pub use crate::state::ServiceState;

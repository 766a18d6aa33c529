//! Response types for the vision endpoint.

use serde::{Deserialize, Serialize};
use servlm_core::NormalizedResults;

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

/// One entry of the route index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteInfo {
    /// Route path.
    pub path: String,
    /// HTTP method.
    pub method: String,
}

//! Request handlers and router assembly.

mod error;
mod request;
mod response;
mod vision;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::trace::TraceLayer;

pub use crate::handler::error::ErrorResponse;
pub use crate::handler::request::VisionRequest;
pub use crate::handler::response::{ImageMetadata, RouteInfo, VisionResponse};
use crate::state::ServiceState;

/// The advertised route table, kept in one place so the index endpoint
/// stays in sync with the router.
const ROUTES: &[(&str, &str)] = &[
    ("/", "GET"),
    ("/health", "GET"),
    ("/vision", "POST"),
];

/// Builds the application router.
pub fn router(state: ServiceState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/vision", post(vision::vision))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Lists the available routes.
async fn index() -> Json<Vec<RouteInfo>> {
    Json(
        ROUTES
            .iter()
            .map(|(path, method)| RouteInfo {
                path: (*path).to_owned(),
                method: (*method).to_owned(),
            })
            .collect(),
    )
}

/// Reports the health of every registered provider.
async fn health(State(state): State<ServiceState>) -> Json<serde_json::Value> {
    let mut report = serde_json::Map::new();
    for provider in state.registry().providers() {
        let health = match provider.health_check().await {
            Ok(health) => health,
            Err(error) => servlm_core::ServiceHealth::unhealthy(error.to_string()),
        };
        report.insert(
            provider.model_id().to_owned(),
            serde_json::to_value(&health).unwrap_or_default(),
        );
    }
    Json(serde_json::Value::Object(report))
}

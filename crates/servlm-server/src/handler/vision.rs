//! The vision endpoint.

use std::time::Instant;

use axum::Json;
use axum::extract::State;
use servlm_core::{ImageInput, Task, normalize, resolve_token};
use uuid::Uuid;

use crate::TRACING_TARGET_HANDLER;
use crate::handler::error::ErrorResponse;
use crate::handler::request::VisionRequest;
use crate::handler::response::{ImageMetadata, VisionResponse};
use crate::state::ServiceState;

/// Handles `POST /vision`.
///
/// Validation (the model selector, the image payload, and token
/// resolution) happens before inference so invalid requests never reach
/// the model.
pub(crate) async fn vision(
    State(state): State<ServiceState>,
    Json(request): Json<VisionRequest>,
) -> Result<Json<VisionResponse>, ErrorResponse> {
    let start = Instant::now();
    let request_id = request
        .id
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let provider = state.registry().resolve(request.model.as_deref())?;

    let decoded = servlm_image::decode_base64(&request.image)?;

    let task = request.task.unwrap_or(Task::Caption);
    let token = resolve_token(task, request.prompt.as_deref(), request.options.as_ref())?;

    tracing::debug!(
        target: TRACING_TARGET_HANDLER,
        request_id = %request_id,
        model = provider.model_id(),
        task = %task,
        token = token.as_str(),
        width = decoded.width(),
        height = decoded.height(),
        "dispatching vision request"
    );

    let image = ImageInput::new(decoded.data.clone(), decoded.mime_type());
    let raw = provider
        .infer(&image, token, request.prompt.as_deref())
        .await?;

    let results = normalize(&raw);

    tracing::info!(
        target: TRACING_TARGET_HANDLER,
        request_id = %request_id,
        model = provider.model_id(),
        task = %task,
        result_count = results.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "vision request served"
    );

    Ok(Json(VisionResponse {
        id: request_id,
        model: provider.model_id().to_owned(),
        results,
        image: ImageMetadata {
            width: decoded.width(),
            height: decoded.height(),
        },
    }))
}

use axum::{extract::State, Json};
use chrono::Utc;
use service_core::error::AppError;
use service_core::extract::ValidatedJson;

use crate::models::{GenerationRequest, GenerationResult, StoredGeneration, NOT_PERSISTED_ID};
use crate::services::{composer, metrics};
use crate::startup::AppState;

/// Compose stylized copy for the request and try to persist it.
///
/// Persistence is best effort: a store failure yields the `no-db` id and the
/// outputs are returned regardless.
#[tracing::instrument(
    skip(state, request),
    fields(
        tone = %request.tone,
        sentiment = %request.sentiment,
        length = %request.length,
        variants = request.variants
    )
)]
pub async fn generate_content(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<GenerationRequest>,
) -> Result<Json<GenerationResult>, AppError> {
    let outputs = composer::compose(&request);
    let stored = StoredGeneration::new(&request, &outputs, Utc::now());

    let id = match state.store.insert_generation(&stored).await {
        Ok(id) => {
            tracing::info!(generation_id = %id, "Generation persisted");
            metrics::record_generation(true);
            id
        }
        Err(e) => {
            tracing::warn!(error = %e, "Generation not persisted");
            metrics::record_generation(false);
            metrics::record_store_fallback("insert");
            NOT_PERSISTED_ID.to_string()
        }
    };

    Ok(Json(GenerationResult { id, outputs }))
}

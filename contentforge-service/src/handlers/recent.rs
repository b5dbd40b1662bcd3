use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;
use service_core::error::AppError;

use crate::models::RecentItem;
use crate::services::metrics;
use crate::startup::AppState;

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    9
}

/// Recent generations for the library preview, newest first. Falls back to
/// placeholder items when the store cannot be read. A malformed `limit` is a
/// 422.
#[tracing::instrument(skip_all, fields(limit = tracing::field::Empty))]
pub async fn recent_generations(
    State(state): State<AppState>,
    query: Result<Query<RecentQuery>, QueryRejection>,
) -> Result<Json<Vec<RecentItem>>, AppError> {
    let Query(query) = query?;
    tracing::Span::current().record("limit", query.limit);

    match state.store.recent_generations(query.limit).await {
        Ok(items) => Ok(Json(items)),
        Err(e) => {
            tracing::warn!(error = %e, "Serving placeholder recent items");
            metrics::record_store_fallback("recent");
            Ok(Json(RecentItem::fallback()))
        }
    }
}

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::error::AppError;
use crate::models::{ShortenRequest, ShortenResponse, StatsResponse};
use crate::service::UrlService;

pub struct AppState {
    pub service: Arc<UrlService>,
}

/// Create a short URL, or return the existing one for a known URL
///
/// Responds 201 when a record was created and 200 when it already existed.
pub async fn shorten_url(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    let Json(payload) =
        payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;

    let outcome = state.service.shorten(payload.url.as_deref()).await?;

    let status = if outcome.is_created() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    let record = outcome.record();
    Ok((
        status,
        Json(ShortenResponse {
            original_url: record.original_url.clone(),
            short_url: state.service.short_url(&record.short_code),
            short_code: record.short_code.clone(),
        }),
    ))
}

/// Get click statistics for a short code
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<StatsResponse>, AppError> {
    let record = state.service.stats(&code).await?;
    Ok(Json(StatsResponse::from(record)))
}

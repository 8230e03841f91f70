use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::service::UrlService;

use super::handlers::{get_stats, shorten_url, AppState};

pub fn create_api_router(service: Arc<UrlService>) -> Router {
    let state = Arc::new(AppState { service });

    Router::new()
        .route("/shorten", post(shorten_url))
        .route("/stats/{code}", get(get_stats))
        .with_state(state)
}

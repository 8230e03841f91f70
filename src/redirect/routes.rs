use axum::{routing::get, Router};
use std::sync::Arc;

use crate::config::RedirectMode;
use crate::service::UrlService;

use super::handlers::{redirect_url, RedirectState};

pub fn create_redirect_router(service: Arc<UrlService>, redirect_mode: RedirectMode) -> Router {
    let state = Arc::new(RedirectState {
        service,
        redirect_mode,
    });

    Router::new()
        .route("/{code}", get(redirect_url))
        .with_state(state)
}

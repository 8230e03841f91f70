pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod redirect;
pub mod service;
pub mod shortcode;
pub mod storage;
pub mod validation;

use axum::Router;
use std::sync::Arc;

use config::RedirectMode;
use service::UrlService;

/// Shorten and stats endpoints plus the catch-all redirect route
pub fn create_app(service: Arc<UrlService>, redirect_mode: RedirectMode) -> Router {
    api::routes::create_api_router(Arc::clone(&service))
        .merge(redirect::routes::create_redirect_router(service, redirect_mode))
}

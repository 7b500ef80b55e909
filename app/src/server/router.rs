use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::cors::CorsLayer;

use super::{api, assets};
use crate::app::SharedState;

/// Create the axum router with all routes.
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        // --- Core ---
        .route("/status", get(api::status::status_handler))
        // --- Configuration ---
        .route(
            "/api/config",
            get(api::config::get_config).patch(api::config::update_config),
        )
        .route("/api/config/logo", delete(api::config::clear_logo))
        // --- Render ---
        .route("/api/generate", post(api::generate::generate))
        .route("/api/preview", get(api::generate::preview))
        .route("/api/download", get(api::generate::download))
        // --- Rewrite ---
        .route("/api/rewrite", post(api::rewrite::rewrite))
        // --- Designer page ---
        .route("/", get(assets::page_index))
        .fallback(assets::page_fallback)
        // --- Middleware ---
        .layer(CorsLayer::permissive())
        .with_state(state)
}

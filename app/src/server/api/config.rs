//! Configuration API:
//!   GET    /api/config      – current configuration
//!   PATCH  /api/config      – partial update
//!   DELETE /api/config/logo – clear the logo

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use qr_engine::RenderConfig;
use qr_engine::config::parse_hex_color;
use qr_engine::logo::is_image_data_uri;

use super::err_json;
use crate::app::{ConfigPatch, SharedState};

/// GET /api/config
pub async fn get_config(State(state): State<SharedState>) -> Json<RenderConfig> {
    Json(state.config().await.clone())
}

/// PATCH /api/config – partial update
pub async fn update_config(
    State(state): State<SharedState>,
    Json(patch): Json<ConfigPatch>,
) -> Result<Json<Value>, (axum::http::StatusCode, Json<Value>)> {
    if let Some(color) = patch.dot_color.as_deref() {
        parse_hex_color(color).map_err(|e| err_json(400, &format!("dot_color: {e}")))?;
    }
    if let Some(logo) = patch.logo.as_deref() {
        if !is_image_data_uri(logo) {
            return Err(err_json(400, "logo: expected an image data URI"));
        }
    }

    state.apply_config(patch).await;
    Ok(Json(json!({ "status": "ok" })))
}

/// DELETE /api/config/logo
pub async fn clear_logo(State(state): State<SharedState>) -> Json<Value> {
    state.clear_logo().await;
    Json(json!({ "status": "ok" }))
}

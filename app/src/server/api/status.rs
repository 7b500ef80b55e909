//! GET /status – liveness and render-state flags.

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use crate::app::SharedState;

pub async fn status_handler(State(state): State<SharedState>) -> Json<Value> {
    let generated_at = state.last_generated_at().await;
    Json(json!({
        "status": "ok",
        "version": "1.0.0",
        "generating": state.is_generating(),
        "generated": generated_at.is_some(),
        "generated_at": generated_at,
    }))
}

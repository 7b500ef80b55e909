//! POST /api/rewrite – the "Magic" input transform.

use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use serde_json::{Value, json};

use super::err_json;
use crate::app::SharedState;

#[derive(Debug, Deserialize)]
pub struct RewriteRequest {
    pub text: String,
}

/// POST /api/rewrite
///
/// Returns the rewritten text, or the original text when the remote call
/// cannot improve it. Only the missing-credential case is an error.
pub async fn rewrite(
    State(state): State<SharedState>,
    Json(body): Json<RewriteRequest>,
) -> Result<Json<Value>, (axum::http::StatusCode, Json<Value>)> {
    if body.text.trim().is_empty() {
        return Err(err_json(400, "text must not be empty"));
    }

    let Some(client) = state.rewriter() else {
        return Err(err_json(
            503,
            "Rewrite is unavailable: API key is not configured",
        ));
    };

    let text = client.rewrite(&body.text).await;
    Ok(Json(json!({ "text": text })))
}

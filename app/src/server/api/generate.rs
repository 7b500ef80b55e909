//! Render API:
//!   POST /api/generate – render from the current configuration
//!   GET  /api/preview  – current render as PNG
//!   GET  /api/download – PNG download attachment

use axum::Json;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};

use super::err_json;
use crate::app::SharedState;

/// POST /api/generate
pub async fn generate(
    State(state): State<SharedState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match state.generate().await {
        Ok(Some(outcome)) => Ok(Json(json!({
            "generated": true,
            "width": outcome.width,
            "height": outcome.height,
            "generated_at": outcome.generated_at,
        }))),
        // Empty content: nothing to do
        Ok(None) => Ok(Json(json!({ "generated": false }))),
        Err(e) => {
            tracing::error!("Render failed: {e}");
            Err(err_json(400, &format!("Render failed: {e}")))
        }
    }
}

/// GET /api/preview
pub async fn preview(State(state): State<SharedState>) -> Response {
    png_response(&state, false).await
}

/// GET /api/download
pub async fn download(State(state): State<SharedState>) -> Response {
    png_response(&state, true).await
}

async fn png_response(state: &SharedState, attachment: bool) -> Response {
    let Some(result) = state.render_png().await else {
        return err_json(404, "No render yet").into_response();
    };

    match result {
        Ok(bytes) => {
            let mut response = ([(header::CONTENT_TYPE, "image/png")], bytes).into_response();
            if attachment {
                response.headers_mut().insert(
                    header::CONTENT_DISPOSITION,
                    header::HeaderValue::from_static(r#"attachment; filename="vibe-qr.png""#),
                );
            }
            response
        }
        Err(e) => err_json(500, &format!("PNG encode failed: {e}")).into_response(),
    }
}

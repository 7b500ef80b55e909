//! Static file serving for the designer page (web/).

use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use rust_embed::Embed;
use serde_json::json;

#[derive(Embed)]
#[folder = "web/"]
struct PageAssets;

/// Serve the designer page for bare `/` requests.
pub async fn page_index() -> Response {
    serve_embedded("index.html")
}

/// Fallback handler: serve page assets for unmatched paths (SPA support).
/// Uses `Uri` instead of `Path` because fallback has no capture parameter.
pub async fn page_fallback(uri: Uri) -> Response {
    let request_path = uri.path();
    if should_return_non_spa_not_found(request_path) {
        return (
            StatusCode::NOT_FOUND,
            axum::Json(json!({
                "error": "Not Found",
                "path": request_path,
            })),
        )
            .into_response();
    }

    serve_embedded(request_path.trim_start_matches('/'))
}

fn should_return_non_spa_not_found(path: &str) -> bool {
    const NON_SPA_PREFIXES: [&str; 2] = ["/api", "/status"];

    NON_SPA_PREFIXES.iter().any(|prefix| {
        path == *prefix
            || path
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('/'))
    })
}

fn serve_embedded(path: &str) -> Response {
    let asset = PageAssets::get(path).or_else(|| PageAssets::get("index.html"));

    match asset {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, mime.as_ref())],
                content.data.to_vec(),
            )
                .into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

//! PDF rendering endpoint
//!
//! `POST /pdf` accepts `{"url": ..., "html": ..., "options": {...}}`
//! and returns the rendered PDF bytes. HTML takes precedence when both
//! sources are given; the render error taxonomy maps to distinct HTTP
//! statuses (validation 400, timeout 504, launch 503, crash 502).

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::Response,
    routing::post,
    Json, Router,
};

use crate::error::{AppError, Result};
use crate::render::RenderRequest;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(render_pdf))
}

/// Render a URL or raw HTML to PDF
async fn render_pdf(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RenderRequest>, JsonRejection>,
) -> Result<Response> {
    // Malformed bodies get the same JSON error shape as everything else
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    tracing::info!(
        has_url = request.url.is_some(),
        has_html = request.html.is_some(),
        "Rendering PDF"
    );

    let bytes = state.pool().render_to_pdf(&request).await?;

    tracing::info!(size = bytes.len(), "PDF generated");

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(header::CONTENT_LENGTH, bytes.len())
        .header(
            header::CONTENT_DISPOSITION,
            "inline; filename=\"document.pdf\"",
        )
        .body(Body::from(bytes))
        .map_err(|e| AppError::Internal(e.to_string()))?)
}

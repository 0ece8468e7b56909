use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use super::AppState;
use crate::error::{ExportError, PreviewError};
use crate::layout::{assemble_deck, Deck};
use crate::models::*;
use crate::render;

// ============================================================
// Error Handling
// ============================================================

/// Log an internal error and return a sanitized response to the client.
/// The full error is logged server-side for debugging, but clients only
/// see a generic message to avoid leaking internal details.
fn internal_error(e: impl std::fmt::Display) -> (StatusCode, String) {
    tracing::error!("Internal error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

/// Unsupported formats and undrawable slide content are the caller's to fix
/// and are returned as-is; package failures are internal.
fn export_error(e: ExportError) -> (StatusCode, String) {
    if e.is_client_error() {
        tracing::warn!("Export rejected: {}", e);
        (StatusCode::BAD_REQUEST, e.to_string())
    } else {
        internal_error(e)
    }
}

fn preview_error(e: PreviewError) -> (StatusCode, String) {
    match e {
        PreviewError::SlideOutOfRange { .. } => (StatusCode::NOT_FOUND, e.to_string()),
    }
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Export
// ============================================================

/// Body of a generate request. `data` is optional so a missing proposal can
/// be reported as a 400 rather than a deserialization failure. A missing,
/// null or empty `format` means PPTX.
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub data: Option<ProposalData>,
    #[serde(default)]
    pub format: Option<String>,
}

impl GenerateRequest {
    fn format(&self) -> &str {
        self.format
            .as_deref()
            .filter(|f| !f.is_empty())
            .unwrap_or(OutputFormat::Pptx.as_str())
    }
}

pub async fn generate(
    State(state): State<AppState>,
    Json(mut input): Json<GenerateRequest>,
) -> Result<Response, (StatusCode, String)> {
    let data = input
        .data
        .take()
        .ok_or((StatusCode::BAD_REQUEST, "Missing proposal data".to_string()))?;
    let format = OutputFormat::from_str(input.format()).ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            format!("unsupported export format: {}", input.format()),
        )
    })?;

    let file_name = data.download_name(format);
    let options = state.config.layout.clone();
    let bytes = tokio::task::spawn_blocking(move || render::export(&data, &options, format))
        .await
        .map_err(internal_error)?
        .map_err(export_error)?;

    tracing::info!(file = %file_name, bytes = bytes.len(), "generated proposal");
    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        bytes,
    )
        .into_response())
}

// ============================================================
// Preview
// ============================================================

/// Query parameters for previewing a single slide.
#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    /// 0-based slide index. Defaults to the cover.
    #[serde(default)]
    pub slide: usize,
}

pub async fn preview(
    State(state): State<AppState>,
    Query(query): Query<PreviewQuery>,
    Json(data): Json<ProposalData>,
) -> Result<Html<String>, (StatusCode, String)> {
    render::render_preview(&data, query.slide, &state.config.layout)
        .map(Html)
        .map_err(preview_error)
}

pub async fn preview_section(
    State(state): State<AppState>,
    Path(section): Path<String>,
    Json(data): Json<ProposalData>,
) -> Result<Html<String>, (StatusCode, String)> {
    let section = Section::from_str(&section).ok_or((
        StatusCode::NOT_FOUND,
        format!("Unknown section: {}", section),
    ))?;
    Ok(Html(render::preview_section(
        &data,
        section,
        &state.config.layout,
    )))
}

// ============================================================
// Layout
// ============================================================

pub async fn layout(
    State(state): State<AppState>,
    Json(data): Json<ProposalData>,
) -> Json<Deck> {
    Json(assemble_deck(&data, &state.config.layout))
}

//! Certificate generation handlers: PNG preview and PDF export.
//!
//! Both accept either an inline document (`data`) or a stored template id,
//! plus the per-recipient binding. Asset fetching happens on the async
//! runtime; rasterization is CPU-bound and runs on a blocking thread.

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::export;
use crate::render::Rasterizer;
use crate::resolve::{self, BindingContext, ResolvedCertificate};
use crate::store::TemplateStore;
use crate::template::Template;

use super::super::state::AppState;

const DEFAULT_SCALE: f32 = 1.0;

#[derive(Debug, Deserialize)]
pub struct CertificateRequest {
    /// Inline serialized template document. Takes precedence over
    /// `template_id` when both are given.
    pub data: Option<String>,
    /// Id of a stored template to render.
    pub template_id: Option<Uuid>,
    #[serde(default)]
    pub binding: BindingContext,
    /// Pixel-density multiplier for the raster.
    pub scale: Option<f32>,
}

/// Handle POST /api/certificates/preview - render a bound certificate as PNG.
pub async fn preview(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CertificateRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let scale = req.scale.unwrap_or(DEFAULT_SCALE);
    let resolved = resolve_request(&state, &req).await?;

    let png_bytes = tokio::task::spawn_blocking(move || {
        Rasterizer::new(scale).render_png(&resolved)
    })
    .await
    .map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Task error: {}", e),
        )
    })?
    .map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Preview render failed: {}", e),
        )
    })?;

    Ok(([(header::CONTENT_TYPE, "image/png")], png_bytes))
}

/// Handle POST /api/certificates/export - render and wrap in a one-page PDF.
pub async fn export(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CertificateRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let scale = req.scale.unwrap_or(2.0);
    let recipient = req.binding.student_name.clone();
    let resolved = resolve_request(&state, &req).await?;

    let exported = tokio::task::spawn_blocking(move || {
        let page = Rasterizer::new(scale).render(&resolved)?;
        let name = (!recipient.trim().is_empty()).then_some(recipient.as_str());
        export::export_pdf(&page, name)
    })
    .await
    .map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Task error: {}", e),
        )
    })?
    .map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Export failed: {}", e),
        )
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", exported.file_name),
            ),
        ],
        exported.bytes,
    ))
}

/// Load the document, bind it, and materialize its image assets.
async fn resolve_request(
    state: &AppState,
    req: &CertificateRequest,
) -> Result<ResolvedCertificate, (StatusCode, String)> {
    let data = match (&req.data, req.template_id) {
        (Some(data), _) => data.clone(),
        (None, Some(id)) => {
            let record = state
                .store
                .fetch(id)
                .await
                .map_err(|e| (StatusCode::NOT_FOUND, e.to_string()))?;
            record.data
        }
        (None, None) => {
            return Err((
                StatusCode::BAD_REQUEST,
                "Provide either `data` or `template_id`".to_string(),
            ));
        }
    };

    let template =
        Template::from_json(&data).map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    let mut resolved = resolve::resolve(&template, &req.binding)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    state
        .assets
        .materialize(&mut resolved)
        .await
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;
    Ok(resolved)
}

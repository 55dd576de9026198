//! Template CRUD handlers.
//!
//! The document body is stored as the serialized JSON string the editor
//! produces; saves are validated by parsing it back before they reach the
//! store, so a broken client can never persist an unloadable template.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::store::{SaveTemplate, TemplateStore};
use crate::template::Template;

use super::super::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SaveTemplateRequest {
    pub name: String,
    pub data: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub is_public: bool,
}

impl SaveTemplateRequest {
    fn validate(&self) -> Result<(), (StatusCode, String)> {
        if self.name.trim().is_empty() {
            return Err((
                StatusCode::BAD_REQUEST,
                "Template name cannot be empty".to_string(),
            ));
        }
        Template::from_json(&self.data)
            .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
        Ok(())
    }
}

/// Handle GET /api/templates - list saved templates in insertion order.
pub async fn list(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let records = state
        .store
        .list()
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(Json(records))
}

/// Handle GET /api/templates/:id - fetch a full template record.
pub async fn fetch(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let record = state
        .store
        .fetch(id)
        .await
        .map_err(|e| (StatusCode::NOT_FOUND, e.to_string()))?;
    Ok(Json(record))
}

/// Handle POST /api/templates - save a new template.
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SaveTemplateRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    req.validate()?;
    let id = state
        .store
        .save(SaveTemplate {
            id: None,
            name: req.name.trim().to_string(),
            data: req.data,
            thumbnail: req.thumbnail,
            is_public: req.is_public,
        })
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok((StatusCode::CREATED, Json(serde_json::json!({ "id": id }))))
}

/// Handle PUT /api/templates/:id - overwrite an existing template.
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<SaveTemplateRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    req.validate()?;
    state
        .store
        .save(SaveTemplate {
            id: Some(id),
            name: req.name.trim().to_string(),
            data: req.data,
            thumbnail: req.thumbnail,
            is_public: req.is_public,
        })
        .await
        .map_err(|e| (StatusCode::NOT_FOUND, e.to_string()))?;
    Ok(Json(serde_json::json!({ "id": id })))
}

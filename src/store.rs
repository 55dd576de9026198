//! Persistence collaborator boundary.
//!
//! The engine never talks to a database or remote API directly; it hands the
//! serialized document, name, and thumbnail to a [`TemplateStore`]. The
//! bundled [`MemoryStore`] backs the HTTP server and the test suite.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::LaureaError;

/// Full persisted record. `data` is the serialized template document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateRecord {
    pub id: Uuid,
    pub name: String,
    pub data: String,
    pub thumbnail: String,
    pub is_public: bool,
    /// Set on first save, preserved across updates.
    pub created_at: DateTime<Utc>,
}

/// Payload handed to the store on save. `id` present means update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub name: String,
    pub data: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub is_public: bool,
}

/// The save/load contract with the external persistence layer.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    async fn list(&self) -> Result<Vec<TemplateRecord>, LaureaError>;
    async fn fetch(&self, id: Uuid) -> Result<TemplateRecord, LaureaError>;
    async fn save(&self, payload: SaveTemplate) -> Result<Uuid, LaureaError>;
}

/// In-memory store. Insertion order is preserved for listing.
#[derive(Default)]
pub struct MemoryStore {
    records: Arc<RwLock<Vec<TemplateRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TemplateStore for MemoryStore {
    async fn list(&self) -> Result<Vec<TemplateRecord>, LaureaError> {
        let records = self.records.read().await;
        Ok(records.clone())
    }

    async fn fetch(&self, id: Uuid) -> Result<TemplateRecord, LaureaError> {
        let records = self.records.read().await;
        records
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| LaureaError::Transport(format!("Template {} not found", id)))
    }

    async fn save(&self, payload: SaveTemplate) -> Result<Uuid, LaureaError> {
        let mut records = self.records.write().await;
        match payload.id {
            Some(id) => {
                let record = records
                    .iter_mut()
                    .find(|r| r.id == id)
                    .ok_or_else(|| LaureaError::Transport(format!("Template {} not found", id)))?;
                record.name = payload.name;
                record.data = payload.data;
                record.thumbnail = payload.thumbnail;
                record.is_public = payload.is_public;
                Ok(id)
            }
            None => {
                let id = Uuid::new_v4();
                records.push(TemplateRecord {
                    id,
                    name: payload.name,
                    data: payload.data,
                    thumbnail: payload.thumbnail,
                    is_public: payload.is_public,
                    created_at: Utc::now(),
                });
                Ok(id)
            }
        }
    }
}

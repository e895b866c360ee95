use crate::entities::image_documents;
use crate::models::GpsRecord;
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, DatabaseConnection};
use uuid::Uuid;

/// Append-only sink for GPS records. Every call creates a new document.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persists `record` and returns the generated document id.
    async fn add_document(&self, record: &GpsRecord) -> Result<String>;
}

pub struct SeaOrmDocumentStore {
    db: DatabaseConnection,
}

impl SeaOrmDocumentStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DocumentStore for SeaOrmDocumentStore {
    async fn add_document(&self, record: &GpsRecord) -> Result<String> {
        let id = Uuid::new_v4().to_string();

        let document = image_documents::ActiveModel {
            id: Set(id.clone()),
            file_path: Set(record.file_path.clone()),
            gps_coordinates: Set(serde_json::to_value(record.gps_coordinates)?),
            thumb_file_name: Set(record.thumb_file_name.clone()),
            created_at: Set(Utc::now()),
        };
        document.insert(&self.db).await?;

        Ok(id)
    }
}

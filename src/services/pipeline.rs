use anyhow::{Context, anyhow};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::models::{GpsCoordinates, GpsRecord, ImageKind, PipelineOutcome, UploadEvent};
use crate::services::document_store::DocumentStore;
use crate::services::metadata::{GpsExtraction, MetadataService};
use crate::services::storage::StorageService;
use crate::services::thumbnail_service::ThumbnailService;
use crate::utils::scratch::ScratchDir;
use crate::utils::validation::{check_content_type, object_file_name};

/// The three buckets the pipeline talks to.
#[derive(Clone)]
pub struct PipelineStores {
    pub source: Arc<dyn StorageService>,
    pub archive: Arc<dyn StorageService>,
    pub thumbnails: Arc<dyn StorageService>,
}

/// Processes one upload notification end to end.
///
/// Clients are constructed once per process and handed in, so the same pipeline serves
/// every invocation a container receives.
pub struct UploadPipeline {
    config: PipelineConfig,
    stores: PipelineStores,
    documents: Arc<dyn DocumentStore>,
}

impl UploadPipeline {
    pub fn new(
        config: PipelineConfig,
        stores: PipelineStores,
        documents: Arc<dyn DocumentStore>,
    ) -> Self {
        Self {
            config,
            stores,
            documents,
        }
    }

    #[tracing::instrument(skip(self, event), fields(object = %event.name, content_type = %event.content_type))]
    pub async fn process(&self, event: &UploadEvent) -> Result<PipelineOutcome, PipelineError> {
        let kind = match check_content_type(&event.content_type) {
            Ok(kind) => kind,
            Err(e) => {
                info!("⏭️  {}", e);
                return Ok(PipelineOutcome::Skipped {
                    content_type: event.content_type.clone(),
                });
            }
        };

        if let Some(bucket) = &event.bucket {
            if bucket != self.stores.source.bucket() {
                warn!(
                    "Event names bucket {} but pipeline reads from {}",
                    bucket,
                    self.stores.source.bucket()
                );
            }
        }

        let file_name = object_file_name(&event.name);
        if file_name.is_empty() {
            return Err(PipelineError::Fetch(anyhow!(
                "object name {:?} has no file component",
                event.name
            )));
        }

        let scratch = ScratchDir::create(&self.config.scratch_root, &event.name)
            .context("failed to create scratch directory")
            .map_err(PipelineError::Fetch)?;

        let outcome = self.run_steps(event, kind, file_name, &scratch).await;

        // Dropping the guard would also remove it; closing here keeps the log ordering.
        scratch.close();
        outcome
    }

    async fn run_steps(
        &self,
        event: &UploadEvent,
        kind: ImageKind,
        file_name: &str,
        scratch: &ScratchDir,
    ) -> Result<PipelineOutcome, PipelineError> {
        // 1. Fetch
        let local_file = scratch.join(file_name);
        let size = self
            .stores
            .source
            .download_to_path(&event.name, &local_file)
            .await
            .with_context(|| format!("downloading {}", event.name))
            .map_err(PipelineError::Fetch)?;
        info!(
            "📥 Image downloaded locally to {} ({} bytes)",
            local_file.display(),
            size
        );

        // 2. Thumbnail
        let thumb_file_name = ThumbnailService::thumbnail_file_name(&event.name, kind);
        let thumb_path = scratch.join(&thumb_file_name);
        ThumbnailService::generate(&local_file, &thumb_path, kind).map_err(PipelineError::Codec)?;
        info!("🖼️  Thumbnail generated at {}", thumb_path.display());

        // 3. Uploads
        self.upload(
            self.stores.thumbnails.as_ref(),
            &thumb_path,
            &thumb_file_name,
            kind,
        )
        .await?;
        info!("📤 Thumbnail uploaded to {}", self.stores.thumbnails.bucket());

        self.upload(self.stores.archive.as_ref(), &local_file, file_name, kind)
            .await?;
        info!("📦 Image moved to {}", self.stores.archive.bucket());

        // 4. EXIF + persist
        let document_id = match MetadataService::extract_gps(&local_file) {
            GpsExtraction::Found(coordinates) => {
                info!(
                    lat = coordinates.lat,
                    lon = coordinates.lon,
                    "📍 Extracted GPS coordinates"
                );
                self.persist(event, coordinates, &thumb_file_name).await
            }
            GpsExtraction::NoGpsData => {
                info!("No GPS data found in image EXIF.");
                None
            }
            GpsExtraction::ParseFailure(reason) => {
                warn!("⚠️  Error extracting EXIF data: {}", reason);
                None
            }
        };

        Ok(PipelineOutcome::Processed {
            thumb_file_name,
            archived_as: file_name.to_string(),
            document_id,
        })
    }

    async fn upload(
        &self,
        store: &dyn StorageService,
        src: &Path,
        key: &str,
        kind: ImageKind,
    ) -> Result<(), PipelineError> {
        store
            .upload_from_path(src, key, kind.content_type())
            .await
            .with_context(|| format!("uploading {} to {}", key, store.bucket()))
            .map_err(PipelineError::Upload)
    }

    /// A failed write is logged and swallowed; the images are already in place.
    async fn persist(
        &self,
        event: &UploadEvent,
        coordinates: GpsCoordinates,
        thumb_file_name: &str,
    ) -> Option<String> {
        let record = GpsRecord {
            file_path: event.name.clone(),
            gps_coordinates: coordinates,
            thumb_file_name: thumb_file_name.to_string(),
        };

        match self.documents.add_document(&record).await {
            Ok(id) => {
                info!(
                    "🗂️  Document written to {} with ID: {}",
                    self.config.document_collection, id
                );
                Some(id)
            }
            Err(e) => {
                error!("❌ Failed to write GPS document for {}: {:?}", event.name, e);
                None
            }
        }
    }
}

use std::env;
use std::path::PathBuf;

/// Runtime configuration for the upload pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Bucket that receives uploads and triggers the handler (default: "image-uploads")
    pub source_bucket: String,

    /// Bucket that keeps the original image after processing (default: "image-archive")
    pub archive_bucket: String,

    /// Bucket for generated thumbnails (default: "image-thumbnails")
    pub thumbnail_bucket: String,

    /// Logical name of the document collection GPS records go to (default: "imagesData")
    pub document_collection: String,

    /// Parent directory for per-invocation scratch directories (default: $TMPDIR/thumbs)
    pub scratch_root: PathBuf,

    /// Database connection string, required by the Lambda entrypoint
    pub database_url: Option<String>,

    /// Custom S3 endpoint (MinIO, LocalStack). Enables path-style addressing.
    pub s3_endpoint: Option<String>,

    /// AWS region (default: "us-east-1")
    pub aws_region: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_bucket: "image-uploads".to_string(),
            archive_bucket: "image-archive".to_string(),
            thumbnail_bucket: "image-thumbnails".to_string(),
            document_collection: "imagesData".to_string(),
            scratch_root: env::temp_dir().join("thumbs"),
            database_url: None,
            s3_endpoint: None,
            aws_region: "us-east-1".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            source_bucket: env::var("SOURCE_BUCKET").unwrap_or(default.source_bucket),
            archive_bucket: env::var("ARCHIVE_BUCKET").unwrap_or(default.archive_bucket),
            thumbnail_bucket: env::var("THUMBNAIL_BUCKET").unwrap_or(default.thumbnail_bucket),
            document_collection: env::var("DOCUMENT_COLLECTION")
                .unwrap_or(default.document_collection),
            scratch_root: env::var("SCRATCH_DIR")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(default.scratch_root),
            database_url: env::var("DATABASE_URL").ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok().filter(|v| !v.trim().is_empty()),
            aws_region: env::var("AWS_REGION").unwrap_or(default.aws_region),
        }
    }

    /// Local setup against MinIO and an in-memory SQLite database
    pub fn development() -> Self {
        Self {
            database_url: Some("sqlite::memory:".to_string()),
            s3_endpoint: Some("http://127.0.0.1:9000".to_string()),
            ..Self::default()
        }
    }
}

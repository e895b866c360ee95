use image::ImageFormat;
use serde::{Deserialize, Serialize};

/// Storage notification that triggers one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadEvent {
    pub name: String,
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub bucket: Option<String>,
}

/// Image encodings the pipeline accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
}

impl ImageKind {
    pub fn content_type(self) -> &'static str {
        match self {
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Png => "image/png",
        }
    }

    /// Extension used for derived file names (the content-type subtype).
    pub fn extension(self) -> &'static str {
        match self {
            ImageKind::Jpeg => "jpeg",
            ImageKind::Png => "png",
        }
    }

    pub fn image_format(self) -> ImageFormat {
        match self {
            ImageKind::Jpeg => ImageFormat::Jpeg,
            ImageKind::Png => ImageFormat::Png,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsCoordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Document persisted for every image that carries usable GPS tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpsRecord {
    pub file_path: String,
    pub gps_coordinates: GpsCoordinates,
    pub thumb_file_name: String,
}

/// What a single invocation did, returned to the Lambda runtime.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum PipelineOutcome {
    #[serde(rename_all = "camelCase")]
    Skipped { content_type: String },
    #[serde(rename_all = "camelCase")]
    Processed {
        thumb_file_name: String,
        archived_as: String,
        document_id: Option<String>,
    },
}

#![allow(dead_code)]

use async_trait::async_trait;
use exif::experimental::Writer;
use exif::{Field, In, Rational, Tag, Value};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use image_upload_pipeline::config::PipelineConfig;
use image_upload_pipeline::models::GpsRecord;
use image_upload_pipeline::services::document_store::DocumentStore;
use image_upload_pipeline::services::pipeline::{PipelineStores, UploadPipeline};
use image_upload_pipeline::services::storage::StorageService;
use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;
use std::sync::{Arc, Mutex};

pub struct StoredObject {
    pub data: Vec<u8>,
    pub content_type: String,
}

pub struct MockStorageService {
    bucket: String,
    files: Mutex<HashMap<String, StoredObject>>,
    uploads: Mutex<Vec<String>>,
    fail_uploads: bool,
}

impl MockStorageService {
    pub fn new(bucket: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            files: Mutex::new(HashMap::new()),
            uploads: Mutex::new(Vec::new()),
            fail_uploads: false,
        }
    }

    pub fn failing(bucket: &str) -> Self {
        Self {
            fail_uploads: true,
            ..Self::new(bucket)
        }
    }

    pub fn put(&self, key: &str, data: Vec<u8>, content_type: &str) {
        self.files.lock().unwrap().insert(
            key.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(key).map(|o| o.data.clone())
    }

    pub fn content_type(&self, key: &str) -> Option<String> {
        self.files
            .lock()
            .unwrap()
            .get(key)
            .map(|o| o.content_type.clone())
    }

    /// Keys passed to `upload_from_path`, in call order, including repeats.
    pub fn uploads(&self) -> Vec<String> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn object_count(&self) -> usize {
        self.files.lock().unwrap().len()
    }
}

#[async_trait]
impl StorageService for MockStorageService {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn download_to_path(&self, key: &str, dest: &Path) -> anyhow::Result<u64> {
        let data = self
            .get(key)
            .ok_or_else(|| anyhow::anyhow!("Object {}/{} not found", self.bucket, key))?;
        tokio::fs::write(dest, &data).await?;
        Ok(data.len() as u64)
    }

    async fn upload_from_path(
        &self,
        src: &Path,
        key: &str,
        content_type: &str,
    ) -> anyhow::Result<()> {
        if self.fail_uploads {
            return Err(anyhow::anyhow!("simulated outage for {}", self.bucket));
        }
        let data = tokio::fs::read(src).await?;
        self.uploads.lock().unwrap().push(key.to_string());
        self.put(key, data, content_type);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingDocumentStore {
    records: Mutex<Vec<GpsRecord>>,
}

impl RecordingDocumentStore {
    pub fn records(&self) -> Vec<GpsRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentStore for RecordingDocumentStore {
    async fn add_document(&self, record: &GpsRecord) -> anyhow::Result<String> {
        let mut records = self.records.lock().unwrap();
        records.push(record.clone());
        Ok(format!("doc-{}", records.len()))
    }
}

pub struct FailingDocumentStore;

#[async_trait]
impl DocumentStore for FailingDocumentStore {
    async fn add_document(&self, _record: &GpsRecord) -> anyhow::Result<String> {
        Err(anyhow::anyhow!("document database unavailable"))
    }
}

pub struct Harness {
    pub source: Arc<MockStorageService>,
    pub archive: Arc<MockStorageService>,
    pub thumbnails: Arc<MockStorageService>,
    pub documents: Arc<RecordingDocumentStore>,
    pub scratch_root: tempfile::TempDir,
    pub pipeline: UploadPipeline,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_stores(
            MockStorageService::new("archive"),
            MockStorageService::new("thumbnails"),
        )
    }

    pub fn with_stores(archive: MockStorageService, thumbnails: MockStorageService) -> Self {
        let documents = Arc::new(RecordingDocumentStore::default());
        Self::build(archive, thumbnails, documents.clone(), documents)
    }

    pub fn with_document_store(documents: Arc<dyn DocumentStore>) -> Self {
        Self::build(
            MockStorageService::new("archive"),
            MockStorageService::new("thumbnails"),
            Arc::new(RecordingDocumentStore::default()),
            documents,
        )
    }

    fn build(
        archive: MockStorageService,
        thumbnails: MockStorageService,
        recorder: Arc<RecordingDocumentStore>,
        documents: Arc<dyn DocumentStore>,
    ) -> Self {
        let _ = tracing_subscriber::fmt::try_init();

        let source = Arc::new(MockStorageService::new("uploads"));
        let archive = Arc::new(archive);
        let thumbnails = Arc::new(thumbnails);
        let scratch_root = tempfile::tempdir().unwrap();

        let config = PipelineConfig {
            scratch_root: scratch_root.path().to_path_buf(),
            ..PipelineConfig::default()
        };
        let stores = PipelineStores {
            source: source.clone(),
            archive: archive.clone(),
            thumbnails: thumbnails.clone(),
        };

        Self {
            source,
            archive,
            thumbnails,
            documents: recorder,
            scratch_root,
            pipeline: UploadPipeline::new(config, stores, documents),
        }
    }

    /// Number of entries left under the scratch root.
    pub fn scratch_entries(&self) -> usize {
        std::fs::read_dir(self.scratch_root.path()).unwrap().count()
    }
}

fn sample_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    }))
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut out = Vec::new();
    sample_image(width, height)
        .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .unwrap();
    out
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut out = Vec::new();
    sample_image(width, height)
        .write_to(&mut Cursor::new(&mut out), ImageFormat::Jpeg)
        .unwrap();
    out
}

fn ascii(tag: Tag, text: &str) -> Field {
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value: Value::Ascii(vec![text.as_bytes().to_vec()]),
    }
}

fn rational(tag: Tag, parts: &[(u32, u32)]) -> Field {
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value: Value::Rational(parts.iter().map(|&p| Rational::from(p)).collect()),
    }
}

fn tiff_block(fields: &[Field]) -> Vec<u8> {
    let mut writer = Writer::new();
    for field in fields {
        writer.push_field(field);
    }
    let mut buf = Cursor::new(Vec::new());
    writer.write(&mut buf, false).unwrap();
    buf.into_inner()
}

/// Inserts an APP1 Exif segment right after the JPEG SOI marker.
fn with_app1(jpeg: &[u8], tiff: &[u8]) -> Vec<u8> {
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    let len = u16::try_from(2 + 6 + tiff.len()).unwrap();

    let mut out = Vec::with_capacity(jpeg.len() + tiff.len() + 10);
    out.extend_from_slice(&jpeg[..2]);
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(tiff);
    out.extend_from_slice(&jpeg[2..]);
    out
}

/// JPEG tagged with 40°26'46.302" <lat_ref>, 79°58'56" W.
pub fn jpeg_with_gps(width: u32, height: u32, lat_ref: &str) -> Vec<u8> {
    let fields = [
        ascii(Tag::Make, "TestCam"),
        ascii(Tag::GPSLatitudeRef, lat_ref),
        rational(Tag::GPSLatitude, &[(40, 1), (26, 1), (46302, 1000)]),
        ascii(Tag::GPSLongitudeRef, "W"),
        rational(Tag::GPSLongitude, &[(79, 1), (58, 1), (56, 1)]),
    ];
    with_app1(&jpeg_bytes(width, height), &tiff_block(&fields))
}

/// JPEG with an EXIF block that has camera tags but no GPS.
pub fn jpeg_without_gps(width: u32, height: u32) -> Vec<u8> {
    let fields = [ascii(Tag::Make, "TestCam"), ascii(Tag::Model, "X100")];
    with_app1(&jpeg_bytes(width, height), &tiff_block(&fields))
}

/// JPEG whose GPS latitude has a zero denominator.
pub fn jpeg_with_broken_gps(width: u32, height: u32) -> Vec<u8> {
    let fields = [
        ascii(Tag::GPSLatitudeRef, "N"),
        rational(Tag::GPSLatitude, &[(40, 1), (26, 0), (1, 1)]),
        ascii(Tag::GPSLongitudeRef, "E"),
        rational(Tag::GPSLongitude, &[(10, 1), (0, 1), (0, 1)]),
    ];
    with_app1(&jpeg_bytes(width, height), &tiff_block(&fields))
}

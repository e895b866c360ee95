use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// Object store operations the pipeline needs, one instance per bucket.
#[async_trait]
pub trait StorageService: Send + Sync {
    fn bucket(&self) -> &str;

    /// Streams `key` into a new file at `dest`, returning the number of bytes written.
    async fn download_to_path(&self, key: &str, dest: &Path) -> Result<u64>;

    /// Uploads the file at `src` under `key`, overwriting any existing object.
    async fn upload_from_path(&self, src: &Path, key: &str, content_type: &str) -> Result<()>;
}

pub struct S3StorageService {
    client: Client,
    bucket: String,
}

impl S3StorageService {
    pub fn new(client: Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

#[async_trait]
impl StorageService for S3StorageService {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn download_to_path(&self, key: &str, dest: &Path) -> Result<u64> {
        let res = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let service_error = e.into_service_error();
                if service_error.is_no_such_key() {
                    anyhow!("Object {}/{} not found", self.bucket, key)
                } else {
                    anyhow!(service_error)
                }
            })?;

        stream_to_file(res.body, dest)
            .await
            .with_context(|| format!("failed to stream {}/{} to disk", self.bucket, key))
    }

    async fn upload_from_path(&self, src: &Path, key: &str, content_type: &str) -> Result<()> {
        let body = ByteStream::from_path(src)
            .await
            .with_context(|| format!("failed to read {}", src.display()))?;

        let res = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(body)
            .send()
            .await;

        if let Err(e) = res {
            tracing::error!(
                "S3 put_object failed: bucket={}, key={}, error={:?}",
                self.bucket,
                key,
                e
            );
            return Err(e.into());
        }
        Ok(())
    }
}

/// Copies an object body into a new file at `dest` chunk by chunk.
async fn stream_to_file(body: ByteStream, dest: &Path) -> Result<u64> {
    let mut body_reader = body.into_async_read();
    let mut file = tokio::fs::File::create(dest)
        .await
        .with_context(|| format!("failed to create {}", dest.display()))?;
    let written = tokio::io::copy(&mut body_reader, &mut file).await?;
    file.flush().await?;
    Ok(written)
}

use crate::config::PipelineConfig;
use crate::services::pipeline::PipelineStores;
use crate::services::storage::S3StorageService;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use std::sync::Arc;
use tracing::info;

/// Builds one S3 client and the three bucket-scoped stores that share it.
pub async fn setup_storage(config: &PipelineConfig) -> PipelineStores {
    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.aws_region.clone()));

    if let Some(endpoint_url) = &config.s3_endpoint {
        info!("☁️  S3 endpoint override: {}", endpoint_url);
        loader = loader.endpoint_url(endpoint_url);
    }

    let aws_config = loader.load().await;

    let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
        .force_path_style(config.s3_endpoint.is_some())
        .build();

    let s3_client = aws_sdk_s3::Client::from_conf(s3_config);

    info!(
        "🪣 Buckets: source={}, archive={}, thumbnails={}",
        config.source_bucket, config.archive_bucket, config.thumbnail_bucket
    );

    PipelineStores {
        source: Arc::new(S3StorageService::new(
            s3_client.clone(),
            config.source_bucket.clone(),
        )),
        archive: Arc::new(S3StorageService::new(
            s3_client.clone(),
            config.archive_bucket.clone(),
        )),
        thumbnails: Arc::new(S3StorageService::new(
            s3_client,
            config.thumbnail_bucket.clone(),
        )),
    }
}

use dotenvy::dotenv;
use image_upload_pipeline::config::PipelineConfig;
use image_upload_pipeline::handler::handler;
use image_upload_pipeline::infrastructure::{database, storage};
use image_upload_pipeline::models::UploadEvent;
use image_upload_pipeline::services::document_store::SeaOrmDocumentStore;
use image_upload_pipeline::services::pipeline::UploadPipeline;
use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "image_upload_pipeline=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("🚀 Starting image upload pipeline...");

    let config = PipelineConfig::from_env();
    info!(
        "🗂️  Documents: collection={}, scratch={}",
        config.document_collection,
        config.scratch_root.display()
    );

    let db = database::setup_database(&config).await?;
    let stores = storage::setup_storage(&config).await;
    let documents = Arc::new(SeaOrmDocumentStore::new(db));
    let pipeline = Arc::new(UploadPipeline::new(config, stores, documents));

    info!("✅ Ready for upload events");

    run(service_fn(move |event: LambdaEvent<UploadEvent>| {
        let pipeline = pipeline.clone();
        async move { handler(&pipeline, event).await }
    }))
    .await
}

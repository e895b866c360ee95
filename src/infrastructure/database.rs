use crate::config::PipelineConfig;
use crate::entities::image_documents;
use anyhow::Context;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema};
use std::time::Duration;
use tracing::info;

pub async fn setup_database(config: &PipelineConfig) -> anyhow::Result<DatabaseConnection> {
    let db_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set")?;

    info!("📂 Database: {}", redact_url(db_url));

    // One invocation at a time per Lambda container, so a small pool is plenty.
    let mut opt = ConnectOptions::new(db_url);
    opt.max_connections(2)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(300))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);

    let db = Database::connect(opt).await?;

    info!("✅ Database connected successfully");

    run_migrations(&db).await?;

    Ok(db)
}

pub async fn run_migrations(db: &DatabaseConnection) -> anyhow::Result<()> {
    info!("🔄 Ensuring document tables exist...");
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let stmt = schema
        .create_table_from_entity(image_documents::Entity)
        .if_not_exists()
        .to_owned();

    db.execute(builder.build(&stmt))
        .await
        .context("failed to create image_documents table")?;

    Ok(())
}

/// Hides the password part of a connection string before it is logged.
fn redact_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    match rest.split_once('@') {
        Some((credentials, host)) => {
            let user = credentials.split(':').next().unwrap_or_default();
            format!("{}://{}:***@{}", scheme, user, host)
        }
        None => url.to_string(),
    }
}

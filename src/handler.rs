use lambda_runtime::{Error, LambdaEvent};
use tracing::error;

use crate::models::{PipelineOutcome, UploadEvent};
use crate::services::pipeline::UploadPipeline;

/// Runs the pipeline for one Lambda event. A returned error marks the event as failed for
/// the platform, which decides whether to redeliver it.
#[tracing::instrument(skip_all, fields(request_id = %event.context.request_id))]
pub async fn handler(
    pipeline: &UploadPipeline,
    event: LambdaEvent<UploadEvent>,
) -> Result<PipelineOutcome, Error> {
    let (payload, _context) = event.into_parts();

    pipeline.process(&payload).await.map_err(|e| {
        error!(stage = e.stage(), "❌ Processing {} failed: {}", payload.name, e);
        Error::from(e)
    })
}

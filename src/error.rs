use thiserror::Error;

/// Failures that end an invocation.
///
/// `UnsupportedType` is only produced by the content-type filter and is turned into a
/// skipped outcome by the pipeline; the other variants reach the Lambda runtime.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Unsupported content type: {0}")]
    UnsupportedType(String),

    #[error("Fetch failed: {0:#}")]
    Fetch(anyhow::Error),

    #[error("Image codec error: {0:#}")]
    Codec(anyhow::Error),

    #[error("Upload failed: {0:#}")]
    Upload(anyhow::Error),
}

impl PipelineError {
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::UnsupportedType(_) => "validate",
            PipelineError::Fetch(_) => "fetch",
            PipelineError::Codec(_) => "thumbnail",
            PipelineError::Upload(_) => "upload",
        }
    }
}

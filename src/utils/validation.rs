use crate::error::PipelineError;
use crate::models::ImageKind;
use std::path::Path;

/// Content types the pipeline processes; everything else is skipped.
/// Matching is exact: no case folding, no parameters.
pub const ALLOWED_MIME_TYPES: &[(&str, ImageKind)] =
    &[("image/jpeg", ImageKind::Jpeg), ("image/png", ImageKind::Png)];

pub fn check_content_type(content_type: &str) -> Result<ImageKind, PipelineError> {
    ALLOWED_MIME_TYPES
        .iter()
        .find(|(allowed, _)| *allowed == content_type)
        .map(|&(_, kind)| kind)
        .ok_or_else(|| PipelineError::UnsupportedType(content_type.to_string()))
}

/// Last path segment of an object key (`photos/cat.jpg` -> `cat.jpg`).
pub fn object_file_name(object_name: &str) -> &str {
    object_name.rsplit('/').next().unwrap_or(object_name)
}

/// File name without its final extension (`photos/cat.v2.jpg` -> `cat.v2`).
pub fn object_stem(object_name: &str) -> &str {
    let file_name = object_file_name(object_name);
    Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name)
}

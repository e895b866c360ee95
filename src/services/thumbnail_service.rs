use anyhow::{Result, anyhow};
use image::DynamicImage;
use image::imageops::FilterType;
use std::path::Path;

use crate::models::ImageKind;
use crate::utils::validation::object_stem;

/// Thumbnail edge length in pixels. Thumbnails are always square.
pub const THUMB_SIZE: u32 = 64;

pub struct ThumbnailService;

impl ThumbnailService {
    /// `thumb@64_<basename>.<ext>` for the given object key.
    pub fn thumbnail_file_name(object_name: &str, kind: ImageKind) -> String {
        format!(
            "thumb@{}_{}.{}",
            THUMB_SIZE,
            object_stem(object_name),
            kind.extension()
        )
    }

    /// Decodes `src`, stretches it to exactly THUMB_SIZE x THUMB_SIZE (aspect ratio is not
    /// preserved) and writes it to `dest` in the same encoding as the source.
    pub fn generate(src: &Path, dest: &Path, kind: ImageKind) -> Result<(u32, u32)> {
        let img = image::io::Reader::open(src)
            .map_err(|e| anyhow!("Failed to open {}: {}", src.display(), e))?
            .with_guessed_format()
            .map_err(|e| anyhow!("Failed to read {}: {}", src.display(), e))?
            .decode()
            .map_err(|e| anyhow!("Failed to load image: {}", e))?;

        let thumbnail = img.resize_exact(THUMB_SIZE, THUMB_SIZE, FilterType::Lanczos3);
        let encoded = Self::prepare_for_encoding(thumbnail, kind);

        encoded
            .save_with_format(dest, kind.image_format())
            .map_err(|e| anyhow!("Failed to encode {:?} thumbnail: {}", kind, e))?;

        Ok((encoded.width(), encoded.height()))
    }

    /// JPEG has no alpha channel and only 8-bit samples.
    fn prepare_for_encoding(img: DynamicImage, kind: ImageKind) -> DynamicImage {
        match (kind, &img) {
            (ImageKind::Jpeg, DynamicImage::ImageRgb8(_) | DynamicImage::ImageLuma8(_)) => img,
            (ImageKind::Jpeg, _) => DynamicImage::ImageRgb8(img.to_rgb8()),
            (ImageKind::Png, _) => img,
        }
    }
}

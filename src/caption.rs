use crate::config::Config;
use crate::document::ExtractedImage;
use crate::error::{SparkError, SparkResult};
use crate::tools::Tools;
use image::ImageFormat;
use std::path::Path;
use tracing::warn;

/// Run OCR over every extracted image of one document, filling in captions.
/// A failed caption never aborts the document: the image keeps `None` (the
/// placeholder alt is applied at assembly) and the failure is returned as a
/// warning for the run report.
pub fn caption_images<T: Tools>(
    cfg: &Config,
    tools: &T,
    images: &mut [ExtractedImage],
) -> Vec<String> {
    if !cfg.ocr.enabled || images.is_empty() {
        return Vec::new();
    }

    let scratch = match tempfile::tempdir() {
        Ok(dir) => dir,
        Err(e) => {
            warn!("captioning skipped: scratch dir unavailable: {e}");
            return vec![format!("captioning skipped: scratch dir unavailable: {e}")];
        }
    };

    let mut warnings = Vec::new();
    for img in images.iter_mut() {
        match caption_one(cfg, tools, scratch.path(), img) {
            Ok(Some(caption)) => img.caption = Some(caption),
            // OCR found no text; assembly falls back to the placeholder.
            Ok(None) => {}
            Err(e) => {
                warn!("caption failed for {}: {e}", img.file_name());
                warnings.push(format!("caption {}: {e}", img.file_name()));
            }
        }
    }
    warnings
}

fn caption_one<T: Tools>(
    cfg: &Config,
    tools: &T,
    scratch: &Path,
    img: &ExtractedImage,
) -> SparkResult<Option<String>> {
    let png_path = scratch.join(img.file_name());
    img.image
        .save_with_format(&png_path, ImageFormat::Png)
        .map_err(|e| SparkError::caption(format!("encoding {}: {e}", img.file_name())))?;

    let raw = tools.ocr_text(&png_path)?;
    let caption = sanitize_caption(&raw, cfg.ocr.max_caption_chars);
    Ok(if caption.is_empty() { None } else { Some(caption) })
}

/// Make raw OCR output safe for the Markdown alt position: whitespace runs
/// collapsed to single spaces, square brackets dropped, truncated to
/// `max_chars` on a char boundary.
pub fn sanitize_caption(raw: &str, max_chars: usize) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let cleaned: String = collapsed
        .chars()
        .filter(|c| *c != '[' && *c != ']')
        .take(max_chars)
        .collect();
    cleaned.trim().to_string()
}

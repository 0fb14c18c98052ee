use crate::document::{ConversionResult, Document, ExtractedImage};
use crate::error::{SparkError, SparkResult};
use crate::tools::Tools;
use tracing::debug;

/// PDF: page text in reading order via pdftotext, embedded raster images in
/// document order via pdfimages. Zero extractable text is not an error.
pub fn convert<T: Tools>(tools: &T, doc: &Document) -> SparkResult<ConversionResult> {
    debug!("pdf convert {}", doc.path.display());
    let raw = tools.pdf_text(&doc.path)?;
    let markdown = pages_to_markdown(&raw);

    // pdfimages writes into a per-document scratch dir; the decoded images
    // are re-encoded as PNG at write time, so the scratch files can go as
    // soon as this conversion ends.
    let scratch = tempfile::tempdir()
        .map_err(|e| SparkError::conversion(&doc.path, format!("creating scratch dir: {e}")))?;
    let produced = tools.pdf_images(&doc.path, scratch.path())?;

    let mut images = Vec::new();
    let mut warnings = Vec::new();
    for path in produced {
        match image::open(&path) {
            Ok(img) => images.push(ExtractedImage::new(images.len() + 1, img)),
            Err(e) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.display().to_string());
                warnings.push(format!("skipping undecodable embedded image {name}: {e}"));
            }
        }
    }

    Ok(ConversionResult {
        markdown,
        images,
        warnings,
    })
}

/// pdftotext separates pages with form feeds; each non-empty page becomes a
/// paragraph-break-separated block.
fn pages_to_markdown(raw: &str) -> String {
    raw.split('\u{000C}')
        .map(str::trim)
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_become_paragraph_blocks() {
        let raw = "Hello World\n\u{000C}Second page\n\u{000C}";
        assert_eq!(pages_to_markdown(raw), "Hello World\n\nSecond page");
    }

    #[test]
    fn empty_text_yields_empty_body() {
        assert_eq!(pages_to_markdown(""), "");
        assert_eq!(pages_to_markdown("\u{000C}\u{000C}"), "");
    }
}

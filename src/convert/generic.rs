use crate::document::{ConversionResult, Document};
use crate::error::SparkResult;
use crate::tools::Tools;
use tracing::debug;

/// TXT/HTML/RTF: the whole text-to-Markdown transformation is delegated to
/// Pandoc. These formats are treated as text-only; no image extraction.
pub fn convert<T: Tools>(tools: &T, doc: &Document) -> SparkResult<ConversionResult> {
    debug!("pandoc convert {}", doc.path.display());
    let markdown = tools.pandoc_markdown(&doc.path)?;
    Ok(ConversionResult::text_only(markdown))
}

use crate::error::{SparkError, SparkResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The closed set of input formats DocuSpark converts.
///
/// Dispatch is by file extension only, ASCII case-insensitive; there is no
/// content sniffing. Anything outside this table is skipped at the tree
/// level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocFormat {
    Pdf,
    Docx,
    Pptx,
    Txt,
    Html,
    Rtf,
}

impl DocFormat {
    pub const ALL: [DocFormat; 6] = [
        DocFormat::Pdf,
        DocFormat::Docx,
        DocFormat::Pptx,
        DocFormat::Txt,
        DocFormat::Html,
        DocFormat::Rtf,
    ];

    /// Detect a format from a path's extension. `None` means "not ours":
    /// the tree walk skips the file silently.
    pub fn detect(path: &Path) -> Option<DocFormat> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(DocFormat::Pdf),
            "docx" => Some(DocFormat::Docx),
            "pptx" => Some(DocFormat::Pptx),
            "txt" => Some(DocFormat::Txt),
            // .htm is accepted alongside .html
            "html" | "htm" => Some(DocFormat::Html),
            "rtf" => Some(DocFormat::Rtf),
            _ => None,
        }
    }

    /// Explicit dispatch for a single named file: an unrecognized extension
    /// is an error naming the extension.
    pub fn from_path(path: &Path) -> SparkResult<DocFormat> {
        match Self::detect(path) {
            Some(fmt) => Ok(fmt),
            None => {
                let ext = path
                    .extension()
                    .and_then(|s| s.to_str())
                    .unwrap_or("")
                    .to_ascii_lowercase();
                Err(SparkError::unsupported(ext))
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocFormat::Pdf => "pdf",
            DocFormat::Docx => "docx",
            DocFormat::Pptx => "pptx",
            DocFormat::Txt => "txt",
            DocFormat::Html => "html",
            DocFormat::Rtf => "rtf",
        }
    }

    /// True for the formats whose conversion is delegated wholesale to
    /// Pandoc and which never yield images.
    pub fn is_text_only(&self) -> bool {
        matches!(self, DocFormat::Txt | DocFormat::Html | DocFormat::Rtf)
    }
}

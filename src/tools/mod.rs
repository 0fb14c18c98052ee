pub mod system;
pub mod types;

use crate::error::SparkResult;
use anyhow::Result;
use std::path::{Path, PathBuf};

pub use system::SystemTools;
pub use types::{ToolDiag, ToolStatus};

/// The external collaborators the pipeline delegates to. Production code
/// shells out via [`SystemTools`]; tests substitute an in-process fake.
pub trait Tools {
    /// Probe every external binary and report what is available.
    fn doctor(&self) -> Result<ToolDiag>;

    /// Full text-to-Markdown conversion of a TXT/HTML/RTF document.
    fn pandoc_markdown(&self, input: &Path) -> SparkResult<String>;

    /// Page text of a PDF in reading order, form feeds between pages.
    fn pdf_text(&self, input: &Path) -> SparkResult<String>;

    /// Extract embedded raster images as PNG files under `out_dir`,
    /// returned in document order.
    fn pdf_images(&self, input: &Path, out_dir: &Path) -> SparkResult<Vec<PathBuf>>;

    /// Recognize text in a PNG image.
    fn ocr_text(&self, image: &Path) -> SparkResult<String>;
}

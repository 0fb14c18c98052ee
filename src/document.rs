use crate::format::DocFormat;
use image::DynamicImage;
use std::path::{Path, PathBuf};

/// One input file to be converted. Discovered during the tree walk, read
/// once, never mutated.
#[derive(Debug, Clone)]
pub struct Document {
    /// Path used to open the file.
    pub path: PathBuf,
    /// Path relative to the input root, used for output mirroring.
    pub relative_path: PathBuf,
    pub format: DocFormat,
}

impl Document {
    pub fn new(path: PathBuf, relative_path: PathBuf, format: DocFormat) -> Self {
        Self {
            path,
            relative_path,
            format,
        }
    }

    /// Output Markdown path relative to the output root: the document's
    /// relative path with the extension replaced by `.md`.
    pub fn markdown_relative_path(&self) -> PathBuf {
        self.relative_path.with_extension("md")
    }

    /// Directory for this document's extracted images, relative to the
    /// output root: an `images/` sibling of the Markdown file.
    pub fn images_relative_dir(&self) -> PathBuf {
        match self.relative_path.parent() {
            Some(parent) => parent.join("images"),
            None => PathBuf::from("images"),
        }
    }
}

/// A raster image pulled out of a document during conversion. Owned by the
/// conversion run that produced it; written once to disk, then dropped.
#[derive(Debug)]
pub struct ExtractedImage {
    /// 1-based sequence index, scoped to the owning document.
    pub index: usize,
    pub image: DynamicImage,
    /// OCR-derived caption; `None` until captioning runs, or when OCR found
    /// no text.
    pub caption: Option<String>,
}

impl ExtractedImage {
    pub fn new(index: usize, image: DynamicImage) -> Self {
        Self {
            index,
            image,
            caption: None,
        }
    }

    pub fn file_name(&self) -> String {
        format!("img_{}.png", self.index)
    }

    /// Markdown-relative reference target for this image.
    pub fn relative_ref(&self) -> String {
        format!("images/{}", self.file_name())
    }
}

/// The output of converting one document: a Markdown body plus the ordered
/// images extracted from it. Every image reference later embedded in the
/// body corresponds to exactly one entry in `images`.
#[derive(Debug)]
pub struct ConversionResult {
    pub markdown: String,
    pub images: Vec<ExtractedImage>,
    /// Non-fatal oddities seen during conversion (undecodable embedded
    /// image, skipped archive entry). Carried into the run report.
    pub warnings: Vec<String>,
}

impl ConversionResult {
    pub fn text_only(markdown: String) -> Self {
        Self {
            markdown,
            images: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

/// Relative path of a file against the tree root, for mirroring.
pub fn relative_to_root(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}

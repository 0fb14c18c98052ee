use std::path::PathBuf;
use thiserror::Error;

/// Error taxonomy for the conversion pipeline.
///
/// Only `Fatal` aborts a batch. `Conversion` is scoped to one document,
/// `Caption` to one image, and `UnsupportedFormat` is a skip at the tree
/// level that only surfaces as an error on explicit single-file dispatch.
#[derive(Debug, Error)]
pub enum SparkError {
    /// File extension is not in the supported table.
    #[error("unsupported input format: '.{extension}'")]
    UnsupportedFormat { extension: String },

    /// A recognized document could not be converted by its backend.
    #[error("conversion failed for '{path}': {detail}")]
    Conversion { path: PathBuf, detail: String },

    /// The OCR engine itself failed (missing binary, crash, timeout).
    #[error("captioning failed: {detail}")]
    Caption { detail: String },

    /// Environment-level failure: the whole run cannot proceed.
    #[error("{detail}")]
    Fatal { detail: String },
}

pub type SparkResult<T> = Result<T, SparkError>;

impl SparkError {
    pub fn unsupported(extension: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            extension: extension.into(),
        }
    }

    pub fn conversion(path: impl Into<PathBuf>, detail: impl std::fmt::Display) -> Self {
        Self::Conversion {
            path: path.into(),
            detail: detail.to_string(),
        }
    }

    pub fn caption(detail: impl std::fmt::Display) -> Self {
        Self::Caption {
            detail: detail.to_string(),
        }
    }

    pub fn fatal(detail: impl std::fmt::Display) -> Self {
        Self::Fatal {
            detail: detail.to_string(),
        }
    }

    /// True when the error must abort the batch rather than skip one file.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_names_extension() {
        let e = SparkError::unsupported("xyz");
        assert!(e.to_string().contains("'.xyz'"));
        assert!(!e.is_fatal());
    }

    #[test]
    fn fatal_is_fatal() {
        assert!(SparkError::fatal("input root missing").is_fatal());
        assert!(!SparkError::caption("tesseract not found").is_fatal());
    }
}

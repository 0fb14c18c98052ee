use serde::{Deserialize, Serialize};

/// Presence and version of one external binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolStatus {
    pub found: bool,
    pub version: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ToolStatus {
    pub fn found(version: impl Into<String>) -> Self {
        Self {
            found: true,
            version: Some(version.into()),
            error: None,
        }
    }

    pub fn missing(error: impl Into<String>) -> Self {
        Self {
            found: false,
            version: None,
            error: Some(error.into()),
        }
    }
}

/// Result of probing the external toolchain (`doctor` subcommand).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDiag {
    pub pandoc: ToolStatus,
    pub pdftotext: ToolStatus,
    pub pdfimages: ToolStatus,
    pub tesseract: ToolStatus,
    /// True when every tool was found.
    pub ok: bool,
}

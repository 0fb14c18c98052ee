use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub global: Global,
    #[serde(default)]
    pub paths: Paths,
    #[serde(default)]
    pub limits: Limits,
    #[serde(default)]
    pub pandoc: Pandoc,
    #[serde(default)]
    pub pdf: Pdf,
    #[serde(default)]
    pub ocr: Ocr,
    #[serde(default)]
    pub markdown: Markdown,
    #[serde(default)]
    pub output: Output,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub debug: Debug,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw).with_context(|| "parsing TOML")?;
        Ok(cfg)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            global: Default::default(),
            paths: Default::default(),
            limits: Default::default(),
            pandoc: Default::default(),
            pdf: Default::default(),
            ocr: Default::default(),
            markdown: Default::default(),
            output: Default::default(),
            logging: Default::default(),
            debug: Default::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Global {
    pub print_summary: bool,
}
impl Default for Global {
    fn default() -> Self {
        Self {
            print_summary: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paths {
    pub input_dir: String,
    pub output_dir: String,
}
impl Default for Paths {
    fn default() -> Self {
        Self {
            input_dir: "data".into(),
            output_dir: "clean_md".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Limits {
    pub max_input_file_bytes: u64,
}
impl Default for Limits {
    fn default() -> Self {
        Self {
            max_input_file_bytes: 2 * 1024 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pandoc {
    pub exe: String,
    /// Pandoc writer used for the Markdown body.
    pub to_format: String,
    pub extra_args: Vec<String>,
    /// 0 disables the timeout.
    pub timeout_seconds: u64,
}
impl Default for Pandoc {
    fn default() -> Self {
        Self {
            exe: "pandoc".into(),
            to_format: "gfm".into(),
            extra_args: vec!["--wrap=none".into()],
            timeout_seconds: 120,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pdf {
    pub pdftotext_exe: String,
    pub pdfimages_exe: String,
    /// Pass -layout to pdftotext to keep reading order on columnar pages.
    pub layout: bool,
    pub timeout_seconds: u64,
}
impl Default for Pdf {
    fn default() -> Self {
        Self {
            pdftotext_exe: "pdftotext".into(),
            pdfimages_exe: "pdfimages".into(),
            layout: true,
            timeout_seconds: 120,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ocr {
    pub enabled: bool,
    pub exe: String,
    pub lang: String,
    /// Tesseract page segmentation mode. 6 = uniform block of text.
    pub psm: u32,
    pub timeout_seconds: u64,
    /// Alt text used when OCR finds no text or captioning fails.
    pub placeholder_alt: String,
    /// Captions longer than this are truncated (chars, not bytes).
    pub max_caption_chars: usize,
}
impl Default for Ocr {
    fn default() -> Self {
        Self {
            enabled: true,
            exe: "tesseract".into(),
            lang: "eng".into(),
            psm: 6,
            timeout_seconds: 60,
            placeholder_alt: "image".into(),
            max_caption_chars: 120,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Markdown {
    pub normalize_unicode: bool,
    pub normalize_newlines: bool,
    pub trim_trailing_whitespace: bool,
    pub strip_junk_lines: bool,
    #[serde(default)]
    pub junk: JunkPatterns,
    /// Heading of the appended image section.
    pub images_heading: String,
}
impl Default for Markdown {
    fn default() -> Self {
        Self {
            normalize_unicode: true,
            normalize_newlines: true,
            trim_trailing_whitespace: true,
            strip_junk_lines: false,
            junk: Default::default(),
            images_heading: "Extracted Images".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JunkPatterns {
    pub patterns: Vec<String>,
}
impl Default for JunkPatterns {
    fn default() -> Self {
        Self {
            patterns: vec!["^(page\\s+\\d+|\\d+\\s*/\\s*\\d+)$".into()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Output {
    pub write_report_json: bool,
    pub report_filename: String,
}
impl Default for Output {
    fn default() -> Self {
        Self {
            write_report_json: true,
            report_filename: "report.json".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logging {
    pub level: String,
    pub json: bool,
    pub write_to_file: bool,
    pub file_path: String,
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            write_to_file: false,
            file_path: "".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debug {
    pub keep_tool_stderr: bool,
    pub dump_effective_config: bool,
}
impl Default for Debug {
    fn default() -> Self {
        Self {
            keep_tool_stderr: true,
            dump_effective_config: false,
        }
    }
}

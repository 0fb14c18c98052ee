use crate::format::DocFormat;
use serde::{Deserialize, Serialize};

/// End-of-run summary: per-run counters plus one entry per attempted
/// document. Unsupported files are counted but get no entry — skipping is
/// not a failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub input_root: String,
    pub output_root: String,
    pub started: String,
    pub finished: String,
    pub converted: u32,
    pub skipped_unsupported: u32,
    pub failed: u32,
    pub entries: Vec<FileReport>,
}

impl RunSummary {
    pub fn new(input_root: String, output_root: String, started: String) -> Self {
        Self {
            input_root,
            output_root,
            started,
            finished: String::new(),
            converted: 0,
            skipped_unsupported: 0,
            failed: 0,
            entries: Vec::new(),
        }
    }

    pub fn record(&mut self, entry: FileReport) {
        match entry.status {
            FileStatus::Converted => self.converted += 1,
            FileStatus::Failed => self.failed += 1,
        }
        self.entries.push(entry);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Converted,
    Failed,
}

/// Record of one conversion attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    pub relative_path: String,
    pub format: DocFormat,
    pub status: FileStatus,
    /// Output Markdown path relative to the output root, when converted.
    pub output: Option<String>,
    pub images: u32,
    pub input_sha256: Option<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(status: FileStatus) -> FileReport {
        FileReport {
            relative_path: "a.txt".into(),
            format: DocFormat::Txt,
            status,
            output: None,
            images: 0,
            input_sha256: None,
            warnings: vec![],
            error: None,
        }
    }

    #[test]
    fn counters_follow_entry_status() {
        let mut summary = RunSummary::new("data".into(), "clean_md".into(), "t0".into());
        summary.record(entry(FileStatus::Converted));
        summary.record(entry(FileStatus::Converted));
        summary.record(entry(FileStatus::Failed));
        summary.skipped_unsupported += 1;
        assert_eq!(summary.converted, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped_unsupported, 1);
        assert_eq!(summary.entries.len(), 3);
    }
}

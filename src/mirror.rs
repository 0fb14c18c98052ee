use crate::{
    caption,
    config::Config,
    convert,
    document::{relative_to_root, ConversionResult, Document},
    error::{SparkError, SparkResult},
    format::DocFormat,
    postprocess,
    report::{FileReport, FileStatus, RunSummary},
    tools::Tools,
    util::{hash_file, now_rfc3339},
};
use image::ImageFormat;
use regex::Regex;
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Walks the input tree, converts every recognized document, and mirrors
/// the results under the output root. Per-document errors are isolated
/// into the run summary; only environment-level failures abort the batch.
pub struct Mirror<T: Tools> {
    cfg: Config,
    tools: T,
    junk: Vec<Regex>,
}

impl<T: Tools> Mirror<T> {
    pub fn new(cfg: &Config, tools: T) -> SparkResult<Self> {
        let junk = postprocess::compile_junk_patterns(cfg)
            .map_err(|e| SparkError::fatal(format!("invalid markdown.junk pattern: {e}")))?;
        Ok(Self {
            cfg: cfg.clone(),
            tools,
            junk,
        })
    }

    pub fn process(&self, input_root: &Path, output_root: &Path) -> SparkResult<RunSummary> {
        if !input_root.is_dir() {
            return Err(SparkError::fatal(format!(
                "input root does not exist: {}",
                input_root.display()
            )));
        }
        std::fs::create_dir_all(output_root).map_err(|e| {
            SparkError::fatal(format!(
                "output root not writable: {}: {e}",
                output_root.display()
            ))
        })?;

        let mut summary = RunSummary::new(
            input_root.display().to_string(),
            output_root.display().to_string(),
            now_rfc3339(),
        );

        // Sorted walk keeps processing order (and logs) deterministic.
        for entry in WalkDir::new(input_root).sort_by_file_name() {
            let entry =
                entry.map_err(|e| SparkError::fatal(format!("walking input tree: {e}")))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.into_path();

            let Some(format) = DocFormat::detect(&path) else {
                debug!("skipping unsupported file {}", path.display());
                summary.skipped_unsupported += 1;
                continue;
            };

            let doc = Document::new(
                path.clone(),
                relative_to_root(input_root, &path),
                format,
            );
            info!(
                "processing {} ({})",
                doc.relative_path.display(),
                format.as_str()
            );

            match self.process_document(&doc, output_root) {
                Ok(report) => summary.record(report),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!("failed {}: {e}", doc.relative_path.display());
                    summary.record(FileReport {
                        relative_path: doc.relative_path.display().to_string(),
                        format: doc.format,
                        status: FileStatus::Failed,
                        output: None,
                        images: 0,
                        input_sha256: hash_file(&doc.path).ok(),
                        warnings: Vec::new(),
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        summary.finished = now_rfc3339();
        info!(
            "batch done: {} converted, {} skipped, {} failed",
            summary.converted, summary.skipped_unsupported, summary.failed
        );
        Ok(summary)
    }

    /// Convert, caption, and write one document. Conversion and captioning
    /// run fully in memory before the first write, so a failed document
    /// never leaves a Markdown file behind.
    fn process_document(&self, doc: &Document, output_root: &Path) -> SparkResult<FileReport> {
        let meta = std::fs::metadata(&doc.path)
            .map_err(|e| SparkError::conversion(&doc.path, format!("stat: {e}")))?;
        if meta.len() > self.cfg.limits.max_input_file_bytes {
            return Err(SparkError::conversion(
                &doc.path,
                format!(
                    "file is {} bytes, over limits.max_input_file_bytes",
                    meta.len()
                ),
            ));
        }

        let ConversionResult {
            markdown,
            mut images,
            mut warnings,
        } = convert::convert(&self.tools, doc)?;

        warnings.extend(caption::caption_images(&self.cfg, &self.tools, &mut images));

        let assembled = postprocess::assemble_markdown(&self.cfg, &markdown, &images);
        let final_md = postprocess::finalize_markdown(&self.cfg, &self.junk, &assembled);

        // Mirror the subdirectory lazily: it exists only for documents that
        // actually converted. Write failures under the output root are
        // environment-level, so they abort the batch.
        let md_path = output_root.join(doc.markdown_relative_path());
        if let Some(parent) = md_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SparkError::fatal(format!("creating {}: {e}", parent.display()))
            })?;
        }

        if !images.is_empty() {
            let images_dir = output_root.join(doc.images_relative_dir());
            std::fs::create_dir_all(&images_dir).map_err(|e| {
                SparkError::fatal(format!("creating {}: {e}", images_dir.display()))
            })?;
            for img in &images {
                let img_path = images_dir.join(img.file_name());
                img.image
                    .save_with_format(&img_path, ImageFormat::Png)
                    .map_err(|e| {
                        SparkError::fatal(format!("writing {}: {e}", img_path.display()))
                    })?;
            }
        }

        std::fs::write(&md_path, &final_md)
            .map_err(|e| SparkError::fatal(format!("writing {}: {e}", md_path.display())))?;
        debug!("wrote {}", md_path.display());

        Ok(FileReport {
            relative_path: doc.relative_path.display().to_string(),
            format: doc.format,
            status: FileStatus::Converted,
            output: Some(doc.markdown_relative_path().display().to_string()),
            images: images.len() as u32,
            input_sha256: hash_file(&doc.path).ok(),
            warnings,
            error: None,
        })
    }
}

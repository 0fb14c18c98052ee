use super::{ToolDiag, ToolStatus, Tools};
use crate::config::Config;
use crate::error::{SparkError, SparkResult};
use anyhow::{anyhow, Context, Result};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Subprocess-backed implementation of [`Tools`]: Pandoc for generic
/// conversion, poppler for PDF, Tesseract for OCR.
pub struct SystemTools {
    cfg: Config,
}

impl SystemTools {
    pub fn new(cfg: &Config) -> Self {
        Self { cfg: cfg.clone() }
    }

    fn run_capture(
        &self,
        exe: &str,
        args: &[&str],
        timeout_seconds: u64,
    ) -> Result<Output> {
        debug!("spawn {} {:?} timeout={}s", exe, args, timeout_seconds);
        let mut cmd = Command::new(exe);
        cmd.args(args);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let mut child = cmd
            .spawn()
            .with_context(|| format!("spawning {exe}; is it installed and on PATH?"))?;

        let output = if timeout_seconds > 0 {
            wait_with_timeout(&mut child, Duration::from_secs(timeout_seconds))
                .with_context(|| format!("waiting for {exe}"))?
        } else {
            child
                .wait_with_output()
                .with_context(|| format!("waiting for {exe}"))?
        };

        if self.cfg.debug.keep_tool_stderr && !output.stderr.is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("{} stderr: {}", exe, stderr.trim());
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("{exe} exited with {}: {}", output.status, stderr.trim()));
        }

        Ok(output)
    }

    fn probe_version(&self, exe: &str, arg: &str) -> ToolStatus {
        let out = Command::new(exe)
            .arg(arg)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output();
        match out {
            Ok(out) => {
                // pdftotext/pdfimages print their version on stderr.
                let text = if out.stdout.is_empty() {
                    String::from_utf8_lossy(&out.stderr).to_string()
                } else {
                    String::from_utf8_lossy(&out.stdout).to_string()
                };
                let first_line = text.lines().next().unwrap_or("").trim().to_string();
                ToolStatus::found(first_line)
            }
            Err(e) => ToolStatus::missing(e.to_string()),
        }
    }
}

impl Tools for SystemTools {
    fn doctor(&self) -> Result<ToolDiag> {
        let pandoc = self.probe_version(&self.cfg.pandoc.exe, "--version");
        let pdftotext = self.probe_version(&self.cfg.pdf.pdftotext_exe, "-v");
        let pdfimages = self.probe_version(&self.cfg.pdf.pdfimages_exe, "-v");
        let tesseract = self.probe_version(&self.cfg.ocr.exe, "--version");
        let ok = pandoc.found && pdftotext.found && pdfimages.found && tesseract.found;
        Ok(ToolDiag {
            pandoc,
            pdftotext,
            pdfimages,
            tesseract,
            ok,
        })
    }

    fn pandoc_markdown(&self, input: &Path) -> SparkResult<String> {
        let input_str = input.display().to_string();
        let mut args = vec![input_str.as_str(), "-t", self.cfg.pandoc.to_format.as_str()];
        for extra in &self.cfg.pandoc.extra_args {
            args.push(extra.as_str());
        }
        let out = self
            .run_capture(&self.cfg.pandoc.exe, &args, self.cfg.pandoc.timeout_seconds)
            .map_err(|e| SparkError::conversion(input, format!("{e:#}")))?;
        String::from_utf8(out.stdout)
            .map_err(|_| SparkError::conversion(input, "pandoc output was not valid UTF-8"))
    }

    fn pdf_text(&self, input: &Path) -> SparkResult<String> {
        let input_str = input.display().to_string();
        let mut args = Vec::new();
        if self.cfg.pdf.layout {
            args.push("-layout");
        }
        args.extend(["-enc", "UTF-8", input_str.as_str(), "-"]);
        let out = self
            .run_capture(&self.cfg.pdf.pdftotext_exe, &args, self.cfg.pdf.timeout_seconds)
            .map_err(|e| SparkError::conversion(input, format!("{e:#}")))?;
        String::from_utf8(out.stdout)
            .map_err(|_| SparkError::conversion(input, "pdftotext output was not valid UTF-8"))
    }

    fn pdf_images(&self, input: &Path, out_dir: &Path) -> SparkResult<Vec<PathBuf>> {
        let input_str = input.display().to_string();
        let prefix = out_dir.join("img");
        let prefix_str = prefix.display().to_string();
        let args = ["-png", input_str.as_str(), prefix_str.as_str()];
        self.run_capture(&self.cfg.pdf.pdfimages_exe, &args, self.cfg.pdf.timeout_seconds)
            .map_err(|e| SparkError::conversion(input, format!("{e:#}")))?;

        // pdfimages names outputs img-000.png, img-001.png, ...; the
        // zero-padded counter makes a lexicographic sort document order.
        let mut produced = Vec::new();
        let entries = std::fs::read_dir(out_dir)
            .map_err(|e| SparkError::conversion(input, format!("reading image dir: {e}")))?;
        for entry in entries {
            let entry = entry
                .map_err(|e| SparkError::conversion(input, format!("reading image dir: {e}")))?;
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with("img-") && name.ends_with(".png") {
                produced.push(path);
            }
        }
        produced.sort();
        Ok(produced)
    }

    fn ocr_text(&self, image: &Path) -> SparkResult<String> {
        let image_str = image.display().to_string();
        let psm = self.cfg.ocr.psm.to_string();
        let args = [
            image_str.as_str(),
            "stdout",
            "-l",
            self.cfg.ocr.lang.as_str(),
            "--psm",
            psm.as_str(),
        ];
        let out = self
            .run_capture(&self.cfg.ocr.exe, &args, self.cfg.ocr.timeout_seconds)
            .map_err(|e| SparkError::caption(format!("{e:#}")))?;
        Ok(String::from_utf8_lossy(&out.stdout).to_string())
    }
}

/// Wait for a child with a deadline, draining stdout/stderr on reader
/// threads so a chatty tool cannot deadlock on a full pipe.
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<Output> {
    let stdout_reader = child.stdout.take();
    let stderr_reader = child.stderr.take();

    let stdout_thread = std::thread::spawn(move || -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        if let Some(mut out) = stdout_reader {
            out.read_to_end(&mut buf).with_context(|| "read stdout")?;
        }
        Ok(buf)
    });

    let stderr_thread = std::thread::spawn(move || -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        if let Some(mut err) = stderr_reader {
            err.read_to_end(&mut buf).with_context(|| "read stderr")?;
        }
        Ok(buf)
    });

    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait().with_context(|| "try_wait")? {
            let stdout = stdout_thread
                .join()
                .map_err(|_| anyhow!("stdout reader thread panicked"))??;
            let stderr = stderr_thread
                .join()
                .map_err(|_| anyhow!("stderr reader thread panicked"))??;
            return Ok(Output {
                status,
                stdout,
                stderr,
            });
        }

        if start.elapsed() > timeout {
            warn!("external tool timed out after {:?}", timeout);
            let _ = child.kill();
            child.wait().with_context(|| "wait after kill")?;
            let _ = stdout_thread.join();
            let stderr = stderr_thread
                .join()
                .map_err(|_| anyhow!("stderr reader thread panicked"))??;
            return Err(anyhow!(
                "timed out after {:?}; stderr: {}",
                timeout,
                String::from_utf8_lossy(&stderr)
            ));
        }

        std::thread::sleep(Duration::from_millis(50));
    }
}

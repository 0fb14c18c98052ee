use crate::config::Config;
use crate::document::ExtractedImage;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Assemble the final Markdown for one document: the converted body, then —
/// when images were extracted — an image section with one reference per
/// image. Alt text is the OCR caption, or the configured placeholder when
/// captioning found nothing. References and extracted images are generated
/// from the same sequence, so they always correspond 1:1.
pub fn assemble_markdown(cfg: &Config, body: &str, images: &[ExtractedImage]) -> String {
    if images.is_empty() {
        return body.to_string();
    }

    let mut parts: Vec<String> = Vec::with_capacity(images.len() + 2);
    if !body.trim().is_empty() {
        parts.push(body.to_string());
    }
    parts.push(format!("## {}", cfg.markdown.images_heading));
    for img in images {
        let alt = img
            .caption
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(cfg.ocr.placeholder_alt.as_str());
        parts.push(format!("![{alt}]({})", img.relative_ref()));
    }
    parts.join("\n\n")
}

/// Compile the junk-line patterns once per run; an invalid pattern is a
/// configuration error, not a per-document one.
pub fn compile_junk_patterns(cfg: &Config) -> Result<Vec<Regex>, regex::Error> {
    if !cfg.markdown.strip_junk_lines {
        return Ok(Vec::new());
    }
    cfg.markdown
        .junk
        .patterns
        .iter()
        .map(|p| Regex::new(p))
        .collect()
}

/// Cleanup pass over assembled Markdown: newline and Unicode normalization,
/// control-char sanitization, trailing-whitespace trim, junk-line removal,
/// exactly one trailing newline.
pub fn finalize_markdown(cfg: &Config, junk: &[Regex], md: &str) -> String {
    let mut out = md.to_string();

    if cfg.markdown.normalize_newlines {
        out = out.replace("\r\n", "\n");
    }

    if cfg.markdown.normalize_unicode {
        out = out.nfkc().collect::<String>();
    }

    // Structural whitespace survives; other control chars never belong in
    // Markdown output.
    out = out
        .chars()
        .filter(|&ch| !ch.is_control() || ch == '\n' || ch == '\t')
        .collect();

    if cfg.markdown.trim_trailing_whitespace {
        out = out
            .lines()
            .map(|l| l.trim_end())
            .collect::<Vec<_>>()
            .join("\n");
    }

    if !junk.is_empty() {
        out = out
            .lines()
            .filter(|line| !junk.iter().any(|r| r.is_match(line.trim())))
            .collect::<Vec<_>>()
            .join("\n");
    }

    let mut out = out.trim_end().to_string();
    out.push('\n');
    out
}

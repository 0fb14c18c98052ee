//! DOCX/PPTX converters.
//!
//! Both formats are ZIP archives of Office Open XML: document text lives in
//! `word/document.xml` (DOCX) or `ppt/slides/slideN.xml` (PPTX), embedded
//! images under `word/media/` / `ppt/media/`. Parsed with manual ZIP + XML
//! reading; no Office library dependency.

use crate::document::{ConversionResult, Document, ExtractedImage};
use crate::error::{SparkError, SparkResult};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

/// DOCX: one Markdown paragraph per `<w:p>`, text from `<w:t>` runs;
/// embedded images from `word/media/*` in archive order.
pub fn convert_docx(doc: &Document) -> SparkResult<ConversionResult> {
    debug!("docx convert {}", doc.path.display());
    let mut archive = open_archive(&doc.path)?;
    let xml = read_entry_string(&mut archive, "word/document.xml")
        .map_err(|e| SparkError::conversion(&doc.path, e))?;
    let paragraphs = text_paragraphs(&xml, b"w:p", b"w:t")
        .map_err(|e| SparkError::conversion(&doc.path, format!("parsing word/document.xml: {e}")))?;
    let (images, warnings) = media_images(&mut archive, "word/media/", &doc.path)?;
    Ok(ConversionResult {
        markdown: paragraphs.join("\n\n"),
        images,
        warnings,
    })
}

/// PPTX: slides in numeric order, each as a `# Slide N` heading followed by
/// its text runs; embedded images from `ppt/media/*`.
pub fn convert_pptx(doc: &Document) -> SparkResult<ConversionResult> {
    debug!("pptx convert {}", doc.path.display());
    let mut archive = open_archive(&doc.path)?;

    let mut slides: Vec<String> = archive
        .file_names()
        .filter(|name| name.starts_with("ppt/slides/slide") && name.ends_with(".xml"))
        .map(str::to_string)
        .collect();
    slides.sort_by_key(|name| trailing_number(name));

    let mut blocks = Vec::new();
    for (ordinal, name) in slides.iter().enumerate() {
        let xml = read_entry_string(&mut archive, name)
            .map_err(|e| SparkError::conversion(&doc.path, e))?;
        let paragraphs = text_paragraphs(&xml, b"a:p", b"a:t")
            .map_err(|e| SparkError::conversion(&doc.path, format!("parsing {name}: {e}")))?;
        blocks.push(format!("# Slide {}", ordinal + 1));
        blocks.extend(paragraphs);
    }

    let (images, warnings) = media_images(&mut archive, "ppt/media/", &doc.path)?;
    Ok(ConversionResult {
        markdown: blocks.join("\n\n"),
        images,
        warnings,
    })
}

fn open_archive(path: &Path) -> SparkResult<ZipArchive<File>> {
    let file =
        File::open(path).map_err(|e| SparkError::conversion(path, format!("open: {e}")))?;
    ZipArchive::new(file)
        .map_err(|e| SparkError::conversion(path, format!("not an Office Open XML archive: {e}")))
}

fn read_entry_string<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<String, String> {
    let mut entry = archive
        .by_name(name)
        .map_err(|e| format!("missing archive entry {name}: {e}"))?;
    let mut xml = String::new();
    entry
        .read_to_string(&mut xml)
        .map_err(|e| format!("reading archive entry {name}: {e}"))?;
    Ok(xml)
}

/// Collect paragraph text from Office Open XML: runs of `text_tag` content
/// accumulated until the enclosing `para_tag` closes. `<w:tab/>` and
/// `<w:br/>` become literal tab/newline.
fn text_paragraphs(xml: &str, para_tag: &[u8], text_tag: &[u8]) -> Result<Vec<String>, String> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.name().as_ref() == text_tag => in_text = true,
            Ok(Event::End(e)) => {
                if e.name().as_ref() == text_tag {
                    in_text = false;
                } else if e.name().as_ref() == para_tag {
                    let text = current.trim().to_string();
                    if !text.is_empty() {
                        paragraphs.push(text);
                    }
                    current.clear();
                }
            }
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" => current.push('\t'),
                b"w:br" => current.push('\n'),
                _ => {}
            },
            Ok(Event::Text(e)) if in_text => {
                let text = e.unescape().map_err(|e| e.to_string())?;
                current.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(e.to_string()),
        }
        buf.clear();
    }

    Ok(paragraphs)
}

/// Decode every media entry under `prefix`, in numeric-then-name order.
/// Entries the image decoder rejects (WMF/EMF and friends) are skipped with
/// a warning rather than failing the document.
fn media_images<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    prefix: &str,
    doc_path: &Path,
) -> SparkResult<(Vec<ExtractedImage>, Vec<String>)> {
    let mut names: Vec<String> = archive
        .file_names()
        .filter(|name| name.starts_with(prefix))
        .map(str::to_string)
        .collect();
    names.sort_by_key(|name| (trailing_number(name), name.clone()));

    let mut images = Vec::new();
    let mut warnings = Vec::new();
    for name in names {
        let mut bytes = Vec::new();
        archive
            .by_name(&name)
            .map_err(|e| SparkError::conversion(doc_path, format!("reading {name}: {e}")))?
            .read_to_end(&mut bytes)
            .map_err(|e| SparkError::conversion(doc_path, format!("reading {name}: {e}")))?;

        match image::load_from_memory(&bytes) {
            Ok(img) => images.push(ExtractedImage::new(images.len() + 1, img)),
            Err(e) => warnings.push(format!("skipping unsupported media {name}: {e}")),
        }
    }
    Ok((images, warnings))
}

/// Number embedded in an archive entry name (`slide12.xml` -> 12,
/// `image3.png` -> 3); entries without digits sort first.
fn trailing_number(name: &str) -> u32 {
    let digits: String = name
        .rsplit('/')
        .next()
        .unwrap_or(name)
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

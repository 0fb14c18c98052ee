use anyhow::Result;
use docuspark::config::Config;
use docuspark::error::{SparkError, SparkResult};
use docuspark::mirror::Mirror;
use docuspark::report::FileStatus;
use docuspark::tools::{ToolDiag, Tools};
use std::io::Write;
use std::path::{Path, PathBuf};

/// In-process stand-in for the external toolchain: "pandoc" echoes the
/// input file, a file containing CORRUPT fails conversion, OCR always
/// reads "ACME Logo".
struct FakeTools;

impl Tools for FakeTools {
    fn doctor(&self) -> Result<ToolDiag> {
        unimplemented!("not used by mirror tests")
    }

    fn pandoc_markdown(&self, input: &Path) -> SparkResult<String> {
        let text = std::fs::read_to_string(input)
            .map_err(|e| SparkError::conversion(input, e.to_string()))?;
        if text.contains("CORRUPT") {
            return Err(SparkError::conversion(input, "pandoc: parse failure"));
        }
        Ok(text)
    }

    fn pdf_text(&self, _input: &Path) -> SparkResult<String> {
        Ok(String::new())
    }

    fn pdf_images(&self, _input: &Path, _out_dir: &Path) -> SparkResult<Vec<PathBuf>> {
        Ok(Vec::new())
    }

    fn ocr_text(&self, _image: &Path) -> SparkResult<String> {
        Ok("ACME Logo".to_string())
    }
}

fn mirror() -> Mirror<FakeTools> {
    Mirror::new(&Config::default(), FakeTools).expect("mirror")
}

#[test]
fn mirrors_tree_and_skips_unsupported() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("data");
    let output = tmp.path().join("clean_md");
    std::fs::create_dir_all(input.join("Subfolder")).unwrap();
    std::fs::write(input.join("notes.txt"), "line one\n").unwrap();
    std::fs::write(input.join("Subfolder/inner.txt"), "nested\n").unwrap();
    std::fs::write(input.join("archive.zip"), b"not a document").unwrap();

    let summary = mirror().process(&input, &output).unwrap();

    assert_eq!(summary.converted, 2);
    assert_eq!(summary.skipped_unsupported, 1);
    assert_eq!(summary.failed, 0);

    assert_eq!(
        std::fs::read_to_string(output.join("notes.md")).unwrap(),
        "line one\n"
    );
    assert_eq!(
        std::fs::read_to_string(output.join("Subfolder/inner.md")).unwrap(),
        "nested\n"
    );
    // Text-only documents never get an images/ folder.
    assert!(!output.join("images").exists());
    assert!(!output.join("Subfolder/images").exists());
    // The skipped file leaves no trace in the output tree.
    assert!(!output.join("archive.md").exists());
}

#[test]
fn corrupt_document_is_isolated_from_siblings() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("data");
    let output = tmp.path().join("clean_md");
    std::fs::create_dir_all(&input).unwrap();
    std::fs::write(input.join("bad.txt"), "CORRUPT\n").unwrap();
    std::fs::write(input.join("good.txt"), "fine\n").unwrap();

    let summary = mirror().process(&input, &output).unwrap();

    assert_eq!(summary.converted, 1);
    assert_eq!(summary.failed, 1);
    // The failed document produced no partial output.
    assert!(!output.join("bad.md").exists());
    assert!(output.join("good.md").exists());

    let failed = summary
        .entries
        .iter()
        .find(|e| e.relative_path == "bad.txt")
        .unwrap();
    assert_eq!(failed.status, FileStatus::Failed);
    assert!(failed.error.as_deref().unwrap().contains("parse failure"));
}

#[test]
fn reruns_produce_byte_identical_markdown() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("data");
    let output = tmp.path().join("clean_md");
    std::fs::create_dir_all(&input).unwrap();
    std::fs::write(input.join("notes.txt"), "alpha\nbeta\n").unwrap();

    let m = mirror();
    m.process(&input, &output).unwrap();
    let first = std::fs::read(output.join("notes.md")).unwrap();
    m.process(&input, &output).unwrap();
    let second = std::fs::read(output.join("notes.md")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn missing_input_root_is_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    let err = mirror()
        .process(&tmp.path().join("nope"), &tmp.path().join("out"))
        .unwrap_err();
    assert!(err.is_fatal());
}

#[test]
fn unsupported_only_tree_produces_empty_output() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("data");
    let output = tmp.path().join("clean_md");
    std::fs::create_dir_all(input.join("deep")).unwrap();
    std::fs::write(input.join("deep/raw.bin"), b"\x00\x01").unwrap();

    let summary = mirror().process(&input, &output).unwrap();

    assert_eq!(summary.converted, 0);
    assert_eq!(summary.skipped_unsupported, 1);
    assert_eq!(summary.failed, 0);
    assert_eq!(std::fs::read_dir(&output).unwrap().count(), 0);
}

#[test]
fn docx_pipeline_extracts_images_with_ocr_alt_text() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("data");
    let output = tmp.path().join("clean_md");
    std::fs::create_dir_all(input.join("Subfolder")).unwrap();
    write_docx(&input.join("Subfolder/doc.docx"));

    let summary = mirror().process(&input, &output).unwrap();
    assert_eq!(summary.converted, 1);

    let md = std::fs::read_to_string(output.join("Subfolder/doc.md")).unwrap();
    assert!(md.contains("Hello World"), "body text missing: {md}");
    assert!(
        md.contains("![ACME Logo](images/img_1.png)"),
        "image reference missing: {md}"
    );

    // Every reference has its PNG on disk, decodable.
    let png = output.join("Subfolder/images/img_1.png");
    assert!(png.exists());
    image::open(&png).expect("written image decodes as PNG");
}

fn write_docx(path: &Path) {
    let file = std::fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();

    zip.start_file("word/document.xml", options).unwrap();
    zip.write_all(
        br#"<?xml version="1.0"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Hello World</w:t></w:r></w:p>
  </w:body>
</w:document>"#,
    )
    .unwrap();

    zip.start_file("word/media/image1.png", options).unwrap();
    zip.write_all(&png_bytes()).unwrap();
    zip.finish().unwrap();
}

fn png_bytes() -> Vec<u8> {
    let img = image::DynamicImage::new_rgb8(4, 4);
    let mut buf = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
    buf.into_inner()
}

use docuspark::convert::office;
use docuspark::document::Document;
use docuspark::format::DocFormat;
use std::io::Write;
use std::path::{Path, PathBuf};

fn doc(path: &Path, format: DocFormat) -> Document {
    Document::new(
        path.to_path_buf(),
        PathBuf::from(path.file_name().unwrap()),
        format,
    )
}

fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
    let file = std::fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();
    for (name, bytes) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(bytes).unwrap();
    }
    zip.finish().unwrap();
}

fn png_bytes() -> Vec<u8> {
    let img = image::DynamicImage::new_rgb8(2, 2);
    let mut buf = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
    buf.into_inner()
}

#[test]
fn docx_paragraphs_and_media() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("memo.docx");
    let document_xml = br#"<w:document xmlns:w="ns">
  <w:body>
    <w:p><w:r><w:t>First paragraph</w:t></w:r></w:p>
    <w:p><w:r><w:t>Second</w:t></w:r><w:r><w:t> half</w:t></w:r></w:p>
  </w:body>
</w:document>"#;
    let png = png_bytes();
    write_zip(
        &path,
        &[
            ("word/document.xml", document_xml.as_slice()),
            ("word/media/image1.png", png.as_slice()),
        ],
    );

    let result = office::convert_docx(&doc(&path, DocFormat::Docx)).unwrap();
    assert_eq!(result.markdown, "First paragraph\n\nSecond half");
    assert_eq!(result.images.len(), 1);
    assert_eq!(result.images[0].index, 1);
    assert!(result.warnings.is_empty());
}

#[test]
fn docx_with_no_text_is_not_an_error() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("empty.docx");
    let png = png_bytes();
    write_zip(
        &path,
        &[
            ("word/document.xml", br#"<w:document><w:body/></w:document>"#.as_slice()),
            ("word/media/image1.png", png.as_slice()),
        ],
    );

    let result = office::convert_docx(&doc(&path, DocFormat::Docx)).unwrap();
    assert_eq!(result.markdown, "");
    assert_eq!(result.images.len(), 1);
}

#[test]
fn docx_undecodable_media_is_a_warning() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("mixed.docx");
    let png = png_bytes();
    write_zip(
        &path,
        &[
            ("word/document.xml", br#"<w:p><w:r><w:t>x</w:t></w:r></w:p>"#.as_slice()),
            ("word/media/image1.wmf", b"\x01\x02vector".as_slice()),
            ("word/media/image2.png", png.as_slice()),
        ],
    );

    let result = office::convert_docx(&doc(&path, DocFormat::Docx)).unwrap();
    // The PNG survives and keeps a dense index; the WMF becomes a warning.
    assert_eq!(result.images.len(), 1);
    assert_eq!(result.images[0].index, 1);
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].contains("image1.wmf"));
}

#[test]
fn pptx_slides_in_numeric_order_with_headings() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("deck.pptx");
    let slide = |text: &str| -> Vec<u8> {
        format!(r#"<p:sld><p:txBody><a:p><a:r><a:t>{text}</a:t></a:r></a:p></p:txBody></p:sld>"#)
            .into_bytes()
    };
    let s1 = slide("Intro");
    let s2 = slide("Middle");
    let s10 = slide("Finale");
    write_zip(
        &path,
        &[
            // Archive order is scrambled; slide numbers win.
            ("ppt/slides/slide10.xml", s10.as_slice()),
            ("ppt/slides/slide1.xml", s1.as_slice()),
            ("ppt/slides/slide2.xml", s2.as_slice()),
        ],
    );

    let result = office::convert_pptx(&doc(&path, DocFormat::Pptx)).unwrap();
    assert_eq!(
        result.markdown,
        "# Slide 1\n\nIntro\n\n# Slide 2\n\nMiddle\n\n# Slide 3\n\nFinale"
    );
    assert!(result.images.is_empty());
}

#[test]
fn pptx_media_is_extracted() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("pics.pptx");
    let s1 = br#"<p:sld><a:p><a:r><a:t>Pic slide</a:t></a:r></a:p></p:sld>"#;
    let png = png_bytes();
    write_zip(
        &path,
        &[
            ("ppt/slides/slide1.xml", s1.as_slice()),
            ("ppt/media/image1.png", png.as_slice()),
            ("ppt/media/image2.png", png.as_slice()),
        ],
    );

    let result = office::convert_pptx(&doc(&path, DocFormat::Pptx)).unwrap();
    assert_eq!(result.images.len(), 2);
    assert_eq!(result.images[0].index, 1);
    assert_eq!(result.images[1].index, 2);
}

#[test]
fn non_zip_file_is_a_conversion_error() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("fake.docx");
    std::fs::write(&path, b"plain text, not a zip").unwrap();

    let err = office::convert_docx(&doc(&path, DocFormat::Docx)).unwrap_err();
    assert!(!err.is_fatal());
    assert!(err.to_string().contains("fake.docx"));
}

pub mod generic;
pub mod office;
pub mod pdf;

use crate::document::{ConversionResult, Document};
use crate::error::SparkResult;
use crate::format::DocFormat;
use crate::tools::Tools;

/// Fixed dispatch table over the closed format set: one converter per
/// format, common contract `Document -> ConversionResult`.
pub fn convert<T: Tools>(tools: &T, doc: &Document) -> SparkResult<ConversionResult> {
    match doc.format {
        DocFormat::Pdf => pdf::convert(tools, doc),
        DocFormat::Docx => office::convert_docx(doc),
        DocFormat::Pptx => office::convert_pptx(doc),
        DocFormat::Txt | DocFormat::Html | DocFormat::Rtf => generic::convert(tools, doc),
    }
}

//! File-backed text extraction for PDF, DOCX and plain text

use crate::error::IngestError;
use estimator_domain::TextExtractor;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// MIME type of PDF documents
pub const PDF_MIME: &str = "application/pdf";

/// MIME type of Word (OOXML) documents
pub const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// MIME type of plain text
pub const TEXT_MIME: &str = "text/plain";

/// Source formats the extractor can read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Portable Document Format
    Pdf,
    /// Office Open XML word processing document
    Docx,
    /// UTF-8 plain text
    Text,
}

impl DocumentKind {
    /// Resolve a MIME type or bare extension
    pub fn from_mime(mime_type: &str) -> Result<Self, IngestError> {
        match mime_type.trim().to_ascii_lowercase().as_str() {
            PDF_MIME | "pdf" => Ok(DocumentKind::Pdf),
            DOCX_MIME | "docx" => Ok(DocumentKind::Docx),
            TEXT_MIME | "txt" => Ok(DocumentKind::Text),
            other => Err(IngestError::UnsupportedFileType(other.to_string())),
        }
    }
}

/// MIME type for `path` derived from its extension
///
/// Unknown extensions are returned as-is so that extraction reports them.
pub fn mime_type_for_path(path: &Path) -> String {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => PDF_MIME.to_string(),
        "docx" => DOCX_MIME.to_string(),
        "txt" => TEXT_MIME.to_string(),
        _ => extension,
    }
}

/// Reads source documents from the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTextExtractor;

impl FileTextExtractor {
    /// Create a new extractor
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for FileTextExtractor {
    type Error = IngestError;

    fn extract(&self, path: &Path, mime_type: &str) -> Result<String, Self::Error> {
        let kind = DocumentKind::from_mime(mime_type)?;
        info!("Using {:?} parser for {}", kind, path.display());

        let text = match kind {
            DocumentKind::Pdf => extract_pdf(path),
            DocumentKind::Docx => extract_docx(path),
            DocumentKind::Text => std::fs::read_to_string(path).map_err(|e| failure(path, e)),
        }?;

        debug!("Extracted {} characters from {}", text.len(), path.display());
        Ok(text)
    }
}

fn failure(path: &Path, e: impl std::fmt::Display) -> IngestError {
    IngestError::ExtractionFailure(format!("{}: {}", path.display(), e))
}

/// One `Page N` block per page so segmentation can track page numbers
fn extract_pdf(path: &Path) -> Result<String, IngestError> {
    let bytes = std::fs::read(path).map_err(|e| failure(path, e))?;
    let pages = pdf_extract::extract_text_from_mem_by_pages(&bytes).map_err(|e| failure(path, e))?;

    Ok(pages
        .iter()
        .enumerate()
        .map(|(i, text)| format!("\nPage {}\n{}\n", i + 1, text))
        .collect())
}

fn extract_docx(path: &Path) -> Result<String, IngestError> {
    let file = File::open(path).map_err(|e| failure(path, e))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| failure(path, e))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| failure(path, e))?
        .read_to_string(&mut xml)
        .map_err(|e| failure(path, e))?;

    document_xml_text(&xml).map_err(|e| failure(path, e))
}

/// Plain text of a WordprocessingML body
fn document_xml_text(xml: &str) -> Result<String, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_run_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_run_text = true,
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_run_text = false,
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" => text.push('\t'),
                b"w:br" | b"w:cr" | b"w:p" => text.push('\n'),
                _ => {}
            },
            Event::Text(e) if in_run_text => text.push_str(&e.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const DOCUMENT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>FIRE ALARM SYSTEM</w:t></w:r></w:p>
    <w:p><w:r><w:t xml:space="preserve">Devices: </w:t></w:r><w:r><w:tab/><w:t>120 &amp; more</w:t></w:r></w:p>
    <w:p><w:r><w:t>line one</w:t><w:br/><w:t>line two</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

    fn temp_with_suffix(suffix: &str) -> NamedTempFile {
        tempfile::Builder::new().suffix(suffix).tempfile().unwrap()
    }

    #[test]
    fn test_mime_resolution() {
        assert_eq!(DocumentKind::from_mime("application/pdf").unwrap(), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_mime("DOCX").unwrap(), DocumentKind::Docx);
        assert_eq!(DocumentKind::from_mime("txt").unwrap(), DocumentKind::Text);
        assert!(matches!(
            DocumentKind::from_mime("image/png"),
            Err(IngestError::UnsupportedFileType(ref t)) if t == "image/png"
        ));
    }

    #[test]
    fn test_mime_type_for_path() {
        assert_eq!(mime_type_for_path(Path::new("scope.PDF")), PDF_MIME);
        assert_eq!(mime_type_for_path(Path::new("a/b/scope.docx")), DOCX_MIME);
        assert_eq!(mime_type_for_path(Path::new("notes.txt")), TEXT_MIME);
        assert_eq!(mime_type_for_path(Path::new("drawing.dwg")), "dwg");
        assert_eq!(mime_type_for_path(Path::new("README")), "");
    }

    #[test]
    fn test_extract_text_file() {
        let mut file = temp_with_suffix(".txt");
        write!(file, "SCOPE\nInstall panel").unwrap();

        let text = FileTextExtractor::new()
            .extract(file.path(), &mime_type_for_path(file.path()))
            .unwrap();
        assert_eq!(text, "SCOPE\nInstall panel");
    }

    #[test]
    fn test_extract_docx_file() {
        let file = temp_with_suffix(".docx");
        {
            let mut zip = zip::ZipWriter::new(file.reopen().unwrap());
            let options = zip::write::SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Stored);
            zip.start_file("word/document.xml", options).unwrap();
            zip.write_all(DOCUMENT_XML.as_bytes()).unwrap();
            zip.finish().unwrap();
        }

        let text = FileTextExtractor::new().extract(file.path(), DOCX_MIME).unwrap();
        assert_eq!(text, "FIRE ALARM SYSTEM\nDevices: \t120 & more\nline one\nline two\n");
    }

    #[test]
    fn test_docx_without_document_part_fails() {
        let file = temp_with_suffix(".docx");
        {
            let mut zip = zip::ZipWriter::new(file.reopen().unwrap());
            zip.start_file("other.xml", zip::write::SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Stored))
                .unwrap();
            zip.finish().unwrap();
        }

        let result = FileTextExtractor::new().extract(file.path(), "docx");
        assert!(matches!(result, Err(IngestError::ExtractionFailure(_))));
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = FileTextExtractor::new()
            .extract(Path::new("/nonexistent/scope.txt"), "txt")
            .unwrap_err();
        match err {
            IngestError::ExtractionFailure(msg) => assert!(msg.contains("/nonexistent/scope.txt")),
            other => panic!("expected extraction failure, got {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_type_is_checked_before_reading() {
        let result = FileTextExtractor::new().extract(Path::new("/nonexistent/plan.xlsx"), "xlsx");
        assert!(matches!(result, Err(IngestError::UnsupportedFileType(_))));
    }

    #[test]
    fn test_invalid_pdf_fails() {
        let mut file = temp_with_suffix(".pdf");
        write!(file, "not a pdf").unwrap();

        let result = FileTextExtractor::new().extract(file.path(), PDF_MIME);
        assert!(matches!(result, Err(IngestError::ExtractionFailure(_))));
    }
}

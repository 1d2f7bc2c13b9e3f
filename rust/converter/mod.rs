//! Conversion capability: turns a document on disk into markdown text.
//!
//! [`MarkdownConverter`] picks a backend from the file extension. Callers that
//! need a different capability implement [`DocumentConverter`] themselves.

use std::path::Path;

use tracing::debug;

use crate::{config::ConverterConfig, error::ConversionError};

mod archive;
mod html;
mod office;
mod pdf;
mod plain;
mod raster;
mod spreadsheet;
mod table;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedDocument {
    pub title: Option<String>,
    pub text_content: String,
}

impl ConvertedDocument {
    pub fn new(text_content: impl Into<String>) -> Self {
        Self {
            title: None,
            text_content: text_content.into(),
        }
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }
}

pub trait DocumentConverter: Send + Sync {
    fn convert(&self, path: &Path) -> Result<ConvertedDocument, ConversionError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Pptx,
    Xlsx,
    Csv,
    Html,
    Image,
    Zip,
    PlainText,
}

impl DocumentKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let Some(ext) = path.extension() else {
            return Some(Self::PlainText);
        };

        match ext.to_string_lossy().to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "pptx" => Some(Self::Pptx),
            "xlsx" | "xlsm" | "xls" | "ods" => Some(Self::Xlsx),
            "csv" => Some(Self::Csv),
            "html" | "htm" => Some(Self::Html),
            "png" | "jpg" | "jpeg" | "gif" | "bmp" | "webp" => Some(Self::Image),
            "zip" => Some(Self::Zip),
            "txt" | "text" | "md" | "markdown" | "json" | "jsonl" | "xml" | "rst" | "log" => {
                Some(Self::PlainText)
            }
            _ => None,
        }
    }
}

/// Default conversion capability covering office documents, PDFs, web pages,
/// spreadsheets, images, archives and plain text.
#[derive(Debug, Clone, Default)]
pub struct MarkdownConverter {
    config: ConverterConfig,
}

impl MarkdownConverter {
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    pub fn from_env() -> Self {
        Self::new(ConverterConfig::from_env())
    }

    pub(crate) fn convert_kind(
        &self,
        kind: DocumentKind,
        path: &Path,
    ) -> Result<ConvertedDocument, ConversionError> {
        debug!(path = %path.display(), ?kind, "dispatching conversion backend");
        match kind {
            DocumentKind::Pdf => {
                pdf::extract(path, &self.config.pdftotext_bin).map(ConvertedDocument::new)
            }
            DocumentKind::Docx => office::docx_to_markdown(path),
            DocumentKind::Pptx => office::pptx_to_markdown(path),
            DocumentKind::Xlsx => spreadsheet::workbook_to_markdown(path),
            DocumentKind::Csv => spreadsheet::csv_to_markdown(path),
            DocumentKind::Html => html::html_to_markdown(path),
            DocumentKind::Image => raster::image_to_markdown(path),
            DocumentKind::Zip => archive::zip_to_markdown(self, path),
            DocumentKind::PlainText => plain::text_to_markdown(path),
        }
    }
}

impl DocumentConverter for MarkdownConverter {
    fn convert(&self, path: &Path) -> Result<ConvertedDocument, ConversionError> {
        let kind = DocumentKind::from_path(path)
            .ok_or_else(|| ConversionError::Unsupported(path.display().to_string()))?;
        self.convert_kind(kind, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_extension_case_insensitively() {
        assert_eq!(DocumentKind::from_path(Path::new("deck.PPTX")), Some(DocumentKind::Pptx));
        assert_eq!(DocumentKind::from_path(Path::new("a/b/report.pdf")), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_path(Path::new("README")), Some(DocumentKind::PlainText));
        assert_eq!(DocumentKind::from_path(Path::new("movie.mkv")), None);
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mkv");
        std::fs::write(&path, b"\0\0").unwrap();

        let err = MarkdownConverter::default().convert(&path).unwrap_err();
        assert!(matches!(err, ConversionError::Unsupported(_)));
    }
}

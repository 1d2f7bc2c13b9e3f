use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by a conversion backend. The tool boundary flattens every
/// variant into its display string.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("Failed to find file: {0}")]
    FileNotFound(String),

    #[error("Unsupported file type: {0}")]
    Unsupported(String),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to extract text from PDF {}: {message}", path.display())]
    Pdf { path: PathBuf, message: String },

    #[error("Failed to open archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Malformed document XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Failed to read spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to read image: {0}")]
    Image(#[from] image::ImageError),

    #[error("No text content found in {0}")]
    Empty(String),
}

impl ConversionError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Hard failures of the dispatch layer. These are never folded into a
/// conversion result.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Method {0} not found")]
    MethodNotFound(String),

    #[error("Invalid module run input: {0}")]
    InvalidRunInput(#[from] serde_json::Error),
}

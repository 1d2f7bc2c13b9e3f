use std::{path::Path, process::Command};

use gag::Gag;
use pdf_extract::extract_text;
use tracing::debug;

use crate::error::ConversionError;

pub(super) fn extract(path: &Path, pdftotext_bin: &str) -> Result<String, ConversionError> {
    extract_with_pdftotext(path, pdftotext_bin).or_else(|primary_err| {
        debug!(path = %path.display(), error = %primary_err, "pdftotext failed; falling back to pdf-extract");
        extract_with_pdf_extract_quiet(path).map_err(|fallback_err| ConversionError::Pdf {
            path: path.to_path_buf(),
            message: format!("pdftotext ({primary_err}) and pdf-extract ({fallback_err}) both failed"),
        })
    })
}

fn extract_with_pdftotext(path: &Path, program: &str) -> Result<String, String> {
    let output = Command::new(program)
        .arg("-layout")
        .arg("-enc")
        .arg("UTF-8")
        .arg(path)
        .arg("-")
        .output()
        .map_err(|e| format!("failed to spawn {program}, ensure poppler is installed: {e}"))?;

    if !output.status.success() {
        return Err(format!("{program} exited with status {}", output.status));
    }

    String::from_utf8(output.stdout).map_err(|_| format!("{program} output was not valid UTF-8"))
}

fn extract_with_pdf_extract_quiet(path: &Path) -> Result<String, String> {
    // Suppress noisy stdout/stderr from the pdf-extract parser.
    let _gag_out = Gag::stdout().ok();
    let _gag_err = Gag::stderr().ok();
    extract_text(path).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrupt_pdf_reports_both_extractors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();

        let err = extract(&path, "pdftotext-does-not-exist").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("broken.pdf"));
        assert!(message.contains("pdf-extract"));
    }
}

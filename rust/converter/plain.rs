use std::{fs, path::Path};

use crate::{converter::ConvertedDocument, error::ConversionError};

pub(super) fn text_to_markdown(path: &Path) -> Result<ConvertedDocument, ConversionError> {
    let bytes = fs::read(path).map_err(|e| ConversionError::io(path, e))?;
    Ok(ConvertedDocument::new(String::from_utf8_lossy(&bytes).into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_text_through_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        fs::write(&path, "# Notes\n\n- one\n").unwrap();

        let doc = text_to_markdown(&path).unwrap();
        assert_eq!(doc.text_content, "# Notes\n\n- one\n");
        assert!(doc.title.is_none());
    }
}

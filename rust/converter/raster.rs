use std::path::Path;

use crate::{converter::ConvertedDocument, error::ConversionError};

/// Images carry no text of their own; describe what can be read from the file
/// header.
pub(super) fn image_to_markdown(path: &Path) -> Result<ConvertedDocument, ConversionError> {
    let (width, height) = image::image_dimensions(path)?;
    let format = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_uppercase())
        .unwrap_or_default();

    Ok(ConvertedDocument::new(format!(
        "ImageSize: {width}x{height}\nFormat: {format}"
    )))
}

use std::{
    fs::{self, File},
    io::{self, Read},
    path::Path,
};

use tracing::warn;
use zip::ZipArchive;

use super::{DocumentKind, MarkdownConverter};
use crate::{converter::ConvertedDocument, error::ConversionError};

/// Converts every supported entry of a zip archive. Entries that fail to
/// convert are skipped; nested archives are not expanded.
pub(super) fn zip_to_markdown(
    converter: &MarkdownConverter,
    path: &Path,
) -> Result<ConvertedDocument, ConversionError> {
    let file = File::open(path).map_err(|e| ConversionError::io(path, e))?;
    let mut archive = ZipArchive::new(file)?;
    let staging = tempfile::tempdir().map_err(|e| ConversionError::io(path, e))?;

    let mut sections = Vec::new();
    for index in 0..archive.len() {
        let mut entry = match archive.by_index(index) {
            Ok(entry) => entry,
            Err(err) => {
                warn!(index, error = %err, "skipping unreadable archive entry");
                continue;
            }
        };
        if entry.is_dir() {
            continue;
        }
        let name = entry.name().to_string();
        let Some(relative) = entry.enclosed_name() else {
            warn!(entry = %name, "skipping archive entry with unsafe path");
            continue;
        };
        let kind = match DocumentKind::from_path(&relative) {
            Some(DocumentKind::Zip) | None => {
                warn!(entry = %name, "skipping unsupported archive entry");
                continue;
            }
            Some(kind) => kind,
        };

        let staged = staging.path().join(&relative);
        if let Err(err) = stage_entry(&mut entry, &staged) {
            warn!(entry = %name, error = %err, "skipping archive entry that failed to extract");
            continue;
        }

        match converter.convert_kind(kind, &staged) {
            Ok(doc) => sections.push(format!("## File: {name}\n\n{}", doc.text_content.trim())),
            Err(err) => warn!(entry = %name, error = %err, "skipping archive entry that failed to convert"),
        }
    }

    let archive_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let mut markdown = format!("Content from the zip file `{archive_name}`:");
    for section in sections {
        markdown.push_str("\n\n");
        markdown.push_str(&section);
    }

    Ok(ConvertedDocument::new(markdown))
}

fn stage_entry(entry: &mut impl Read, staged: &Path) -> io::Result<()> {
    if let Some(parent) = staged.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut out = File::create(staged)?;
    io::copy(entry, &mut out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;
    use zip::{ZipWriter, write::SimpleFileOptions};

    use super::*;

    #[test]
    fn converts_supported_entries_and_skips_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundle.zip");
        let mut writer = ZipWriter::new(File::create(&path).unwrap());
        let options = SimpleFileOptions::default();
        writer.start_file("docs/readme.txt", options).unwrap();
        writer.write_all(b"hello from the archive").unwrap();
        writer.start_file("data/table.csv", options).unwrap();
        writer.write_all(b"a,b\n1,2\n").unwrap();
        writer.start_file("bin/tool.exe", options).unwrap();
        writer.write_all(b"MZ").unwrap();
        writer.finish().unwrap();

        let doc = zip_to_markdown(&MarkdownConverter::default(), &path).unwrap();
        assert_eq!(
            doc.text_content,
            "Content from the zip file `bundle.zip`:\n\n\
             ## File: docs/readme.txt\n\nhello from the archive\n\n\
             ## File: data/table.csv\n\n| a | b |\n| --- | --- |\n| 1 | 2 |"
        );
    }

    #[test]
    fn entry_that_cannot_be_staged_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clash.zip");
        let mut writer = ZipWriter::new(File::create(&path).unwrap());
        let options = SimpleFileOptions::default();
        writer.start_file("a.txt", options).unwrap();
        writer.write_all(b"kept").unwrap();
        // Needs `a.txt` as a directory, but it was already staged as a file.
        writer.start_file("a.txt/b.txt", options).unwrap();
        writer.write_all(b"lost").unwrap();
        writer.finish().unwrap();

        let doc = zip_to_markdown(&MarkdownConverter::default(), &path).unwrap();
        assert_eq!(
            doc.text_content,
            "Content from the zip file `clash.zip`:\n\n## File: a.txt\n\nkept"
        );
    }
}

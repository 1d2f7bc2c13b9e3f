use std::{fs, path::Path};

use html2md::parse_html;

use crate::{converter::ConvertedDocument, error::ConversionError};

/// Elements whose text never belongs in the converted body.
const STRIPPED_ELEMENTS: [&str; 4] = ["head", "script", "style", "noscript"];

pub(super) fn html_to_markdown(path: &Path) -> Result<ConvertedDocument, ConversionError> {
    let bytes = fs::read(path).map_err(|e| ConversionError::io(path, e))?;
    let html = String::from_utf8_lossy(&bytes);

    let markdown = parse_html(&strip_elements(&html, &STRIPPED_ELEMENTS));
    if markdown.trim().is_empty() {
        return Err(ConversionError::Empty(path.display().to_string()));
    }

    Ok(ConvertedDocument::new(markdown.trim().to_string()).with_title(extract_title(&html)))
}

fn extract_title(html: &str) -> Option<String> {
    let lower = html.to_ascii_lowercase();
    let open = find_open_tag(&lower, "title", 0)?;
    let start = open + lower[open..].find('>')? + 1;
    let end = start + lower[start..].find("</title")?;
    let title = html[start..end].trim();
    (!title.is_empty()).then(|| title.to_string())
}

/// Removes each listed element together with its content. An element with no
/// closing tag loses only its opening tag.
fn strip_elements(html: &str, tags: &[&str]) -> String {
    let mut out = html.to_string();
    for tag in tags {
        let close = format!("</{tag}");
        let mut from = 0;
        loop {
            // ASCII lowercasing keeps byte offsets aligned with `out`.
            let lower = out.to_ascii_lowercase();
            let Some(start) = find_open_tag(&lower, tag, from) else {
                break;
            };
            let end = match lower[start..].find(&close) {
                Some(offset) => {
                    let close_at = start + offset;
                    lower[close_at..]
                        .find('>')
                        .map_or(lower.len(), |gt| close_at + gt + 1)
                }
                None => lower[start..].find('>').map_or(lower.len(), |gt| start + gt + 1),
            };
            out.replace_range(start..end, "");
            from = start;
        }
    }
    out
}

/// Finds `<tag` followed by a tag boundary, so `head` does not match `header`.
fn find_open_tag(lower: &str, tag: &str, from: usize) -> Option<usize> {
    let needle = format!("<{tag}");
    let mut cursor = from;
    while let Some(offset) = lower[cursor..].find(&needle) {
        let at = cursor + offset;
        let next = lower.as_bytes().get(at + needle.len()).copied();
        if matches!(next, None | Some(b'>' | b'/' | b' ' | b'\t' | b'\n' | b'\r')) {
            return Some(at);
        }
        cursor = at + needle.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn converts_headings_and_reads_title() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.html");
        fs::write(
            &path,
            "<html><head><title> Release Notes </title></head><body><h1>Changes</h1><p>Fixed the parser.</p></body></html>",
        )
        .unwrap();

        let doc = html_to_markdown(&path).unwrap();
        assert_eq!(doc.title.as_deref(), Some("Release Notes"));
        assert!(doc.text_content.contains("Changes"));
        assert!(doc.text_content.contains("Fixed the parser."));
        assert!(!doc.text_content.contains("Release Notes"));
    }

    #[test]
    fn head_script_and_style_text_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.html");
        fs::write(
            &path,
            "<head><title>T</title><style>body{color:red}</style><script>var secret=1;</script></head>\
             <body><header>Top</header><p>Hi</p><SCRIPT type=\"text/javascript\">track();</SCRIPT></body>",
        )
        .unwrap();

        let doc = html_to_markdown(&path).unwrap();
        assert_eq!(doc.title.as_deref(), Some("T"));
        assert!(doc.text_content.contains("Top"));
        assert!(doc.text_content.contains("Hi"));
        for leaked in ["color:red", "secret", "track()"] {
            assert!(!doc.text_content.contains(leaked), "{leaked} leaked into {:?}", doc.text_content);
        }
    }

    #[test]
    fn non_utf8_pages_decode_lossily() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.html");
        fs::write(&path, b"<body><p>Caf\xe9</p></body>").unwrap();

        let doc = html_to_markdown(&path).unwrap();
        assert_eq!(doc.text_content, "Caf\u{FFFD}");
    }

    #[test]
    fn unclosed_element_only_loses_its_tag() {
        assert_eq!(strip_elements("<p>a<script src=x>b</p>", &["script"]), "<p>ab</p>");
    }

    #[test]
    fn title_is_optional() {
        assert_eq!(extract_title("<p>no head</p>"), None);
        assert_eq!(extract_title("<TITLE></TITLE>"), None);
    }
}

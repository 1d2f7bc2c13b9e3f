use std::path::Path;

use calamine::{Reader, open_workbook_auto};
use csv::ReaderBuilder;

use super::table::markdown_table;
use crate::{converter::ConvertedDocument, error::ConversionError};

pub(super) fn workbook_to_markdown(path: &Path) -> Result<ConvertedDocument, ConversionError> {
    let mut workbook = open_workbook_auto(path)?;

    let mut sections = Vec::new();
    for name in workbook.sheet_names() {
        let range = workbook.worksheet_range(&name)?;
        let rows: Vec<Vec<String>> = range
            .rows()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect();
        sections.push(format!("## {name}\n{}", markdown_table(&rows)));
    }

    Ok(ConvertedDocument::new(sections.join("\n").trim().to_string()))
}

pub(super) fn csv_to_markdown(path: &Path) -> Result<ConvertedDocument, ConversionError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    Ok(ConvertedDocument::new(markdown_table(&rows).trim().to_string()))
}

#[cfg(test)]
mod tests {
    use std::{fs::File, io::Write};

    use super::*;
    use pretty_assertions::assert_eq;
    use zip::{ZipWriter, write::SimpleFileOptions};

    fn write_xlsx(path: &Path, sheet_name: &str, sheet_xml: &str) {
        let workbook = format!(
            r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
                <sheets><sheet name="{sheet_name}" sheetId="1" r:id="rId1"/></sheets>
            </workbook>"#
        );
        let parts = [
            (
                "[Content_Types].xml",
                r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
                    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
                    <Default Extension="xml" ContentType="application/xml"/>
                    <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
                    <Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
                </Types>"#,
            ),
            (
                "_rels/.rels",
                r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
                    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
                </Relationships>"#,
            ),
            ("xl/workbook.xml", workbook.as_str()),
            (
                "xl/_rels/workbook.xml.rels",
                r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
                    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
                </Relationships>"#,
            ),
            ("xl/worksheets/sheet1.xml", sheet_xml),
        ];

        let mut writer = ZipWriter::new(File::create(path).unwrap());
        for (name, body) in parts {
            writer.start_file(name, SimpleFileOptions::default()).unwrap();
            writer.write_all(body.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn csv_becomes_table_with_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("people.csv");
        std::fs::write(&path, "name,age\nAda,36\n\"Lovelace, A\",\n").unwrap();

        let doc = csv_to_markdown(&path).unwrap();
        assert_eq!(
            doc.text_content,
            "| name | age |\n| --- | --- |\n| Ada | 36 |\n| Lovelace, A |  |"
        );
    }

    #[test]
    fn non_workbook_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.xlsx");
        std::fs::write(&path, "plain text, not a workbook").unwrap();

        assert!(matches!(
            workbook_to_markdown(&path),
            Err(ConversionError::Spreadsheet(_))
        ));
    }

    #[test]
    fn workbook_sheet_becomes_titled_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("people.xlsx");
        write_xlsx(
            &path,
            "People",
            r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>
                <row r="1"><c r="A1" t="inlineStr"><is><t>name</t></is></c><c r="B1" t="inlineStr"><is><t>age</t></is></c></row>
                <row r="2"><c r="A2" t="inlineStr"><is><t>Ada</t></is></c><c r="B2"><v>36</v></c></row>
            </sheetData></worksheet>"#,
        );

        let doc = workbook_to_markdown(&path).unwrap();
        assert_eq!(
            doc.text_content,
            "## People\n| name | age |\n| --- | --- |\n| Ada | 36 |"
        );
    }
}

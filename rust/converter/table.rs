/// Renders rows as a pipe table. The first row is the header; short rows are
/// padded to the widest row.
pub(super) fn markdown_table(rows: &[Vec<String>]) -> String {
    let Some(header) = rows.first() else {
        return String::new();
    };
    let width = rows.iter().map(Vec::len).max().unwrap_or(0).max(1);

    let mut out = String::new();
    push_row(&mut out, header, width);
    out.push('|');
    for _ in 0..width {
        out.push_str(" --- |");
    }
    out.push('\n');
    for row in &rows[1..] {
        push_row(&mut out, row, width);
    }
    out
}

fn push_row(out: &mut String, row: &[String], width: usize) {
    out.push('|');
    for index in 0..width {
        let cell = row.get(index).map(String::as_str).unwrap_or("");
        out.push(' ');
        out.push_str(&escape_cell(cell));
        out.push_str(" |");
    }
    out.push('\n');
}

fn escape_cell(cell: &str) -> String {
    cell.trim()
        .replace('|', "\\|")
        .replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn pads_ragged_rows_and_escapes_pipes() {
        let table = markdown_table(&[row(&["name", "note"]), row(&["a|b"]), row(&["c", "two\nlines"])]);
        assert_eq!(
            table,
            "| name | note |\n| --- | --- |\n| a\\|b |  |\n| c | two lines |\n"
        );
    }

    #[test]
    fn empty_input_renders_nothing() {
        assert_eq!(markdown_table(&[]), "");
    }
}

//! Plain-text rendering for the CLI.

use super::element::Element;

/// Render a view as terminal text. Tables become aligned columns; anything
/// else is printed as its text content.
pub fn render(view: &Element) -> String {
    if view.tag == "table" {
        render_table(view)
    } else {
        view.text_content()
    }
}

/// Left-align every column of `table` to its widest cell.
pub fn render_table(table: &Element) -> String {
    let rows: Vec<Vec<String>> = table
        .child_elements()
        .filter(|r| r.tag == "tr")
        .map(|r| r.child_elements().map(Element::text_content).collect())
        .collect();

    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0usize; columns];
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for row in &rows {
        let mut line = String::new();
        for (i, cell) in row.iter().enumerate() {
            if i > 0 {
                line.push_str("  ");
            }
            line.push_str(cell);
            let pad = widths[i].saturating_sub(cell.chars().count());
            line.extend(std::iter::repeat(' ').take(pad));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::table::{build_table, ColumnDescriptor};
    use serde_json::json;

    #[test]
    fn test_columns_are_aligned() {
        let cols: Vec<ColumnDescriptor> = vec![("ID", "id", "").into(), ("NAME", "name", "").into()];
        let records = vec![
            json!({"id": "1", "name": "dom1"}).into(),
            json!({"id": "1234", "name": "d"}).into(),
        ];
        let text = render(&build_table(&cols, &records, ""));
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines, vec!["ID    NAME", "1     dom1", "1234  d"]);
    }

    #[test]
    fn test_non_table_renders_text() {
        let pre = Element::new("pre").child("{\n  \"a\": 1\n}");
        assert_eq!(render(&pre), "{\n  \"a\": 1\n}");
    }
}

//! Declarative table building.
//!
//! A table is fully described by a list of [`ColumnDescriptor`]s and a list of
//! records. Nothing here knows about particular entity kinds: each cell value
//! is found by walking the record along the column's dotted path.

use thiserror::Error;

use crate::models::{Entity, FieldValue};
use crate::session::ConsoleLog;

use super::element::{make_data, make_header, make_row, make_table, Element};

/// Text put in a cell whose path does not resolve in the record.
pub const MISSING_PLACEHOLDER: &str = ".";

/// Text put in a cell whose value could not be converted.
pub const FALLBACK_PLACEHOLDER: &str = "?";

/// Text for an absent value handed straight to the cell converter.
pub const UNDEFINED_TEXT: &str = "undefined";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub label: String,
    /// Dotted path into the record, e.g. `location.connected`.
    pub path: String,
    /// Class put on every data cell of this column.
    pub class: String,
}

impl ColumnDescriptor {
    pub fn new(label: impl Into<String>, path: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
            class: class.into(),
        }
    }
}

impl From<(&str, &str, &str)> for ColumnDescriptor {
    fn from((label, path, class): (&str, &str, &str)) -> Self {
        Self::new(label, path, class)
    }
}

/// Why a value could not be shown in a single cell.
#[derive(Debug, Error, PartialEq)]
pub enum CellError {
    #[error("null value")]
    Null,
    #[error("object value with {0} fields")]
    Mapping(usize),
    #[error("list contains a non-primitive item")]
    NestedList,
}

/// Stringify a resolved value for a cell.
pub fn cell_text(value: &FieldValue) -> Result<String, CellError> {
    match value {
        FieldValue::Text(s) => Ok(s.clone()),
        FieldValue::Number(n) => Ok(n.to_string()),
        FieldValue::Bool(b) => Ok(b.to_string()),
        FieldValue::Missing => Ok(UNDEFINED_TEXT.to_string()),
        FieldValue::List(items) => {
            if !items.iter().all(FieldValue::is_scalar) {
                return Err(CellError::NestedList);
            }
            let parts = items.iter().map(cell_text).collect::<Result<Vec<_>, _>>()?;
            Ok(parts.join(", "))
        }
        FieldValue::Null => Err(CellError::Null),
        FieldValue::Mapping(m) => Err(CellError::Mapping(m.len())),
    }
}

/// Build a `td` for `value`.
pub fn make_cell(value: &FieldValue, class: &str) -> Result<Element, CellError> {
    cell_text(value).map(|text| make_data(text, class))
}

/// Value of `column` in `record`, with unresolvable paths replaced by the
/// placeholder.
pub fn column_value(record: &Entity, column: &ColumnDescriptor) -> FieldValue {
    match record.field(&column.path) {
        FieldValue::Missing => FieldValue::Text(MISSING_PLACEHOLDER.to_string()),
        v => v,
    }
}

/// Build the header row and one data row per record.
pub fn build_table_rows(
    columns: &[ColumnDescriptor],
    records: &[Entity],
    mut log: Option<&mut ConsoleLog>,
) -> Vec<Element> {
    let mut rows = Vec::with_capacity(records.len() + 1);

    rows.push(make_row(
        columns.iter().map(|c| make_header(c.label.as_str(), "")).collect(),
        "",
    ));

    for (idx, record) in records.iter().enumerate() {
        let cells = columns
            .iter()
            .map(|col| {
                let value = column_value(record, col);
                make_cell(&value, &col.class).unwrap_or_else(|e| {
                    tracing::warn!(row = idx, column = %col.label, error = %e, "cell conversion failed");
                    if let Some(log) = log.as_deref_mut() {
                        log.error(format!("BuildTable: row {} column '{}': {}", idx, col.label, e));
                    }
                    make_data(FALLBACK_PLACEHOLDER, &col.class)
                })
            })
            .collect();
        rows.push(make_row(cells, ""));
    }

    rows
}

/// Render `records` as a table with the given style tag.
pub fn build_table(columns: &[ColumnDescriptor], records: &[Entity], table_class: &str) -> Element {
    make_table(build_table_rows(columns, records, None), &table_class_for(table_class))
}

/// Like [`build_table`], but cell conversion failures also go to the console log.
pub fn build_table_logged(
    columns: &[ColumnDescriptor],
    records: &[Entity],
    table_class: &str,
    log: &mut ConsoleLog,
) -> Element {
    make_table(build_table_rows(columns, records, Some(log)), &table_class_for(table_class))
}

fn table_class_for(tag: &str) -> String {
    ["v-table", tag.trim(), "v-info-table"]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Header labels of a table built by [`build_table`], in column order.
pub fn header_labels(table: &Element) -> Vec<String> {
    table
        .child_elements()
        .next()
        .map(|row| row.child_elements().map(Element::text_content).collect())
        .unwrap_or_default()
}

/// Text of every data row (the header row excluded).
pub fn data_rows(table: &Element) -> Vec<Vec<String>> {
    table
        .child_elements()
        .skip(1)
        .map(|row| row.child_elements().map(Element::text_content).collect())
        .collect()
}

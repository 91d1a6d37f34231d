//! Views: element tree, declarative tables, and the console pages.

pub mod columns;
pub mod element;
pub mod page;
pub mod stats;
pub mod table;
pub mod text;

pub use columns::columns_for;
pub use element::{Element, Node};
pub use table::{build_table, build_table_logged, ColumnDescriptor};

/// Pretty-printed JSON in a `pre` block.
pub fn json_view(value: &serde_json::Value) -> Element {
    let text = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    Element::new("pre").with_class("v-raw-display").child(text)
}

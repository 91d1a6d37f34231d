//! Declarative tables over JSON records.

use serde_json::json;

use iamus_console::models::{resolve_field, Entity, EntityKind, FieldValue};
use iamus_console::session::log::ConsoleLog;
use iamus_console::view::table::{data_rows, header_labels, MISSING_PLACEHOLDER};
use iamus_console::view::{build_table, build_table_logged, columns_for, ColumnDescriptor};

fn records(values: Vec<serde_json::Value>) -> Vec<Entity> {
    values.into_iter().map(Entity::from).collect()
}

fn cols(defs: &[(&str, &str, &str)]) -> Vec<ColumnDescriptor> {
    defs.iter().copied().map(ColumnDescriptor::from).collect()
}

#[test]
fn test_table_shape_is_records_plus_header() {
    let columns = columns_for(EntityKind::Accounts);
    for n in [0usize, 1, 7] {
        let recs: Vec<Entity> = (0..n)
            .map(|i| Entity::from(json!({"accountId": format!("a{}", i), "username": "u"})))
            .collect();
        let table = build_table(&columns, &recs, "v-acct-table");

        let rows: Vec<_> = table.child_elements().collect();
        assert_eq!(rows.len(), n + 1);
        for row in rows {
            assert_eq!(row.child_elements().count(), columns.len());
        }
    }
}

#[test]
fn test_dotted_path_resolution() {
    let record = json!({"a": {"b": 5}});
    assert_eq!(resolve_field(&record, "a.b"), FieldValue::Number(5.into()));
    assert!(resolve_field(&record, "a.c").is_missing());
    assert!(resolve_field(&record, "x.y").is_missing());

    let table = build_table(
        &cols(&[("B", "a.b", ""), ("C", "a.c", ""), ("Y", "x.y", "")]),
        &records(vec![record]),
        "",
    );
    assert_eq!(data_rows(&table), vec![vec!["5", MISSING_PLACEHOLDER, MISSING_PLACEHOLDER]]);
}

#[test]
fn test_header_labels_recover_column_order() {
    for kind in EntityKind::ALL {
        let columns = columns_for(kind);
        let table = build_table(&columns, &[], kind.table_class());
        let labels: Vec<String> = columns.iter().map(|c| c.label.clone()).collect();
        assert_eq!(header_labels(&table), labels, "{}", kind);
    }
}

#[test]
fn test_domains_end_to_end() {
    let recs = records(vec![
        json!({"id": "1", "name": "dom1"}),
        json!({"id": "2", "name": "dom2"}),
    ]);
    let table = build_table(&cols(&[("ID", "id", ""), ("Name", "name", "")]), &recs, "");

    assert_eq!(header_labels(&table), vec!["ID", "Name"]);
    assert_eq!(data_rows(&table), vec![vec!["1", "dom1"], vec!["2", "dom2"]]);
}

#[test]
fn test_bad_cells_degrade_and_are_logged() {
    let recs = records(vec![json!({"id": "1", "roles": ["user", "admin"], "loc": {"x": 1}, "n": null})]);
    let columns = cols(&[("ID", "id", ""), ("Roles", "roles", ""), ("Loc", "loc", ""), ("N", "n", "")]);
    let mut log = ConsoleLog::new(20);

    let table = build_table_logged(&columns, &recs, "v-acct-table", &mut log);

    assert_eq!(data_rows(&table), vec![vec!["1", "user, admin", "?", "?"]]);
    assert_eq!(log.lines().filter(|l| l.is_error).count(), 2);
    assert_eq!(table.class.as_deref(), Some("v-table v-acct-table v-info-table"));
}

#[test]
fn test_cell_values_are_escaped_in_html() {
    let recs = records(vec![json!({"name": "<b>dom</b>"})]);
    let html = build_table(&cols(&[("Name", "name", "v-domain-name")]), &recs, "").to_html();
    assert!(html.contains("&lt;b&gt;dom&lt;/b&gt;"));
    assert!(!html.contains("<b>"));
}

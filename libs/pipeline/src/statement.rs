//! SQL text for the two statements the resources issue.
//!
//! Table and field names come only from configuration and are
//! interpolated verbatim; record values are always bound as parameters.

/// `INSERT IGNORE INTO t (a, b) VALUES (?, ?)` with `rows` value groups.
///
/// IGNORE makes the backend absorb unique-key conflicts, so a duplicate
/// delivery is not an error.
pub fn insert_statement(table: &str, fields: &[String], rows: usize) -> String {
    let group = format!("({})", vec!["?"; fields.len()].join(", "));
    let groups = vec![group.as_str(); rows.max(1)].join(", ");
    format!("INSERT IGNORE INTO {table} ({}) VALUES {groups}", fields.join(", "))
}

/// Existence check keyed by a single field.
pub fn exists_statement(table: &str, field: &str) -> String {
    format!("SELECT count(*) FROM {table} where {field}=?")
}

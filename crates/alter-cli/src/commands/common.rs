//! Shared utilities for CLI commands

use alter_core::{CoreError, MigrationStore};
use serde::Serialize;

/// Calculate column widths for a table from headers and row data.
pub(crate) fn calculate_column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }
    widths
}

/// Render a left-aligned table: header row, a dashed separator, then each
/// data row. Columns are separated by two spaces and trailing padding is
/// trimmed.
pub(crate) fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let widths = calculate_column_widths(headers, rows);

    let render = |cells: Vec<String>| -> String {
        let parts: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{:<width$}", cell, width = w))
            .collect();
        parts.join("  ").trim_end().to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(render(headers.iter().map(|h| h.to_string()).collect()));
    lines.push(render(widths.iter().map(|&w| "-".repeat(w)).collect()));
    for row in rows {
        lines.push(render(row.clone()));
    }
    lines.join("\n")
}

/// Print a formatted table to stdout.
pub(crate) fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    println!("{}", format_table(headers, rows));
}

/// Print `value` as pretty JSON to stdout.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// SQL of migration `id`, or `None` when its file has since been removed.
pub(crate) fn read_sql(store: &MigrationStore, id: &str) -> anyhow::Result<Option<String>> {
    match store.load(id) {
        Ok(sql) => Ok(Some(sql)),
        Err(CoreError::MigrationNotFound { .. }) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Indent every line of `text` by four spaces.
pub(crate) fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("    {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;

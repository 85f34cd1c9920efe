//! Plain text tables for the terminal, or JSON when `--json` is given.

use anyhow::Result;
use serde::Serialize;
use std::fmt::{Display, Write as _};

/// Column aligned table. Missing values render as `-`.
#[derive(Debug, Default)]
pub struct Table {
    headers: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

impl Table {
    #[must_use]
    pub fn new(headers: &[&'static str]) -> Self {
        Self {
            headers: headers.to_vec(),
            rows: Vec::new(),
        }
    }

    pub fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    #[must_use]
    pub fn render(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut out = String::new();
        let headers: Vec<String> = self.headers.iter().map(ToString::to_string).collect();
        write_line(&mut out, &headers, &widths);
        for row in &self.rows {
            write_line(&mut out, row, &widths);
        }
        out
    }
}

fn write_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    let _ = writeln!(out, "{}", line.trim_end());
}

/// Render an optional value for a table cell.
pub fn cell<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |value| value.to_string())
}

/// Print `value` as pretty JSON, or the table built by `table` otherwise.
///
/// # Errors
/// Returns an error if `value` cannot be serialized.
pub fn emit<T, F>(json: bool, value: &T, table: F) -> Result<()>
where
    T: Serialize + ?Sized,
    F: FnOnce() -> Table,
{
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        let table = table();
        if table.rows.is_empty() {
            println!("No results.");
        } else {
            print!("{}", table.render());
        }
    }
    Ok(())
}

/// Print a confirmation, or `{"status": .., ..}` in JSON mode.
///
/// # Errors
/// Returns an error if `details` cannot be serialized.
pub fn status<T: Serialize>(json: bool, message: &str, details: &T) -> Result<()> {
    if json {
        let mut value = serde_json::to_value(details)?;
        if let Some(map) = value.as_object_mut() {
            map.insert("status".to_string(), message.into());
        } else {
            value = serde_json::json!({ "status": message });
        }
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{message}");
    }
    Ok(())
}

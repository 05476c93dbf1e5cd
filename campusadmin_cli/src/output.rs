use std::collections::BTreeSet;
use std::str::FromStr;

use anyhow::Result;
use campusadmin_lib::types::probe::{lookup, scalar_text};
use campusadmin_lib::ResolvedPage;
use serde_json::Value;
use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::Table;

const MAX_CELL_WIDTH: usize = 40;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => anyhow::bail!(
                "unknown output format '{}'. Valid formats: table, json, csv, markdown",
                other
            ),
        }
    }
}

/// Columns to render for `items`. Configured columns win; otherwise the
/// scalar top-level keys of the first item, sorted.
pub fn columns_for(configured: &[String], items: &[Value]) -> Vec<String> {
    if !configured.is_empty() {
        return configured.to_vec();
    }
    let Some(Value::Object(first)) = items.first() else {
        return Vec::new();
    };
    first
        .iter()
        .filter(|(_, v)| !v.is_object() && !v.is_array())
        .map(|(k, _)| k.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn cell(item: &Value, column: &str, truncate: bool) -> String {
    let text = lookup(item, column).map(scalar_text).unwrap_or_default();
    if truncate && text.chars().count() > MAX_CELL_WIDTH {
        let mut short: String = text.chars().take(MAX_CELL_WIDTH - 3).collect();
        short.push_str("...");
        short
    } else {
        text
    }
}

fn build_rows(items: &[Value], columns: &[String], truncate: bool) -> Vec<Vec<String>> {
    items
        .iter()
        .map(|item| columns.iter().map(|c| cell(item, c, truncate)).collect())
        .collect()
}

fn build_table(items: &[Value], columns: &[String]) -> Table {
    let mut builder = Builder::default();
    builder.push_record(columns.iter().cloned());
    for row in build_rows(items, columns, true) {
        builder.push_record(row);
    }
    builder.build()
}

/// "Showing X-Y of Z (page P/T, server pagination)".
pub fn summary_line(page: &ResolvedPage) -> String {
    format!(
        "Showing {}-{} of {} (page {}/{}, {} pagination)",
        page.display_from,
        page.display_to,
        page.display_total,
        page.page,
        page.total_pages,
        if page.using_server_pagination {
            "server"
        } else {
            "client"
        }
    )
}

// -- Table output --

pub fn print_items_table(items: &[Value], columns: &[String]) {
    println!("{}", build_table(items, columns));
}

// -- Markdown output --

pub fn print_items_markdown(items: &[Value], columns: &[String]) {
    let mut table = build_table(items, columns);
    table.with(Style::markdown());
    println!("{}", table);
}

// -- CSV output --

pub fn write_items_csv<W: std::io::Write>(
    writer: W,
    items: &[Value],
    columns: &[String],
) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(columns)?;
    for row in build_rows(items, columns, false) {
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_items_csv(items: &[Value], columns: &[String]) -> Result<()> {
    write_items_csv(std::io::stdout(), items, columns)
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

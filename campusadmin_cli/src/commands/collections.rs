use anyhow::Result;
use campusadmin_lib::{CollectionProfile, ProfileSet};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::output::{print_json, OutputFormat};

#[derive(Tabled, Serialize)]
struct CollectionRow {
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Endpoint")]
    #[serde(rename = "Endpoint")]
    endpoint: String,
    #[tabled(rename = "Deleted view")]
    #[serde(rename = "Deleted view")]
    deleted: String,
    #[tabled(rename = "Filters")]
    #[serde(rename = "Filters")]
    filters: String,
    #[tabled(rename = "Default sort")]
    #[serde(rename = "Default sort")]
    sort: String,
    #[tabled(rename = "Per page")]
    #[serde(rename = "Per page")]
    per_page: u64,
    #[tabled(rename = "Auth")]
    #[serde(rename = "Auth")]
    auth: bool,
}

fn build_collection_rows(profiles: &ProfileSet) -> Vec<CollectionRow> {
    profiles.iter().map(collection_row).collect()
}

fn collection_row(profile: &CollectionProfile) -> CollectionRow {
    CollectionRow {
        name: profile.name.clone(),
        endpoint: profile.endpoint.clone(),
        deleted: profile
            .deleted_endpoint
            .clone()
            .unwrap_or_else(|| format!("{}?status=deleted", profile.endpoint)),
        filters: profile
            .filters
            .iter()
            .map(|f| f.key.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        sort: if profile.default_sort.is_empty() {
            "-".to_string()
        } else {
            format!("{} {}", profile.default_sort, profile.sort_direction())
        },
        per_page: profile.items_per_page,
        auth: profile.requires_auth,
    }
}

pub fn run(profiles: &ProfileSet, format: &OutputFormat) -> Result<()> {
    let rows = build_collection_rows(profiles);
    match format {
        OutputFormat::Table => println!("{}", Table::new(rows)),
        OutputFormat::Markdown => {
            let mut table = Table::new(rows);
            table.with(Style::markdown());
            println!("{}", table);
        }
        OutputFormat::Json => print_json(&rows),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            for row in rows {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
        }
    }
    Ok(())
}

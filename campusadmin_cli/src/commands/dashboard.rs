use anyhow::Result;
use campusadmin_lib::{fetch_dashboard, Client, Role};
use clap::Args;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::output::{print_json, OutputFormat};

#[derive(Args)]
pub struct DashboardArgs {
    /// Role to summarize: admin, instructor, customerCare
    pub role: String,

    /// Stats endpoint
    #[arg(long, default_value = "/dashboard/stats")]
    pub path: String,
}

#[derive(Tabled, Serialize)]
struct StatRow {
    #[tabled(rename = "Metric")]
    #[serde(rename = "Metric")]
    label: String,
    #[tabled(rename = "Value")]
    #[serde(rename = "Value")]
    value: u64,
}

pub async fn run(args: &DashboardArgs, client: &Client, format: &OutputFormat) -> Result<()> {
    let role: Role = args.role.parse()?;
    let dashboard = fetch_dashboard(client, role, &args.path).await?;

    let rows: Vec<StatRow> = dashboard
        .stat_cards()
        .into_iter()
        .map(|card| StatRow {
            label: card.label.to_string(),
            value: card.value,
        })
        .collect();

    match format {
        OutputFormat::Table => println!("{}", Table::new(rows)),
        OutputFormat::Markdown => {
            let mut table = Table::new(rows);
            table.with(Style::markdown());
            println!("{}", table);
        }
        OutputFormat::Json => print_json(&dashboard),
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

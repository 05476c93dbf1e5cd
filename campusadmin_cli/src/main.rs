mod commands;
mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use campusadmin_lib::{load_profiles, load_profiles_from_path, Client};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "campusadmin")]
#[command(about = "Browse campus admin collections through the list query controller")]
struct Cli {
    /// Output format: table, json, csv or markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// API base URL (falls back to CAMPUSADMIN_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Bearer token (falls back to CAMPUSADMIN_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    /// Collection profile YAML to use instead of the built-in set
    #[arg(long, global = true)]
    profiles: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one page of a collection
    List(commands::list::ListArgs),
    /// Show the configured collections
    Collections,
    /// Show the dashboard summary for a role
    Dashboard(commands::dashboard::DashboardArgs),
}

fn api_client(cli: &Cli) -> Result<Client> {
    let base_url = cli
        .base_url
        .clone()
        .or_else(|| std::env::var("CAMPUSADMIN_BASE_URL").ok())
        .context("no API base URL: pass --base-url or set CAMPUSADMIN_BASE_URL")?;
    let mut client = Client::new(&base_url)?;
    if let Some(token) = cli
        .token
        .clone()
        .or_else(|| std::env::var("CAMPUSADMIN_TOKEN").ok())
        .filter(|t| !t.trim().is_empty())
    {
        client = client.with_token(&token);
    }
    Ok(client)
}

/// `RUST_LOG` plus info-level output from the library crates.
fn log_filter() -> EnvFilter {
    EnvFilter::from_default_env()
        .add_directive("campusadmin_lib=info".parse().unwrap())
        .add_directive("campusadmin_api=info".parse().unwrap())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let format: OutputFormat = cli.output.parse()?;

    let profiles = match &cli.profiles {
        Some(path) => load_profiles_from_path(path)
            .with_context(|| format!("loading profiles from {}", path.display()))?,
        None => load_profiles()?,
    };

    match &cli.command {
        Commands::List(args) => {
            commands::list::run(args, &profiles, api_client(&cli)?, &format).await?
        }
        Commands::Collections => commands::collections::run(&profiles, &format)?,
        Commands::Dashboard(args) => {
            commands::dashboard::run(args, &api_client(&cli)?, &format).await?
        }
    }

    Ok(())
}

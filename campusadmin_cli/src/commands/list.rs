use anyhow::{bail, Result};
use clap::Args;
use campusadmin_lib::validation;
use campusadmin_lib::{
    Client, HttpSource, ItemsPerPage, ListQueryController, ListView, ProfileSet, ResolvedPage,
    Severity, SortDirection,
};

use crate::output::{
    columns_for, print_items_csv, print_items_markdown, print_items_table, print_json,
    summary_line, OutputFormat,
};

#[derive(Args)]
pub struct ListArgs {
    /// Collection to list (see `campusadmin collections`)
    pub collection: String,

    /// Case-insensitive search over the collection's searchable fields
    #[arg(long)]
    pub search: Option<String>,

    /// Filter as key=value (repeatable). A value of `all` clears the filter
    #[arg(long = "filter", value_name = "KEY=VALUE")]
    pub filters: Vec<String>,

    /// Sort key (dotted paths allowed, e.g. category.name)
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort direction: asc or desc (defaults to the collection's)
    #[arg(long)]
    pub direction: Option<String>,

    /// Page number
    #[arg(long, default_value = "1")]
    pub page: u64,

    /// Items per page, or `all`
    #[arg(long)]
    pub per_page: Option<String>,

    /// List soft-deleted items instead of active ones
    #[arg(long)]
    pub deleted: bool,
}

pub async fn run(
    args: &ListArgs,
    profiles: &ProfileSet,
    client: Client,
    format: &OutputFormat,
) -> Result<()> {
    let profile = profiles.get(&args.collection)?.clone();
    let source = HttpSource::new(client).requiring_auth(profile.requires_auth);
    let mut controller = ListQueryController::new(source, profile);

    if args.deleted {
        controller.switch_view(ListView::Deleted);
    }

    for raw in &args.filters {
        let (key, value) = validation::parse_filter(raw)?;
        controller.set_filter(&key, &value);
    }

    if let Some(search) = &args.search {
        let term = validation::validate_search(search)?;
        controller.set_search(&term);
    }

    if let Some(key) = &args.sort {
        if controller.state().sort_key() != key {
            controller.set_sort(key);
        }
    }

    if let Some(direction) = &args.direction {
        let wanted: SortDirection = direction.parse().map_err(|_| {
            anyhow::anyhow!("invalid direction '{}'. Valid values: asc, desc", direction)
        })?;
        if controller.state().sort_key().is_empty() {
            bail!("--direction needs a sort key: pass --sort");
        }
        if controller.state().sort_direction() != wanted {
            let key = controller.state().sort_key().to_string();
            controller.set_sort(&key);
        }
    }

    if let Some(per_page) = &args.per_page {
        controller.set_items_per_page(validation::parse_items_per_page(per_page)?);
    }

    let page_number = validation::validate_page(args.page)?;
    controller.set_page(page_number);

    let mut page = fetch(&mut controller).await?;

    // With `all`, the first request's limit only reflects the fallback page
    // size. One more round trip picks up the total the server just reported.
    if page.using_server_pagination
        && controller.state().items_per_page() == ItemsPerPage::All
        && (page.items.len() as u64) < page.display_total
    {
        page = fetch(&mut controller).await?;
    }

    if let Some(status) = controller.status() {
        if status.severity == Severity::Warning {
            eprintln!("warning: {}", status.text);
        }
    }

    if page.total_pages > 0 && page_number > page.total_pages {
        eprintln!(
            "warning: page {} is past the last page ({})",
            page_number, page.total_pages
        );
    }

    eprintln!("{}", summary_line(&page));

    let columns = columns_for(&controller.profile().columns, &page.items);
    match format {
        OutputFormat::Table => print_items_table(&page.items, &columns),
        OutputFormat::Json => print_json(&page),
        OutputFormat::Csv => print_items_csv(&page.items, &columns)?,
        OutputFormat::Markdown => print_items_markdown(&page.items, &columns),
    }

    Ok(())
}

async fn fetch(controller: &mut ListQueryController<HttpSource>) -> Result<ResolvedPage> {
    match controller.fetch_page().await? {
        Some(page) => Ok(page.clone()),
        None => bail!("request was superseded before it completed"),
    }
}

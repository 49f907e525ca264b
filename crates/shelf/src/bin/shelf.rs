use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use shelf::{CatalogFlags, CatalogOptions, CatalogView, HttpSource, Selection, DEFAULT_ENDPOINT};
use shelf_core::{Model, Page, ProgramOptions};
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Fetch the software catalog once, apply filters, and print the rendered page.
#[derive(Parser, Debug)]
#[clap(name = "shelf", version)]
struct Cli {
    /// Catalog endpoint returning a JSON array of items
    #[clap(long, env = "SHELF_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Search text matched against item names and taglines
    #[clap(short, long, default_value = "")]
    query: String,

    /// Category id to require (repeatable; all must match)
    #[clap(short, long = "category")]
    categories: Vec<i64>,

    /// Quiet period after typing before a search applies, in milliseconds
    #[clap(long, env = "SHELF_DEBOUNCE_MS", default_value_t = 250)]
    debounce_ms: u64,

    /// Print only the inner HTML of this region (e.g. softwareGrid)
    #[clap(long)]
    region: Option<String>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let selection: Selection = cli.categories.iter().copied().map(Into::into).collect();
    let flags = CatalogFlags::new(HttpSource::new(cli.endpoint))
        .with_options(CatalogOptions {
            debounce: Duration::from_millis(cli.debounce_ms),
        })
        .with_search(cli.query)
        .with_selection(selection)
        .once();

    let view = shelf_core::run_with::<CatalogView>(flags, ProgramOptions::default())
        .await
        .context("catalog view stopped unexpectedly")?;

    let mut page = Page::new();
    view.view(&mut page);

    match cli.region {
        Some(id) => match page.inner_html(&id) {
            Some(html) => println!("{html}"),
            None => warn!(region = %id, "region was not rendered"),
        },
        None => print!("{}", page.to_html()),
    }

    Ok(())
}

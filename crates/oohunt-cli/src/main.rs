use std::io::Read;
use std::path::Path;

use anyhow::Context;
use clap::{Parser, Subcommand};
use oohunt_adapter::{adapt_document, adapt_products_detailed, category_summaries, AdaptOutcome};
use oohunt_core::select_featured_deals;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "oohunt-cli")]
#[command(about = "oohunt product adapter command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Adapt raw product JSON into storefront view models
    Adapt {
        /// JSON file to read, or `-` for stdin
        input: String,
        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },
    /// Show the best deals from the configured catalog
    Featured {
        /// Number of deals to show (defaults to `OOHUNT_FEATURED_LIMIT`)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// List catalog categories with product counts
    Categories,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Adapt { input, pretty }) => run_adapt(&input, pretty)?,
        Some(Commands::Featured { limit }) => run_featured(limit)?,
        Some(Commands::Categories) => run_categories()?,
        None => println!("oohunt-cli ready; run with --help to list commands"),
    }

    Ok(())
}

fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(Path::new(input)).with_context(|| format!("failed to read {input}"))
}

fn run_adapt(input: &str, pretty: bool) -> anyhow::Result<()> {
    let raw = read_input(input)?;
    let value: serde_json::Value =
        serde_json::from_str(&raw).with_context(|| format!("{input} is not valid JSON"))?;

    let outcomes = adapt_products_detailed(&value);
    warn_degraded(&outcomes);

    let products: Vec<_> = outcomes.into_iter().map(AdaptOutcome::into_product).collect();
    print_json(&products, pretty)
}

fn run_featured(limit: Option<usize>) -> anyhow::Result<()> {
    let config = oohunt_core::load_app_config()?;
    let catalog = oohunt_core::load_catalog(&config.catalog_path)?;

    let outcomes: Vec<_> = catalog.documents().iter().map(adapt_document).collect();
    warn_degraded(&outcomes);

    let products: Vec<_> = outcomes.into_iter().map(AdaptOutcome::into_product).collect();
    let deals = select_featured_deals(&products, limit.unwrap_or(config.featured_limit));
    print_json(&deals, true)
}

fn run_categories() -> anyhow::Result<()> {
    let config = oohunt_core::load_app_config()?;
    let catalog = oohunt_core::load_catalog(&config.catalog_path)?;
    print_json(&category_summaries(catalog.documents()), true)
}

fn warn_degraded(outcomes: &[AdaptOutcome]) {
    for (index, outcome) in outcomes.iter().enumerate() {
        if let Some(error) = outcome.error() {
            tracing::warn!(index, error = %error, "product document degraded");
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}

//! papershelf - A research paper catalog with listing, detail pages and feed.

mod build;
mod catalog;
mod cli;
mod config;
mod query;
mod render;
mod serve;
mod utils;

use anyhow::{Context, Result};
use build::build_catalog;
use catalog::RecordStore;
use clap::Parser;
use cli::{Cli, Commands, QueryArgs};
use config::SiteConfig;
use query::{QueryState, filter};
use render::listing::render_listing;
use serve::serve_catalog;
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match &cli.command {
        Commands::Build { .. } => build_catalog(&config).map(|_| ()),
        Commands::Query { query_args } => run_query(&config, query_args),
        Commands::Serve { .. } => serve_catalog(&config, load_store(&config)?),
    }
}

/// Load and validate configuration from CLI arguments
fn load_config(cli: &Cli) -> Result<SiteConfig> {
    let root = cli.root.as_deref().unwrap_or(Path::new("./"));
    let config_path = root.join(&cli.config);

    let mut config = if config_path.exists() {
        SiteConfig::from_path(&config_path)?
    } else {
        log!("config"; "{} not found, using defaults", config_path.display());
        SiteConfig::default()
    };
    config.update_with_cli(cli);
    config.validate(cli)?;

    Ok(config)
}

fn load_store(config: &SiteConfig) -> Result<RecordStore> {
    RecordStore::load(&config.build.data)
        .with_context(|| format!("Failed to load {}", config.build.data.display()))
}

/// Filter the catalog once and print the listing to stdout.
fn run_query(config: &SiteConfig, args: &QueryArgs) -> Result<()> {
    let store = load_store(config)?;
    let query = QueryState::from(args);
    let filtered = filter(store.records(), &query);
    let view = render_listing(&filtered, store.len());

    if args.html {
        print!("{}", view.to_html());
        return Ok(());
    }

    println!("{}", view.summary);
    if view.is_empty() {
        println!("No papers match your search. Try adjusting your filters.");
    }
    for record in &filtered {
        println!(
            "{:<24} {}  {} ({})",
            record.id,
            record.year,
            record.title,
            record.authors_joined()
        );
    }
    Ok(())
}

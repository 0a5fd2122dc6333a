//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use crate::query::QueryState;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// papershelf research paper catalog CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Record source file (relative to project root)
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// Output directory path (relative to project root)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Config file name (default: papershelf.toml)
    #[arg(short = 'C', long, default_value = "papershelf.toml")]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments for a full rebuild
#[derive(clap::Args, Debug, Clone)]
pub struct BuildArgs {
    /// Minify the generated detail pages
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub minify: Option<bool>,

    /// enable rss feed generation
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub feed: Option<bool>,

    /// Override base URL used for feed permalinks.
    ///
    /// Useful for CI deployments where the production URL differs from the one in
    /// papershelf.toml, e.g.:
    ///   papershelf build --base-url "https://user.github.io/papers"
    #[arg(long = "base-url")]
    pub base_url: Option<String>,
}

/// One listing query
#[derive(clap::Args, Debug, Clone, Default)]
pub struct QueryArgs {
    /// Free-text search over title, authors, summary, abstract and tags
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Only papers published in this year
    #[arg(short, long)]
    pub year: Option<String>,

    /// Only papers with this methodology
    #[arg(short, long)]
    pub methodology: Option<String>,

    /// Only papers carrying this tag
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Print the listing markup instead of a text summary
    #[arg(long)]
    pub html: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Rebuild every detail page and the feed from the record source
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Filter the catalog and print the listing
    Query {
        #[command(flatten)]
        query_args: QueryArgs,
    },

    /// Serve the interactive listing, detail pages and feed locally
    Serve {
        /// Interface to bind on
        #[arg(short, long)]
        interface: Option<String>,

        /// The port you should provide
        #[arg(short, long)]
        port: Option<u16>,
    },
}

impl Cli {
    pub const fn is_build(&self) -> bool {
        matches!(self.command, Commands::Build { .. })
    }
}

impl From<&QueryArgs> for QueryState {
    fn from(args: &QueryArgs) -> Self {
        Self {
            search: args.search.clone(),
            year: args.year.clone(),
            methodology: args.methodology.clone(),
            tag: args.tag.clone(),
        }
    }
}

//! Catalog configuration management for `papershelf.toml`.
//!
//! # Sections
//!
//! | Section        | Purpose                                      |
//! |----------------|----------------------------------------------|
//! | `[base]`       | Site metadata (title, description, url)      |
//! | `[build]`      | Record source, output directory, minify      |
//! | `[build.feed]` | rss feed path and entry limit                |
//! | `[serve]`      | Preview server (interface, port)             |
//!
//! # Example
//!
//! ```toml
//! [base]
//! title = "AI Labor Research"
//! url = "https://example.github.io/ai-labor-papers"
//!
//! [build]
//! data = "data/papers.json"
//! output = "public"
//!
//! [build.feed]
//! limit = 20
//!
//! [serve]
//! port = 5277
//! ```

mod base;
mod build;
pub mod defaults;
mod error;
mod serve;

use base::BaseConfig;
use build::BuildConfig;
pub use error::ConfigError;
use serve::ServeConfig;

use crate::{
    cli::{Cli, Commands},
    render::SiteInfo,
};
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Root configuration structure representing papershelf.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute project root (set after loading)
    #[serde(skip)]
    #[educe(Default = PathBuf::from("./"))]
    pub root: PathBuf,

    /// Basic site information
    #[serde(default)]
    pub base: BaseConfig,

    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Preview server settings
    #[serde(default)]
    pub serve: ServeConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Base URL without trailing slash, empty when unset.
    pub fn base_url(&self) -> &str {
        self.base.url.as_deref().unwrap_or_default().trim_end_matches('/')
    }

    /// Page chrome strings for detail documents.
    pub fn site_info(&self) -> SiteInfo {
        SiteInfo {
            title: self.base.title.clone(),
            copyright: self.base.copyright.clone(),
        }
    }

    /// Absolute path of the generated feed.
    pub fn feed_output(&self) -> PathBuf {
        self.build.output.join(&self.build.feed.path)
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        let root = cli.root.clone().unwrap_or_else(|| self.root.clone());
        let root = Self::normalize_path(&root);

        Self::update_option(&mut self.build.data, cli.data.as_ref());
        Self::update_option(&mut self.build.output, cli.output.as_ref());

        self.build.data = Self::normalize_path(&root.join(&self.build.data));
        self.build.output = Self::normalize_path(&root.join(&self.build.output));
        self.root = root;

        match &cli.command {
            Commands::Build { build_args } => {
                Self::update_option(&mut self.build.minify, build_args.minify.as_ref());
                Self::update_option(&mut self.build.feed.enable, build_args.feed.as_ref());
                if let Some(url) = &build_args.base_url {
                    self.base.url = Some(url.clone());
                }
            }
            Commands::Serve { interface, port } => {
                Self::update_option(&mut self.serve.interface, interface.as_ref());
                Self::update_option(&mut self.serve.port, port.as_ref());
                self.base.url = Some(format!(
                    "http://{}:{}",
                    self.serve.interface, self.serve.port
                ));
            }
            Commands::Query { .. } => {}
        }
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration for the current command
    pub fn validate(&self, cli: &Cli) -> Result<()> {
        if let Some(base_url) = &self.base.url
            && !base_url.starts_with("http://")
            && !base_url.starts_with("https://")
        {
            bail!(ConfigError::Validation(
                "[base.url] must start with http:// or https://".into()
            ));
        }

        if self.build.feed.limit == 0 {
            bail!(ConfigError::Validation(
                "[build.feed.limit] must be at least 1".into()
            ));
        }

        if cli.is_build() && self.build.feed.enable && self.base.url.is_none() {
            bail!(ConfigError::Validation(
                "[base.url] is required for feed generation (or pass --feed=false)".into()
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

//! `[build]` section configuration.
//!
//! Record source, output location, minification and feed settings.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[build]` section in papershelf.toml.
///
/// # Example
/// ```toml
/// [build]
/// data = "data/papers.json"
/// output = "public"
/// minify = true
///
/// [build.feed]
/// limit = 30
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// JSON array of paper records.
    #[serde(default = "defaults::build::data")]
    #[educe(Default = defaults::build::data())]
    pub data: PathBuf,

    /// Build output directory.
    #[serde(default = "defaults::build::output")]
    #[educe(Default = defaults::build::output())]
    pub output: PathBuf,

    /// Minify generated detail pages.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub minify: bool,

    /// Feed generation settings.
    #[serde(default)]
    pub feed: FeedConfig,
}

/// `[build.feed]` section - rss feed generation configuration.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct FeedConfig {
    /// Generate the feed during `build`.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub enable: bool,

    /// Feed file path, relative to the output directory.
    #[serde(default = "defaults::build::feed::path")]
    #[educe(Default = defaults::build::feed::path())]
    pub path: PathBuf,

    /// Maximum number of feed entries (newest first).
    #[serde(default = "defaults::build::feed::limit")]
    #[educe(Default = defaults::build::feed::limit())]
    pub limit: usize,
}

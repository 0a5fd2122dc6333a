//! `[base]` section configuration.
//!
//! Site metadata used by page chrome and the feed channel.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[base]` section in papershelf.toml.
///
/// # Example
/// ```toml
/// [base]
/// title = "AI Labor Research"
/// description = "Papers on the labor market impact of AI"
/// url = "https://user.github.io/ai-labor-papers"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BaseConfig {
    /// Site title, shown in page headers and as the feed title.
    #[serde(default = "defaults::base::title")]
    #[educe(Default = defaults::base::title())]
    pub title: String,

    /// Feed channel description.
    #[serde(default = "defaults::base::description")]
    #[educe(Default = defaults::base::description())]
    pub description: String,

    /// Base URL for feed permalinks and GUIDs.
    /// Required when `[build.feed].enable = true`.
    #[serde(default = "defaults::base::url")]
    #[educe(Default = defaults::base::url())]
    pub url: Option<String>,

    /// Feed language code (e.g., "en-us").
    #[serde(default = "defaults::base::language")]
    #[educe(Default = defaults::base::language())]
    pub language: String,

    /// Copyright notice for the page footer.
    #[serde(default)]
    pub copyright: String,
}

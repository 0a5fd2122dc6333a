//! Pure renderers: listing view, detail documents and the rss feed.
//!
//! Every renderer is a plain function of its inputs with no shared state, so
//! identical input always yields byte-identical output and records can be
//! rendered in parallel.
//!
//! | Module      | Input                  | Output                         |
//! |-------------|------------------------|--------------------------------|
//! | [`listing`] | filtered subset, total | `ListingView` (summary, cards) |
//! | [`detail`]  | one record             | complete HTML document         |
//! | [`feed`]    | all records            | rss 2.0 document               |
//! | [`escape`]  | raw text               | markup-safe / feed-safe text   |

pub mod detail;
pub mod escape;
pub mod feed;
pub mod listing;

use thiserror::Error;

/// Directory (relative to the site root) holding one detail page per record.
pub const PAGES_DIR: &str = "papers";

/// Relative href of a record's detail page, as linked from the site root.
pub fn detail_href(id: &str) -> String {
    format!("{PAGES_DIR}/{id}.html")
}

/// A single record cannot be rendered.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("record `{id}`: missing required field `{field}`")]
    MissingField { id: String, field: &'static str },
}

/// Site-wide strings used by page chrome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteInfo {
    pub title: String,
    pub copyright: String,
}

#[cfg(test)]
impl SiteInfo {
    pub(crate) fn sample() -> Self {
        Self {
            title: "AI Labor Research".to_string(),
            copyright: "2024 AI Labor Research Database".to_string(),
        }
    }
}

//! rss 2.0 feed of the most recent records.
//!
//! The document is rendered from a template with [`escape_feed_text`] so that
//! every text field is escaped exactly once in the strict XML form, then
//! checked by [`validate_feed`] with the `rss` crate before it is written.

use super::{PAGES_DIR, escape::escape_feed_text};
use crate::{
    catalog::PaperRecord,
    config::SiteConfig,
    utils::date::to_rfc2822,
};
use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use rss::{Channel, validation::Validate};
use std::{cmp::Reverse, fmt::Write};

/// Channel-level settings for one feed rendering.
#[derive(Debug, Clone)]
pub struct FeedChannel {
    pub title: String,
    pub description: String,
    /// Site base URL without trailing slash.
    pub base_url: String,
    /// Feed location relative to the site root (e.g. `feed.xml`).
    pub feed_path: String,
    pub language: String,
    /// Maximum number of items.
    pub limit: usize,
    /// Value of `<lastBuildDate>`; injected to keep rendering pure.
    pub build_date: DateTime<Utc>,
}

impl FeedChannel {
    pub fn from_config(config: &SiteConfig, build_date: DateTime<Utc>) -> Self {
        Self {
            title: config.base.title.clone(),
            description: config.base.description.clone(),
            base_url: config.base_url().to_string(),
            feed_path: config.build.feed.path.to_string_lossy().replace('\\', "/"),
            language: config.base.language.clone(),
            limit: config.build.feed.limit,
            build_date,
        }
    }

    /// Absolute detail-page URL, used as both `<link>` and `<guid>`.
    pub fn permalink(&self, id: &str) -> String {
        format!("{}/{PAGES_DIR}/{id}.html", self.base_url)
    }
}

/// Render the feed for `records`, keeping the `channel.limit` newest.
///
/// Order is `dateAdded` descending; ties keep input order and unparsable
/// dates come last. An empty input yields a valid feed with no items.
pub fn render_feed(records: &[PaperRecord], channel: &FeedChannel) -> String {
    let mut recent: Vec<&PaperRecord> = records.iter().collect();
    recent.sort_by_cached_key(|r| Reverse(r.added_at()));
    recent.truncate(channel.limit);

    let mut items = String::new();
    for record in recent {
        items.push_str(&render_item(record, channel));
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom">
  <channel>
    <title>{title}</title>
    <link>{link}/</link>
    <description>{description}</description>
    <language>{language}</language>
    <generator>papershelf</generator>
    <lastBuildDate>{build_date}</lastBuildDate>
    <atom:link href="{link}/{feed_path}" rel="self" type="application/rss+xml"/>
{items}  </channel>
</rss>
"#,
        title = escape_feed_text(&channel.title),
        link = escape_feed_text(&channel.base_url),
        description = escape_feed_text(&channel.description),
        language = escape_feed_text(&channel.language),
        build_date = to_rfc2822(&channel.build_date),
        feed_path = escape_feed_text(channel.feed_path.trim_start_matches('/')),
    )
}

fn render_item(record: &PaperRecord, channel: &FeedChannel) -> String {
    let permalink = channel.permalink(&record.id);
    let permalink = escape_feed_text(&permalink);
    let authors = record.authors_joined();

    let mut item = String::from("    <item>\n");
    let _ = writeln!(item, "      <title>{}</title>", escape_feed_text(&record.title));
    let _ = writeln!(item, "      <link>{permalink}</link>");
    let _ = writeln!(
        item,
        "      <description>{}</description>",
        escape_feed_text(&record.summary)
    );
    let _ = writeln!(item, "      <author>{}</author>", escape_feed_text(&authors));
    if let Some(added) = record.added_at() {
        let _ = writeln!(item, "      <pubDate>{}</pubDate>", to_rfc2822(&added));
    }
    let _ = writeln!(item, "      <guid isPermaLink=\"true\">{permalink}</guid>");
    item.push_str("    </item>\n");
    item
}

/// Parse `xml` back with the `rss` crate and run its validator.
pub fn validate_feed(xml: &str) -> Result<Channel> {
    let channel = Channel::read_from(xml.as_bytes())?;
    channel
        .validate()
        .map_err(|e| anyhow!("rss validation failed: {e}"))?;
    Ok(channel)
}

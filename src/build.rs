//! Catalog build orchestration.
//!
//! # Architecture
//!
//! ```text
//! build_catalog()
//!     │
//!     ├── RecordStore::load()  ──► abort on any LoadError, nothing written
//!     │
//!     ├── clear_pages()        ──► drop {output}/papers from earlier runs
//!     │
//!     └── rayon::join
//!             ├── write_pages() ──► par_iter: render_detail → {output}/papers/{id}.html
//!             │                     (RenderError → skipped, logged, counted)
//!             │
//!             └── write_feed()  ──► render_feed → validate → {output}/{feed path}
//! ```

use crate::{
    catalog::{PaperRecord, RecordStore},
    config::SiteConfig,
    log,
    render::{
        PAGES_DIR, RenderError, SiteInfo,
        detail::render_detail,
        feed::{FeedChannel, render_feed, validate_feed},
    },
    utils::minify::minify_html,
};
use anyhow::{Context, Result};
use chrono::Utc;
use rayon::prelude::*;
use std::{fs, path::Path};

/// Outcome of a successful build.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Detail pages written.
    pub written: usize,
    /// Records that could not be rendered, with the reason.
    pub skipped: Vec<RenderError>,
    /// Feed items written, `None` when the feed is disabled.
    pub feed_items: Option<usize>,
}

/// Load the record source and write every artifact.
pub fn build_catalog(config: &SiteConfig) -> Result<BuildReport> {
    let store = RecordStore::load(&config.build.data)
        .with_context(|| format!("Failed to load {}", config.build.data.display()))?;

    clear_pages(&config.build.output)?;

    let site = config.site_info();
    let (pages, feed) = rayon::join(
        || write_pages(store.records(), &site, &config.build.output, config.build.minify),
        || {
            if config.build.feed.enable {
                write_feed(&store, config).map(Some)
            } else {
                Ok(None)
            }
        },
    );

    let (written, skipped) = pages?;
    let report = BuildReport {
        written,
        skipped,
        feed_items: feed?,
    };

    if report.skipped.is_empty() {
        log!("build"; "done, {} pages", report.written);
    } else {
        log!("build"; "done, {} pages, {} skipped", report.written, report.skipped.len());
    }
    Ok(report)
}

/// Remove every detail page left by a previous build.
///
/// Records that were deleted or no longer render must not keep a page.
fn clear_pages(output: &Path) -> Result<()> {
    let pages_dir = output.join(PAGES_DIR);
    if pages_dir.exists() {
        fs::remove_dir_all(&pages_dir).with_context(|| {
            format!("Failed to clear pages directory: {}", pages_dir.display())
        })?;
    }
    Ok(())
}

/// Render and write one detail page per record.
///
/// Unrenderable records are skipped; write failures abort.
fn write_pages(
    records: &[PaperRecord],
    site: &SiteInfo,
    output: &Path,
    minify: bool,
) -> Result<(usize, Vec<RenderError>)> {
    let pages_dir = output.join(PAGES_DIR);
    fs::create_dir_all(&pages_dir)
        .with_context(|| format!("Failed to create {}", pages_dir.display()))?;

    let outcomes: Vec<Result<(), RenderError>> = records
        .par_iter()
        .map(|record| -> Result<Result<(), RenderError>> {
            let html = match render_detail(record, site) {
                Ok(html) => html,
                Err(e) => {
                    log!("skip"; "{e}");
                    return Ok(Err(e));
                }
            };

            let path = pages_dir.join(format!("{}.html", record.id));
            let html = minify_html(html.as_bytes(), minify);
            fs::write(&path, &html)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            Ok(Ok(()))
        })
        .collect::<Result<_>>()?;

    let mut written = 0;
    let mut skipped = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(()) => written += 1,
            Err(e) => skipped.push(e),
        }
    }
    Ok((written, skipped))
}

/// Render, validate and write the feed. Returns the number of items.
fn write_feed(store: &RecordStore, config: &SiteConfig) -> Result<usize> {
    let channel = FeedChannel::from_config(config, Utc::now());
    let xml = render_feed(store.records(), &channel);
    let items = validate_feed(&xml)
        .context("Generated feed failed validation")?
        .items()
        .len();

    let path = config.feed_output();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(&path, xml).with_context(|| format!("Failed to write {}", path.display()))?;

    log!("feed"; "{} items written to {}", items, path.display());
    Ok(items)
}

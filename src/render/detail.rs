//! Per-record detail documents.
//!
//! Every record produces the same document skeleton; only escaped content
//! varies. A record without a source `url` cannot be rendered.

use super::{
    RenderError, SiteInfo,
    escape::{escape_markup, format_tag},
};
use crate::{catalog::PaperRecord, utils::date::to_human};

/// Length of the `<meta name="description">` excerpt, in characters.
const DESCRIPTION_LEN: usize = 160;

/// Render the standalone detail page for `record`.
pub fn render_detail(record: &PaperRecord, site: &SiteInfo) -> Result<String, RenderError> {
    let url = record.source_url().ok_or_else(|| RenderError::MissingField {
        id: record.id.clone(),
        field: "url",
    })?;

    let title = escape_markup(&record.title);
    let site_title = escape_markup(&site.title);
    let description: String = record.summary.chars().take(DESCRIPTION_LEN).collect();
    let description = escape_markup(&description);
    let authors = record.authors_joined();
    let authors = escape_markup(&authors);
    let publication = escape_markup(&record.publication);
    let year = record.year;

    let tags = record
        .tags
        .iter()
        .map(|t| format!("<span class=\"tag\">{}</span>", escape_markup(&format_tag(t))))
        .collect::<Vec<_>>()
        .join("\n          ");
    let methodology = escape_markup(&record.methodology);

    let pdf_button = record
        .pdf_link()
        .map(|pdf| {
            format!(
                "\n          <a href=\"{}\" target=\"_blank\" rel=\"noopener\" class=\"btn btn-outline\">Download PDF</a>",
                escape_markup(pdf)
            )
        })
        .unwrap_or_default();

    let date_added = record
        .added_at()
        .map(|dt| to_human(&dt))
        .unwrap_or_else(|| record.date_added.clone());

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{title} - {site_title}</title>
  <meta name="description" content="{description}">
  <link rel="stylesheet" href="../css/styles.css">
</head>
<body>
  <header>
    <div class="container">
      <a href="../index.html" class="logo">{site_title}</a>
      <nav>
        <a href="../index.html">Papers</a>
        <a href="../about.html">About</a>
        <a href="../subscribe.html">Subscribe</a>
      </nav>
    </div>
  </header>

  <main class="paper-detail">
    <div class="container">
      <a href="../index.html" class="back-link">← Back to all papers</a>

      <div class="paper-detail-header">
        <h1 class="paper-detail-title">{title}</h1>
        <div class="paper-detail-meta">
          <span>{authors}</span>
          <span>•</span>
          <span>{year}</span>
          <span>•</span>
          <span>{publication}</span>
        </div>
        <div class="paper-tags">
          {tags}
          <span class="tag tag-methodology">{methodology}</span>
        </div>
      </div>

      <div class="paper-detail-content">
        <div class="paper-detail-main">
          <section>
            <h2>Summary</h2>
            <p>{summary}</p>
          </section>

          <section>
            <h2>Abstract</h2>
            <p>{abstract_}</p>
          </section>
        </div>

        <div class="paper-detail-sidebar">
          <h3>Access Paper</h3>
          <a href="{url}" target="_blank" rel="noopener" class="btn">View Original →</a>{pdf_button}

          <div class="sidebar-section">
            <h3>Cite This Paper</h3>
            <p class="citation">{citation}</p>
          </div>

          <div class="sidebar-section">
            <h3>Added to Database</h3>
            <p class="date-added">{date_added}</p>
          </div>
        </div>
      </div>
    </div>
  </main>

  <footer>
    <div class="container">
      <p>&copy; {copyright}</p>
    </div>
  </footer>
</body>
</html>
"#,
        summary = escape_markup(&record.summary),
        abstract_ = escape_markup(&record.r#abstract),
        url = escape_markup(url),
        citation = format_citation(record),
        date_added = escape_markup(&date_added),
        copyright = escape_markup(&site.copyright),
    ))
}

/// Author part of a citation: `A`, `A & B`, or `A et al.`. Not escaped.
pub fn citation_stem(authors: &[String]) -> String {
    match authors {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{first} & {second}"),
        [first, ..] => format!("{first} et al."),
    }
}

/// `Stem (Year). Title. <em>Publication</em>.` with every part escaped once.
fn format_citation(record: &PaperRecord) -> String {
    format!(
        "{} ({}). {}. <em>{}</em>.",
        escape_markup(&citation_stem(&record.authors)),
        record.year,
        escape_markup(&record.title),
        escape_markup(&record.publication),
    )
}

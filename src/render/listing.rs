//! Listing view: count summary plus one card per matching record.
//!
//! The view model ([`ListingView`]) is computed first; [`ListingView::to_html`]
//! turns it into markup. Showing or hiding the empty-state region is the
//! caller's job.

use super::{
    detail_href,
    escape::{escape_markup, format_tag},
};
use crate::catalog::PaperRecord;
use std::fmt::Write;

/// Everything the listing surface shows for one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingView {
    /// "Showing all N papers" or "Showing K of N papers".
    pub summary: String,
    pub body: ListingBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingBody {
    /// Nothing matched; show the empty state instead of a list.
    Empty,
    Cards(Vec<Card>),
}

/// Card payload. Text fields are already markup-escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub title: String,
    pub year: i32,
    pub authors: String,
    pub publication: String,
    pub summary: String,
    /// Escaped, word-spaced tag labels.
    pub tags: Vec<String>,
    pub methodology: String,
    pub detail_href: String,
    pub source_href: Option<String>,
    pub featured: bool,
}

/// Build the listing view for `filtered` out of `total` records.
pub fn render_listing(filtered: &[&PaperRecord], total: usize) -> ListingView {
    let shown = filtered.len();
    let summary = if shown == total {
        format!("Showing all {total} papers")
    } else {
        format!("Showing {shown} of {total} papers")
    };

    let body = if filtered.is_empty() {
        ListingBody::Empty
    } else {
        ListingBody::Cards(filtered.iter().map(|r| Card::from_record(r)).collect())
    };

    ListingView { summary, body }
}

impl ListingView {
    pub fn is_empty(&self) -> bool {
        matches!(self.body, ListingBody::Empty)
    }

    /// Markup for the results region: the summary line, then the card list or
    /// the empty state.
    pub fn to_html(&self) -> String {
        let mut html = format!(
            "<p class=\"results-info\">{}</p>\n",
            escape_markup(&self.summary)
        );

        match &self.body {
            ListingBody::Empty => html.push_str(
                "<div class=\"empty-state\">\n  <p>No papers match your search. Try adjusting your filters.</p>\n</div>\n",
            ),
            ListingBody::Cards(cards) => {
                html.push_str("<div class=\"paper-list\">\n");
                for card in cards {
                    html.push_str(&card.to_html());
                }
                html.push_str("</div>\n");
            }
        }

        html
    }
}

impl Card {
    fn from_record(record: &PaperRecord) -> Self {
        Self {
            title: escape_markup(&record.title).into_owned(),
            year: record.year,
            authors: escape_markup(&record.authors_joined()).into_owned(),
            publication: escape_markup(&record.publication).into_owned(),
            summary: escape_markup(&record.summary).into_owned(),
            tags: record
                .tags
                .iter()
                .map(|t| escape_markup(&format_tag(t)).into_owned())
                .collect(),
            methodology: escape_markup(&record.methodology).into_owned(),
            detail_href: escape_markup(&detail_href(&record.id)).into_owned(),
            source_href: record.source_url().map(|u| escape_markup(u).into_owned()),
            featured: record.featured,
        }
    }

    pub fn to_html(&self) -> String {
        let class = if self.featured { "paper-card featured" } else { "paper-card" };

        let mut tags = String::new();
        for tag in &self.tags {
            let _ = write!(tags, "<span class=\"tag\">{tag}</span>");
        }

        let source = self
            .source_href
            .as_deref()
            .map(|href| {
                format!(
                    "\n      <a href=\"{href}\" target=\"_blank\" rel=\"noopener\" class=\"paper-link\">Original Source ↗</a>"
                )
            })
            .unwrap_or_default();

        format!(
            r#"  <article class="{class}">
    <div class="paper-header">
      <h2 class="paper-title"><a href="{href}">{title}</a></h2>
      <span class="paper-year">{year}</span>
    </div>
    <p class="paper-authors">{authors}</p>
    <p class="paper-publication">{publication}</p>
    <p class="paper-summary">{summary}</p>
    <div class="paper-tags">
      {tags}<span class="tag tag-methodology">{methodology}</span>
    </div>
    <div class="paper-links">
      <a href="{href}" class="paper-link">View Details →</a>{source}
    </div>
  </article>
"#,
            href = self.detail_href,
            title = self.title,
            year = self.year,
            authors = self.authors,
            publication = self.publication,
            summary = self.summary,
            methodology = self.methodology,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(n: usize) -> Vec<PaperRecord> {
        (0..n)
            .map(|i| PaperRecord::sample(&format!("p{i}"), &format!("2024-01-{:02}", i + 1)))
            .collect()
    }

    #[test]
    fn test_summary_all() {
        let all = records(10);
        let refs: Vec<_> = all.iter().collect();
        assert_eq!(render_listing(&refs, 10).summary, "Showing all 10 papers");
    }

    #[test]
    fn test_summary_subset() {
        let all = records(10);
        let refs: Vec<_> = all.iter().take(3).collect();
        assert_eq!(render_listing(&refs, 10).summary, "Showing 3 of 10 papers");
    }

    #[test]
    fn test_empty_state() {
        let view = render_listing(&[], 10);

        assert!(view.is_empty());
        assert_eq!(view.summary, "Showing 0 of 10 papers");
        let html = view.to_html();
        assert!(html.contains("empty-state"));
        assert!(!html.contains("paper-card"));
    }

    #[test]
    fn test_card_fields_escaped() {
        let mut record = PaperRecord::sample("x", "2024-01-01");
        record.title = "Bits & <Bytes>".into();
        record.authors = vec!["O'Neil".into(), "Smith & Co".into()];
        record.publication = "\"Quoted\" Review".into();
        record.summary = "<b>bold</b>".into();
        record.tags = vec!["policy-response".into(), "a<b".into()];
        record.methodology = "mixed & matched".into();
        record.url = Some("https://example.org/?a=1&b=2".into());

        let view = render_listing(&[&record], 1);
        let ListingBody::Cards(cards) = &view.body else {
            panic!("expected cards");
        };
        let card = &cards[0];

        assert_eq!(card.title, "Bits &amp; &lt;Bytes&gt;");
        assert_eq!(card.authors, "O&#039;Neil, Smith &amp; Co");
        assert_eq!(card.publication, "&quot;Quoted&quot; Review");
        assert_eq!(card.summary, "&lt;b&gt;bold&lt;/b&gt;");
        assert_eq!(card.tags, ["policy response", "a&lt;b"]);
        assert_eq!(card.methodology, "mixed &amp; matched");
        assert_eq!(card.detail_href, "papers/x.html");
        assert_eq!(card.source_href.as_deref(), Some("https://example.org/?a=1&amp;b=2"));

        let html = view.to_html();
        assert!(!html.contains("<b>"));
        assert!(html.contains(r#"<a href="papers/x.html">Bits &amp; &lt;Bytes&gt;</a>"#));
    }

    #[test]
    fn test_source_link_optional() {
        let mut record = PaperRecord::sample("x", "2024-01-01");
        record.url = None;

        let html = render_listing(&[&record], 1).to_html();
        assert!(html.contains("View Details"));
        assert!(!html.contains("Original Source"));
    }

    #[test]
    fn test_featured_class() {
        let mut record = PaperRecord::sample("x", "2024-01-01");
        record.featured = true;

        let html = render_listing(&[&record], 1).to_html();
        assert!(html.contains(r#"<article class="paper-card featured">"#));
    }

    #[test]
    fn test_cards_follow_input_order() {
        let all = records(3);
        let refs: Vec<_> = all.iter().rev().collect();
        let ListingBody::Cards(cards) = render_listing(&refs, 3).body else {
            panic!("expected cards");
        };
        let hrefs: Vec<_> = cards.iter().map(|c| c.detail_href.as_str()).collect();
        assert_eq!(hrefs, ["papers/p2.html", "papers/p1.html", "papers/p0.html"]);
    }

    #[test]
    fn test_deterministic() {
        let all = records(4);
        let refs: Vec<_> = all.iter().collect();
        assert_eq!(render_listing(&refs, 5).to_html(), render_listing(&refs, 5).to_html());
    }
}

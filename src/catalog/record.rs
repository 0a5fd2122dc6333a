//! The paper record schema.

use crate::utils::date::parse_timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One cataloged paper, as stored in `papers.json`.
///
/// Missing free-text fields deserialize as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperRecord {
    /// URL-safe slug, unique across the store.
    pub id: String,

    #[serde(default)]
    pub title: String,

    /// Ordered, never empty once validated.
    #[serde(default)]
    pub authors: Vec<String>,

    pub year: i32,

    #[serde(default)]
    pub publication: String,

    #[serde(default)]
    pub summary: String,

    #[serde(default)]
    pub r#abstract: String,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub methodology: String,

    /// ISO 8601 timestamp, kept verbatim. See [`PaperRecord::added_at`].
    #[serde(default)]
    pub date_added: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,

    #[serde(default)]
    pub featured: bool,
}

impl PaperRecord {
    /// Parsed `dateAdded`, `None` when it does not parse.
    pub fn added_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.date_added)
    }

    /// External source link, ignoring blank values.
    pub fn source_url(&self) -> Option<&str> {
        non_blank(self.url.as_deref())
    }

    /// PDF download link, ignoring blank values.
    pub fn pdf_link(&self) -> Option<&str> {
        non_blank(self.pdf_url.as_deref())
    }

    /// Authors joined by ", ".
    pub fn authors_joined(&self) -> String {
        self.authors.join(", ")
    }
}

#[inline]
fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
impl PaperRecord {
    /// Minimal valid record for tests.
    pub(crate) fn sample(id: &str, date_added: &str) -> Self {
        Self {
            id: id.to_string(),
            title: format!("Paper {id}"),
            authors: vec!["Alice".to_string()],
            year: 2024,
            publication: "Working Paper".to_string(),
            summary: format!("Summary of {id}"),
            r#abstract: format!("Abstract of {id}"),
            tags: vec!["automation".to_string()],
            methodology: "empirical".to_string(),
            date_added: date_added.to_string(),
            url: Some(format!("https://example.org/{id}")),
            pdf_url: None,
            featured: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "id": "ai-and-jobs",
            "title": "AI and Jobs",
            "authors": ["Daron Acemoglu", "Pascual Restrepo"],
            "year": 2022,
            "publication": "Journal of Political Economy",
            "summary": "Short summary",
            "abstract": "Long abstract",
            "tags": ["automation", "wage-inequality"],
            "methodology": "empirical",
            "dateAdded": "2024-01-15",
            "url": "https://example.org/paper",
            "pdfUrl": "https://example.org/paper.pdf",
            "featured": true
        }"#;
        let record: PaperRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.id, "ai-and-jobs");
        assert_eq!(record.authors.len(), 2);
        assert_eq!(record.r#abstract, "Long abstract");
        assert_eq!(record.date_added, "2024-01-15");
        assert_eq!(record.pdf_link(), Some("https://example.org/paper.pdf"));
        assert!(record.featured);
    }

    #[test]
    fn test_deserialize_defaults() {
        let json = r#"{ "id": "bare", "year": 2020, "authors": ["Bob"] }"#;
        let record: PaperRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.title, "");
        assert_eq!(record.r#abstract, "");
        assert!(record.tags.is_empty());
        assert_eq!(record.url, None);
        assert!(!record.featured);
        assert!(record.added_at().is_none());
    }

    #[test]
    fn test_blank_links_are_absent() {
        let mut record = PaperRecord::sample("x", "2024-01-01");
        record.url = Some("   ".to_string());
        record.pdf_url = Some(String::new());

        assert_eq!(record.source_url(), None);
        assert_eq!(record.pdf_link(), None);
    }

    #[test]
    fn test_authors_joined() {
        let mut record = PaperRecord::sample("x", "2024-01-01");
        record.authors = vec!["Alice".into(), "Bob".into(), "Carol".into()];
        assert_eq!(record.authors_joined(), "Alice, Bob, Carol");
    }
}

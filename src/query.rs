//! Filter/search engine for the listing.
//!
//! A pure function of (records, query). Matching is case-insensitive, every
//! constraint is ANDed, and matches keep the order of the input (newest first
//! when fed from the store). There is no relevance ranking.

use crate::catalog::PaperRecord;
use std::borrow::Cow;

/// Current search term plus the three discrete selectors.
///
/// `None` or an empty string means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryState {
    pub search: String,
    pub year: Option<String>,
    pub methodology: Option<String>,
    pub tag: Option<String>,
}

impl QueryState {
    /// Parse `search=..&year=..&methodology=..&tag=..` (leading `?` allowed).
    ///
    /// Values are percent-decoded with `+` read as a space. Unknown keys and
    /// undecodable values are ignored.
    pub fn from_query_string(query: &str) -> Self {
        let mut state = Self::default();

        for pair in query.trim_start_matches('?').split('&') {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let value = value.replace('+', " ");
            let Ok(value) = urlencoding::decode(&value) else {
                continue;
            };
            let value = value.into_owned();

            match key {
                "search" => state.search = value,
                "year" => state.year = Some(value),
                "methodology" => state.methodology = Some(value),
                "tag" => state.tag = Some(value),
                _ => {}
            }
        }

        state
    }

    /// True when no field constrains the result.
    pub fn is_unconstrained(&self) -> bool {
        self.search.trim().is_empty()
            && active(&self.year).is_none()
            && active(&self.methodology).is_none()
            && active(&self.tag).is_none()
    }
}

/// Return the records matching `query`, in input order.
pub fn filter<'a>(records: &'a [PaperRecord], query: &QueryState) -> Vec<&'a PaperRecord> {
    let matcher = Matcher::new(query);
    records.iter().filter(|r| matcher.matches(r)).collect()
}

/// Query normalized once per `filter` call.
struct Matcher<'q> {
    search: Option<String>,
    year: Option<&'q str>,
    methodology: Option<String>,
    tag: Option<String>,
}

impl<'q> Matcher<'q> {
    fn new(query: &'q QueryState) -> Self {
        let search = query.search.trim();
        Self {
            search: (!search.is_empty()).then(|| search.to_lowercase()),
            year: active(&query.year),
            methodology: active(&query.methodology).map(str::to_lowercase),
            tag: active(&query.tag).map(str::to_lowercase),
        }
    }

    fn matches(&self, record: &PaperRecord) -> bool {
        self.matches_search(record)
            && self.year.is_none_or(|y| record.year.to_string() == y)
            && self
                .methodology
                .as_deref()
                .is_none_or(|m| lower(&record.methodology) == m)
            && self
                .tag
                .as_deref()
                .is_none_or(|t| record.tags.iter().any(|tag| lower(tag) == t))
    }

    fn matches_search(&self, record: &PaperRecord) -> bool {
        let Some(term) = self.search.as_deref() else {
            return true;
        };
        let hit = |field: &str| lower(field).contains(term);

        hit(&record.title)
            || record.authors.iter().any(|a| hit(a))
            || hit(&record.summary)
            || hit(&record.r#abstract)
            || record.tags.iter().any(|t| hit(t))
    }
}

/// Trimmed selector value, `None` when unset or blank.
fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Lowercase without allocating for already-lowercase ASCII.
#[inline]
fn lower(s: &str) -> Cow<'_, str> {
    if s.bytes().any(|b| !b.is_ascii() || b.is_ascii_uppercase()) {
        Cow::Owned(s.to_lowercase())
    } else {
        Cow::Borrowed(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RecordStore;

    fn store() -> RecordStore {
        let mut labor = PaperRecord::sample("labor", "2024-03-01");
        labor.title = "Robots and Jobs: Evidence from US Labor Markets".into();
        labor.authors = vec!["Daron Acemoglu".into(), "Pascual Restrepo".into()];
        labor.year = 2020;
        labor.tags = vec!["automation".into(), "labor-demand".into()];
        labor.methodology = "empirical".into();

        let mut gpt = PaperRecord::sample("gpts", "2024-02-01");
        gpt.title = "GPTs are GPTs".into();
        gpt.authors = vec!["Tyna Eloundou".into()];
        gpt.year = 2023;
        gpt.summary = "Exposure of occupations to large language models".into();
        gpt.tags = vec!["llm".into(), "exposure".into()];
        gpt.methodology = "Task-Based".into();

        let mut theory = PaperRecord::sample("theory", "2024-01-01");
        theory.title = "The Race between Man and Machine".into();
        theory.year = 2020;
        theory.r#abstract = "A task-based framework for automation".into();
        theory.tags = vec!["automation".into(), "theory".into()];
        theory.methodology = "theoretical".into();

        RecordStore::from_records(vec![theory, labor, gpt]).unwrap()
    }

    fn ids<'a>(records: &[&'a PaperRecord]) -> Vec<&'a str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    fn search(term: &str) -> QueryState {
        QueryState {
            search: term.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_unconstrained_returns_everything_in_order() {
        let store = store();
        let query = QueryState::default();

        assert!(query.is_unconstrained());
        assert_eq!(ids(&filter(store.records(), &query)), ["labor", "gpts", "theory"]);
    }

    #[test]
    fn test_blank_selectors_are_unconstrained() {
        let store = store();
        let query = QueryState {
            search: "   ".into(),
            year: Some(String::new()),
            methodology: Some(" ".into()),
            tag: None,
        };

        assert!(query.is_unconstrained());
        assert_eq!(filter(store.records(), &query).len(), 3);
    }

    #[test]
    fn test_title_substring_any_case() {
        let store = store();
        for term in ["robots", "ROBOTS", "Labor Mar", "  evidence from  "] {
            assert_eq!(ids(&filter(store.records(), &search(term))), ["labor"], "{term}");
        }
    }

    #[test]
    fn test_every_title_finds_its_record() {
        let store = store();
        for record in store.records() {
            let term = record.title[2..8].to_uppercase();
            let found = filter(store.records(), &search(&term));
            assert!(found.iter().any(|r| r.id == record.id), "{term}");
        }
    }

    #[test]
    fn test_search_covers_authors_summary_abstract_tags() {
        let store = store();
        assert_eq!(ids(&filter(store.records(), &search("restrepo"))), ["labor"]);
        assert_eq!(ids(&filter(store.records(), &search("language models"))), ["gpts"]);
        assert_eq!(ids(&filter(store.records(), &search("task-based framework"))), ["theory"]);
        assert_eq!(ids(&filter(store.records(), &search("demand"))), ["labor"]);
    }

    #[test]
    fn test_search_does_not_cover_methodology() {
        let store = store();
        assert!(filter(store.records(), &search("theoretical")).is_empty());
    }

    #[test]
    fn test_year_filter() {
        let store = store();
        let query = QueryState {
            year: Some("2020".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter(store.records(), &query)), ["labor", "theory"]);

        let query = QueryState {
            year: Some("1999".into()),
            ..Default::default()
        };
        assert!(filter(store.records(), &query).is_empty());
    }

    #[test]
    fn test_methodology_filter_case_insensitive() {
        let store = store();
        let query = QueryState {
            methodology: Some("task-based".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter(store.records(), &query)), ["gpts"]);
    }

    #[test]
    fn test_tag_filter_exact_membership() {
        let store = store();
        let query = QueryState {
            tag: Some("Automation".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter(store.records(), &query)), ["labor", "theory"]);

        // a tag filter is membership, not substring
        let query = QueryState {
            tag: Some("auto".into()),
            ..Default::default()
        };
        assert!(filter(store.records(), &query).is_empty());
    }

    #[test]
    fn test_constraints_are_anded_and_order_preserved() {
        let store = store();
        let query = QueryState {
            search: "a".into(),
            year: Some("2020".into()),
            methodology: None,
            tag: Some("automation".into()),
        };
        let found = ids(&filter(store.records(), &query));
        assert_eq!(found, ["labor", "theory"]);

        let query = QueryState {
            methodology: Some("theoretical".into()),
            ..query
        };
        assert_eq!(ids(&filter(store.records(), &query)), ["theory"]);
    }

    #[test]
    fn test_from_query_string() {
        let query = QueryState::from_query_string("?search=large+language%20models&year=2023&tag=labor-demand&x=1");

        assert_eq!(query.search, "large language models");
        assert_eq!(query.year.as_deref(), Some("2023"));
        assert_eq!(query.methodology, None);
        assert_eq!(query.tag.as_deref(), Some("labor-demand"));
    }

    #[test]
    fn test_from_query_string_empty() {
        let query = QueryState::from_query_string("");
        assert!(query.is_unconstrained());

        let query = QueryState::from_query_string("search=&year=&methodology=&tag=");
        assert!(query.is_unconstrained());
    }
}

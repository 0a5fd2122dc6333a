//! Immutable, date-ordered record store.
//!
//! Loaded once from a JSON snapshot, validated, sorted newest first, and read-only
//! afterwards. Renderers and the filter engine borrow from it.

use super::error::{LoadError, ValidationError};
use super::record::PaperRecord;
use crate::log;
use regex::Regex;
use rustc_hash::FxHashSet;
use std::{
    cmp::Reverse,
    collections::{BTreeMap, BTreeSet},
    fs,
    path::Path,
    sync::LazyLock,
};

/// One entry of the tag filter options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFacet {
    /// Tag as stored on records, used for matching.
    pub value: String,
    /// Word-spaced display form (`policy-response` → `policy response`).
    pub label: String,
}

/// Validated paper records, newest `dateAdded` first.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<PaperRecord>,
}

impl RecordStore {
    /// Read, parse and validate the record source at `path`.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let content =
            fs::read_to_string(path).map_err(|err| LoadError::Io(path.to_path_buf(), err))?;
        let records: Vec<PaperRecord> = serde_json::from_str(&content)
            .map_err(|err| LoadError::Parse(path.to_path_buf(), err))?;

        let store = Self::from_records(records)?;
        if store.is_empty() {
            log!("warn"; "{} contains no papers", path.display());
        } else {
            log!("load"; "{} papers from {}", store.len(), path.display());
        }
        Ok(store)
    }

    /// Validate `records` and order them newest first.
    ///
    /// The sort is stable; records whose `dateAdded` does not parse go last,
    /// in source order.
    pub fn from_records(mut records: Vec<PaperRecord>) -> Result<Self, ValidationError> {
        validate(&records)?;

        for record in records.iter().filter(|r| r.added_at().is_none()) {
            log!("warn"; "{}: unparsable dateAdded `{}`, listed last", record.id, record.date_added);
        }

        // `None` is the smallest key, so `Reverse` puts it after every date.
        records.sort_by_cached_key(|r| Reverse(r.added_at()));
        Ok(Self { records })
    }

    pub fn records(&self) -> &[PaperRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by id.
    pub fn get(&self, id: &str) -> Option<&PaperRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Distinct years, newest first.
    pub fn years(&self) -> Vec<i32> {
        let years: BTreeSet<i32> = self.records.iter().map(|r| r.year).collect();
        years.into_iter().rev().collect()
    }

    /// Distinct tags, ascending by lowercase value.
    pub fn tags(&self) -> Vec<TagFacet> {
        sorted_distinct(self.records.iter().flat_map(|r| r.tags.iter()))
            .into_iter()
            .map(|value| TagFacet {
                label: crate::render::escape::format_tag(value),
                value: value.to_string(),
            })
            .collect()
    }

    /// Distinct non-empty methodologies, ascending by lowercase value.
    pub fn methodologies(&self) -> Vec<String> {
        sorted_distinct(self.records.iter().map(|r| &r.methodology))
            .into_iter()
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Dedupe case-insensitively and order by the lowercase key.
///
/// The first spelling met (newest record first) is the one kept for display.
fn sorted_distinct<'a>(values: impl Iterator<Item = &'a String>) -> Vec<&'a str> {
    let mut distinct: BTreeMap<String, &str> = BTreeMap::new();
    for value in values {
        distinct.entry(value.to_lowercase()).or_insert(value.as_str());
    }
    distinct.into_values().collect()
}

/// Check every store invariant, failing on the first violation.
fn validate(records: &[PaperRecord]) -> Result<(), ValidationError> {
    static RE_URL_SAFE_ID: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").unwrap());

    let mut seen = FxHashSet::default();

    for (index, record) in records.iter().enumerate() {
        let id = &record.id;

        if !RE_URL_SAFE_ID.is_match(id) {
            return Err(ValidationError::InvalidId { index, id: id.clone() });
        }
        if !seen.insert(id.as_str()) {
            return Err(ValidationError::DuplicateId { id: id.clone() });
        }
        if record.authors.is_empty() {
            return Err(ValidationError::EmptyAuthors { id: id.clone() });
        }
        if let Some(tag) = record.tags.iter().find(|t| t.is_empty() || t.trim() != t.as_str()) {
            return Err(ValidationError::MalformedTag {
                id: id.clone(),
                tag: tag.clone(),
            });
        }
    }

    Ok(())
}

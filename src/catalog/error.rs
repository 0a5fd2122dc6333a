//! Record store error types.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to produce a record store from its source. Fatal to the run.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read record source `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("malformed record source `{0}`")]
    Parse(PathBuf, #[source] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// A record set that parsed but breaks a store invariant.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("duplicate id `{id}`")]
    DuplicateId { id: String },

    #[error("record #{index}: id `{id}` is not url-safe")]
    InvalidId { index: usize, id: String },

    #[error("record `{id}`: field `authors` is empty")]
    EmptyAuthors { id: String },

    #[error("record `{id}`: tag `{tag}` is empty or has surrounding whitespace")]
    MalformedTag { id: String, tag: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_load_error_display_names_path() {
        let err = LoadError::Io(
            PathBuf::from("data/papers.json"),
            Error::new(ErrorKind::NotFound, "file not found"),
        );
        assert!(err.to_string().contains("data/papers.json"));
    }

    #[test]
    fn test_validation_error_is_transparent() {
        let err: LoadError = ValidationError::DuplicateId { id: "ai-jobs".into() }.into();
        assert_eq!(err.to_string(), "duplicate id `ai-jobs`");
    }

    #[test]
    fn test_validation_error_names_record_and_field() {
        let err = ValidationError::MalformedTag {
            id: "ai-jobs".into(),
            tag: " wages".into(),
        };
        let display = err.to_string();
        assert!(display.contains("ai-jobs"));
        assert!(display.contains(" wages"));
    }
}

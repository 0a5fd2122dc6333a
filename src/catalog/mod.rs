//! Record store: the paper schema, loading, validation and facets.
//!
//! ```text
//! papers.json ──► RecordStore::load ──► validate ──► sort (dateAdded desc)
//!                                                        │
//!                        ┌───────────────┬───────────────┤
//!                        ▼               ▼               ▼
//!                     query::filter   render::detail  render::feed
//! ```

mod error;
mod record;
mod store;

pub use error::{LoadError, ValidationError};
pub use record::PaperRecord;
pub use store::{RecordStore, TagFacet};

//! Fluent match-clause builder for bool-query filters
//!
//! Chained [`MatchClause`] values accumulate required, forbidden, and
//! optional field matches into a shared [`MatchAccumulator`] and compile into
//! a weighted [`FilterBoost`] in the search engine's bool-query shape.
//!
//! ```
//! use pliant::{BaseHandle, MatchClause};
//! use serde_json::json;
//!
//! let base = BaseHandle::new();
//! let clause = MatchClause::with_primary(&base, json!({ "title": "rust" }))?;
//! clause.not_matching(json!({ "status": "draft" }))?;
//! clause.should_matching(json!({ "tags": "tutorial" }))?;
//!
//! let boost = clause.to_boost().unwrap();
//! assert!(boost.groups.must.contains_field("title"));
//! assert!(boost.groups.must_not.contains_field("status"));
//! assert!(boost.groups.should.contains_field("tags"));
//! # Ok::<(), pliant::PliantError>(())
//! ```

pub mod accumulator;
pub mod base;
pub mod boost;
pub mod clause;
pub mod error;
pub mod term;

pub use accumulator::{FieldTerms, MatchAccumulator, MatchMode, SharedAccumulator};
pub use base::{BaseHandle, QueryRoot};
pub use boost::{FilterBoost, MatchGroups};
pub use clause::{MatchClause, MatchOptions};
pub use error::{PliantError, Result};
pub use term::{TermValue, ALL_FIELD};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

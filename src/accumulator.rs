//! Accumulated match state shared by chained clauses
//!
//! One accumulator backs every clause derived from a common ancestor. Each
//! registration routes a batch of terms into exactly one of four mappings,
//! selected by the clause flags at the time of the call. Terms accumulate
//! additively and keep insertion order.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

use crate::term::TermValue;

/// Shared handle to the accumulator behind a family of derived clauses
pub type SharedAccumulator = Rc<RefCell<MatchAccumulator>>;

/// Destination mapping for a batch of registered terms
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchMode {
    /// Field must match (AND)
    Must,
    /// Field must not match (NOT)
    MustNot,
    /// Field should match (optional boost)
    Should,
    /// Field should not match (optional penalty, no exclusion)
    ShouldNot,
}

impl MatchMode {
    /// Map the clause flags onto a destination
    pub fn from_flags(inverse: bool, should: bool) -> Self {
        match (inverse, should) {
            (false, false) => MatchMode::Must,
            (true, false) => MatchMode::MustNot,
            (false, true) => MatchMode::Should,
            (true, true) => MatchMode::ShouldNot,
        }
    }
}

/// Insertion-ordered mapping from field keys to their registered terms
///
/// Fields keep first-registration order, values keep append order, and
/// duplicates are kept as given.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldTerms(Vec<(String, Vec<TermValue>)>);

impl FieldTerms {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append terms to a field, creating the entry on first use
    ///
    /// An empty batch creates no entry.
    pub fn append(
        &mut self,
        field: impl Into<String>,
        values: impl IntoIterator<Item = TermValue>,
    ) {
        let field = field.into();
        let mut values = values.into_iter().peekable();
        if values.peek().is_none() {
            return;
        }
        if let Some(idx) = self.0.iter().position(|(f, _)| *f == field) {
            self.0[idx].1.extend(values);
        } else {
            self.0.push((field, values.collect()));
        }
    }

    /// Terms registered for a field, in append order
    pub fn values(&self, field: &str) -> Option<&[TermValue]> {
        self.0
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, terms)| terms.as_slice())
    }

    /// True if the field has at least one registered term
    pub fn contains_field(&self, field: &str) -> bool {
        self.0.iter().any(|(f, _)| f == field)
    }

    /// Fields and their terms, in first-registration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[TermValue])> {
        self.0.iter().map(|(f, terms)| (f.as_str(), terms.as_slice()))
    }

    /// True if no field has been registered
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of registered fields
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// The four term mappings behind one logical match clause
///
/// The mappings are mutually exclusive destinations: a registration lands in
/// exactly one of them, and later registrations never move earlier terms.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MatchAccumulator {
    matches: FieldTerms,
    antimatches: FieldTerms,
    shouldmatches: FieldTerms,
    shouldnotmatches: FieldTerms,
}

impl MatchAccumulator {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a fresh accumulator in a shared handle
    pub fn shared() -> SharedAccumulator {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Append terms for a field into the mapping selected by `mode`
    pub fn register(
        &mut self,
        mode: MatchMode,
        field: impl Into<String>,
        values: impl IntoIterator<Item = TermValue>,
    ) {
        let target = match mode {
            MatchMode::Must => &mut self.matches,
            MatchMode::MustNot => &mut self.antimatches,
            MatchMode::Should => &mut self.shouldmatches,
            MatchMode::ShouldNot => &mut self.shouldnotmatches,
        };
        target.append(field, values);
    }

    /// True if any mapping holds at least one entry
    pub fn any(&self) -> bool {
        !self.matches.is_empty()
            || !self.antimatches.is_empty()
            || !self.shouldmatches.is_empty()
            || !self.shouldnotmatches.is_empty()
    }

    /// Fields that must match
    pub fn matches(&self) -> &FieldTerms {
        &self.matches
    }

    /// Fields that must not match
    pub fn antimatches(&self) -> &FieldTerms {
        &self.antimatches
    }

    /// Fields that should match
    pub fn shouldmatches(&self) -> &FieldTerms {
        &self.shouldmatches
    }

    /// Fields that should not match
    pub fn shouldnotmatches(&self) -> &FieldTerms {
        &self.shouldnotmatches
    }
}

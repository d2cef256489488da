//! Chainable match clause
//!
//! A clause wraps a shared accumulator plus the two flags (`inverse`,
//! `should`) that select which mapping newly registered terms land in.
//! Chaining borrows the receiver and returns a new clause value over the same
//! accumulator, so every clause derived from one ancestor observes every
//! registration. Flags are resolved once per call; a call sets only the flag
//! it names and the other flag carries over from the receiver.
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
//! let acc = clause.accumulator();
//! assert!(acc.matches().contains_field("title"));
//! assert!(acc.antimatches().contains_field("status"));
//! assert!(acc.shouldmatches().contains_field("tags"));
//! # Ok::<(), pliant::PliantError>(())
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::Ref;
use std::rc::Rc;
use tracing::debug;

use crate::accumulator::{MatchAccumulator, MatchMode, SharedAccumulator};
use crate::base::BaseHandle;
use crate::boost::{FilterBoost, MatchGroups};
use crate::error::{PliantError, Result};
use crate::term::{TermValue, ALL_FIELD};

// Reserved keys lifted out of an object primary into the clause flags
const INVERSE_KEY: &str = "inverse";
const SHOULD_KEY: &str = "should";

/// Explicit flag overrides accepted alongside a primary argument
///
/// An explicit option wins over the same flag embedded in the primary
/// object; a flag absent from both is inherited from the invoking clause.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOptions {
    /// Route terms into the forbidden mappings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inverse: Option<bool>,
    /// Route terms into the optional mappings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub should: Option<bool>,
}

impl MatchOptions {
    /// Create empty options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the inverse flag
    pub fn with_inverse(mut self, inverse: bool) -> Self {
        self.inverse = Some(inverse);
        self
    }

    /// Set the should flag
    pub fn with_should(mut self, should: bool) -> Self {
        self.should = Some(should);
        self
    }
}

/// Chainable builder accumulating field-match conditions
///
/// Clause values are immutable: chaining never mutates the receiver's flags,
/// it returns a new value sharing the accumulator. The `Rc` interior keeps
/// construction on one thread; cross-thread use is a compile error.
#[derive(Clone, Debug)]
pub struct MatchClause {
    base: BaseHandle,
    accumulator: SharedAccumulator,
    inverse: bool,
    should: bool,
}

impl MatchClause {
    /// Empty clause against `base`
    pub fn new(base: &BaseHandle) -> Self {
        Self {
            base: base.clone(),
            accumulator: MatchAccumulator::shared(),
            inverse: false,
            should: false,
        }
    }

    /// Clause seeded from a primary argument
    ///
    /// A scalar registers under [`ALL_FIELD`]; an object registers each of
    /// its fields, with the reserved `inverse` and `should` keys lifted out
    /// into the clause flags. A field's value may be a scalar or an array of
    /// scalars.
    pub fn with_primary(base: &BaseHandle, primary: impl Into<Value>) -> Result<Self> {
        Self::with_options(base, primary, MatchOptions::default())
    }

    /// Clause seeded from a JSON string primary
    pub fn with_primary_str(base: &BaseHandle, json_str: &str) -> Result<Self> {
        let primary: Value = serde_json::from_str(json_str)?;
        Self::with_primary(base, primary)
    }

    /// Clause seeded from a primary argument plus explicit options
    pub fn with_options(
        base: &BaseHandle,
        primary: impl Into<Value>,
        options: MatchOptions,
    ) -> Result<Self> {
        Self::new(base).registered(primary.into(), options)
    }

    /// Empty clause against a fresh, detached base
    ///
    /// Distinct calls never share state; useful for building a boost in
    /// isolation before grafting it onto a query.
    pub fn tmp() -> Self {
        Self::new(&BaseHandle::new())
    }

    /// Derived clause whose registrations are forbidden matches
    ///
    /// The should flag carries over from the receiver.
    pub fn not(&self) -> Self {
        self.derived(true, self.should)
    }

    /// Register forbidden matches and return the derived clause
    pub fn not_matching(&self, primary: impl Into<Value>) -> Result<Self> {
        self.not_matching_with(primary, MatchOptions::default())
    }

    /// Register forbidden matches with explicit options
    ///
    /// The inverse flag is pinned for this call; options and embedded keys
    /// may still direct the should flag.
    pub fn not_matching_with(
        &self,
        primary: impl Into<Value>,
        options: MatchOptions,
    ) -> Result<Self> {
        self.registered(primary.into(), options.with_inverse(true))
    }

    /// Derived clause whose registrations are optional matches
    ///
    /// The inverse flag carries over from the receiver.
    pub fn should(&self) -> Self {
        self.derived(self.inverse, true)
    }

    /// Register optional matches and return the derived clause
    pub fn should_matching(&self, primary: impl Into<Value>) -> Result<Self> {
        self.should_matching_with(primary, MatchOptions::default())
    }

    /// Register optional matches with explicit options
    ///
    /// The should flag is pinned for this call; options and embedded keys
    /// may still direct the inverse flag.
    pub fn should_matching_with(
        &self,
        primary: impl Into<Value>,
        options: MatchOptions,
    ) -> Result<Self> {
        self.registered(primary.into(), options.with_should(true))
    }

    /// Register matches under the clause's current flags
    pub fn matching(&self, primary: impl Into<Value>) -> Result<Self> {
        self.matching_with(primary, MatchOptions::default())
    }

    /// Register matches with explicit options
    pub fn matching_with(&self, primary: impl Into<Value>, options: MatchOptions) -> Result<Self> {
        self.registered(primary.into(), options)
    }

    /// True if registrations through this clause are forbidden matches
    pub fn is_inverse(&self) -> bool {
        self.inverse
    }

    /// True if registrations through this clause are optional matches
    pub fn is_should(&self) -> bool {
        self.should
    }

    /// True if any terms have been registered through any derived clause
    pub fn any(&self) -> bool {
        self.accumulator.borrow().any()
    }

    /// Read view of the shared accumulator; keep it short-lived
    ///
    /// Registering through a derived clause while the view is held panics.
    pub fn accumulator(&self) -> Ref<'_, MatchAccumulator> {
        self.accumulator.borrow()
    }

    /// Handle to the parent query context
    pub fn base(&self) -> &BaseHandle {
        &self.base
    }

    /// Compile the accumulated state into a filter boost
    ///
    /// An empty clause contributes nothing. The clause stays usable; later
    /// registrations affect only later compiles.
    pub fn to_boost(&self) -> Option<FilterBoost> {
        self.to_boost_weighted(FilterBoost::DEFAULT_WEIGHT)
    }

    /// Compile with an explicit weight
    pub fn to_boost_weighted(&self, weight: f32) -> Option<FilterBoost> {
        let acc = self.accumulator.borrow();
        if !acc.any() {
            return None;
        }
        Some(FilterBoost::new(MatchGroups::from(&*acc)).with_weight(weight))
    }

    /// Compile and record into the base
    ///
    /// Returns whether a boost was recorded; an empty clause records
    /// nothing.
    pub fn report_boost(&self) -> bool {
        match self.to_boost() {
            Some(boost) => {
                debug!("recording filter boost (weight {})", boost.weight);
                self.base.record_boost(boost);
                true
            }
            None => {
                debug!("skipping boost for empty match clause");
                false
            }
        }
    }

    fn derived(&self, inverse: bool, should: bool) -> Self {
        Self {
            base: self.base.clone(),
            accumulator: Rc::clone(&self.accumulator),
            inverse,
            should,
        }
    }

    /// Parse `primary`, resolve flags, register, and derive the new clause
    ///
    /// Per flag: explicit option, else reserved key embedded in the primary,
    /// else the receiver's flag. Registration and the returned clause both
    /// use the resolved flags.
    fn registered(&self, primary: Value, options: MatchOptions) -> Result<Self> {
        let parsed = parse_primary(&primary)?;
        let inverse = options.inverse.or(parsed.inverse).unwrap_or(self.inverse);
        let should = options.should.or(parsed.should).unwrap_or(self.should);

        if !parsed.batches.is_empty() {
            let mode = MatchMode::from_flags(inverse, should);
            let mut acc = self.accumulator.borrow_mut();
            for (field, values) in parsed.batches {
                acc.register(mode, field, values);
            }
        }

        Ok(self.derived(inverse, should))
    }
}

/// Registrations and embedded flags split out of one primary argument
#[derive(Debug, Default)]
struct ParsedPrimary {
    batches: Vec<(String, Vec<TermValue>)>,
    inverse: Option<bool>,
    should: Option<bool>,
}

fn parse_primary(primary: &Value) -> Result<ParsedPrimary> {
    let mut parsed = ParsedPrimary::default();
    match primary {
        // Absent input registers nothing
        Value::Null => {}
        Value::String(s) => {
            if !s.is_empty() {
                parsed
                    .batches
                    .push((ALL_FIELD.to_string(), vec![TermValue::String(s.clone())]));
            }
        }
        Value::Number(_) | Value::Bool(_) => {
            if let Some(term) = TermValue::from_json(primary) {
                parsed.batches.push((ALL_FIELD.to_string(), vec![term]));
            }
        }
        Value::Object(map) => {
            for (key, value) in map {
                match key.as_str() {
                    INVERSE_KEY => parsed.inverse = Some(flag_value(key, value)?),
                    SHOULD_KEY => parsed.should = Some(flag_value(key, value)?),
                    field => {
                        let values = field_terms(field, value)?;
                        if !values.is_empty() {
                            parsed.batches.push((field.to_string(), values));
                        }
                    }
                }
            }
        }
        Value::Array(_) => {
            return Err(PliantError::InvalidPrimary(
                "expected a scalar term or a field mapping, got an array".to_string(),
            ));
        }
    }
    Ok(parsed)
}

fn flag_value(key: &str, value: &Value) -> Result<bool> {
    value.as_bool().ok_or_else(|| PliantError::InvalidFlag {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Terms for one field of an object primary: a scalar or an array of scalars
fn field_terms(field: &str, value: &Value) -> Result<Vec<TermValue>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                TermValue::from_json(item).ok_or_else(|| PliantError::InvalidTermValue {
                    field: field.to_string(),
                    value: item.to_string(),
                })
            })
            .collect(),
        _ => match TermValue::from_json(value) {
            Some(term) => Ok(vec![term]),
            None => Err(PliantError::InvalidTermValue {
                field: field.to_string(),
                value: value.to_string(),
            }),
        },
    }
}

//! Compiled clause output and bool-query rendering
//!
//! A [`MatchGroups`] value is the order-preserving snapshot of one
//! accumulator; a [`FilterBoost`] pairs it with a weight for the engine's
//! function-score layer.
//!
//! # Example output
//!
//! ```json
//! {
//!   "filter": {
//!     "query": {
//!       "bool": {
//!         "must": [
//!           { "match": { "title": { "query": "rust" } } }
//!         ],
//!         "must_not": [
//!           { "match": { "status": { "query": "draft" } } }
//!         ],
//!         "should": [
//!           { "bool": { "must": [ { "match": { "tags": { "query": "tutorial" } } } ] } }
//!         ]
//!       }
//!     }
//!   },
//!   "weight": 1.2
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::accumulator::{FieldTerms, MatchAccumulator};
use crate::term::TermValue;

/// Order-preserving snapshot of an accumulator's four mappings
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchGroups {
    /// Fields that must match
    #[serde(default, skip_serializing_if = "FieldTerms::is_empty")]
    pub must: FieldTerms,
    /// Fields that must not match
    #[serde(default, skip_serializing_if = "FieldTerms::is_empty")]
    pub must_not: FieldTerms,
    /// Fields that should match
    #[serde(default, skip_serializing_if = "FieldTerms::is_empty")]
    pub should: FieldTerms,
    /// Fields that should not match
    #[serde(default, skip_serializing_if = "FieldTerms::is_empty")]
    pub should_not: FieldTerms,
}

impl From<&MatchAccumulator> for MatchGroups {
    fn from(acc: &MatchAccumulator) -> Self {
        Self {
            must: acc.matches().clone(),
            must_not: acc.antimatches().clone(),
            should: acc.shouldmatches().clone(),
            should_not: acc.shouldnotmatches().clone(),
        }
    }
}

impl MatchGroups {
    /// True if all four groups are empty
    pub fn is_empty(&self) -> bool {
        self.must.is_empty()
            && self.must_not.is_empty()
            && self.should.is_empty()
            && self.should_not.is_empty()
    }

    /// Render the groups as the engine's bool query
    ///
    /// Each field becomes one match entry. A field with several terms joins
    /// them into a single match string (OR semantics). The two optional
    /// groups render as one nested bool under `should`, so a should-not
    /// field penalizes scoring without excluding documents. Empty groups are
    /// omitted; a fully empty value renders `match_all`.
    pub fn to_query_json(&self) -> Value {
        if self.is_empty() {
            return json!({ "match_all": {} });
        }

        let mut body = Map::new();
        if !self.must.is_empty() {
            body.insert("must".to_string(), Value::Array(match_entries(&self.must)));
        }
        if !self.must_not.is_empty() {
            body.insert(
                "must_not".to_string(),
                Value::Array(match_entries(&self.must_not)),
            );
        }
        if !self.should.is_empty() || !self.should_not.is_empty() {
            let mut optional = Map::new();
            if !self.should.is_empty() {
                optional.insert(
                    "must".to_string(),
                    Value::Array(match_entries(&self.should)),
                );
            }
            if !self.should_not.is_empty() {
                optional.insert(
                    "must_not".to_string(),
                    Value::Array(match_entries(&self.should_not)),
                );
            }
            body.insert("should".to_string(), json!([{ "bool": optional }]));
        }

        json!({ "bool": body })
    }
}

/// One `{"match": {field: {"query": ...}}}` entry per field
fn match_entries(terms: &FieldTerms) -> Vec<Value> {
    terms
        .iter()
        .map(|(field, values)| json!({ "match": { field: { "query": joined_value(values) } } }))
        .collect()
}

/// A single term passes through as-is; several join into one match string
fn joined_value(values: &[TermValue]) -> Value {
    match values {
        [single] => single.to_json(),
        many => Value::String(
            many.iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(" "),
        ),
    }
}

/// Weighted filter wrapping a compiled bool query
///
/// Consumed by the engine's function-score layer: documents passing the
/// filter have their score multiplied by the weight.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterBoost {
    /// Compiled match groups backing the filter
    pub groups: MatchGroups,
    /// Score multiplier for matching documents
    #[serde(default = "default_weight")]
    pub weight: f32,
}

fn default_weight() -> f32 {
    FilterBoost::DEFAULT_WEIGHT
}

impl FilterBoost {
    /// Weight applied when none is given
    pub const DEFAULT_WEIGHT: f32 = 1.2;

    /// Wrap compiled groups with the default weight
    pub fn new(groups: MatchGroups) -> Self {
        Self {
            groups,
            weight: Self::DEFAULT_WEIGHT,
        }
    }

    /// Set the weight
    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    /// Render the function-score entry for this boost
    pub fn to_json(&self) -> Value {
        json!({
            "filter": { "query": self.groups.to_query_json() },
            "weight": self.weight,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulator::MatchMode;

    fn groups_with(mode: MatchMode, field: &str, term: &str) -> MatchGroups {
        let mut acc = MatchAccumulator::new();
        acc.register(mode, field, [TermValue::from(term)]);
        MatchGroups::from(&acc)
    }

    #[test]
    fn test_empty_groups_render_match_all() {
        let groups = MatchGroups::default();
        assert!(groups.is_empty());
        assert_eq!(groups.to_query_json(), json!({ "match_all": {} }));
    }

    #[test]
    fn test_single_term_passes_scalar_through() {
        let mut acc = MatchAccumulator::new();
        acc.register(MatchMode::Must, "year", [TermValue::from(2024i64)]);
        let groups = MatchGroups::from(&acc);

        assert_eq!(
            groups.to_query_json(),
            json!({
                "bool": {
                    "must": [
                        { "match": { "year": { "query": 2024 } } }
                    ]
                }
            })
        );
    }

    #[test]
    fn test_multiple_terms_join_into_match_string() {
        let mut acc = MatchAccumulator::new();
        acc.register(
            MatchMode::Must,
            "tags",
            [TermValue::from("rust"), TermValue::from("search")],
        );
        let groups = MatchGroups::from(&acc);

        assert_eq!(
            groups.to_query_json(),
            json!({
                "bool": {
                    "must": [
                        { "match": { "tags": { "query": "rust search" } } }
                    ]
                }
            })
        );
    }

    #[test]
    fn test_optional_groups_nest_under_should() {
        let mut acc = MatchAccumulator::new();
        acc.register(MatchMode::Should, "tags", [TermValue::from("tutorial")]);
        acc.register(MatchMode::ShouldNot, "status", [TermValue::from("draft")]);
        let groups = MatchGroups::from(&acc);

        assert_eq!(
            groups.to_query_json(),
            json!({
                "bool": {
                    "should": [
                        {
                            "bool": {
                                "must": [
                                    { "match": { "tags": { "query": "tutorial" } } }
                                ],
                                "must_not": [
                                    { "match": { "status": { "query": "draft" } } }
                                ]
                            }
                        }
                    ]
                }
            })
        );
    }

    #[test]
    fn test_must_not_renders_its_own_group() {
        let groups = groups_with(MatchMode::MustNot, "status", "draft");
        assert_eq!(
            groups.to_query_json(),
            json!({
                "bool": {
                    "must_not": [
                        { "match": { "status": { "query": "draft" } } }
                    ]
                }
            })
        );
    }

    #[test]
    fn test_field_order_survives_rendering() {
        let mut acc = MatchAccumulator::new();
        acc.register(MatchMode::Must, "first", [TermValue::from("a")]);
        acc.register(MatchMode::Must, "second", [TermValue::from("b")]);
        let rendered = MatchGroups::from(&acc).to_query_json();

        let entries = rendered["bool"]["must"].as_array().unwrap();
        assert!(entries[0]["match"].get("first").is_some());
        assert!(entries[1]["match"].get("second").is_some());
    }

    #[test]
    fn test_filter_boost_default_weight() {
        let boost = FilterBoost::new(groups_with(MatchMode::Must, "f", "v"));
        assert_eq!(boost.weight, FilterBoost::DEFAULT_WEIGHT);

        let heavier = boost.clone().with_weight(3.0);
        assert_eq!(heavier.weight, 3.0);
    }

    #[test]
    fn test_filter_boost_json_shape() {
        let boost = FilterBoost::new(groups_with(MatchMode::Must, "title", "rust"));
        let rendered = boost.to_json();

        assert_eq!(
            rendered["filter"]["query"],
            json!({
                "bool": {
                    "must": [
                        { "match": { "title": { "query": "rust" } } }
                    ]
                }
            })
        );
        assert_eq!(rendered["weight"], json!(FilterBoost::DEFAULT_WEIGHT));
    }

    #[test]
    fn test_groups_serde_skips_empty() {
        let groups = groups_with(MatchMode::Must, "f", "v");
        let value = serde_json::to_value(&groups).unwrap();
        assert!(value.get("must").is_some());
        assert!(value.get("must_not").is_none());
    }
}

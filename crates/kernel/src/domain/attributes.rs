//! Agnostic representation of arbitrary, caller-supplied parameter trees.
//!
//! `AuthInput.parameters` is conceptually an opaque JSON-like tree (spec §9).
//! `AttributeValue` models it as a recursive sum type instead of reusing
//! `serde_json::Value` directly so redaction and schema-free comparisons stay
//! independent of the JSON crate's representation choices (e.g. integer vs.
//! float merging).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A JSON-like value: `null | bool | integer | real | string | array | object`.
///
/// `Object` uses a `BTreeMap` (not `HashMap`) so that two semantically equal
/// attribute trees always serialize identically — load-bearing for the
/// Policy Engine's determinism requirement (spec §4.2) and for fingerprint
/// stability in the Decision Cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Integer(i64),
    Real(f64),
    String(String),
    Array(Vec<AttributeValue>),
    Object(BTreeMap<String, AttributeValue>),
}

impl AttributeValue {
    pub fn string(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, AttributeValue>> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for AttributeValue {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Integer(i)
                } else {
                    Self::Real(n.as_f64().unwrap_or_default())
                }
            }
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(a) => Self::Array(a.into_iter().map(Into::into).collect()),
            serde_json::Value::Object(o) => {
                Self::Object(o.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

/// A parameter map: the capability-call arguments a caller presents.
pub type ParameterMap = BTreeMap<String, AttributeValue>;

/// Structurally removes the keys in `sensitive` from `params`, preserving
/// the order and nesting of every key that survives (spec §8 property 4:
/// "round-trip redaction"). Redaction is shallow — only top-level keys
/// named in the capability's sensitive-key set are removed, matching the
/// spec's `Capability.sensitive_parameter_keys` contract.
pub fn redact(params: &ParameterMap, sensitive: &std::collections::BTreeSet<String>) -> ParameterMap {
    params
        .iter()
        .filter(|(k, _)| !sensitive.contains(*k))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redact_removes_only_named_keys() {
        let mut params = ParameterMap::new();
        params.insert("query".into(), AttributeValue::string("SELECT 1"));
        params.insert("password".into(), AttributeValue::string("hunter2"));

        let mut sensitive = std::collections::BTreeSet::new();
        sensitive.insert("password".to_string());

        let filtered = redact(&params, &sensitive);
        assert_eq!(filtered.len(), 1);
        assert!(filtered.contains_key("query"));
        assert!(!filtered.contains_key("password"));
    }

    #[test]
    fn redact_is_noop_with_empty_sensitive_set() {
        let mut params = ParameterMap::new();
        params.insert("a".into(), AttributeValue::Integer(1));
        let filtered = redact(&params, &Default::default());
        assert_eq!(filtered, params);
    }
}

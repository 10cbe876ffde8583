//! Boundary adapter: backend calibration JSON → canonical kernel input.
//!
//! The backend delivers one snapshot per fetch cycle shaped as
//! `{ entity_id: { parameter_key: raw } }`. A raw record must be a plain JSON
//! number, `null`, or an object carrying the canonical `value` field. Anything
//! else (`{mean}`, `{result}`, strings, ...) is rejected with
//! [`CalibError::MalformedRecord`] instead of being guessed at.
//!
//! Absent values stay absent: they are carried as `None` and never coerced to
//! zero.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CalibError, Result};

/// Name of the single numeric field accepted inside an object record.
pub const CANONICAL_FIELD: &str = "value";

// ---------------------------------------------------------------------------
// Canonical kernel input
// ---------------------------------------------------------------------------

/// One entity's value for one parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub entity_id: String,
    pub value: Option<f64>,
}

/// Ordered measurements of a single parameter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub entries: Vec<Measurement>,
}

impl Sample {
    pub fn push(&mut self, entity_id: impl Into<String>, value: Option<f64>) {
        self.entries.push(Measurement {
            entity_id: entity_id.into(),
            value,
        });
    }

    /// Value recorded for `entity_id` (first occurrence).
    pub fn get(&self, entity_id: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|m| m.entity_id == entity_id)
            .and_then(|m| m.value)
    }

    /// Present, finite values in entry order.
    pub fn values(&self) -> Vec<f64> {
        self.entries
            .iter()
            .filter_map(|m| m.value)
            .filter(|v| v.is_finite())
            .collect()
    }

    pub fn present_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|m| m.value.is_some_and(f64::is_finite))
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parameter key → sample. Keys sharing one entity-id namespace but not
/// necessarily the same entity coverage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    samples: BTreeMap<String, Sample>,
}

impl ParameterSet {
    pub fn insert(&mut self, key: impl Into<String>, sample: Sample) {
        self.samples.insert(key.into(), sample);
    }

    pub fn get(&self, key: &str) -> Option<&Sample> {
        self.samples.get(key)
    }

    /// Finite values for `key`; empty when the key is unknown.
    pub fn values_of(&self, key: &str) -> Vec<f64> {
        self.get(key).map(Sample::values).unwrap_or_default()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.samples.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Backend snapshot
// ---------------------------------------------------------------------------

/// Raw backend snapshot: entity id → parameter key → raw record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    pub entities: BTreeMap<String, BTreeMap<String, Value>>,
}

impl Snapshot {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Read and parse a snapshot JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let snapshot = Self::from_json_str(&raw)?;
        log::debug!(
            "loaded snapshot {} ({} entities)",
            path.display(),
            snapshot.entities.len()
        );
        Ok(snapshot)
    }

    /// Sorted union of parameter keys across all entities.
    pub fn parameter_keys(&self) -> Vec<String> {
        let keys: BTreeSet<&String> = self.entities.values().flat_map(|p| p.keys()).collect();
        keys.into_iter().cloned().collect()
    }

    pub fn entity_ids(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    /// Pivot into parameter-major form, normalizing every record.
    ///
    /// Fails on the first malformed record.
    pub fn to_parameter_set(&self) -> Result<ParameterSet> {
        let mut set = ParameterSet::default();
        for (entity, params) in &self.entities {
            for (key, raw) in params {
                let value = normalize_value(entity, key, raw).inspect_err(|e| {
                    log::warn!("rejecting snapshot record: {e}");
                })?;
                set.samples.entry(key.clone()).or_default().push(entity, value);
            }
        }
        log::debug!(
            "normalized snapshot: {} entities, {} parameters",
            self.entities.len(),
            set.len()
        );
        Ok(set)
    }
}

/// Normalize one raw record into the canonical `Option<f64>`.
///
/// Accepts a number, `null`, or `{"value": number | null}`. Non-finite numbers
/// become `None`.
pub fn normalize_value(entity: &str, parameter: &str, raw: &Value) -> Result<Option<f64>> {
    match raw {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(n.as_f64().filter(|v| v.is_finite())),
        Value::Object(fields) => match fields.get(CANONICAL_FIELD) {
            Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => Ok(n.as_f64().filter(|v| v.is_finite())),
            Some(other) => Err(CalibError::malformed(
                entity,
                parameter,
                format!("'{CANONICAL_FIELD}' must be a number or null, got {}", kind(other)),
            )),
            None => {
                let found: Vec<&str> = fields.keys().map(String::as_str).collect();
                Err(CalibError::malformed(
                    entity,
                    parameter,
                    format!(
                        "object record lacks '{CANONICAL_FIELD}' (fields: {})",
                        found.join(", ")
                    ),
                ))
            }
        },
        other => Err(CalibError::malformed(
            entity,
            parameter,
            format!("expected number, null or {{\"{CANONICAL_FIELD}\": ..}}, got {}", kind(other)),
        )),
    }
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

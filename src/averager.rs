//! CSV soil-moisture averaging.
//!
//! Each non-blank line of the input is expected to be
//! `identifier,timestamp,value`. Lines that fail validation are skipped and
//! never influence the result; [`summarize_text`] additionally reports why
//! each one was dropped.

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

use crate::error::{AggregateError, Result};
use crate::stats::{mean, round2};

/// One validated row of input.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading<'a> {
    pub id: &'a str,
    pub timestamp: &'a str,
    pub value: f64,
}

/// Why a single line was not accepted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowError {
    Empty,
    FieldCount { found: usize },
    BadValue { value: String },
    NonFinite { value: String },
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowError::Empty => write!(f, "blank line"),
            RowError::FieldCount { found } => write!(f, "expected 3 fields, found {found}"),
            RowError::BadValue { value } => write!(f, "value {value:?} is not a number"),
            RowError::NonFinite { value } => write!(f, "value {value:?} is not finite"),
        }
    }
}

/// Validates one line: trim, check the field count, parse the value.
pub fn parse_row(line: &str) -> std::result::Result<Reading<'_>, RowError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(RowError::Empty);
    }

    let fields: Vec<&str> = line.split(',').collect();
    let &[id, timestamp, raw] = fields.as_slice() else {
        return Err(RowError::FieldCount {
            found: fields.len(),
        });
    };

    let value: f64 = raw.trim().parse().map_err(|_| RowError::BadValue {
        value: raw.to_string(),
    })?;
    if !value.is_finite() {
        return Err(RowError::NonFinite {
            value: raw.to_string(),
        });
    }

    Ok(Reading {
        id,
        timestamp,
        value,
    })
}

/// Per-key and overall averages, both rounded to two decimals.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Averages {
    pub per_key: HashMap<String, f64>,
    pub overall: f64,
}

impl Averages {
    pub fn into_parts(self) -> (HashMap<String, f64>, f64) {
        (self.per_key, self.overall)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRow {
    /// 1-based line number in the input.
    pub line: usize,
    pub reason: RowError,
}

/// Averages plus bookkeeping about what was accepted and what was dropped.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParseReport {
    pub averages: Averages,
    pub accepted: usize,
    pub per_key_counts: HashMap<String, usize>,
    pub skipped: Vec<SkippedRow>,
}

/// Runs the row pipeline over `text` and aggregates the surviving readings.
pub fn summarize_text(text: &str) -> ParseReport {
    // Keys in first-appearance order; the overall sum walks the groups in
    // this order.
    let mut series: IndexMap<&str, Vec<f64>> = IndexMap::new();
    let mut skipped = Vec::new();

    for (idx, line) in text.split('\n').enumerate() {
        match parse_row(line) {
            Ok(reading) => {
                series.entry(reading.id).or_default().push(reading.value);
            }
            Err(RowError::Empty) => continue,
            Err(reason) => {
                debug!(line = idx + 1, %reason, "Skipping row");
                skipped.push(SkippedRow {
                    line: idx + 1,
                    reason,
                });
            }
        }
    }

    let all_values: Vec<f64> = series.values().flatten().copied().collect();

    let mut per_key = HashMap::with_capacity(series.len());
    let mut per_key_counts = HashMap::with_capacity(series.len());
    for (id, values) in series {
        per_key.insert(id.to_string(), round2(mean(&values)));
        per_key_counts.insert(id.to_string(), values.len());
    }

    let overall = if all_values.is_empty() {
        0.0
    } else {
        round2(mean(&all_values))
    };

    debug!(
        accepted = all_values.len(),
        skipped = skipped.len(),
        keys = per_key.len(),
        "Parsed readings"
    );

    ParseReport {
        averages: Averages { per_key, overall },
        accepted: all_values.len(),
        per_key_counts,
        skipped,
    }
}

/// Computes per-key and overall averages. Malformed rows are ignored.
pub fn compute_averages(text: &str) -> Averages {
    summarize_text(text).averages
}

/// Like [`summarize_text`], for raw bytes that must be UTF-8.
///
/// # Errors
///
/// Returns [`AggregateError::InvalidInput`] if `bytes` is not valid UTF-8.
pub fn summarize_bytes(bytes: &[u8]) -> Result<ParseReport> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| AggregateError::InvalidInput(format!("input is not UTF-8: {e}")))?;
    Ok(summarize_text(text))
}

/// Like [`compute_averages`], for raw bytes that must be UTF-8.
pub fn compute_averages_bytes(bytes: &[u8]) -> Result<Averages> {
    Ok(summarize_bytes(bytes)?.averages)
}

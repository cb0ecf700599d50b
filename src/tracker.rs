//! In-memory store of the latest value per identifier.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{AggregateError, Result};
use crate::stats::{mean, round2};

/// Conversion of caller-supplied input into a stored float.
///
/// Anything that is not a finite number is rejected with
/// [`AggregateError::Conversion`].
pub trait IntoValue {
    fn into_value(self) -> Result<f64>;
}

fn finite(value: f64, original: impl ToString) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AggregateError::Conversion {
            value: original.to_string(),
        })
    }
}

impl IntoValue for f64 {
    fn into_value(self) -> Result<f64> {
        finite(self, self)
    }
}

impl IntoValue for f32 {
    fn into_value(self) -> Result<f64> {
        finite(self as f64, self)
    }
}

macro_rules! impl_into_value_int {
    ($($t:ty),*) => {
        $(
            impl IntoValue for $t {
                fn into_value(self) -> Result<f64> {
                    Ok(self as f64)
                }
            }
        )*
    };
}

impl_into_value_int!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

impl IntoValue for &str {
    fn into_value(self) -> Result<f64> {
        let parsed: f64 = self.trim().parse().map_err(|_| AggregateError::Conversion {
            value: self.to_string(),
        })?;
        finite(parsed, self)
    }
}

impl IntoValue for String {
    fn into_value(self) -> Result<f64> {
        self.as_str().into_value()
    }
}

impl IntoValue for &Value {
    fn into_value(self) -> Result<f64> {
        match self {
            Value::Number(n) => match n.as_f64() {
                Some(v) => finite(v, n),
                None => Err(AggregateError::Conversion {
                    value: n.to_string(),
                }),
            },
            Value::String(s) => s.as_str().into_value(),
            other => Err(AggregateError::Conversion {
                value: other.to_string(),
            }),
        }
    }
}

/// Count of tracked identifiers and the rounded mean of their values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub average: Option<f64>,
}

/// Values are kept in first-insertion order; the summary sums them in that
/// order so the rounded average is the same on every run.
#[derive(Debug, Default)]
pub struct ValueTracker {
    values: IndexMap<String, f64>,
}

impl ValueTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` for `id`, replacing any previous value. An overwritten
    /// id keeps its original position.
    ///
    /// # Errors
    ///
    /// Returns [`AggregateError::Conversion`] if `value` is not a finite
    /// number. The tracker is left untouched in that case.
    pub fn add(&mut self, id: impl Into<String>, value: impl IntoValue) -> Result<()> {
        let value = value.into_value()?;
        let id = id.into();
        debug!(id = %id, value, "Tracking value");
        self.values.insert(id, value);
        Ok(())
    }

    /// Removes `id`, returning its value, or `None` if it was not tracked.
    pub fn remove(&mut self, id: &str) -> Option<f64> {
        let removed = self.values.shift_remove(id);
        if removed.is_none() {
            debug!(id, "Nothing to remove");
        }
        removed
    }

    pub fn get(&self, id: &str) -> Option<f64> {
        self.values.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn summary(&self) -> Summary {
        if self.values.is_empty() {
            return Summary {
                count: 0,
                average: None,
            };
        }

        let values: Vec<f64> = self.values.values().copied().collect();
        // Float addition is order dependent; `values()` follows insertion order.
        Summary {
            count: values.len(),
            average: Some(round2(mean(&values))),
        }
    }
}

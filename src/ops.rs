//! Scripted tracker operations, decoded from JSON.
//!
//! ```json
//! [
//!   { "op": "add", "id": "a1", "value": 22 },
//!   { "op": "remove", "id": "a1" }
//! ]
//! ```

use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::error::{AggregateError, Result};
use crate::tracker::ValueTracker;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum TrackerOp {
    /// `value` stays raw so conversion happens inside [`ValueTracker::add`].
    Add { id: String, value: Value },
    Remove { id: String },
}

/// Decodes a JSON array of operations.
pub fn parse_ops(bytes: &[u8]) -> Result<Vec<TrackerOp>> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Applies `ops` in order, stopping at the first one that fails.
///
/// Operations before the failing one stay applied.
pub fn apply_ops(tracker: &mut ValueTracker, ops: &[TrackerOp]) -> Result<()> {
    for (index, op) in ops.iter().enumerate() {
        match op {
            TrackerOp::Add { id, value } => {
                tracker
                    .add(id.as_str(), value)
                    .map_err(|e| AggregateError::Operation {
                        index,
                        source: Box::new(e),
                    })?;
            }
            TrackerOp::Remove { id } => {
                let removed = tracker.remove(id);
                info!(id = %id, ?removed, "Removed");
            }
        }
    }
    Ok(())
}

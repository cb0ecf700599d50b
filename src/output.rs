//! Output formatting and persistence for averages and tracker summaries.
//!
//! Supports pretty-printing, JSON serialization, and CSV append.

use anyhow::Result;
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::Serialize;
use std::fmt::Debug;
use std::fs::OpenOptions;
use std::path::Path;
use tracing::{debug, info};

use crate::averager::Averages;
use crate::tracker::Summary;

/// Key used for the overall-average row in CSV output.
pub const OVERALL_KEY: &str = "__overall__";

#[derive(Debug, Serialize)]
pub struct AverageRecord<'a> {
    pub computed_at: DateTime<Utc>,
    pub source: &'a str,
    pub key: &'a str,
    pub average: f64,
}

#[derive(Debug, Serialize)]
pub struct SummaryRecord<'a> {
    pub computed_at: DateTime<Utc>,
    pub source: &'a str,
    pub count: usize,
    pub average: Option<f64>,
}

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty<T: Debug>(value: &T) {
    debug!("{:#?}", value);
}

/// Logs a value as pretty-printed JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Appends `records` to a CSV file, creating it with headers if it does not
/// already exist.
fn append_records<T: Serialize>(path: &str, records: &[T]) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, rows = records.len(), "Appending CSV records");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);

    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(())
}

/// Appends one row per key plus an [`OVERALL_KEY`] row.
pub fn append_averages(path: &str, source: &str, averages: &Averages) -> Result<()> {
    let computed_at = Utc::now();

    let mut keys: Vec<&String> = averages.per_key.keys().collect();
    keys.sort();

    let mut records: Vec<AverageRecord> = keys
        .into_iter()
        .map(|key| AverageRecord {
            computed_at,
            source,
            key,
            average: averages.per_key[key],
        })
        .collect();
    records.push(AverageRecord {
        computed_at,
        source,
        key: OVERALL_KEY,
        average: averages.overall,
    });

    append_records(path, &records)
}

pub fn append_summary(path: &str, source: &str, summary: &Summary) -> Result<()> {
    let record = SummaryRecord {
        computed_at: Utc::now(),
        source,
        count: summary.count,
        average: summary.average,
    };
    append_records(path, &[record])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::averager::compute_averages;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&Averages::default());
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&compute_averages("a,t,1")).unwrap();
    }

    #[test]
    fn test_append_averages_rows() {
        let path = temp_path("moisture_rater_test_averages.csv");
        let _ = fs::remove_file(&path);

        let averages = compute_averages("b,t,2\na,t,1\n");
        append_averages(&path, "readings.csv", &averages).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "computed_at,source,key,average");
        assert!(lines[1].ends_with(",readings.csv,a,1.0"));
        assert!(lines[2].ends_with(",readings.csv,b,2.0"));
        assert!(lines[3].ends_with(",readings.csv,__overall__,1.5"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_summary_writes_header_once() {
        let path = temp_path("moisture_rater_test_summary.csv");
        let _ = fs::remove_file(&path);

        let summary = Summary {
            count: 0,
            average: None,
        };
        append_summary(&path, "ops.json", &summary).unwrap();
        append_summary(&path, "ops.json", &summary).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let header_count = content.lines().filter(|l| l.contains("computed_at")).count();
        assert_eq!(header_count, 1);
        assert_eq!(content.lines().count(), 3);

        fs::remove_file(&path).unwrap();
    }
}

use moisture_rater::averager::{RowError, compute_averages, summarize_bytes};
use moisture_rater::ops::{apply_ops, parse_ops};
use moisture_rater::tracker::{Summary, ValueTracker};

#[test]
fn test_sample_readings() {
    let bytes = include_bytes!("fixtures/sample_readings.csv");
    let report = summarize_bytes(bytes).expect("fixture is UTF-8");

    let (per_key, overall) = report.averages.into_parts();
    assert_eq!(per_key.len(), 3);
    assert_eq!(per_key["tr131"], 32.7);
    assert_eq!(per_key["tr132"], 34.2);
    assert_eq!(per_key["tr133"], 35.7);
    assert_eq!(overall, 34.2);
    assert!(report.skipped.is_empty());
}

#[test]
fn test_noisy_readings() {
    let bytes = include_bytes!("fixtures/noisy_readings.csv");
    let report = summarize_bytes(bytes).expect("fixture is UTF-8");

    assert_eq!(report.accepted, 4);
    assert_eq!(report.averages.per_key.len(), 2);
    assert_eq!(report.averages.per_key["tr131"], 33.0);
    assert_eq!(report.averages.per_key["tr132"], 41.0);
    // Mean over all four readings, not over the two per-key averages (37.0).
    assert_eq!(report.averages.overall, 35.0);

    let lines: Vec<usize> = report.skipped.iter().map(|s| s.line).collect();
    assert_eq!(lines, vec![4, 5, 7]);
    assert_eq!(report.skipped[2].reason, RowError::FieldCount { found: 4 });
}

#[test]
fn test_injected_malformed_lines() {
    let good = "s1,2025-01-01T08:00,12.5";
    let noisy = format!("foo,bar\n{good}\nid,ts,NaNtext");
    assert_eq!(compute_averages(good), compute_averages(&noisy));
}

#[test]
fn test_sample_operations_script() {
    let ops = parse_ops(include_bytes!("fixtures/sample_ops.json")).expect("valid script");
    let mut tracker = ValueTracker::new();
    apply_ops(&mut tracker, &ops).expect("all values numeric");

    assert_eq!(
        tracker.summary(),
        Summary {
            count: 2,
            average: Some(18.0)
        }
    );
}

/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Rounds to two decimal places, ties to even on the exact binary value.
///
/// `0.125` is exactly representable and rounds down to `0.12`; `2.675` is
/// stored just below the tie and also rounds down, to `2.67`.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    // Float formatting rounds the exact decimal expansion half-to-even.
    format!("{value:.2}").parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_mean_normal_values() {
        assert_eq!(mean(&[22.0, 17.0, 19.0]), 19.333333333333332);
        assert_eq!(mean(&[5.0]), 5.0);
    }

    #[test]
    fn test_round2_plain() {
        assert_eq!(round2(34.2), 34.2);
        assert_eq!(round2(19.333333333333332), 19.33);
        assert_eq!(round2(18.0), 18.0);
        assert_eq!(round2(-1.006), -1.01);
    }

    #[test]
    fn test_round2_ties_go_to_even() {
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(2.675), 2.67);
    }

    #[test]
    fn test_round2_keeps_at_most_two_decimals() {
        for v in [1.23456, 98.7654321, 0.005, 33.333333] {
            let r = round2(v);
            assert_eq!(r, (r * 100.0).round() / 100.0);
        }
    }
}

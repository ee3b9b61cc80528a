//! Price statistics: mean and Pearson correlation.
//!
//! Degenerate inputs are reported as `0.0` (average) or `None` (correlation),
//! never as errors; the HTTP layer decides how to surface them.

/// Arithmetic mean. Returns `0.0` for an empty slice.
pub fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Pearson correlation coefficient of two equal-length samples.
///
/// Returns `None` when the lengths differ, the input is empty, or either
/// sample has zero variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.is_empty() {
        return None;
    }

    let mean_x = average(xs);
    let mean_y = average(ys);

    let (covariance, variance_x, variance_y) = xs.iter().zip(ys).fold(
        (0.0, 0.0, 0.0),
        |(cov, var_x, var_y), (x, y)| {
            let dx = x - mean_x;
            let dy = y - mean_y;
            (cov + dx * dy, var_x + dx * dx, var_y + dy * dy)
        },
    );

    let std_x = variance_x.sqrt();
    let std_y = variance_y.sqrt();

    if std_x == 0.0 || std_y == 0.0 {
        return None;
    }

    Some(covariance / (std_x * std_y))
}

/// Round half away from zero to `places` decimal places
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_average_empty_is_zero() {
        assert_eq!(average(&[]), 0.0);
    }

    #[test]
    fn test_average_basic() {
        assert_eq!(average(&[100.0, 200.0, 300.0]), 200.0);
        assert_eq!(average(&[42.5]), 42.5);
    }

    #[test]
    fn test_pearson_perfect_negative() {
        let r = pearson(&[100.0, 200.0, 300.0], &[300.0, 200.0, 100.0]).unwrap();
        assert!((r + 1.0).abs() < EPSILON, "Got: {}", r);
    }

    #[test]
    fn test_pearson_perfect_positive_under_affine_transform() {
        let xs = [1.0, 2.0, 4.0, 8.0];
        let ys: Vec<f64> = xs.iter().map(|x| 3.0 * x + 10.0).collect();
        let r = pearson(&xs, &ys).unwrap();
        assert!((r - 1.0).abs() < EPSILON, "Got: {}", r);
    }

    #[test]
    fn test_pearson_known_value() {
        // cov = 1, var_x = 2, var_y = 2
        let xs = [1.0, 2.0, 3.0];
        let ys = [1.0, 3.0, 2.0];
        let r = pearson(&xs, &ys).unwrap();
        assert!((r - 0.5).abs() < EPSILON, "Got: {}", r);
    }

    #[test]
    fn test_pearson_length_mismatch_is_none() {
        assert_eq!(pearson(&[1.0, 2.0], &[1.0, 2.0, 3.0]), None);
    }

    #[test]
    fn test_pearson_empty_is_none() {
        assert_eq!(pearson(&[], &[]), None);
    }

    #[test]
    fn test_pearson_zero_variance_is_none() {
        assert_eq!(pearson(&[5.0, 5.0, 5.0], &[1.0, 2.0, 3.0]), None);
        assert_eq!(pearson(&[1.0, 2.0, 3.0], &[5.0, 5.0, 5.0]), None);
    }

    #[test]
    fn test_pearson_stays_within_bounds() {
        let xs = [10.1, 10.4, 9.8, 10.9, 11.2, 10.0];
        let ys = [20.3, 20.1, 19.9, 21.5, 21.0, 20.2];
        let r = pearson(&xs, &ys).unwrap();
        assert!((-1.0 - EPSILON..=1.0 + EPSILON).contains(&r), "Got: {}", r);
    }

    #[test]
    fn test_round_to_four_places() {
        assert_eq!(round_to(-0.999_999_999, 4), -1.0);
        assert_eq!(round_to(0.123_456, 4), 0.1235);
        assert_eq!(round_to(0.5, 0), 1.0);
    }
}

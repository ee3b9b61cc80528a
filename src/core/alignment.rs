//! Time alignment of two independently sampled price series.
//!
//! Both series are restricted to their common time range, a unified timeline
//! is built from every timestamp that survives, and each timeline instant is
//! paired with the nearest point of each series. An instant is kept only when
//! both nearest points lie within [`MAX_ALIGNMENT_GAP_SECS`] of it.

use chrono::{DateTime, Duration, Utc};

use super::types::PricePoint;

/// Maximum distance between a timeline instant and a matched point (5 minutes)
pub const MAX_ALIGNMENT_GAP_SECS: i64 = 5 * 60;

/// Index-aligned prices: `a[i]` and `b[i]` belong to the same instant
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignedPrices {
    pub a: Vec<f64>,
    pub b: Vec<f64>,
}

impl AlignedPrices {
    pub fn len(&self) -> usize {
        self.a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.a.is_empty()
    }
}

/// Align two series on their overlapping time range.
///
/// Inputs need not be sorted. Points with equal timestamps keep their arrival
/// order, and ties in distance resolve to the earlier point.
pub fn align(series_a: &[PricePoint], series_b: &[PricePoint]) -> AlignedPrices {
    let sorted_a = sorted_by_time(series_a);
    let sorted_b = sorted_by_time(series_b);

    let (Some(first_a), Some(last_a)) = (sorted_a.first(), sorted_a.last()) else {
        return AlignedPrices::default();
    };
    let (Some(first_b), Some(last_b)) = (sorted_b.first(), sorted_b.last()) else {
        return AlignedPrices::default();
    };

    let start = first_a.observed_at.max(first_b.observed_at);
    let end = last_a.observed_at.min(last_b.observed_at);
    if start > end {
        return AlignedPrices::default();
    }

    let window_a = within(&sorted_a, start, end);
    let window_b = within(&sorted_b, start, end);

    let mut timeline: Vec<DateTime<Utc>> = window_a
        .iter()
        .chain(window_b.iter())
        .map(|p| p.observed_at)
        .collect();
    timeline.sort_unstable();
    timeline.dedup();

    let max_gap = Duration::seconds(MAX_ALIGNMENT_GAP_SECS);
    let mut aligned = AlignedPrices::default();

    for instant in timeline {
        let matched_a = nearest(window_a, instant).filter(|p| gap(p.observed_at, instant) <= max_gap);
        let matched_b = nearest(window_b, instant).filter(|p| gap(p.observed_at, instant) <= max_gap);

        if let (Some(pa), Some(pb)) = (matched_a, matched_b) {
            aligned.a.push(pa.price);
            aligned.b.push(pb.price);
        }
    }

    aligned
}

fn sorted_by_time(series: &[PricePoint]) -> Vec<PricePoint> {
    let mut sorted = series.to_vec();
    // stable: equal timestamps keep arrival order
    sorted.sort_by_key(|p| p.observed_at);
    sorted
}

/// Sub-slice of a sorted series inside `[start, end]`
fn within(sorted: &[PricePoint], start: DateTime<Utc>, end: DateTime<Utc>) -> &[PricePoint] {
    let lo = sorted.partition_point(|p| p.observed_at < start);
    let hi = sorted.partition_point(|p| p.observed_at <= end);
    &sorted[lo..hi]
}

fn gap(a: DateTime<Utc>, b: DateTime<Utc>) -> Duration {
    if a >= b {
        a - b
    } else {
        b - a
    }
}

/// Point of a sorted series closest to `target`; the earliest wins on ties
fn nearest(sorted: &[PricePoint], target: DateTime<Utc>) -> Option<&PricePoint> {
    let idx = sorted.partition_point(|p| p.observed_at < target);

    let after = sorted.get(idx);
    let before = idx.checked_sub(1).map(|i| {
        // first of any run of equal timestamps
        let ts = sorted[i].observed_at;
        &sorted[sorted.partition_point(|p| p.observed_at < ts)]
    });

    match (before, after) {
        (Some(b), Some(a)) => {
            if gap(b.observed_at, target) <= gap(a.observed_at, target) {
                Some(b)
            } else {
                Some(a)
            }
        }
        (Some(b), None) => Some(b),
        (None, Some(a)) => Some(a),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, min: u32, sec: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 9, hour, min, sec).unwrap()
    }

    fn point(price: f64, hour: u32, min: u32) -> PricePoint {
        PricePoint::new(price, at(hour, min, 0))
    }

    #[test]
    fn test_identical_timelines_pair_one_to_one() {
        let a = vec![point(100.0, 2, 1), point(200.0, 2, 2), point(300.0, 2, 3)];
        let b = vec![point(300.0, 2, 1), point(200.0, 2, 2), point(100.0, 2, 3)];

        let aligned = align(&a, &b);
        assert_eq!(aligned.a, vec![100.0, 200.0, 300.0]);
        assert_eq!(aligned.b, vec![300.0, 200.0, 100.0]);
    }

    #[test]
    fn test_no_overlap_yields_empty_sequences() {
        let a = vec![point(100.0, 2, 1)];
        let b = vec![point(300.0, 3, 1)];

        let aligned = align(&a, &b);
        assert!(aligned.a.is_empty());
        assert!(aligned.b.is_empty());
    }

    #[test]
    fn test_empty_input_yields_empty_sequences() {
        let a = vec![point(100.0, 2, 1)];
        assert!(align(&a, &[]).is_empty());
        assert!(align(&[], &a).is_empty());
        assert!(align(&[], &[]).is_empty());
    }

    #[test]
    fn test_unsorted_input_is_sorted_before_alignment() {
        let a = vec![point(300.0, 2, 3), point(100.0, 2, 1), point(200.0, 2, 2)];
        let b = vec![point(30.0, 2, 3), point(10.0, 2, 1), point(20.0, 2, 2)];

        let aligned = align(&a, &b);
        assert_eq!(aligned.a, vec![100.0, 200.0, 300.0]);
        assert_eq!(aligned.b, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_points_outside_overlap_are_dropped() {
        // a spans 02:00-02:20, b spans 02:10-02:30; overlap is 02:10-02:20
        let a = vec![point(1.0, 2, 0), point(2.0, 2, 10), point(3.0, 2, 20)];
        let b = vec![point(10.0, 2, 10), point(20.0, 2, 20), point(30.0, 2, 30)];

        let aligned = align(&a, &b);
        assert_eq!(aligned.a, vec![2.0, 3.0]);
        assert_eq!(aligned.b, vec![10.0, 20.0]);
    }

    #[test]
    fn test_instant_skipped_when_nearest_match_exceeds_gap() {
        // overlap 02:00-02:20; the 02:10 instant from b has no a-point within 5 minutes
        let a = vec![point(1.0, 2, 0), point(2.0, 2, 20)];
        let b = vec![point(10.0, 2, 0), point(20.0, 2, 10), point(30.0, 2, 20)];

        let aligned = align(&a, &b);
        assert_eq!(aligned.a, vec![1.0, 2.0]);
        assert_eq!(aligned.b, vec![10.0, 30.0]);
    }

    #[test]
    fn test_match_exactly_at_gap_boundary_is_kept() {
        let a = vec![point(1.0, 2, 0), point(2.0, 2, 10)];
        let b = vec![point(10.0, 2, 0), point(20.0, 2, 5), point(30.0, 2, 10)];

        // 02:05 is exactly 5 minutes from both a-points; the earlier one wins
        let aligned = align(&a, &b);
        assert_eq!(aligned.a, vec![1.0, 1.0, 2.0]);
        assert_eq!(aligned.b, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_uneven_sampling_uses_nearest_point() {
        let a = vec![
            PricePoint::new(1.0, at(2, 0, 0)),
            PricePoint::new(2.0, at(2, 1, 0)),
            PricePoint::new(3.0, at(2, 2, 0)),
        ];
        let b = vec![
            PricePoint::new(10.0, at(2, 0, 0)),
            PricePoint::new(20.0, at(2, 1, 40)),
            PricePoint::new(30.0, at(2, 2, 0)),
        ];

        let aligned = align(&a, &b);
        // timeline: 02:00, 02:01:00, 02:01:40, 02:02:00
        assert_eq!(aligned.a, vec![1.0, 2.0, 3.0, 3.0]);
        assert_eq!(aligned.b, vec![10.0, 20.0, 20.0, 30.0]);
        assert_eq!(aligned.a.len(), aligned.b.len());
    }

    #[test]
    fn test_duplicate_timestamps_prefer_first_arrival() {
        let a = vec![point(1.0, 2, 0), point(2.0, 2, 0), point(3.0, 2, 2)];
        let b = vec![point(10.0, 2, 0), point(20.0, 2, 2)];

        let aligned = align(&a, &b);
        // 02:00 resolves to the first a-point at 02:00
        assert_eq!(aligned.a, vec![1.0, 3.0]);
        assert_eq!(aligned.b, vec![10.0, 20.0]);
    }

    #[test]
    fn test_overlap_of_single_instant_yields_one_pair() {
        // overlap collapses to 02:00; the other points fall outside it
        let a = vec![point(1.0, 2, 0), point(2.0, 2, 10)];
        let b = vec![point(10.0, 1, 50), point(20.0, 2, 0)];

        let aligned = align(&a, &b);
        assert_eq!(aligned.len(), 1);
        assert_eq!(aligned.a, vec![1.0]);
        assert_eq!(aligned.b, vec![20.0]);
    }
}

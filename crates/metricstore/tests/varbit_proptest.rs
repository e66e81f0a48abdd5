//! Property-based tests for the VarBit series encoding.
//!
//! Uses proptest to verify lossless round-trip for arbitrary data. Delta
//! arithmetic wraps and the fallback bucket is 64 bits wide, so no input
//! constraints are needed: every `i64` timestamp and every `f64` bit
//! pattern must come back unchanged.

use alopex_metricstore::{MetricStore, Point, VarBitMetricStore, VarBitTimeSeries};
use proptest::prelude::*;

/// Arbitrary points, including NaN payloads and extreme timestamps.
fn arbitrary_points() -> impl Strategy<Value = Vec<(i64, u64)>> {
    prop::collection::vec((any::<i64>(), any::<u64>()), 0..200)
}

/// Regular intervals with a few repeated and jittered samples.
fn typical_timeseries_strategy() -> impl Strategy<Value = Vec<(i64, f64)>> {
    (1i64..100_000, 1..300usize).prop_flat_map(|(interval, count)| {
        let start_ts = 1_000_000_000_000i64;
        (
            prop::collection::vec(-5i64..=5, count),
            prop::collection::vec(prop::sample::select(vec![0.0, 1.0, 1.5, 99.25, -3.0]), count),
        )
            .prop_map(move |(jitter, values)| {
                jitter
                    .into_iter()
                    .zip(values)
                    .enumerate()
                    .map(|(i, (j, v))| (start_ts + (i as i64) * interval + j, v))
                    .collect()
            })
    })
}

proptest! {
    /// Every appended bit pattern decodes unchanged, in order.
    #[test]
    fn test_arbitrary_roundtrip(points in arbitrary_points()) {
        let mut series = VarBitTimeSeries::new();
        for &(ts, bits) in &points {
            series.append(ts, f64::from_bits(bits));
        }

        let decoded = series.points();
        prop_assert_eq!(decoded.len(), points.len());
        for (point, &(ts, bits)) in decoded.iter().zip(points.iter()) {
            prop_assert_eq!(point.timestamp, ts);
            prop_assert_eq!(point.value.to_bits(), bits);
        }
    }

    /// Typical scraped series round-trip and compress below the raw size.
    #[test]
    fn test_typical_timeseries_roundtrip(points in typical_timeseries_strategy()) {
        let mut series = VarBitTimeSeries::new();
        for &(ts, val) in &points {
            series.append(ts, val);
        }

        let decoded = series.points();
        prop_assert_eq!(decoded.len(), points.len());
        for (point, &(ts, val)) in decoded.iter().zip(points.iter()) {
            prop_assert!(point.bit_eq(&Point::new(ts, val)));
        }

        if points.len() >= 16 {
            prop_assert!(series.compression_ratio() > 1.0);
        }
    }

    /// The store returns exactly what a bare series would for the same input.
    #[test]
    fn test_store_matches_series(points in arbitrary_points(), id in any::<u64>()) {
        let store = VarBitMetricStore::with_capacity(1);
        let mut series = VarBitTimeSeries::new();
        for &(ts, bits) in &points {
            store.add_point(id, ts, f64::from_bits(bits)).unwrap();
            series.append(ts, f64::from_bits(bits));
        }

        let from_store = store.get_series(id);
        let from_series = series.points();
        prop_assert_eq!(from_store.len(), from_series.len());
        for (a, b) in from_store.iter().zip(from_series.iter()) {
            prop_assert!(a.bit_eq(b));
        }
        prop_assert_eq!(store.get_stats().metric_count, usize::from(!points.is_empty()));
    }
}

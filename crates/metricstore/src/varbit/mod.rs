//! Per-series compressed append log.
//!
//! A [`VarBitTimeSeries`] keeps two independent bit streams: timestamps in
//! delta-of-delta form and values in XOR form (see [`timestamp`] and
//! [`value`] for the exact layouts). Appending never rewrites earlier
//! output, and decoding is a single forward pass that leaves the buffers
//! untouched.
//!
//! # Example
//!
//! ```rust
//! use alopex_metricstore::{Point, VarBitTimeSeries};
//!
//! let mut series = VarBitTimeSeries::new();
//! series.append(100, 1.0);
//! series.append(200, 1.0);
//! series.append(305, 2.0);
//!
//! assert_eq!(
//!     series.points(),
//!     vec![Point::new(100, 1.0), Point::new(200, 1.0), Point::new(305, 2.0)]
//! );
//! ```

mod bits;
pub mod timestamp;
pub mod value;

pub use bits::BitBuffer;
pub use timestamp::{TimestampDecoder, TimestampEncoder};
pub use value::{ValueDecoder, ValueEncoder};

use crate::point::{Point, Timestamp};
use serde::Serialize;
use std::mem::size_of;

/// Size statistics for one encoded stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BufferStats {
    /// Encoded length in bytes (the last byte may be partially used).
    pub byte_len: usize,
    /// Encoded length in bits.
    pub bit_len: usize,
    /// Number of logical elements stored in the stream.
    pub count: usize,
}

impl BufferStats {
    fn of(buf: &BitBuffer, count: usize) -> Self {
        Self {
            byte_len: buf.as_raw_slice().len(),
            bit_len: buf.len(),
            count,
        }
    }
}

/// Size statistics for a whole series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SeriesStats {
    /// Timestamp stream statistics.
    pub timestamps: BufferStats,
    /// Value stream statistics.
    pub values: BufferStats,
}

/// Compressed, append-only sequence of points for a single series.
///
/// Not internally synchronized: `append` takes `&mut self`, and the store
/// places each series behind its own lock.
#[derive(Debug, Clone, Default)]
pub struct VarBitTimeSeries {
    timestamps: BitBuffer,
    values: BitBuffer,
    ts_encoder: TimestampEncoder,
    val_encoder: ValueEncoder,
    count: usize,
}

impl VarBitTimeSeries {
    /// Creates an empty series.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one sample.
    pub fn append(&mut self, timestamp: Timestamp, value: f64) {
        self.ts_encoder.encode(timestamp, &mut self.timestamps);
        self.val_encoder.encode(value, &mut self.values);
        self.count += 1;
    }

    /// Number of appended points.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if nothing has been appended.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Timestamp of the most recently appended point.
    pub fn last_timestamp(&self) -> Option<Timestamp> {
        self.ts_encoder.last()
    }

    /// Value of the most recently appended point.
    pub fn last_value(&self) -> Option<f64> {
        self.val_encoder.last()
    }

    /// Lazily decodes the series in append order.
    pub fn iter(&self) -> PointIter<'_> {
        PointIter {
            timestamps: TimestampDecoder::new(&self.timestamps),
            values: ValueDecoder::new(&self.values),
            remaining: self.count,
        }
    }

    /// Decodes every point in append order.
    pub fn points(&self) -> Vec<Point> {
        self.iter().collect()
    }

    /// Encoded timestamp stream.
    pub fn timestamp_buffer(&self) -> &BitBuffer {
        &self.timestamps
    }

    /// Encoded value stream.
    pub fn value_buffer(&self) -> &BitBuffer {
        &self.values
    }

    /// Returns size statistics for both streams.
    pub fn stats(&self) -> SeriesStats {
        SeriesStats {
            timestamps: BufferStats::of(&self.timestamps, self.count),
            values: BufferStats::of(&self.values, self.count),
        }
    }

    /// Raw size of the points divided by their encoded size.
    pub fn compression_ratio(&self) -> f64 {
        let encoded = self.timestamps.as_raw_slice().len() + self.values.as_raw_slice().len();
        if encoded == 0 {
            return 0.0;
        }
        let raw = self.count * (size_of::<Timestamp>() + size_of::<f64>());
        raw as f64 / encoded as f64
    }
}

impl<'a> IntoIterator for &'a VarBitTimeSeries {
    type Item = Point;
    type IntoIter = PointIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the decoded points of a [`VarBitTimeSeries`].
#[derive(Debug, Clone)]
pub struct PointIter<'a> {
    timestamps: TimestampDecoder<'a>,
    values: ValueDecoder<'a>,
    remaining: usize,
}

impl Iterator for PointIter<'_> {
    type Item = Point;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let timestamp = self.timestamps.decode_next()?;
        let value = self.values.decode_next()?;
        self.remaining -= 1;
        Some(Point { timestamp, value })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_bit_exact(actual: &[Point], expected: &[(i64, f64)]) {
        assert_eq!(actual.len(), expected.len());
        for (point, &(ts, val)) in actual.iter().zip(expected) {
            assert!(
                point.bit_eq(&Point::new(ts, val)),
                "expected ({ts}, {val:?}), got {point:?}"
            );
        }
    }

    #[test]
    fn test_empty_series() {
        let series = VarBitTimeSeries::new();
        assert!(series.is_empty());
        assert!(series.points().is_empty());
        assert_eq!(series.stats(), SeriesStats::default());
        assert_eq!(series.last_timestamp(), None);
        assert_eq!(series.compression_ratio(), 0.0);
    }

    #[test]
    fn test_append_and_read() {
        let mut series = VarBitTimeSeries::new();
        let input = [(100, 1.0), (200, 1.0), (305, 2.0)];
        for &(ts, val) in &input {
            series.append(ts, val);
        }

        assert_eq!(series.len(), 3);
        assert_eq!(series.last_timestamp(), Some(305));
        assert_eq!(series.last_value(), Some(2.0));
        assert_bit_exact(&series.points(), &input);
    }

    #[test]
    fn test_read_is_non_destructive() {
        let mut series = VarBitTimeSeries::new();
        series.append(1, 1.5);
        series.append(2, 2.5);

        let first = series.points();
        let second = series.points();
        assert_eq!(first, second);

        series.append(3, 3.5);
        let third: Vec<Point> = series.iter().collect();
        assert_eq!(&third[..2], &first[..]);
        assert_eq!(third[2], Point::new(3, 3.5));
    }

    #[test]
    fn test_irregular_input() {
        let input = [
            (1000, 1.0),
            (900, f64::NAN),
            (900, f64::NAN),
            (i64::MAX, -0.0),
            (i64::MIN, 0.0),
            (0, f64::INFINITY),
            (5, f64::from_bits(0x7ff4_0000_0000_0001)),
        ];
        let mut series = VarBitTimeSeries::new();
        for &(ts, val) in &input {
            series.append(ts, val);
        }
        assert_bit_exact(&series.points(), &input);
    }

    #[test]
    fn test_stats() {
        let mut series = VarBitTimeSeries::new();
        for i in 0..10 {
            series.append(1_000 + i * 10, 42.0);
        }
        let stats = series.stats();

        // 64 + 9 + 8 bits of timestamps, 64 + 9 bits of values.
        assert_eq!(stats.timestamps.bit_len, 81);
        assert_eq!(stats.timestamps.byte_len, 11);
        assert_eq!(stats.timestamps.count, 10);
        assert_eq!(stats.values.bit_len, 73);
        assert_eq!(stats.values.byte_len, 10);
        assert_eq!(stats.values.count, 10);
    }

    #[test]
    fn test_compression_ratio_regular_series() {
        let mut series = VarBitTimeSeries::new();
        for i in 0..1000 {
            series.append(1_000_000_000 + i * 15_000, 50.0 + (i % 4) as f64);
        }
        assert!(series.compression_ratio() > 4.0);
    }

    #[test]
    fn test_into_iterator() {
        let mut series = VarBitTimeSeries::new();
        series.append(10, 0.5);
        let mut seen = 0;
        for point in &series {
            assert_eq!(point, Point::new(10, 0.5));
            seen += 1;
        }
        assert_eq!(seen, 1);
    }
}

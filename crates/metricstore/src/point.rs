//! Sample types shared by the encoder and the store.

/// Numeric identifier of one series within a chunk.
pub type SeriesId = u64;

/// Caller-supplied sample timestamp.
pub type Timestamp = i64;

/// A single decoded `(timestamp, value)` sample.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Sample timestamp.
    pub timestamp: Timestamp,
    /// Sample value.
    pub value: f64,
}

impl Point {
    /// Creates a new point.
    pub fn new(timestamp: Timestamp, value: f64) -> Self {
        Self { timestamp, value }
    }

    /// Returns true if both points carry the same timestamp and the same
    /// IEEE 754 bit pattern for the value.
    ///
    /// Unlike `==`, this treats two NaNs with the same payload as equal and
    /// distinguishes `0.0` from `-0.0`.
    pub fn bit_eq(&self, other: &Point) -> bool {
        self.timestamp == other.timestamp && self.value.to_bits() == other.value.to_bits()
    }
}

impl From<(Timestamp, f64)> for Point {
    fn from((timestamp, value): (Timestamp, f64)) -> Self {
        Self::new(timestamp, value)
    }
}

//! Delta-of-delta timestamp codec.
//!
//! - First value: 64 bits raw
//! - Subsequent values use variable-length encoding based on delta-of-delta:
//!   - `0`: `'0'` (1 bit)
//!   - `[-63, 64]`: `'10'` + 7 bits
//!   - `[-255, 256]`: `'110'` + 9 bits
//!   - `[-2047, 2048]`: `'1110'` + 12 bits
//!   - else: `'1111'` + 64 bits
//!
//! Deltas use wrapping arithmetic, so any `i64` sequence round-trips,
//! including non-monotonic and extreme timestamps.

use super::bits::{write_bit, write_bits, BitBuffer, BitReader};
use crate::point::Timestamp;

/// A delta-of-delta bucket: `(min, max, payload bits)`.
struct Bucket {
    min: i64,
    max: i64,
    width: u32,
}

/// Bounded buckets in header order; the fallback after them is 64 raw bits.
const BUCKETS: [Bucket; 3] = [
    Bucket {
        min: -63,
        max: 64,
        width: 7,
    },
    Bucket {
        min: -255,
        max: 256,
        width: 9,
    },
    Bucket {
        min: -2047,
        max: 2048,
        width: 12,
    },
];

/// Number of `1` header bits selecting the full-width fallback.
const FALLBACK_HEADER: u32 = BUCKETS.len() as u32 + 1;

/// Encoder for timestamps using delta-of-delta encoding.
#[derive(Debug, Clone, Default)]
pub struct TimestampEncoder {
    started: bool,
    prev_ts: Timestamp,
    prev_delta: i64,
}

impl TimestampEncoder {
    /// Creates a new timestamp encoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the last encoded timestamp, if any.
    pub fn last(&self) -> Option<Timestamp> {
        self.started.then_some(self.prev_ts)
    }

    /// Encodes a timestamp into the output buffer.
    pub fn encode(&mut self, timestamp: Timestamp, output: &mut BitBuffer) {
        if !self.started {
            self.started = true;
            self.prev_ts = timestamp;
            self.prev_delta = 0;
            write_bits(output, timestamp as u64, 64);
            return;
        }

        let delta = timestamp.wrapping_sub(self.prev_ts);
        let dod = delta.wrapping_sub(self.prev_delta);

        if dod == 0 {
            write_bit(output, false);
        } else {
            match BUCKETS
                .iter()
                .position(|b| (b.min..=b.max).contains(&dod))
            {
                Some(idx) => {
                    let bucket = &BUCKETS[idx];
                    write_header(output, idx as u32 + 1);
                    write_bits(output, (dod - bucket.min) as u64, bucket.width);
                }
                None => {
                    write_header(output, FALLBACK_HEADER);
                    write_bits(output, dod as u64, 64);
                }
            }
        }

        self.prev_delta = delta;
        self.prev_ts = timestamp;
    }
}

/// Writes `ones` set bits followed by a terminating `0`, except for the
/// fallback header which has no terminator.
fn write_header(output: &mut BitBuffer, ones: u32) {
    for _ in 0..ones {
        write_bit(output, true);
    }
    if ones < FALLBACK_HEADER {
        write_bit(output, false);
    }
}

/// Decoder for delta-of-delta encoded timestamps.
#[derive(Debug, Clone)]
pub struct TimestampDecoder<'a> {
    reader: BitReader<'a>,
    started: bool,
    prev_ts: Timestamp,
    prev_delta: i64,
}

impl<'a> TimestampDecoder<'a> {
    /// Creates a decoder positioned at the start of `data`.
    pub fn new(data: &'a BitBuffer) -> Self {
        Self {
            reader: BitReader::new(data),
            started: false,
            prev_ts: 0,
            prev_delta: 0,
        }
    }

    /// Decodes the next timestamp, or `None` when the stream is exhausted.
    pub fn decode_next(&mut self) -> Option<Timestamp> {
        if !self.started {
            let ts = self.reader.read_bits(64)? as i64;
            self.started = true;
            self.prev_ts = ts;
            self.prev_delta = 0;
            return Some(ts);
        }

        let header = self.reader.read_unary(FALLBACK_HEADER)?;
        let dod = match header {
            0 => 0,
            FALLBACK_HEADER => self.reader.read_bits(64)? as i64,
            n => {
                let bucket = &BUCKETS[n as usize - 1];
                self.reader.read_bits(bucket.width)? as i64 + bucket.min
            }
        };

        let delta = self.prev_delta.wrapping_add(dod);
        let ts = self.prev_ts.wrapping_add(delta);
        self.prev_delta = delta;
        self.prev_ts = ts;

        Some(ts)
    }
}

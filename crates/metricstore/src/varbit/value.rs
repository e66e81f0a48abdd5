//! XOR-based float value codec.
//!
//! - First value: 64 bits raw (IEEE 754)
//! - Subsequent values, with `xor = bits ^ prev_bits`:
//!   - XOR = 0: `'0'` (1 bit)
//!   - Fits the previous window: `'10'` + the window's meaningful bits
//!   - New window: `'11'` + 5 bits leading + 6 bits length + meaningful bits
//!
//! Values are compared by bit pattern only, so NaN payloads and signed
//! zeros survive a round trip unchanged.

use super::bits::{write_bit, write_bits, BitBuffer, BitReader};

/// Largest leading-zero count representable in the 5-bit header field.
const MAX_LEADING: u32 = 31;

/// The run of meaningful bits inside a non-zero XOR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Window {
    leading: u32,
    trailing: u32,
}

impl Window {
    fn meaningful(&self) -> u32 {
        64 - self.leading - self.trailing
    }

    fn contains(&self, leading: u32, trailing: u32) -> bool {
        leading >= self.leading && trailing >= self.trailing
    }
}

/// Encoder for float values using XOR compression.
#[derive(Debug, Clone, Default)]
pub struct ValueEncoder {
    started: bool,
    prev_bits: u64,
    window: Option<Window>,
}

impl ValueEncoder {
    /// Creates a new value encoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the last encoded value, if any.
    pub fn last(&self) -> Option<f64> {
        self.started.then(|| f64::from_bits(self.prev_bits))
    }

    /// Encodes a float value into the output buffer.
    pub fn encode(&mut self, value: f64, output: &mut BitBuffer) {
        let bits = value.to_bits();

        if !self.started {
            self.started = true;
            self.prev_bits = bits;
            write_bits(output, bits, 64);
            return;
        }

        let xor = bits ^ self.prev_bits;
        self.prev_bits = bits;

        if xor == 0 {
            write_bit(output, false);
            return;
        }

        let leading = xor.leading_zeros().min(MAX_LEADING);
        let trailing = xor.trailing_zeros();

        match self.window {
            Some(window) if window.contains(leading, trailing) => {
                write_bit(output, true);
                write_bit(output, false);
                write_bits(output, xor >> window.trailing, window.meaningful());
            }
            _ => {
                let window = Window { leading, trailing };
                let meaningful = window.meaningful();
                write_bit(output, true);
                write_bit(output, true);
                write_bits(output, u64::from(leading), 5);
                write_bits(output, u64::from(meaningful - 1), 6);
                write_bits(output, xor >> trailing, meaningful);
                self.window = Some(window);
            }
        }
    }
}

/// Decoder for XOR-encoded float values.
#[derive(Debug, Clone)]
pub struct ValueDecoder<'a> {
    reader: BitReader<'a>,
    started: bool,
    prev_bits: u64,
    window: Option<Window>,
}

impl<'a> ValueDecoder<'a> {
    /// Creates a decoder positioned at the start of `data`.
    pub fn new(data: &'a BitBuffer) -> Self {
        Self {
            reader: BitReader::new(data),
            started: false,
            prev_bits: 0,
            window: None,
        }
    }

    /// Decodes the next value, or `None` when the stream is exhausted.
    pub fn decode_next(&mut self) -> Option<f64> {
        if !self.started {
            let bits = self.reader.read_bits(64)?;
            self.started = true;
            self.prev_bits = bits;
            return Some(f64::from_bits(bits));
        }

        let xor = if !self.reader.read_bit()? {
            0
        } else if !self.reader.read_bit()? {
            // A reused window always follows a '11' record.
            let window = self.window?;
            self.reader.read_bits(window.meaningful())? << window.trailing
        } else {
            let leading = self.reader.read_bits(5)? as u32;
            let meaningful = self.reader.read_bits(6)? as u32 + 1;
            let trailing = 64u32.checked_sub(leading + meaningful)?;
            self.window = Some(Window { leading, trailing });
            self.reader.read_bits(meaningful)? << trailing
        };

        let bits = self.prev_bits ^ xor;
        self.prev_bits = bits;

        Some(f64::from_bits(bits))
    }
}

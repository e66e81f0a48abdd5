//! Append-only bit cursor shared by the timestamp and value codecs.
//!
//! Fields are always written most-significant bit first, so the byte
//! layout of a buffer depends only on the sequence of writes.

use bitvec::prelude::*;

/// Growable, MSB-first bit buffer backing one encoded stream.
pub type BitBuffer = BitVec<u8, Msb0>;

/// Appends the low `width` bits of `value`, most significant first.
pub(crate) fn write_bits(out: &mut BitBuffer, value: u64, width: u32) {
    debug_assert!(width <= 64);
    for i in (0..width).rev() {
        out.push((value >> i) & 1 == 1);
    }
}

/// Appends a single control bit.
pub(crate) fn write_bit(out: &mut BitBuffer, bit: bool) {
    out.push(bit);
}

/// Forward-only reader over an encoded stream.
///
/// Every read returns `None` once the stream is exhausted instead of
/// panicking.
#[derive(Debug, Clone)]
pub(crate) struct BitReader<'a> {
    data: &'a BitSlice<u8, Msb0>,
    pos: usize,
}

impl<'a> BitReader<'a> {
    pub(crate) fn new(data: &'a BitSlice<u8, Msb0>) -> Self {
        Self { data, pos: 0 }
    }

    pub(crate) fn read_bit(&mut self) -> Option<bool> {
        let bit = *self.data.get(self.pos)?;
        self.pos += 1;
        Some(bit)
    }

    /// Reads `width` bits as an unsigned integer, most significant first.
    pub(crate) fn read_bits(&mut self, width: u32) -> Option<u64> {
        debug_assert!(width <= 64);
        let end = self.pos.checked_add(width as usize)?;
        let bits = self.data.get(self.pos..end)?;
        self.pos = end;
        Some(
            bits.iter()
                .by_vals()
                .fold(0u64, |acc, bit| (acc << 1) | u64::from(bit)),
        )
    }

    /// Counts consecutive `1` bits, consuming them and the terminating `0`.
    ///
    /// Stops early after `max` ones without consuming a terminator.
    pub(crate) fn read_unary(&mut self, max: u32) -> Option<u32> {
        let mut ones = 0;
        while ones < max {
            if !self.read_bit()? {
                break;
            }
            ones += 1;
        }
        Some(ones)
    }

    #[cfg(test)]
    pub(crate) fn position(&self) -> usize {
        self.pos
    }
}

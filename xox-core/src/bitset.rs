//! Fixed-length bit vector with byte-packed storage.
//!
//! Bit `i` is stored in byte `i / 8` at bit position `i % 8`, so the first
//! bit of the set is the least significant bit of the first byte.

use std::fmt;
use std::str::FromStr;

use crate::error::{GameError, Result};

/// Fixed-length bit vector. One of these backs each player's half of a
/// [`Board`](crate::Board).
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct BitSet {
    bits: Vec<u8>,
    size: usize,
}

impl BitSet {
    /// Create a bit set of `size` bits, all cleared.
    pub fn new(size: usize) -> Result<BitSet> {
        if size == 0 {
            return Err(GameError::InvalidArgument(
                "bit set size cannot be 0".to_string(),
            ));
        }
        Ok(BitSet {
            bits: vec![0; Self::byte_count(size)],
            size,
        })
    }

    /// Create a bit set from raw packed bytes. `bytes` must hold exactly
    /// `ceil(size / 8)` bytes.
    pub fn from_bytes(size: usize, bytes: &[u8]) -> Result<BitSet> {
        let mut bitset = BitSet::new(size)?;
        if bytes.len() != bitset.bits.len() {
            return Err(GameError::InvalidArgument(format!(
                "{} bits need {} bytes, got {}",
                size,
                bitset.bits.len(),
                bytes.len()
            )));
        }
        let tail = size % 8;
        if tail != 0 && bytes[bytes.len() - 1] >> tail != 0 {
            return Err(GameError::InvalidArgument(format!(
                "padding bits past bit {} must be zero",
                size - 1
            )));
        }
        bitset.bits.copy_from_slice(bytes);
        Ok(bitset)
    }

    #[inline]
    fn byte_count(size: usize) -> usize {
        size.div_ceil(8)
    }

    #[inline]
    fn check(&self, index: usize) -> Result<()> {
        if index >= self.size {
            return Err(GameError::IndexOutOfRange {
                index,
                len: self.size,
            });
        }
        Ok(())
    }

    /// Number of bits.
    #[inline]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Always false; a bit set holds at least one bit.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Packed storage, `ceil(len / 8)` bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    #[inline]
    pub fn get(&self, index: usize) -> Result<bool> {
        self.check(index)?;
        Ok(self.bits[index / 8] & (1 << (index % 8)) != 0)
    }

    #[inline]
    pub fn set(&mut self, index: usize) -> Result<()> {
        self.check(index)?;
        self.bits[index / 8] |= 1 << (index % 8);
        Ok(())
    }

    #[inline]
    pub fn clear(&mut self, index: usize) -> Result<()> {
        self.check(index)?;
        self.bits[index / 8] &= !(1 << (index % 8));
        Ok(())
    }

    /// Invert a single bit.
    #[inline]
    pub fn flip(&mut self, index: usize) -> Result<()> {
        self.check(index)?;
        self.bits[index / 8] ^= 1 << (index % 8);
        Ok(())
    }

    /// Number of set bits. Padding bits of the last byte are never set.
    pub fn count_ones(&self) -> usize {
        self.bits.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Text form: one `'1'` or `'0'` per bit in ascending index order.
    pub fn to_text(&self) -> String {
        (0..self.size)
            .map(|i| {
                if self.bits[i / 8] & (1 << (i % 8)) != 0 {
                    '1'
                } else {
                    '0'
                }
            })
            .collect()
    }

    /// Load bits from text form.
    ///
    /// Character `i` sets bit `i` when it is `'1'` and clears it otherwise.
    /// Bits past the end of `repr` keep their current value, so a shorter
    /// string only overwrites a prefix. Text longer than the set is rejected
    /// before any bit changes.
    pub fn load_text(&mut self, repr: &str) -> Result<()> {
        let len = repr.chars().count();
        if len > self.size {
            return Err(GameError::IndexOutOfRange {
                index: self.size,
                len: self.size,
            });
        }
        for (i, c) in repr.chars().enumerate() {
            if c == '1' {
                self.bits[i / 8] |= 1 << (i % 8);
            } else {
                self.bits[i / 8] &= !(1 << (i % 8));
            }
        }
        Ok(())
    }
}

impl fmt::Display for BitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// Builds a bit set sized to the string.
impl FromStr for BitSet {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        let mut bitset = BitSet::new(s.chars().count())?;
        bitset.load_text(s)?;
        Ok(bitset)
    }
}

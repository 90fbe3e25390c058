//! Rolling hash used to pick content-defined chunk boundaries
//!
//! A cyclic polynomial (Buzhash) over a sliding window: each byte value maps
//! to a pseudo-random 32-bit weight, the running hash is rotated left by one
//! bit per step, and the byte leaving the window is cancelled by XOR-ing its
//! weight rotated by the window width.

use std::fmt;
use std::sync::Arc;

/// Seed of the weight table generator.
///
/// Changing it changes every chunk boundary, so two sides that need to agree
/// on boundaries must use the same value.
pub const WEIGHT_SEED: u64 = 0x0123_4567_89AB_CDEF;

/// Trait for rolling hash implementations
pub trait RollingHash {
    /// Prime the hash as if the window ending right before `pos` had been
    /// rolled in one byte at a time from a zero state
    fn initialize(&mut self, data: &[u8], pos: usize);

    /// Roll the window: remove `old_byte`, add `new_byte`, return the hash
    fn roll(&mut self, old_byte: u8, new_byte: u8) -> u32;

    /// Get the current hash value
    fn digest(&self) -> u32;

    /// Reset the hash state
    fn reset(&mut self);
}

/// Immutable per-byte weights for [`BuzHash`].
///
/// Generated by xorshift64 (shifts 13, 7, 17); entry `k` is the high half of
/// the `k + 1`-th generator state. Built once and shared through an `Arc`.
#[derive(Clone, PartialEq, Eq)]
pub struct WeightTable([u32; 256]);

impl WeightTable {
    /// Table generated from [`WEIGHT_SEED`]
    pub fn new() -> Self {
        Self::from_seed(WEIGHT_SEED)
    }

    /// Table generated from a custom seed. A zero seed would make xorshift
    /// emit zeros forever, so it falls back to [`WEIGHT_SEED`].
    pub fn from_seed(seed: u64) -> Self {
        let mut state = if seed == 0 { WEIGHT_SEED } else { seed };
        let mut weights = [0u32; 256];
        for weight in weights.iter_mut() {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            *weight = (state >> 32) as u32;
        }
        Self(weights)
    }

    #[inline]
    pub fn weight(&self, byte: u8) -> u32 {
        self.0[byte as usize]
    }

    pub fn as_array(&self) -> &[u32; 256] {
        &self.0
    }
}

impl Default for WeightTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for WeightTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "WeightTable([{:#010x}, {:#010x}, .., {:#010x}])",
            self.0[0], self.0[1], self.0[255]
        )
    }
}

/// Buzhash over a fixed window with a 32-bit accumulator
#[derive(Debug, Clone)]
pub struct BuzHash {
    table: Arc<WeightTable>,
    window_size: usize,
    /// Rotation that cancels a byte which entered `window_size` rolls ago
    rotation: u32,
    hash: u32,
}

impl BuzHash {
    pub fn new(table: Arc<WeightTable>, window_size: usize) -> Self {
        Self {
            table,
            window_size,
            rotation: (window_size % 32) as u32,
            hash: 0,
        }
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Hash of `window` computed from scratch (for verification)
    pub fn checksum(table: &WeightTable, window: &[u8]) -> u32 {
        window
            .iter()
            .fold(0u32, |hash, &byte| hash.rotate_left(1) ^ table.weight(byte))
    }
}

impl RollingHash for BuzHash {
    fn initialize(&mut self, data: &[u8], pos: usize) {
        let start = pos.saturating_sub(self.window_size);
        self.hash = Self::checksum(&self.table, &data[start..pos]);
    }

    #[inline]
    fn roll(&mut self, old_byte: u8, new_byte: u8) -> u32 {
        self.hash = self.hash.rotate_left(1)
            ^ self.table.weight(old_byte).rotate_left(self.rotation)
            ^ self.table.weight(new_byte);
        self.hash
    }

    fn digest(&self) -> u32 {
        self.hash
    }

    fn reset(&mut self) {
        self.hash = 0;
    }
}

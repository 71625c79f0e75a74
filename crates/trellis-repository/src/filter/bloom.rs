//! In-process bloom filter.

use super::NameFilter;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use tracing::debug;
use trellis_core::TrellisResult;

/// Bloom filter over usernames held in process memory.
///
/// Sized from the expected number of names `n` and the target
/// false-positive rate `p`: `m = -n ln p / (ln 2)^2` bits and
/// `k = m / n * ln 2` hash functions. Bit positions use double hashing,
/// `h1 + i * h2 mod m`.
pub struct BloomNameFilter {
    bits: RwLock<Vec<u64>>,
    num_bits: u64,
    num_hashes: u32,
}

impl BloomNameFilter {
    /// Creates an empty filter sized for `capacity` names at the given
    /// false-positive rate.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn new(capacity: usize, false_positive_rate: f64) -> Self {
        let n = capacity.max(1) as f64;
        let p = false_positive_rate.clamp(f64::MIN_POSITIVE, 0.5);
        let ln2 = std::f64::consts::LN_2;

        let num_bits = ((-n * p.ln()) / (ln2 * ln2)).ceil().max(64.0) as u64;
        let num_hashes = ((num_bits as f64 / n) * ln2).round().max(1.0) as u32;
        let words = num_bits.div_ceil(64) as usize;

        debug!(
            capacity,
            false_positive_rate, num_bits, num_hashes, "Created in-memory name filter"
        );

        Self {
            bits: RwLock::new(vec![0; words]),
            num_bits,
            num_hashes,
        }
    }

    /// Number of bits in the filter.
    #[must_use]
    pub const fn num_bits(&self) -> u64 {
        self.num_bits
    }

    /// Number of hash functions per name.
    #[must_use]
    pub const fn num_hashes(&self) -> u32 {
        self.num_hashes
    }

    fn positions(&self, name: &str) -> impl Iterator<Item = u64> {
        let mut first = DefaultHasher::new();
        name.hash(&mut first);
        let h1 = first.finish();

        let mut second = DefaultHasher::new();
        0x9e37_79b9_7f4a_7c15_u64.hash(&mut second);
        name.hash(&mut second);
        // Odd step so successive probes never collapse onto one bit.
        let h2 = second.finish() | 1;

        let num_bits = self.num_bits;
        (0..u64::from(self.num_hashes)).map(move |i| h1.wrapping_add(i.wrapping_mul(h2)) % num_bits)
    }

    fn insert(&self, name: &str) {
        let mut bits = self.bits.write();
        for pos in self.positions(name) {
            bits[word_index(pos)] |= 1 << (pos % 64);
        }
    }

    fn contains(&self, name: &str) -> bool {
        let bits = self.bits.read();
        self.positions(name)
            .all(|pos| bits[word_index(pos)] & (1 << (pos % 64)) != 0)
    }
}

#[allow(clippy::cast_possible_truncation)]
const fn word_index(pos: u64) -> usize {
    (pos / 64) as usize
}

#[async_trait]
impl NameFilter for BloomNameFilter {
    async fn add(&self, name: &str) -> TrellisResult<()> {
        self.insert(name);
        Ok(())
    }

    async fn might_contain(&self, name: &str) -> TrellisResult<bool> {
        Ok(self.contains(name))
    }
}

impl std::fmt::Debug for BloomNameFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BloomNameFilter")
            .field("num_bits", &self.num_bits)
            .field("num_hashes", &self.num_hashes)
            .finish_non_exhaustive()
    }
}

// Double-hashed membership filter over key code sequences
//
// The bloom region is a flat bit array. A hash selects byte
// `(hash >> 3) & mask` and bit `hash & 7` within it. A prefix "may be
// present" only when the bits of both hashes are set.

use crate::DictError;

const H1_SEED: u32 = 0;
const H1_MULTIPLIER: u32 = 33;
const H2_SEED: u32 = 0xdead_beef;
const H2_MULTIPLIER: u32 = 73;

/// First prefix hash: `h = h * 33 + code`, seeded with 0.
pub fn hash1(codes: &[u8]) -> u32 {
    codes.iter().fold(H1_SEED, |h, &code| {
        h.wrapping_mul(H1_MULTIPLIER).wrapping_add(u32::from(code))
    })
}

/// Second prefix hash: `h = (h * 73) ^ code`, seeded with `0xdeadbeef`.
pub fn hash2(codes: &[u8]) -> u32 {
    codes.iter().fold(H2_SEED, |h, &code| {
        h.wrapping_mul(H2_MULTIPLIER) ^ u32::from(code)
    })
}

#[inline]
fn locate(hash: u32, mask: usize) -> (usize, u8) {
    ((hash >> 3) as usize & mask, 1 << (hash & 7))
}

fn check_size(size: usize) -> Result<usize, DictError> {
    if size.is_power_of_two() {
        Ok(size - 1)
    } else {
        Err(DictError::InvalidBloomSize(size))
    }
}

/// Read-only view of a bloom bit array.
#[derive(Debug, Clone, Copy)]
pub struct BloomFilter<'a> {
    bits: &'a [u8],
    mask: usize,
}

impl<'a> BloomFilter<'a> {
    /// Wrap a bit array. Its length must be a non-zero power of two.
    pub fn new(bits: &'a [u8]) -> Result<Self, DictError> {
        let mask = check_size(bits.len())?;
        Ok(Self { bits, mask })
    }

    /// Wrap a region whose size the header parser has already checked.
    pub(crate) fn from_validated(bits: &'a [u8]) -> Self {
        debug_assert!(bits.len().is_power_of_two());
        Self {
            bits,
            mask: bits.len().wrapping_sub(1),
        }
    }

    /// Whether the bit selected by `hash` is set.
    #[inline]
    pub fn test(&self, hash: u32) -> bool {
        let (offset, bit) = locate(hash, self.mask);
        self.bits[offset] & bit != 0
    }

    /// Whether the key code sequence may be an indexed prefix.
    ///
    /// `false` is definite; `true` may be a false positive.
    pub fn may_contain(&self, codes: &[u8]) -> bool {
        self.test(hash1(codes)) && self.test(hash2(codes))
    }

    /// Filter size in bytes.
    pub fn size(&self) -> usize {
        self.bits.len()
    }

    /// Fraction of bits set, for diagnostics.
    pub fn fill_ratio(&self) -> f64 {
        let set: u64 = self.bits.iter().map(|b| u64::from(b.count_ones())).sum();
        set as f64 / (self.bits.len() as f64 * 8.0)
    }
}

/// Mutable bloom bit array, used when compiling a dictionary.
#[derive(Debug, Clone)]
pub struct BloomFilterBuilder {
    bits: Vec<u8>,
    mask: usize,
}

impl BloomFilterBuilder {
    /// Allocate a cleared filter of `size` bytes (non-zero power of two).
    pub fn new(size: usize) -> Result<Self, DictError> {
        let mask = check_size(size)?;
        Ok(Self {
            bits: vec![0; size],
            mask,
        })
    }

    /// Set the bit selected by `hash`.
    pub fn set(&mut self, hash: u32) {
        let (offset, bit) = locate(hash, self.mask);
        self.bits[offset] |= bit;
    }

    /// Record a key code sequence under both hashes.
    pub fn insert(&mut self, codes: &[u8]) {
        self.set(hash1(codes));
        self.set(hash2(codes));
    }

    pub fn as_filter(&self) -> BloomFilter<'_> {
        BloomFilter {
            bits: &self.bits,
            mask: self.mask,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bits
    }
}

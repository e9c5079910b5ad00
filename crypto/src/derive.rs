//! Address derivation.
//!
//! An address is the Blake2b-256 digest of the length-prefixed seeds, followed by
//! the namespace and a fixed marker. Prefixing every seed with its length makes the
//! encoding injective: `["ab", "c"]` and `["a", "bc"]` hash different preimages.
//!
//! Numeric seeds must go through [`u64_seed`]. Decimal strings of variable length
//! are not injective once concatenated without a separator (poll 12 / candidate 3
//! and poll 1 / candidate 23 both read "123"); [`decimal_seed`] exists only so
//! that failure mode stays covered by tests.

use civic_types::{Address, Namespace};

use crate::hash::blake2b_256_multi;
use crate::DeriveError;

/// Maximum number of seeds per derivation.
pub const MAX_SEEDS: usize = 16;

/// Maximum length of a single seed in bytes.
pub const MAX_SEED_LEN: usize = 32;

const ADDRESS_MARKER: &[u8] = b"civic-derived-address";

/// Derive the address for `seeds` under `namespace`.
///
/// Pure and deterministic. Fails only when the seed list is malformed.
pub fn derive_address(seeds: &[&[u8]], namespace: &Namespace) -> Result<Address, DeriveError> {
    if seeds.len() > MAX_SEEDS {
        return Err(DeriveError::TooManySeeds {
            count: seeds.len(),
            max: MAX_SEEDS,
        });
    }
    if let Some((index, seed)) = seeds
        .iter()
        .enumerate()
        .find(|(_, seed)| seed.len() > MAX_SEED_LEN)
    {
        return Err(DeriveError::SeedTooLong {
            index,
            len: seed.len(),
            max: MAX_SEED_LEN,
        });
    }

    // every seed length fits in a byte after the check above
    let lengths: Vec<[u8; 1]> = seeds.iter().map(|s| [s.len() as u8]).collect();
    let mut parts: Vec<&[u8]> = Vec::with_capacity(seeds.len() * 2 + 2);
    for (len, seed) in lengths.iter().zip(seeds) {
        parts.push(len);
        parts.push(seed);
    }
    parts.push(namespace.as_bytes());
    parts.push(ADDRESS_MARKER);

    Ok(Address::new(blake2b_256_multi(&parts)))
}

/// Fixed-width little-endian encoding of a numeric seed.
pub fn u64_seed(value: u64) -> [u8; 8] {
    value.to_le_bytes()
}

/// Variable-length decimal encoding of a numeric seed.
///
/// Not used by any derivation path.
pub fn decimal_seed(value: u64) -> Vec<u8> {
    value.to_string().into_bytes()
}

//! Cryptographic primitives for the civic record ledger.
//!
//! - **Blake2b** for hashing (address derivation, commit references)
//! - **Ed25519** to turn deterministic seeds into caller identities
//! - Address derivation from a namespace and an ordered seed list

pub mod derive;
pub mod error;
pub mod hash;
pub mod keys;

pub use derive::{decimal_seed, derive_address, u64_seed, MAX_SEEDS, MAX_SEED_LEN};
pub use error::DeriveError;
pub use hash::{blake2b_256, blake2b_256_multi};
pub use keys::identity_from_seed;

//! Deterministic caller identities.
//!
//! Key management belongs to the signing layer; the ledger only needs a way to
//! turn a fixed seed into the identity that signer would present.

use civic_types::Identity;
use ed25519_dalek::SigningKey;

/// Derive the Ed25519 public key for a 32-byte seed and return it as an identity.
pub fn identity_from_seed(seed: &[u8; 32]) -> Identity {
    let signing_key = SigningKey::from_bytes(seed);
    Identity::new(signing_key.verifying_key().to_bytes())
}

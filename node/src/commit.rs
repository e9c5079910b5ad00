//! Opaque references to committed operations.

use std::fmt;

use civic_crypto::blake2b_256_multi;
use civic_types::{Address, Identity};

use crate::{Instruction, NodeError};

/// Encode `instruction` for [`CommitRef::compute`].
///
/// Done before the instruction runs, so reference computation cannot fail after
/// the store has committed.
pub fn encode_instruction(instruction: &Instruction) -> Result<Vec<u8>, NodeError> {
    bincode::serialize(instruction).map_err(|e| NodeError::Encoding(e.to_string()))
}

/// Returned for every committed operation and never for a rejected one.
///
/// Blake2b-256 over the node's commit sequence number, the caller, the target
/// address and the encoded instruction, so two commits never share a reference.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommitRef([u8; 32]);

impl CommitRef {
    pub fn compute(sequence: u64, caller: &Identity, address: &Address, encoded: &[u8]) -> Self {
        Self(blake2b_256_multi(&[
            &sequence.to_le_bytes()[..],
            &caller.as_bytes()[..],
            &address.as_bytes()[..],
            encoded,
        ]))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for CommitRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for CommitRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CommitRef({})", hex::encode(&self.0[..4]))
    }
}

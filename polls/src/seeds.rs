//! Seed layouts for poll subsystem addresses.
//!
//! Numeric ids are encoded fixed-width so `(12, 3)` and `(1, 23)` never share
//! an address.

use civic_crypto::{derive_address, u64_seed, DeriveError};
use civic_types::{Address, CandidateId, Identity, Namespace, PollId};

pub const POLL_TAG: &[u8] = b"poll";
pub const CANDIDATE_TAG: &[u8] = b"candidate";
pub const VOTE_TAG: &[u8] = b"vote";

pub fn poll_address(namespace: &Namespace, poll_id: PollId) -> Result<Address, DeriveError> {
    derive_address(&[POLL_TAG, &u64_seed(poll_id)], namespace)
}

pub fn candidate_address(
    namespace: &Namespace,
    poll_id: PollId,
    candidate_id: CandidateId,
) -> Result<Address, DeriveError> {
    derive_address(
        &[CANDIDATE_TAG, &u64_seed(poll_id), &u64_seed(candidate_id)],
        namespace,
    )
}

pub fn vote_address(
    namespace: &Namespace,
    poll_id: PollId,
    voter: &Identity,
) -> Result<Address, DeriveError> {
    derive_address(&[VOTE_TAG, &u64_seed(poll_id), voter.as_bytes()], namespace)
}

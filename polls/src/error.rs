use civic_crypto::DeriveError;
use civic_store::StoreError;
use civic_types::{CandidateId, Identity, PollId, Timestamp};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollError {
    #[error("poll {0} already exists")]
    PollAlreadyExists(PollId),

    #[error("candidate {candidate_id} already exists in poll {poll_id}")]
    CandidateAlreadyExists {
        poll_id: PollId,
        candidate_id: CandidateId,
    },

    #[error("{voter} has already voted in poll {poll_id}")]
    AlreadyVoted { poll_id: PollId, voter: Identity },

    #[error("poll {0} not found")]
    PollNotFound(PollId),

    #[error("candidate {candidate_id} not found in poll {poll_id}")]
    CandidateNotFound {
        poll_id: PollId,
        candidate_id: CandidateId,
    },

    #[error("only the creator of poll {poll_id} may finish it, not {caller}")]
    NotCreator { poll_id: PollId, caller: Identity },

    #[error("poll {poll_id} opens at {start}")]
    PollNotStarted { poll_id: PollId, start: Timestamp },

    #[error("poll {poll_id} closed at {end}")]
    PollEnded { poll_id: PollId, end: Timestamp },

    #[error("poll {0} is finished")]
    PollFinished(PollId),

    #[error("{field} is {len} bytes, limit is {max}")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("poll window starts at {start} after it ends at {end}")]
    InvalidWindow { start: Timestamp, end: Timestamp },

    #[error("{0} counter overflow")]
    Overflow(&'static str),

    #[error("address derivation failed: {0}")]
    Derive(#[from] DeriveError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

//! The three record types of the poll subsystem.
//!
//! Field names and integer widths are part of the persisted layout that external
//! indexers read; do not rename them.

use civic_store::{Record, RecordKind};
use civic_types::{CandidateId, Identity, PollId, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poll {
    pub poll_id: PollId,
    pub poll_name: String,
    pub poll_description: String,
    pub poll_start_time: Timestamp,
    pub poll_end_time: Timestamp,
    pub poll_is_finished: bool,
    pub total_votes: u64,
    /// Identity that created the poll; the only one allowed to finish it.
    pub authority: Identity,
}

impl Record for Poll {
    const KIND: RecordKind = RecordKind::Poll;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub poll_id: PollId,
    pub candidate_id: CandidateId,
    pub candidate_name: String,
    pub candidate_description: String,
    pub votes: u64,
}

impl Record for Candidate {
    const KIND: RecordKind = RecordKind::Candidate;
}

/// Proof that `voter` voted in `poll_id`. Immutable once written.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub poll_id: PollId,
    pub candidate_id: CandidateId,
    pub voter: Identity,
}

impl Record for VoteRecord {
    const KIND: RecordKind = RecordKind::VoteRecord;
}

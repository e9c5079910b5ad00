//! Identifier aliases and the field-size limits every record enforces.
//!
//! Limits mirror the fixed account space the records were first laid out in,
//! so a record that fits here also fits an external indexer's schema.

/// Poll identifier chosen by the poll's creator.
pub type PollId = u64;

/// Candidate identifier, unique within a poll.
pub type CandidateId = u64;

pub const MAX_POLL_NAME_LEN: usize = 32;
pub const MAX_POLL_DESCRIPTION_LEN: usize = 256;

pub const MAX_CANDIDATE_NAME_LEN: usize = 32;
pub const MAX_CANDIDATE_DESCRIPTION_LEN: usize = 256;

pub const MAX_FAVORITE_NAME_LEN: usize = 32;
pub const MAX_FAVORITE_DESCRIPTION_LEN: usize = 100;

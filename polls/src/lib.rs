//! Polls, candidates and votes.
//!
//! A poll is created once under its creator-chosen id, candidates are registered
//! under `(poll, candidate)` and each vote leaves a `VoteRecord` at an address
//! derived from `(poll, voter)`. Creating that record is what makes a second
//! vote by the same voter impossible; the record and both counters are written
//! in one store transaction, so `total_votes` always equals the number of vote
//! records and the sum of candidate votes.

pub mod engine;
pub mod error;
pub mod policy;
pub mod records;
pub mod seeds;

pub use engine::{PollEngine, Tally};
pub use error::PollError;
pub use policy::PollPolicy;
pub use records::{Candidate, Poll, VoteRecord};

//! Fundamental types for the civic record ledger.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! caller identities, derived record addresses, namespaces, timestamps and input limits.

pub mod address;
pub mod error;
pub mod identity;
pub mod limits;
pub mod time;

mod encoding;

pub use address::{Address, Namespace};
pub use error::ParseError;
pub use identity::Identity;
pub use limits::{CandidateId, PollId};
pub use time::{Clock, SystemClock, Timestamp};

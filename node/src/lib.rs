//! civic program node: the boundary between callers and the record engines.
//!
//! The node:
//! - Decodes boundary instructions (JSON or typed)
//! - Dispatches them to the poll and favorite engines over one shared store
//! - Returns an opaque commit reference for every committed operation
//! - Maps every failure onto a stable error kind
//! - Loads its configuration from TOML and sets up structured logging

pub mod backend;
pub mod commit;
pub mod config;
pub mod error;
pub mod instruction;
pub mod logging;
pub mod program;
pub mod tracing_spans;

pub use backend::Backend;
pub use commit::CommitRef;
pub use config::{BackendKind, NodeConfig};
pub use error::{ErrorKind, NodeError};
pub use instruction::Instruction;
pub use logging::{init_logging, LogFormat};
pub use program::Program;

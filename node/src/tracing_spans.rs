//! Pre-built [`tracing::Span`] constructors for node operations.
//!
//! Consistent span names and field sets make it easy to filter and correlate
//! the engine events emitted inside them.

use civic_types::Identity;
use tracing::{info_span, Span};

/// Span covering the execution of one boundary instruction.
pub fn execute_span(instruction: &str, caller: &Identity) -> Span {
    info_span!("execute", instruction = %instruction, caller = %caller)
}

/// Span covering opening the record store at startup.
pub fn open_store_span(backend: &str) -> Span {
    info_span!("open_store", backend = %backend)
}

//! Source Plumbing for Telemetry Streams
//!
//! This module holds the concrete error type shared by source
//! implementations and the in-memory sources used for tests and replay.
//! Real serial transports live in the surrounding application; they only
//! need to speak the traits in [`crate::traits`].

use core::fmt;

pub mod memory;

pub use memory::{MemoryByteSource, MemoryLineSource, MemorySink};

/// Errors that can occur while pulling from a source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceError<E> {
    /// Transport-level error (e.g. a serial read failure)
    Transport(E),
    /// The source has no more data and never will (replay exhausted)
    EndOfStream,
}

impl<E: fmt::Display> fmt::Display for SourceError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "Transport error: {}", e),
            Self::EndOfStream => write!(f, "End of stream"),
        }
    }
}

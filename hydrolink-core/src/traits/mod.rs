//! Core Traits and Abstractions for Hydrolink
//!
//! The decoding engine touches the outside world through exactly three
//! seams, each a narrow trait the surrounding application implements:
//!
//! - [`LineSource`] / [`ByteSource`] - where raw telemetry comes from.
//!   Pull-based and non-blocking (`nb::Result`); a source that has nothing
//!   this instant returns `WouldBlock`, which is normal and not an error.
//! - [`RecordSink`] - where validated records go. A sink failure is reported
//!   and counted but never corrupts decoder state.
//! - [`TimeSource`](crate::time::TimeSource) - where capture timestamps come
//!   from, so the decode path stays deterministic under test.
//!
//! Opening serial devices, reconnecting them, scheduling poll delays, and
//! retrying uploads all live on the far side of these seams.

pub mod sink;
pub mod source;

pub use sink::RecordSink;
pub use source::{ByteSource, LineBuf, LineSource};

// Re-export the remaining seams at the module level for convenience
pub use crate::time::TimeSource;
pub use crate::validators::Validator;

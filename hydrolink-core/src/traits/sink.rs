//! Record Sink Trait
//!
//! The sink is the downstream half of the decoder's world: it accepts a
//! fully decoded, validated record and either stores it or reports why not.
//! Storage schema, network transport, batching, and retry policy all live
//! behind this trait.

use core::fmt;

/// Destination for validated records
///
/// ## Contract
///
/// - `submit` is called at most once per record; there is no dedup key
///   beyond the timestamp, so sinks that retry internally must tolerate
///   at-most-once delivery from the decoder's side.
/// - A returned error is logged and counted by the collector; decoder
///   buffers and accumulators are unaffected and decoding continues.
pub trait RecordSink<R> {
    /// Failure description surfaced to the operator
    type Error: fmt::Display;

    /// Accept one validated record
    fn submit(&mut self, record: &R) -> Result<(), Self::Error>;
}

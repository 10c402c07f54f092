//! Temperature Probe Protocol Constants
//!
//! The two-channel temperature probe speaks a half-duplex poll/response
//! protocol: the collector writes a single command byte, the probe answers
//! with one or more fixed-length frames.

/// Single-byte poll command that requests a reading.
///
/// Source: probe serial protocol.
pub const POLL_COMMAND: u8 = b'A';

/// Maximum bytes read from the link per poll cycle.
///
/// Two full frames plus slack; the probe answers a poll with an echo frame
/// followed by the settled reading.
pub const READ_CHUNK_BYTES: usize = 32;

/// Bytes of raw stream retained between poll cycles.
///
/// After each cycle the synchronizer keeps only this trailing window, which
/// bounds memory and prevents stale candidates from dominating the scan.
pub const RETENTION_WINDOW_BYTES: usize = 32;

/// Minimum accepted channel temperature (°C).
///
/// Readings below this indicate a disconnected or faulted sensor element for
/// this deployment, not a plausible process temperature.
pub const TEMP_ACCEPT_MIN_C: f32 = 10.0;

/// Maximum accepted channel temperature (°C).
pub const TEMP_ACCEPT_MAX_C: f32 = 100.0;

/// Consecutive empty poll cycles before an operator warning is logged.
///
/// A silent probe across this many polls usually means a cabling or power
/// fault; the collector keeps polling but surfaces the condition.
pub const EMPTY_CYCLE_WARN_THRESHOLD: u32 = 5;

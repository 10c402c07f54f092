//! Core decoding engine for Hydrolink
//!
//! Turns the raw byte streams of a hydrometric station into validated
//! records: line-oriented ASCII telemetry from an ultrasonic flowmeter and
//! fixed-length BCD frames from a two-channel temperature probe on a
//! half-duplex poll link.
//!
//! Key constraints:
//! - Pure, synchronous decode path - all I/O behind narrow traits
//! - No heap allocation while decoding; bounded buffers throughout
//! - Survives noise, partial frames, and malformed lines indefinitely
//!
//! ```
//! use hydrolink_core::LineRecordAssembler;
//!
//! let mut assembler = LineRecordAssembler::new();
//!
//! assembler.consume("25-06-30 08:15:00").unwrap();
//! assembler.consume("Flow   1.234  l/s").unwrap();
//!
//! // The velocity line completes the group
//! let record = assembler.consume("Vel: 0.87 m/s").unwrap().unwrap();
//! assert_eq!(record.flow, 1.234);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod assembler;
pub mod bcd;
pub mod buffer;
pub mod collector;
pub mod constants;
pub mod errors;
pub mod frame;
pub mod record;
pub mod stream;
pub mod time;
pub mod traits;
pub mod validators;

// Public API
pub use assembler::{LineMatch, LineRecordAssembler};
pub use collector::{CycleOutcome, FlowCollector, ProbeCollector, ProbeConfig};
pub use errors::{DecodeError, DecodeResult, ValidationError, ValidationResult};
pub use frame::{FrameSynchronizer, TempFrame};
pub use record::{FlowRecord, PartialFlowRecord, TemperatureRecord, TimestampPolicy};
pub use traits::{ByteSource, LineSource, RecordSink, TimeSource, Validator};
pub use validators::{FlowValidator, TemperatureValidator};

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

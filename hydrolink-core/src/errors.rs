//! Error Types for Decoding and Range-Validation Failures
//!
//! ## Design Philosophy
//!
//! Hydrolink's error system is designed with embedded collectors in mind:
//!
//! 1. **Small Size**: Each error variant is kept minimal since errors are
//!    returned in the per-line / per-frame hot path.
//!
//! 2. **No Heap Allocation**: All error data is inline - no String. This
//!    ensures deterministic memory usage.
//!
//! 3. **Copy Semantics**: Errors implement Copy for efficient return from
//!    functions without move semantics complications.
//!
//! 4. **Actionable Information**: Each error carries enough context to log a
//!    useful diagnostic without additional queries.
//!
//! ## Error Categories
//!
//! Errors fall into two decoder-owned categories:
//!
//! ### Structural
//! - `FrameTooShort`, `InvalidStartMarker`, `InvalidEndMarker`: a frame
//!   candidate that cannot be decoded. The offending bytes are discarded and
//!   scanning continues.
//! - `MalformedNumber`, `MalformedTimestamp`: a line matched a pattern shape
//!   but its payload would not parse. The line is skipped without mutating
//!   the accumulator.
//!
//! ### Range
//! - `OutOfRange`: a decoded value lies outside the accepted physical window.
//!   The whole record is dropped, never partially uploaded.
//! - `InvalidValue`: mathematically invalid (NaN, infinity).
//!
//! Source and sink I/O failures are owned by the external collaborators and
//! surface through their own error types (see [`crate::stream::SourceError`]);
//! they never corrupt decoder state.
//!
//! ## Error Handling Strategy
//!
//! No error in this crate is fatal. Both collectors are designed to run
//! indefinitely in the presence of noisy, partial, or malformed input:
//! structural errors drop the offending unit, range errors drop the record,
//! and decoding resumes from the retained buffer or accumulator as-is.

use thiserror_no_std::Error;

/// Result type for structural decoding operations
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Result type for range-validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Structural decoding errors - always recoverable
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Frame candidate shorter than the fixed frame length
    #[error("Frame needs {needed} bytes, got {actual}")]
    FrameTooShort {
        /// Bytes a complete frame requires
        needed: usize,
        /// Bytes actually available
        actual: usize,
    },

    /// First byte of a frame candidate is not the start marker
    #[error("Invalid start marker: {found:#04X}")]
    InvalidStartMarker {
        /// The byte found where the start marker was expected
        found: u8,
    },

    /// Last byte of a frame candidate is not the end marker
    #[error("Invalid end marker: {found:#04X}")]
    InvalidEndMarker {
        /// The byte found where the end marker was expected
        found: u8,
    },

    /// A numeric field in a telemetry line would not parse
    #[error("Malformed numeric field")]
    MalformedNumber,

    /// A timestamp field matched structurally but is not a valid civil time
    #[error("Malformed timestamp field")]
    MalformedTimestamp,
}

/// Range-validation errors - recoverable, the record is dropped
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ValidationError {
    /// Value outside the accepted physical window
    #[error("Value {value} outside range [{min}, {max}]")]
    OutOfRange {
        /// The decoded reading that failed validation
        value: f32,
        /// Minimum accepted value
        min: f32,
        /// Maximum accepted value
        max: f32,
    },

    /// Value makes no numeric sense (NaN, infinity)
    #[error("Invalid value: not a valid number")]
    InvalidValue,
}

#[cfg(feature = "defmt")]
impl defmt::Format for DecodeError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::FrameTooShort { needed, actual } =>
                defmt::write!(fmt, "Frame needs {} bytes, got {}", needed, actual),
            Self::InvalidStartMarker { found } =>
                defmt::write!(fmt, "Invalid start marker: {:#04X}", found),
            Self::InvalidEndMarker { found } =>
                defmt::write!(fmt, "Invalid end marker: {:#04X}", found),
            Self::MalformedNumber =>
                defmt::write!(fmt, "Malformed numeric field"),
            Self::MalformedTimestamp =>
                defmt::write!(fmt, "Malformed timestamp field"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ValidationError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::OutOfRange { value, min, max } =>
                defmt::write!(fmt, "Value {} outside [{}, {}]", value, min, max),
            Self::InvalidValue =>
                defmt::write!(fmt, "Invalid value"),
        }
    }
}

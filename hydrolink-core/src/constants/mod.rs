//! Constants for Hydrolink Core
//!
//! This module provides centralized, documented constants used throughout
//! the decoding engine. All numeric values are defined here with their
//! purpose and source.
//!
//! ## Organization
//!
//! Constants are grouped by domain:
//! - **Flowmeter**: the ASCII line protocol and its buffering defaults
//! - **Probe**: the binary frame protocol, poll command, and accepted ranges
//! - **Time**: conversion factors and the device clock zone
//!
//! ## Usage Guidelines
//!
//! 1. Always use these constants instead of magic numbers
//! 2. When adding new constants, document purpose and source
//! 3. Use descriptive names that include units

/// Flowmeter line protocol and buffering defaults.
pub mod flowmeter;

/// Temperature probe frame protocol, polling, and accepted ranges.
pub mod probe;

/// Time conversion factors and the device clock zone.
pub mod time;

// Re-export commonly used constants for convenience
pub use flowmeter::{LINE_BUFFER_LINES, MAX_LINE_LEN};

pub use probe::{
    POLL_COMMAND, READ_CHUNK_BYTES, RETENTION_WINDOW_BYTES,
    TEMP_ACCEPT_MIN_C, TEMP_ACCEPT_MAX_C, EMPTY_CYCLE_WARN_THRESHOLD,
};

pub use time::DEVICE_UTC_OFFSET_SECS;

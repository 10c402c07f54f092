//! Line Classification and Flow-Record Assembly
//!
//! ## Overview
//!
//! The flowmeter emits one field per line, in repeating groups:
//!
//! ```text
//! 25-06-30 08:15:00
//! Flow   1.234  l/s
//! Vel:   0.87   m/s
//! ```
//!
//! Lines are classified by an ordered list of structural matchers - no
//! regular expressions, each matcher is a hand-written pattern parser that
//! returns a typed match or nothing. The assembler fills a
//! [`PartialFlowRecord`] across calls and yields a [`FlowRecord`] when the
//! terminal velocity line lands with all three fields present.
//!
//! ## Matcher Priority
//!
//! Matchers are evaluated in fixed order per line: timestamp, flow,
//! velocity. A line matching none of them is ignored without touching the
//! accumulator - the device interleaves status chatter the collector has no
//! use for.
//!
//! ## Failure Modes
//!
//! A line with the right shape but an unparsable payload (a malformed float,
//! an impossible civil time) returns a structural error and leaves the
//! accumulator untouched; callers log it and move on. A record with a field
//! still missing is never emitted - the accumulator waits across subsequent
//! lines, with no timeout, until the field arrives or the caller resets it.

use chrono::{FixedOffset, NaiveDateTime};

use crate::{
    constants::flowmeter::{FLOW_PREFIX, FLOW_UNIT, VELOCITY_PREFIX, VELOCITY_UNIT},
    constants::time::DEVICE_UTC_OFFSET_SECS,
    errors::{DecodeError, DecodeResult},
    record::{FlowRecord, PartialFlowRecord},
    time::Timestamp,
};

/// Length of the device timestamp prefix: `YY-MM-DD HH:MM:SS`
const TIMESTAMP_LEN: usize = 17;

/// Device timestamp format for chrono
const TIMESTAMP_FORMAT: &str = "%y-%m-%d %H:%M:%S";

/// Typed result of classifying one telemetry line
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineMatch {
    /// Device clock line, converted to epoch milliseconds
    Timestamp(Timestamp),
    /// Flow reading in l/s
    Flow(f32),
    /// Velocity reading in m/s - the terminal field of a record
    Velocity(f32),
    /// Line matches no known pattern; no state change
    Ignored,
}

/// Classify a line against the ordered matchers
///
/// Leading/trailing whitespace is stripped first, matching the raw serial
/// read. Errors mean the line had a recognizable shape with an unparsable
/// payload; `Ignored` means it had no recognizable shape at all.
pub fn classify(line: &str) -> DecodeResult<LineMatch> {
    let line = line.trim();

    if has_timestamp_shape(line) {
        return parse_device_timestamp(&line[..TIMESTAMP_LEN]).map(LineMatch::Timestamp);
    }

    if let Some(result) = match_reading(line, FLOW_PREFIX, FLOW_UNIT) {
        return result.map(LineMatch::Flow);
    }

    if let Some(result) = match_reading(line, VELOCITY_PREFIX, VELOCITY_UNIT) {
        return result.map(LineMatch::Velocity);
    }

    Ok(LineMatch::Ignored)
}

/// Check the 17-char prefix for the `dd-dd-dd dd:dd:dd` shape
fn has_timestamp_shape(line: &str) -> bool {
    let bytes = line.as_bytes();
    if bytes.len() < TIMESTAMP_LEN {
        return false;
    }

    bytes[..TIMESTAMP_LEN].iter().enumerate().all(|(i, &b)| match i {
        2 | 5 => b == b'-',
        8 => b == b' ',
        11 | 14 => b == b':',
        _ => b.is_ascii_digit(),
    })
}

/// Parse a structurally valid timestamp prefix into epoch milliseconds
///
/// The device clock runs in its fixed local zone (see
/// [`DEVICE_UTC_OFFSET_SECS`]); the two-digit year follows the usual
/// 69-pivot convention.
fn parse_device_timestamp(prefix: &str) -> DecodeResult<Timestamp> {
    let naive = NaiveDateTime::parse_from_str(prefix, TIMESTAMP_FORMAT)
        .map_err(|_| DecodeError::MalformedTimestamp)?;

    let zone = FixedOffset::east_opt(DEVICE_UTC_OFFSET_SECS)
        .ok_or(DecodeError::MalformedTimestamp)?;
    let instant = naive
        .and_local_timezone(zone)
        .single()
        .ok_or(DecodeError::MalformedTimestamp)?;

    Ok(instant.timestamp_millis().max(0) as Timestamp)
}

/// Match `<prefix> <float> <unit>` and parse the numeric token
///
/// Returns `None` when the line does not have the shape at all, and
/// `Some(Err(..))` when the shape is right but the number is not. The token
/// accepts only digits and dots, mirroring the unsigned fixed-point format
/// the device emits.
fn match_reading(line: &str, prefix: &str, unit: &str) -> Option<DecodeResult<f32>> {
    let rest = line.strip_prefix(prefix)?;

    // At least one separating space, as the device prints
    let rest = rest.strip_prefix(char::is_whitespace)?.trim_start();

    let token_end = rest
        .find(char::is_whitespace)
        .unwrap_or(rest.len());
    let (token, rest) = rest.split_at(token_end);

    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return None;
    }

    if !rest.trim_start().starts_with(unit) {
        return None;
    }

    Some(token.parse::<f32>().map_err(|_| DecodeError::MalformedNumber))
}

/// Incremental assembler for flow records spanning multiple lines
///
/// Owns the accumulator exclusively. Completion is only checked on the
/// velocity line; emitting resets the accumulator for the next group
/// regardless of what the caller does with the record.
#[derive(Debug, Clone, Default)]
pub struct LineRecordAssembler {
    partial: PartialFlowRecord,
}

impl LineRecordAssembler {
    /// Create an assembler with an empty accumulator
    pub const fn new() -> Self {
        Self {
            partial: PartialFlowRecord::new(),
        }
    }

    /// Feed one line; returns a record when the group completes
    ///
    /// Errors report an unparsable payload on a recognized line shape; the
    /// accumulator is unchanged in that case.
    pub fn consume(&mut self, line: &str) -> DecodeResult<Option<FlowRecord>> {
        match classify(line)? {
            LineMatch::Timestamp(ts) => {
                self.partial.timestamp = Some(ts);
                Ok(None)
            }
            LineMatch::Flow(value) => {
                self.partial.flow = Some(value);
                Ok(None)
            }
            LineMatch::Velocity(value) => {
                self.partial.velocity = Some(value);
                match self.partial.complete() {
                    Some(record) => {
                        self.partial.reset();
                        Ok(Some(record))
                    }
                    None => Ok(None),
                }
            }
            LineMatch::Ignored => Ok(None),
        }
    }

    /// Inspect the in-progress accumulator
    pub fn partial(&self) -> &PartialFlowRecord {
        &self.partial
    }

    /// Externally reset a stuck accumulation cycle
    pub fn reset(&mut self) {
        self.partial.reset();
    }
}

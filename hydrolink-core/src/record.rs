//! Record Types Flowing from the Decoders to the Sink
//!
//! ## Overview
//!
//! The decoders turn raw bytes into exactly two record shapes: a flow record
//! assembled from successive telemetry lines, and a temperature record
//! decoded from a settled binary frame. A record exists only in a fully
//! populated, structurally valid form - partial state lives in the
//! accumulator types and never crosses the sink boundary.
//!
//! ## Accumulator Lifecycle
//!
//! [`PartialFlowRecord`] is created empty, mutated field-by-field as matching
//! lines arrive, and reset to empty immediately after a complete record is
//! taken - whether or not emission succeeded downstream. Emission is
//! attempted at most once per accumulation cycle.

use crate::time::Timestamp;

/// Complete flowmeter record: one reading group from the device
///
/// All fields are required; the assembler only produces this type once the
/// terminal velocity line has landed with the other two fields present.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlowRecord {
    /// Record timestamp in epoch milliseconds
    ///
    /// Which instant this carries is a policy decision: the parsed device
    /// clock or the capture wall-clock at emission. See
    /// [`TimestampPolicy`].
    pub timestamp: Timestamp,
    /// Volumetric flow in litres per second
    pub flow: f32,
    /// Stream velocity in metres per second
    pub velocity: f32,
}

/// Complete temperature probe record: both channels of a settled frame
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemperatureRecord {
    /// Capture timestamp in epoch milliseconds
    pub timestamp: Timestamp,
    /// Channel 1 temperature in °C
    pub t1: f32,
    /// Channel 2 temperature in °C
    pub t2: f32,
}

/// Which instant a flow record's `timestamp` field carries at emission
///
/// The flowmeter reports its own clock on a dedicated line, but deployments
/// that trust the collector host's clock overwrite it with the capture time
/// at emission. Both behaviors exist in the field; the choice is explicit
/// configuration here rather than a silent overwrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampPolicy {
    /// Replace the parsed device time with `TimeSource::now()` at emission.
    ///
    /// Default: the deployed station runs with an unsynchronized device
    /// clock, so the host capture time is the trustworthy instant.
    #[default]
    CaptureTime,
    /// Keep the timestamp parsed from the device's timestamp line.
    DeviceReported,
}

/// Mutable accumulator for a flow record spanning multiple lines
///
/// All fields are absent until parsed from their matching lines. The
/// velocity line is the terminal field: completion is only checked there.
#[derive(Debug, Clone, Copy, Default)]
pub struct PartialFlowRecord {
    /// Parsed device timestamp, epoch milliseconds
    pub timestamp: Option<Timestamp>,
    /// Parsed flow reading
    pub flow: Option<f32>,
    /// Parsed velocity reading
    pub velocity: Option<f32>,
}

impl PartialFlowRecord {
    /// Create an empty accumulator
    pub const fn new() -> Self {
        Self {
            timestamp: None,
            flow: None,
            velocity: None,
        }
    }

    /// Promote to a complete record if every field is present
    pub fn complete(&self) -> Option<FlowRecord> {
        Some(FlowRecord {
            timestamp: self.timestamp?,
            flow: self.flow?,
            velocity: self.velocity?,
        })
    }

    /// Clear all fields, ready for the next accumulation cycle
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

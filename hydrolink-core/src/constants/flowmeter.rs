//! Flowmeter Line Protocol Constants
//!
//! The ultrasonic flowmeter emits free-running ASCII telemetry, one field per
//! line, in repeating groups of timestamp, flow, and velocity lines.

/// Default depth of the line ring buffer (lines).
///
/// Lines are drained from the serial source into a bounded ring before being
/// run through the assembler; when full, the oldest line is dropped. One
/// thousand lines is several minutes of device output at its fastest rate.
pub const LINE_BUFFER_LINES: usize = 1000;

/// Maximum length of a single telemetry line (bytes).
///
/// The longest line the device emits ("Flow" with a full-precision reading
/// and unit suffix) is under 32 bytes; 64 leaves headroom for firmware
/// variants without growing the ring's footprint unnecessarily.
pub const MAX_LINE_LEN: usize = 64;

/// Line prefix for flow readings.
pub const FLOW_PREFIX: &str = "Flow";

/// Unit suffix for flow readings.
pub const FLOW_UNIT: &str = "l/s";

/// Line prefix for velocity readings.
pub const VELOCITY_PREFIX: &str = "Vel:";

/// Unit suffix for velocity readings.
pub const VELOCITY_UNIT: &str = "m/s";

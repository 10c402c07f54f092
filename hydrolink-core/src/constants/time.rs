//! Time-Related Constants

/// Fixed UTC offset of the flowmeter's device clock, in seconds.
///
/// The flowmeter reports local civil time for Asia/Bangkok (UTC+07:00, no
/// daylight saving). Parsed device timestamps are interpreted in this zone
/// before conversion to epoch milliseconds.
pub const DEVICE_UTC_OFFSET_SECS: i32 = 7 * 3600;

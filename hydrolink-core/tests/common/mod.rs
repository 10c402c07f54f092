//! Shared fixtures for the collector integration tests
//!
//! Wire-level builders for probe traffic: frames with chosen readings and
//! full poll responses. Everything here is deterministic, so a failing test
//! replays exactly.

#![allow(dead_code)]

use hydrolink_core::frame::{END_MARKER, FRAME_LEN, START_MARKER};

/// Probe address byte carried by every fixture frame
pub const PROBE_ADDR: u8 = 0x01;

/// Build a thermometer-pair frame reading `t1`/`t2` in °C
///
/// Readings are encoded the way the probe does: each channel as a 16-bit
/// big-endian magnitude scaled by ten.
pub fn thermometer_frame(t1: f32, t2: f32) -> [u8; FRAME_LEN] {
    let r1 = ((t1 * 10.0).round() as u16).to_be_bytes();
    let r2 = ((t2 * 10.0).round() as u16).to_be_bytes();
    [
        START_MARKER,
        PROBE_ADDR,
        r1[0],
        r1[1],
        r2[0],
        r2[1],
        0x00,
        END_MARKER,
    ]
}

/// Build a full poll response: echo frame first, settled frame second
///
/// This is the shape the probe answers with on a healthy link - the first
/// frame is its settling response, the second the stable reading.
pub fn poll_response(echo: (f32, f32), settled: (f32, f32)) -> [u8; 2 * FRAME_LEN] {
    let mut response = [0u8; 2 * FRAME_LEN];
    response[..FRAME_LEN].copy_from_slice(&thermometer_frame(echo.0, echo.1));
    response[FRAME_LEN..].copy_from_slice(&thermometer_frame(settled.0, settled.1));
    response
}

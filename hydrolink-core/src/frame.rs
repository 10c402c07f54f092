//! Frame Synchronization for the Temperature Probe Stream
//!
//! ## Overview
//!
//! The probe's serial stream carries fixed 8-byte frames with no alignment
//! guarantee: a read chunk may start mid-frame, contain line noise, or hold
//! several frames back-to-back. This module recovers frame boundaries by
//! scanning for the start/end marker pair and decodes the two message
//! interpretations the probe uses.
//!
//! ## Synchronization Algorithm
//!
//! The scan walks the retained buffer left to right. At every position whose
//! byte equals the start marker, the next 8 bytes form a *candidate*:
//!
//! ```text
//! FF 02 01 64 03 ...        buffer with leading noise
//!    ↑
//!    candidate start - take 8 bytes, check the 8th is the end marker
//! ```
//!
//! A candidate whose end marker matches is a valid frame. A candidate that
//! fails is logged and the scan resumes at the *next* position - never past
//! it, since a spurious start byte can appear inside noise ahead of the true
//! frame start. Overlapping candidates are therefore allowed by design.
//!
//! An exhausted buffer is a normal "no frame yet", not an error.
//!
//! ## Frame Layout
//!
//! ```text
//! Offset:  0     1      2   3      4   5      6      7
//!        ┌─────┬──────┬─────────┬─────────┬──────┬─────┐
//!        │ STX │ addr │ t1 BE16 │ t2 BE16 │ stat │ ETX │  thermometer pair
//!        └─────┴──────┴─────────┴─────────┴──────┴─────┘
//!        ┌─────┬──────┬──────┬────┬────┬────┬────┬─────┐
//!        │ STX │ addr │ mode │ d1 │ d2 │ d3 │ d4 │ ETX │  display registers
//!        └─────┴──────┴──────┴────┴────┴────┴────┴─────┘
//! ```
//!
//! The two interpretations are distinct message types sharing one framing;
//! [`TempFrame::thermometer_pair`] and [`TempFrame::display_value`] decode
//! them as separate named operations.

use crate::{
    bcd,
    buffer::RetainedBuffer,
    errors::{DecodeError, DecodeResult},
};

/// Fixed length of a probe frame in bytes
pub const FRAME_LEN: usize = 8;

/// Start-of-frame marker (ASCII STX)
pub const START_MARKER: u8 = 0x02;

/// End-of-frame marker (ASCII ETX)
pub const END_MARKER: u8 = 0x03;

/// Sign bit in the display-mode byte
const DISPLAY_SIGN_BIT: u8 = 0x04;

/// Decimal-point position mask in the display-mode byte
const DISPLAY_POINT_MASK: u8 = 0x03;

/// One structurally valid 8-byte probe frame
///
/// Frames are transient: they exist between the marker scan and record
/// construction, and are never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TempFrame {
    bytes: [u8; FRAME_LEN],
}

impl TempFrame {
    /// Validate a candidate window as a frame
    ///
    /// The window must hold at least [`FRAME_LEN`] bytes, begin with the
    /// start marker, and carry the end marker in the eighth position. Extra
    /// trailing bytes are ignored; only the leading frame is taken.
    pub fn parse(window: &[u8]) -> DecodeResult<Self> {
        if window.len() < FRAME_LEN {
            return Err(DecodeError::FrameTooShort {
                needed: FRAME_LEN,
                actual: window.len(),
            });
        }
        if window[0] != START_MARKER {
            return Err(DecodeError::InvalidStartMarker { found: window[0] });
        }
        if window[FRAME_LEN - 1] != END_MARKER {
            return Err(DecodeError::InvalidEndMarker {
                found: window[FRAME_LEN - 1],
            });
        }

        let mut bytes = [0u8; FRAME_LEN];
        bytes.copy_from_slice(&window[..FRAME_LEN]);
        Ok(Self { bytes })
    }

    /// Decode the two-channel thermometer interpretation
    ///
    /// Bytes 2-3 and 4-5 are big-endian 16-bit magnitudes scaled by ten:
    /// `0x01 0x64` is 356, reading 35.6 °C.
    pub fn thermometer_pair(&self) -> (f32, f32) {
        let t1 = u16::from_be_bytes([self.bytes[2], self.bytes[3]]) as f32 / 10.0;
        let t2 = u16::from_be_bytes([self.bytes[4], self.bytes[5]]) as f32 / 10.0;
        (t1, t2)
    }

    /// Decode the display-register interpretation
    ///
    /// Byte 2 is a display mode: bit 2 carries the sign, bits 0-1 the
    /// decimal point position. Bytes 3-6 are four BCD digit registers,
    /// most significant first.
    pub fn display_value(&self) -> f32 {
        let mode = self.bytes[2];
        let sign = if mode & DISPLAY_SIGN_BIT != 0 { -1.0 } else { 1.0 };
        let point = (mode & DISPLAY_POINT_MASK) as u32;

        let value = bcd::digit_pair(self.bytes[3]) as u32 * 1000
            + bcd::digit_pair(self.bytes[4]) as u32 * 100
            + bcd::digit_pair(self.bytes[5]) as u32 * 10
            + bcd::digit_pair(self.bytes[6]) as u32;

        sign * value as f32 / 10u32.pow(point) as f32
    }

    /// Raw frame bytes, marker to marker
    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.bytes
    }
}

/// Locate the first valid frame in `bytes`
///
/// Returns the frame and the count of bytes up to and including its end
/// marker, so callers can discard everything the frame consumed. Returns
/// `None` when no valid frame is present; nothing is consumed in that case.
pub fn scan(bytes: &[u8]) -> Option<(TempFrame, usize)> {
    let mut frames = Frames::new(bytes);
    frames.next().map(|frame| (frame, frames.pos))
}

/// Iterator over every valid frame in a byte slice
///
/// Positions are scanned one by one, so overlapping candidates and
/// back-to-back frames are all visited. Rejected candidates are logged at
/// debug level as the scan passes them.
pub struct Frames<'a> {
    bytes: &'a [u8],
    /// Offset one past the end of the last yielded frame (scan resume point
    /// is tracked separately in `next_start`)
    pos: usize,
    next_start: usize,
}

impl<'a> Frames<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            pos: 0,
            next_start: 0,
        }
    }
}

impl<'a> Iterator for Frames<'a> {
    type Item = TempFrame;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next_start + FRAME_LEN <= self.bytes.len() {
            let start = self.next_start;
            self.next_start += 1;

            if self.bytes[start] != START_MARKER {
                continue;
            }

            match TempFrame::parse(&self.bytes[start..]) {
                Ok(frame) => {
                    self.pos = start + FRAME_LEN;
                    return Some(frame);
                }
                Err(_e) => {
                    #[cfg(feature = "log")]
                    log::debug!("frame candidate at offset {} rejected: {}", start, _e);
                }
            }
        }
        None
    }
}

/// Marker-scanning frame synchronizer over a retained byte stream
///
/// Owns the raw byte accumulator exclusively: bytes enter through
/// [`extend`](Self::extend), leave through frame consumption and
/// [`trim`](Self::trim). `CAP` is the compile-time buffer capacity and must
/// cover the retention window plus one read chunk.
#[derive(Debug, Clone)]
pub struct FrameSynchronizer<const CAP: usize = 64> {
    buffer: RetainedBuffer<CAP>,
    window: usize,
}

impl<const CAP: usize> Default for FrameSynchronizer<CAP> {
    fn default() -> Self {
        Self::new(crate::constants::probe::RETENTION_WINDOW_BYTES)
    }
}

impl<const CAP: usize> FrameSynchronizer<CAP> {
    /// Create a synchronizer retaining `window` bytes between cycles
    pub fn new(window: usize) -> Self {
        Self {
            buffer: RetainedBuffer::new(),
            window,
        }
    }

    /// Append a chunk read from the serial link
    pub fn extend(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
    }

    /// Decode the next frame, consuming through its end marker
    ///
    /// Bytes ahead of the frame (noise, partial frames) are consumed along
    /// with it. Returns `None` with nothing consumed when no valid frame is
    /// present yet.
    pub fn next_frame(&mut self) -> Option<TempFrame> {
        let (frame, consumed) = scan(self.buffer.as_slice())?;
        self.buffer.consume(consumed);
        Some(frame)
    }

    /// Iterate every valid frame currently in the buffer, consuming nothing
    pub fn valid_frames(&self) -> Frames<'_> {
        Frames::new(self.buffer.as_slice())
    }

    /// The settled reading of this cycle: the second valid frame
    ///
    /// The probe answers a poll with an echo/settling frame first and the
    /// stable reading second, so the first frame is discarded by design.
    /// Fewer than two valid frames means no reading this cycle.
    pub fn settled_frame(&self) -> Option<TempFrame> {
        self.valid_frames().nth(1)
    }

    /// Drop everything but the trailing retention window
    pub fn trim(&mut self) {
        self.buffer.trim_to(self.window);
    }

    /// Bytes currently retained
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Retention window in bytes
    pub fn window(&self) -> usize {
        self.window
    }

    /// View the retained bytes (diagnostics)
    pub fn as_slice(&self) -> &[u8] {
        self.buffer.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // STX addr t1=35.6 t2=50.0 stat ETX
    const FRAME_A: [u8; 8] = [0x02, 0x01, 0x01, 0x64, 0x01, 0xF4, 0x00, 0x03];
    // STX addr t1=21.7 t2=99.9 stat ETX
    const FRAME_B: [u8; 8] = [0x02, 0x01, 0x00, 0xD9, 0x03, 0xE7, 0x00, 0x03];

    #[test]
    fn parse_valid_frame() {
        let frame = TempFrame::parse(&FRAME_A).unwrap();
        assert_eq!(frame.as_bytes(), &FRAME_A);
    }

    #[test]
    fn parse_rejects_short_window() {
        let result = TempFrame::parse(&FRAME_A[..5]);
        assert!(matches!(
            result,
            Err(DecodeError::FrameTooShort { needed: 8, actual: 5 })
        ));
    }

    #[test]
    fn parse_rejects_wrong_markers() {
        let mut bad_start = FRAME_A;
        bad_start[0] = 0xFF;
        assert!(matches!(
            TempFrame::parse(&bad_start),
            Err(DecodeError::InvalidStartMarker { found: 0xFF })
        ));

        // Wrong end marker: a candidate, never a frame
        let mut bad_end = FRAME_A;
        bad_end[7] = 0x02;
        assert!(matches!(
            TempFrame::parse(&bad_end),
            Err(DecodeError::InvalidEndMarker { found: 0x02 })
        ));
    }

    #[test]
    fn thermometer_pair_scales_by_ten() {
        let frame = TempFrame::parse(&FRAME_A).unwrap();
        let (t1, t2) = frame.thermometer_pair();
        // 0x0164 = 356, 0x01F4 = 500
        assert_eq!(t1, 35.6);
        assert_eq!(t2, 50.0);
    }

    #[test]
    fn display_value_positive_with_point() {
        // mode 0x01: positive, one decimal place; digits 0 2 5 7 -> 25.7
        let frame =
            TempFrame::parse(&[0x02, 0x01, 0x01, 0x00, 0x02, 0x05, 0x07, 0x03]).unwrap();
        assert_eq!(frame.display_value(), 25.7);
    }

    #[test]
    fn display_value_negative() {
        // mode 0x05: sign bit set, one decimal place; digits 0 0 1 5 -> -1.5
        let frame =
            TempFrame::parse(&[0x02, 0x01, 0x05, 0x00, 0x00, 0x01, 0x05, 0x03]).unwrap();
        assert_eq!(frame.display_value(), -1.5);
    }

    #[test]
    fn scan_skips_leading_garbage() {
        let mut bytes = heapless::Vec::<u8, 16>::new();
        bytes.push(0xFF).unwrap();
        bytes.extend_from_slice(&FRAME_A).unwrap();

        let (frame, consumed) = scan(&bytes).unwrap();
        assert_eq!(frame.as_bytes(), &FRAME_A);
        assert_eq!(consumed, 1 + FRAME_LEN);
    }

    #[test]
    fn scan_ignores_false_start_before_true_frame() {
        // A spurious start marker whose candidate fails must not skip the
        // real frame beginning inside that candidate window.
        let mut bytes = heapless::Vec::<u8, 16>::new();
        bytes.extend_from_slice(&[0x02, 0xAA, 0xBB]).unwrap();
        bytes.extend_from_slice(&FRAME_A).unwrap();

        let (frame, consumed) = scan(&bytes).unwrap();
        assert_eq!(frame.as_bytes(), &FRAME_A);
        assert_eq!(consumed, 3 + FRAME_LEN);
    }

    #[test]
    fn scan_empty_and_frameless() {
        assert!(scan(&[]).is_none());
        assert!(scan(&[0xFF, 0x00, 0x01]).is_none());

        // Start marker but never an end marker
        let candidate = [0x02, 0x01, 0x64, 0x02, 0x00, 0x00, 0x00, 0x00];
        assert!(scan(&candidate).is_none());
    }

    #[test]
    fn synchronizer_finds_both_back_to_back_frames() {
        let mut sync: FrameSynchronizer<64> = FrameSynchronizer::new(32);
        sync.extend(&FRAME_A);
        sync.extend(&FRAME_B);

        let frames: heapless::Vec<TempFrame, 4> = sync.valid_frames().collect();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].as_bytes(), &FRAME_A);
        assert_eq!(frames[1].as_bytes(), &FRAME_B);
    }

    #[test]
    fn settled_frame_is_the_second() {
        let mut sync: FrameSynchronizer<64> = FrameSynchronizer::new(32);
        sync.extend(&FRAME_A);
        sync.extend(&FRAME_B);

        let settled = sync.settled_frame().unwrap();
        assert_eq!(settled.as_bytes(), &FRAME_B);
    }

    #[test]
    fn settled_frame_requires_two() {
        let mut sync: FrameSynchronizer<64> = FrameSynchronizer::new(32);
        sync.extend(&[0xFF, 0xFF]);
        sync.extend(&FRAME_A);
        assert!(sync.settled_frame().is_none());
    }

    #[test]
    fn next_frame_consumes_through_end() {
        let mut sync: FrameSynchronizer<64> = FrameSynchronizer::new(32);
        sync.extend(&[0xDE, 0xAD]);
        sync.extend(&FRAME_A);
        sync.extend(&FRAME_B);

        let first = sync.next_frame().unwrap();
        assert_eq!(first.as_bytes(), &FRAME_A);
        assert_eq!(sync.len(), FRAME_LEN);

        let second = sync.next_frame().unwrap();
        assert_eq!(second.as_bytes(), &FRAME_B);
        assert!(sync.is_empty());
        assert!(sync.next_frame().is_none());
    }

    #[test]
    fn trim_bounds_retention() {
        let mut sync: FrameSynchronizer<64> = FrameSynchronizer::new(32);
        for _ in 0..6 {
            sync.extend(&FRAME_A);
        }
        sync.trim();
        assert!(sync.len() <= 32);
        // The trailing window still holds whole frames
        let frames: heapless::Vec<TempFrame, 8> = sync.valid_frames().collect();
        assert!(!frames.is_empty());
    }
}

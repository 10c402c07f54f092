//! Telemetry Source Traits
//!
//! Both sources follow a pull-based model using the `nb` crate: consumers
//! control when to read, `WouldBlock` means "nothing yet, try next cycle",
//! and `Other` carries a transport error owned by the collaborator.
//!
//! ## Contract
//!
//! - Implementations must not block indefinitely
//! - Repeated `WouldBlock` returns are normal and expected
//! - After an error the source may still be usable; the decoder resumes
//!   from its retained state either way

use crate::constants::flowmeter::MAX_LINE_LEN;

/// One telemetry line, bounded to the device's maximum line length
pub type LineBuf = heapless::String<MAX_LINE_LEN>;

/// Source of discrete text lines (the flowmeter link)
///
/// ## Example Implementation
///
/// ```rust
/// use hydrolink_core::traits::{LineSource, LineBuf};
///
/// struct ReplaySource {
///     lines: &'static [&'static str],
///     position: usize,
/// }
///
/// impl LineSource for ReplaySource {
///     type Error = ();
///
///     fn poll_line(&mut self) -> nb::Result<LineBuf, Self::Error> {
///         let line = self.lines.get(self.position).ok_or(nb::Error::WouldBlock)?;
///         self.position += 1;
///         let mut buf = LineBuf::new();
///         let _ = buf.push_str(&line[..line.len().min(buf.capacity())]);
///         Ok(buf)
///     }
/// }
/// ```
pub trait LineSource {
    /// Transport error type, owned by the collaborator
    type Error;

    /// Pull the next available line
    ///
    /// Returns:
    /// - `Ok(line)` - a line arrived
    /// - `Err(nb::Error::WouldBlock)` - nothing buffered right now
    /// - `Err(nb::Error::Other(e))` - transport failure
    fn poll_line(&mut self) -> nb::Result<LineBuf, Self::Error>;
}

/// Source of raw response bytes on a half-duplex poll link (the probe)
///
/// The probe only speaks when spoken to: each cycle the collector issues a
/// single-byte poll command and reads whatever response bytes have arrived.
/// Writing the command, the settle delay, and the read timeout are all
/// transport concerns behind this trait.
pub trait ByteSource {
    /// Transport error type, owned by the collaborator
    type Error;

    /// Issue `command` and read up to `buf.len()` response bytes
    ///
    /// Returns the byte count actually read; zero and `WouldBlock` both mean
    /// an empty cycle, which is normal for a quiet device.
    fn poll_chunk(&mut self, command: u8, buf: &mut [u8]) -> nb::Result<usize, Self::Error>;
}

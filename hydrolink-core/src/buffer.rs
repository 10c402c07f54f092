//! Bounded Retention Buffer for the Raw Byte Stream
//!
//! ## Overview
//!
//! This module provides the byte accumulator the frame synchronizer scans:
//! bytes are appended as they arrive from the serial link, consumed as frames
//! are decoded, and trimmed to a trailing window between poll cycles. The
//! capacity is a compile-time constant; nothing here allocates.
//!
//! ## Design Rationale
//!
//! ### Why Slice-and-Copy Instead of a Ring?
//!
//! Frame synchronization scans overlapping 8-byte windows across the whole
//! retained stream. A ring buffer would split candidates across the wrap
//! point, forcing either a shadow copy per scan or index gymnastics in the
//! hot loop. Keeping the bytes contiguous makes the scan a plain slice walk;
//! the cost is a `copy_within` on trim, which for a window this small (tens
//! of bytes) is a handful of cycles.
//!
//! ### Overflow Behavior
//!
//! When an append would exceed capacity, the oldest bytes are discarded
//! first. Recent bytes are always the valuable ones: a frame that was cut in
//! half by overflow was already unrecoverable, and the next poll response
//! will re-synchronize the scan.
//!
//! ## Usage Example
//!
//! ```rust
//! use hydrolink_core::buffer::RetainedBuffer;
//!
//! let mut buf: RetainedBuffer<64> = RetainedBuffer::new();
//! buf.extend_from_slice(&[0xFF, 0x02, 0x01]);
//! assert_eq!(buf.as_slice(), &[0xFF, 0x02, 0x01]);
//!
//! buf.consume(1);
//! assert_eq!(buf.as_slice(), &[0x02, 0x01]);
//! ```

use heapless::Vec;

/// Fixed-capacity byte accumulator with append, consume, and trim
///
/// ## Type Parameter
///
/// - `N`: compile-time capacity in bytes. Must be at least the retention
///   window plus one read chunk, so a full poll response always fits behind
///   the carried-over window.
///
/// ## Internal Invariants
///
/// - Stored bytes are contiguous and in arrival order
/// - `len() <= N` always; overflow discards from the front
#[derive(Debug, Clone, Default)]
pub struct RetainedBuffer<const N: usize> {
    data: Vec<u8, N>,
}

impl<const N: usize> RetainedBuffer<N> {
    /// Create an empty buffer
    pub const fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Append bytes, discarding the oldest if capacity would be exceeded
    pub fn extend_from_slice(&mut self, chunk: &[u8]) {
        // A chunk larger than the whole buffer reduces to its own tail
        let chunk = if chunk.len() > N {
            &chunk[chunk.len() - N..]
        } else {
            chunk
        };

        let needed = self.data.len() + chunk.len();
        if needed > N {
            self.drop_front(needed - N);
        }

        // Capacity is guaranteed by the trim above
        let _ = self.data.extend_from_slice(chunk);
    }

    /// Drop the first `count` bytes (consumed by a decoded frame)
    pub fn consume(&mut self, count: usize) {
        self.drop_front(count.min(self.data.len()));
    }

    /// Keep only the last `window` bytes
    pub fn trim_to(&mut self, window: usize) {
        if self.data.len() > window {
            let excess = self.data.len() - window;
            self.drop_front(excess);
        }
    }

    /// View the retained bytes in arrival order
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Number of retained bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Compile-time capacity
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Discard everything
    pub fn clear(&mut self) {
        self.data.clear();
    }

    fn drop_front(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        let remaining = self.data.len() - count;
        self.data.copy_within(count.., 0);
        self.data.truncate(remaining);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_buffer() {
        let buf: RetainedBuffer<8> = RetainedBuffer::new();
        assert!(buf.is_empty());
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.capacity(), 8);
    }

    #[test]
    fn append_and_view() {
        let mut buf: RetainedBuffer<8> = RetainedBuffer::new();
        buf.extend_from_slice(&[1, 2, 3]);
        assert_eq!(buf.as_slice(), &[1, 2, 3]);

        buf.extend_from_slice(&[4]);
        assert_eq!(buf.as_slice(), &[1, 2, 3, 4]);
    }

    #[test]
    fn overflow_keeps_newest() {
        let mut buf: RetainedBuffer<4> = RetainedBuffer::new();
        buf.extend_from_slice(&[1, 2, 3]);
        buf.extend_from_slice(&[4, 5, 6]);
        assert_eq!(buf.as_slice(), &[3, 4, 5, 6]);
    }

    #[test]
    fn oversized_chunk_reduces_to_tail() {
        let mut buf: RetainedBuffer<4> = RetainedBuffer::new();
        buf.extend_from_slice(&[1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(buf.as_slice(), &[4, 5, 6, 7]);
    }

    #[test]
    fn consume_from_front() {
        let mut buf: RetainedBuffer<8> = RetainedBuffer::new();
        buf.extend_from_slice(&[1, 2, 3, 4, 5]);
        buf.consume(2);
        assert_eq!(buf.as_slice(), &[3, 4, 5]);

        // Consuming more than retained empties the buffer
        buf.consume(100);
        assert!(buf.is_empty());
    }

    #[test]
    fn trim_keeps_trailing_window() {
        let mut buf: RetainedBuffer<16> = RetainedBuffer::new();
        buf.extend_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
        buf.trim_to(3);
        assert_eq!(buf.as_slice(), &[6, 7, 8]);

        // Trimming to a larger window is a no-op
        buf.trim_to(10);
        assert_eq!(buf.as_slice(), &[6, 7, 8]);
    }
}

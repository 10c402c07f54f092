//! Memory-based sources and sinks for testing and replay
//!
//! These implementations are useful for:
//! - Unit and integration testing the collectors
//! - Replaying captured serial logs
//! - Simulating device behavior (quiet cycles, noise bursts)

use core::convert::Infallible;

use super::SourceError;
use crate::traits::{ByteSource, LineBuf, LineSource, RecordSink};

/// Line source replaying a fixed slice of lines
///
/// Yields one line per poll and reports `EndOfStream` once exhausted.
pub struct MemoryLineSource<'a> {
    lines: &'a [&'a str],
    position: usize,
}

impl<'a> MemoryLineSource<'a> {
    /// Create a source over a slice of lines
    pub fn new(lines: &'a [&'a str]) -> Self {
        Self { lines, position: 0 }
    }

    /// Rewind to the first line
    pub fn reset(&mut self) {
        self.position = 0;
    }

    /// Check if every line has been yielded
    pub fn is_exhausted(&self) -> bool {
        self.position >= self.lines.len()
    }
}

impl<'a> LineSource for MemoryLineSource<'a> {
    // Replay never fails in transport, it only runs out
    type Error = SourceError<Infallible>;

    fn poll_line(&mut self) -> nb::Result<LineBuf, Self::Error> {
        if self.position >= self.lines.len() {
            return Err(nb::Error::Other(SourceError::EndOfStream));
        }

        let line = self.lines[self.position];
        self.position += 1;

        let mut buf = LineBuf::new();
        // Oversized replay lines are truncated, as a bounded serial read would
        let take = line.len().min(buf.capacity());
        let _ = buf.push_str(&line[..take]);
        Ok(buf)
    }
}

/// Byte source replaying one chunk per poll cycle
///
/// Records every poll command issued so tests can assert the protocol.
/// After the chunks run out it reports `WouldBlock` forever, simulating a
/// device that has gone quiet.
pub struct MemoryByteSource<'a> {
    chunks: &'a [&'a [u8]],
    position: usize,
    commands: heapless::Vec<u8, 32>,
}

impl<'a> MemoryByteSource<'a> {
    /// Create a source over a slice of response chunks
    pub fn new(chunks: &'a [&'a [u8]]) -> Self {
        Self {
            chunks,
            position: 0,
            commands: heapless::Vec::new(),
        }
    }

    /// Poll commands received so far, oldest first
    pub fn commands(&self) -> &[u8] {
        &self.commands
    }

    /// Check if every chunk has been yielded
    pub fn is_exhausted(&self) -> bool {
        self.position >= self.chunks.len()
    }
}

impl<'a> ByteSource for MemoryByteSource<'a> {
    type Error = SourceError<Infallible>;

    fn poll_chunk(&mut self, command: u8, buf: &mut [u8]) -> nb::Result<usize, Self::Error> {
        let _ = self.commands.push(command);

        if self.position >= self.chunks.len() {
            return Err(nb::Error::WouldBlock);
        }

        let chunk = self.chunks[self.position];
        self.position += 1;

        let take = chunk.len().min(buf.len());
        buf[..take].copy_from_slice(&chunk[..take]);
        Ok(take)
    }
}

/// Sink collecting records into a bounded buffer
///
/// Overflow is reported as a submit failure, which doubles as the test
/// fixture for the sink-failure path.
pub struct MemorySink<R, const CAP: usize = 32> {
    records: heapless::Vec<R, CAP>,
}

impl<R, const CAP: usize> MemorySink<R, CAP> {
    /// Create an empty sink
    pub fn new() -> Self {
        Self {
            records: heapless::Vec::new(),
        }
    }

    /// Records accepted so far, oldest first
    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// Number of accepted records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if nothing has been accepted
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Discard accepted records
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

impl<R, const CAP: usize> Default for MemorySink<R, CAP> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Clone, const CAP: usize> RecordSink<R> for MemorySink<R, CAP> {
    type Error = &'static str;

    fn submit(&mut self, record: &R) -> Result<(), Self::Error> {
        self.records
            .push(record.clone())
            .map_err(|_| "memory sink full")
    }
}

//! Per-Device Collection Loops
//!
//! ## Overview
//!
//! A collector is the cooperative loop around one decoding pipeline: it
//! pulls from a source, feeds the decoder, runs validation, and hands
//! accepted records to the sink. Both collectors are plain synchronous
//! structs - suspension (inter-poll delays, serial waits) belongs to the
//! caller, so a `poll_cycle`/`pump` call never blocks and is safe to drive
//! from any scheduler, including none.
//!
//! ```text
//! FlowCollector:   LineSource → line ring → assembler → validator → sink
//! ProbeCollector:  ByteSource → retained bytes → synchronizer → validator → sink
//! ```
//!
//! ## Error Posture
//!
//! Nothing in a cycle is fatal. Unparsable lines and rejected frames are
//! counted and skipped; out-of-range records are dropped whole; sink and
//! source failures are logged and the decoder resumes from its retained
//! state on the next cycle. The collectors are designed to run indefinitely
//! against noisy devices.

use core::fmt;

use crate::{
    assembler::LineRecordAssembler,
    constants::flowmeter::LINE_BUFFER_LINES,
    constants::probe::{
        EMPTY_CYCLE_WARN_THRESHOLD, POLL_COMMAND, READ_CHUNK_BYTES, RETENTION_WINDOW_BYTES,
    },
    errors::ValidationError,
    frame::{FrameSynchronizer, TempFrame},
    record::{FlowRecord, TemperatureRecord, TimestampPolicy},
    traits::{ByteSource, LineSource, RecordSink, TimeSource},
    validators::{FlowValidator, TemperatureValidator},
};

use heapless::Deque;

/// Cumulative counters for a flow pipeline
#[derive(Debug, Clone, Copy, Default)]
pub struct FlowStats {
    /// Lines pulled from the source
    pub lines_read: u32,
    /// Lines discarded because the ring was full
    pub lines_dropped: u32,
    /// Lines with a recognized shape but unparsable payload
    pub parse_errors: u32,
    /// Records accepted by the sink
    pub records_emitted: u32,
    /// Records dropped by validation
    pub records_rejected: u32,
    /// Records the sink refused
    pub sink_failures: u32,
    /// Transport errors from the source
    pub source_errors: u32,
}

/// Cumulative counters for a probe pipeline
#[derive(Debug, Clone, Copy, Default)]
pub struct ProbeStats {
    /// Poll cycles driven
    pub cycles: u32,
    /// Cycles with no response bytes
    pub empty_cycles: u32,
    /// Response bytes read
    pub bytes_read: u64,
    /// Valid frames observed in the retained buffer
    pub frames_seen: u32,
    /// Records accepted by the sink
    pub records_emitted: u32,
    /// Records dropped by validation
    pub records_rejected: u32,
    /// Records the sink refused
    pub sink_failures: u32,
    /// Transport errors from the source
    pub source_errors: u32,
}

/// What one probe poll cycle produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CycleOutcome {
    /// No response bytes this cycle - normal for a quiet device
    NoData,
    /// Bytes arrived but fewer than two valid frames are present
    NoSettledFrame,
    /// A settled frame decoded but failed range validation
    Rejected(ValidationError),
    /// Record accepted and handed to the sink
    Emitted(TemperatureRecord),
    /// Record accepted but the sink refused it
    SinkFailed(TemperatureRecord),
    /// The source reported a transport failure
    SourceError,
}

/// Collector for the flowmeter's free-running line telemetry
///
/// Each [`pump`](Self::pump) call drains whatever lines the source has
/// buffered into a bounded ring, then runs the ring through the assembler.
/// `LINE_CAP` bounds the ring; when a burst overflows it, the oldest lines
/// are dropped first.
pub struct FlowCollector<S, K, T, const LINE_CAP: usize = LINE_BUFFER_LINES> {
    source: S,
    sink: K,
    clock: T,
    assembler: LineRecordAssembler,
    validator: FlowValidator,
    policy: TimestampPolicy,
    ring: Deque<crate::traits::LineBuf, LINE_CAP>,
    stats: FlowStats,
}

impl<S, K, T, const LINE_CAP: usize> FlowCollector<S, K, T, LINE_CAP>
where
    S: LineSource,
    S::Error: fmt::Display,
    K: RecordSink<FlowRecord>,
    T: TimeSource,
{
    /// Create a collector with the default timestamp policy
    pub fn new(source: S, sink: K, clock: T) -> Self {
        Self {
            source,
            sink,
            clock,
            assembler: LineRecordAssembler::new(),
            validator: FlowValidator,
            policy: TimestampPolicy::default(),
            ring: Deque::new(),
            stats: FlowStats::default(),
        }
    }

    /// Choose which instant emitted records carry
    pub fn with_policy(mut self, policy: TimestampPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Drain available lines and process them; returns records emitted
    pub fn pump(&mut self) -> usize {
        self.ingest();
        self.drain()
    }

    /// Pull lines from the source into the ring until it runs dry
    fn ingest(&mut self) {
        loop {
            match self.source.poll_line() {
                Ok(line) => {
                    self.stats.lines_read += 1;
                    if line.trim().is_empty() {
                        continue;
                    }
                    if self.ring.is_full() {
                        // Recent telemetry outranks stale backlog
                        self.ring.pop_front();
                        self.stats.lines_dropped += 1;
                    }
                    let _ = self.ring.push_back(line);
                }
                Err(nb::Error::WouldBlock) => break,
                Err(nb::Error::Other(_e)) => {
                    self.stats.source_errors += 1;
                    #[cfg(feature = "log")]
                    log::error!("flowmeter source error: {}", _e);
                    break;
                }
            }
        }
    }

    /// Run buffered lines through the assembler and emit completions
    fn drain(&mut self) -> usize {
        let mut emitted = 0;
        while let Some(line) = self.ring.pop_front() {
            match self.assembler.consume(&line) {
                Ok(Some(record)) => {
                    if self.emit(record) {
                        emitted += 1;
                    }
                }
                Ok(None) => {}
                Err(_e) => {
                    self.stats.parse_errors += 1;
                    #[cfg(feature = "log")]
                    log::debug!("skipping unparsable line {:?}: {}", line.as_str(), _e);
                }
            }
        }
        emitted
    }

    /// Stamp, validate, and hand one record to the sink
    fn emit(&mut self, mut record: FlowRecord) -> bool {
        if self.policy == TimestampPolicy::CaptureTime {
            record.timestamp = self.clock.now();
        }

        if let Err(_e) = self.validator.validate_record(record.flow, record.velocity) {
            self.stats.records_rejected += 1;
            #[cfg(feature = "log")]
            log::warn!(
                "dropping flow record (flow {} l/s, vel {} m/s): {}",
                record.flow,
                record.velocity,
                _e
            );
            return false;
        }

        match self.sink.submit(&record) {
            Ok(()) => {
                self.stats.records_emitted += 1;
                #[cfg(feature = "log")]
                log::info!(
                    "stored {} | Flow: {:.3} l/s | Vel: {:.3} m/s",
                    crate::time::datetime_utc(record.timestamp),
                    record.flow,
                    record.velocity
                );
                true
            }
            Err(_e) => {
                self.stats.sink_failures += 1;
                #[cfg(feature = "log")]
                log::error!("flow sink refused record: {}", _e);
                false
            }
        }
    }

    /// Cumulative counters
    pub fn stats(&self) -> &FlowStats {
        &self.stats
    }

    /// The sink, for inspection
    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Externally reset a stuck accumulation cycle
    pub fn reset_accumulator(&mut self) {
        self.assembler.reset();
    }
}

/// Configuration for the probe poll loop
#[derive(Debug, Clone, Copy)]
pub struct ProbeConfig {
    /// Single-byte poll command issued each cycle
    pub poll_command: u8,
    /// Response bytes requested per cycle (capped at [`READ_CHUNK_BYTES`])
    pub read_chunk: usize,
    /// Bytes retained between cycles
    pub retention_window: usize,
    /// Consecutive empty cycles before an operator warning
    pub empty_cycle_warn_threshold: u32,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            poll_command: POLL_COMMAND,
            read_chunk: READ_CHUNK_BYTES,
            retention_window: RETENTION_WINDOW_BYTES,
            empty_cycle_warn_threshold: EMPTY_CYCLE_WARN_THRESHOLD,
        }
    }
}

/// Collector for the temperature probe's half-duplex poll link
///
/// One [`poll_cycle`](Self::poll_cycle) call is one protocol round: issue
/// the poll command, append whatever arrived, scan the whole retained
/// buffer, upload the settled (second) frame if present, trim. `CAP` is the
/// synchronizer's compile-time buffer capacity and must cover the retention
/// window plus one read chunk.
pub struct ProbeCollector<S, K, T, const CAP: usize = 64> {
    source: S,
    sink: K,
    clock: T,
    sync: FrameSynchronizer<CAP>,
    validator: TemperatureValidator,
    config: ProbeConfig,
    last_valid_frame: Option<TempFrame>,
    consecutive_empty: u32,
    stats: ProbeStats,
}

impl<S, K, T, const CAP: usize> ProbeCollector<S, K, T, CAP>
where
    S: ByteSource,
    S::Error: fmt::Display,
    K: RecordSink<TemperatureRecord>,
    T: TimeSource,
{
    /// Create a collector with default protocol configuration
    pub fn new(source: S, sink: K, clock: T) -> Self {
        Self::with_config(source, sink, clock, ProbeConfig::default())
    }

    /// Create a collector with explicit protocol configuration
    pub fn with_config(source: S, sink: K, clock: T, config: ProbeConfig) -> Self {
        Self {
            source,
            sink,
            clock,
            sync: FrameSynchronizer::new(config.retention_window),
            validator: TemperatureValidator::default(),
            config,
            last_valid_frame: None,
            consecutive_empty: 0,
            stats: ProbeStats::default(),
        }
    }

    /// Replace the accepted temperature window
    pub fn with_validator(mut self, validator: TemperatureValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Drive one poll/response round
    pub fn poll_cycle(&mut self) -> CycleOutcome {
        self.stats.cycles += 1;

        let mut chunk = [0u8; READ_CHUNK_BYTES];
        let take = self.config.read_chunk.min(READ_CHUNK_BYTES);

        let read = match self
            .source
            .poll_chunk(self.config.poll_command, &mut chunk[..take])
        {
            Ok(0) | Err(nb::Error::WouldBlock) => return self.empty_cycle(),
            Ok(n) => n,
            Err(nb::Error::Other(_e)) => {
                self.stats.source_errors += 1;
                #[cfg(feature = "log")]
                log::error!("probe source error: {}", _e);
                return CycleOutcome::SourceError;
            }
        };

        self.consecutive_empty = 0;
        self.stats.bytes_read += read as u64;
        self.sync.extend(&chunk[..read]);

        let outcome = self.scan_and_emit();
        self.sync.trim();
        outcome
    }

    /// Scan the retained buffer, log every valid frame, upload the settled one
    fn scan_and_emit(&mut self) -> CycleOutcome {
        let mut seen = 0u32;
        let mut newest = None;
        for frame in self.sync.valid_frames() {
            seen += 1;
            newest = Some(frame);
            #[cfg(feature = "log")]
            {
                let (t1, t2) = frame.thermometer_pair();
                log::debug!(
                    "frame {}: T1 {:.2} °C, T2 {:.2} °C ({:02X?})",
                    seen,
                    t1,
                    t2,
                    frame.as_bytes()
                );
            }
        }
        self.stats.frames_seen += seen;
        if newest.is_some() {
            self.last_valid_frame = newest;
        }

        // The first frame of a cycle is the probe settling; only the second
        // is a stable reading worth uploading.
        let settled = match self.sync.settled_frame() {
            Some(frame) => frame,
            None => return CycleOutcome::NoSettledFrame,
        };

        let (t1, t2) = settled.thermometer_pair();
        if let Err(e) = self.validator.validate_pair(t1, t2) {
            self.stats.records_rejected += 1;
            #[cfg(feature = "log")]
            log::warn!("dropping reading T1 {:.2} °C, T2 {:.2} °C: {}", t1, t2, e);
            return CycleOutcome::Rejected(e);
        }

        let record = TemperatureRecord {
            timestamp: self.clock.now(),
            t1,
            t2,
        };

        match self.sink.submit(&record) {
            Ok(()) => {
                self.stats.records_emitted += 1;
                #[cfg(feature = "log")]
                log::info!(
                    "uploaded T1: {:.2} °C, T2: {:.2} °C at {}",
                    record.t1,
                    record.t2,
                    crate::time::datetime_utc(record.timestamp)
                );
                CycleOutcome::Emitted(record)
            }
            Err(_e) => {
                self.stats.sink_failures += 1;
                #[cfg(feature = "log")]
                log::error!("temperature sink refused record: {}", _e);
                CycleOutcome::SinkFailed(record)
            }
        }
    }

    fn empty_cycle(&mut self) -> CycleOutcome {
        self.stats.empty_cycles += 1;
        self.consecutive_empty += 1;

        if self.consecutive_empty >= self.config.empty_cycle_warn_threshold {
            #[cfg(feature = "log")]
            match self.last_valid_frame {
                Some(frame) => log::warn!(
                    "probe silent for {} polls; last valid frame {:02X?}",
                    self.consecutive_empty,
                    frame.as_bytes()
                ),
                None => log::warn!(
                    "probe silent for {} polls and no valid frame seen yet",
                    self.consecutive_empty
                ),
            }
        }

        CycleOutcome::NoData
    }

    /// Cumulative counters
    pub fn stats(&self) -> &ProbeStats {
        &self.stats
    }

    /// The sink, for inspection
    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Last structurally valid frame observed, for diagnostics
    pub fn last_valid_frame(&self) -> Option<&TempFrame> {
        self.last_valid_frame.as_ref()
    }

    /// Bytes currently retained by the synchronizer
    pub fn retained_len(&self) -> usize {
        self.sync.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::{MemoryByteSource, MemoryLineSource, MemorySink};
    use crate::time::FixedTime;

    const GROUP: [&str; 3] = ["25-06-30 08:15:00", "Flow 1.234 l/s", "Vel: 0.87 m/s"];

    #[test]
    fn flow_collector_emits_capture_time() {
        let source = MemoryLineSource::new(&GROUP);
        let sink: MemorySink<FlowRecord, 8> = MemorySink::new();
        let mut collector: FlowCollector<_, _, _, 16> =
            FlowCollector::new(source, sink, FixedTime::new(42_000));

        assert_eq!(collector.pump(), 1);
        let records = collector.sink().records();
        assert_eq!(records.len(), 1);
        // Default policy: the parsed device time is replaced at emission
        assert_eq!(records[0].timestamp, 42_000);
        assert_eq!(records[0].flow, 1.234);
    }

    #[test]
    fn flow_collector_device_time_policy() {
        let source = MemoryLineSource::new(&GROUP);
        let sink: MemorySink<FlowRecord, 8> = MemorySink::new();
        let mut collector: FlowCollector<_, _, _, 16> =
            FlowCollector::new(source, sink, FixedTime::new(42_000))
                .with_policy(TimestampPolicy::DeviceReported);

        collector.pump();
        let records = collector.sink().records();
        assert_ne!(records[0].timestamp, 42_000);
    }

    #[test]
    fn flow_collector_ring_drops_oldest() {
        // Ring of 4: the first group's lines are pushed out by later ones
        let lines = [
            "Flow 1.0 l/s",
            "Flow 2.0 l/s",
            "25-06-30 08:15:00",
            "Flow 3.0 l/s",
            "Vel: 0.5 m/s",
        ];
        let source = MemoryLineSource::new(&lines);
        let sink: MemorySink<FlowRecord, 8> = MemorySink::new();
        let mut collector: FlowCollector<_, _, _, 4> =
            FlowCollector::new(source, sink, FixedTime::new(0));

        collector.pump();
        assert_eq!(collector.stats().lines_dropped, 1);
        // The surviving group still completes
        assert_eq!(collector.sink().records().len(), 1);
        assert_eq!(collector.sink().records()[0].flow, 3.0);
    }

    #[test]
    fn probe_collector_full_round() {
        // One response: echo frame then settled frame
        let response: [u8; 16] = [
            0x02, 0x01, 0x01, 0x64, 0x01, 0xF4, 0x00, 0x03, // 35.6 / 50.0
            0x02, 0x01, 0x00, 0xD9, 0x03, 0xE7, 0x00, 0x03, // 21.7 / 99.9
        ];
        let chunks: [&[u8]; 1] = [&response];
        let source = MemoryByteSource::new(&chunks);
        let sink: MemorySink<TemperatureRecord, 8> = MemorySink::new();
        let mut collector: ProbeCollector<_, _, _, 64> =
            ProbeCollector::new(source, sink, FixedTime::new(7_000));

        match collector.poll_cycle() {
            CycleOutcome::Emitted(record) => {
                assert_eq!(record.timestamp, 7_000);
                assert_eq!(record.t1, 21.7);
                assert_eq!(record.t2, 99.9);
            }
            other => panic!("expected emission, got {:?}", other),
        }

        assert_eq!(collector.stats().frames_seen, 2);
        assert!(collector.retained_len() <= 32);
    }

    #[test]
    fn probe_collector_single_frame_is_not_enough() {
        let frame: [u8; 8] = [0x02, 0x01, 0x01, 0x64, 0x01, 0xF4, 0x00, 0x03];
        let chunks: [&[u8]; 1] = [&frame];
        let source = MemoryByteSource::new(&chunks);
        let sink: MemorySink<TemperatureRecord, 8> = MemorySink::new();
        let mut collector: ProbeCollector<_, _, _, 64> =
            ProbeCollector::new(source, sink, FixedTime::new(0));

        assert_eq!(collector.poll_cycle(), CycleOutcome::NoSettledFrame);
        assert!(collector.sink().is_empty());
    }

    #[test]
    fn probe_collector_counts_quiet_polls() {
        let chunks: [&[u8]; 0] = [];
        let source = MemoryByteSource::new(&chunks);
        let sink: MemorySink<TemperatureRecord, 8> = MemorySink::new();
        let mut collector: ProbeCollector<_, _, _, 64> =
            ProbeCollector::new(source, sink, FixedTime::new(0));

        for _ in 0..6 {
            assert_eq!(collector.poll_cycle(), CycleOutcome::NoData);
        }
        assert_eq!(collector.stats().empty_cycles, 6);
    }
}

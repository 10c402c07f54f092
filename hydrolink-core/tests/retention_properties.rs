//! Property tests for buffer retention and decoder robustness
//!
//! The decoders must stay bounded and panic-free for arbitrary input, not
//! just well-formed device traffic. These properties drive them with
//! generated bursts, noise prefixes, and line soup.

use hydrolink_core::{
    assembler::{classify, LineRecordAssembler},
    buffer::RetainedBuffer,
    frame::{self, FrameSynchronizer, END_MARKER, FRAME_LEN, START_MARKER},
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn retained_buffer_never_exceeds_capacity(
        chunks in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..100), 0..16),
    ) {
        let mut buf: RetainedBuffer<64> = RetainedBuffer::new();
        for chunk in &chunks {
            buf.extend_from_slice(chunk);
            prop_assert!(buf.len() <= 64);
        }
    }

    #[test]
    fn trim_bounds_any_burst(burst in prop::collection::vec(any::<u8>(), 0..512)) {
        let mut sync: FrameSynchronizer<64> = FrameSynchronizer::new(32);
        for chunk in burst.chunks(24) {
            sync.extend(chunk);
        }
        sync.trim();
        prop_assert!(sync.len() <= 32);
    }

    #[test]
    fn embedded_frame_is_found_behind_any_noise(
        prefix in prop::collection::vec(
            any::<u8>().prop_filter("not a start marker", |b| *b != START_MARKER),
            0..24,
        ),
        raw1 in 0u16..=9999,
        raw2 in 0u16..=9999,
    ) {
        let r1 = raw1.to_be_bytes();
        let r2 = raw2.to_be_bytes();
        let mut bytes = prefix.clone();
        bytes.extend_from_slice(&[
            START_MARKER, 0x01, r1[0], r1[1], r2[0], r2[1], 0x00, END_MARKER,
        ]);

        let (found, consumed) = frame::scan(&bytes).expect("frame must be found");
        prop_assert_eq!(consumed, prefix.len() + FRAME_LEN);

        let (t1, t2) = found.thermometer_pair();
        prop_assert_eq!(t1, raw1 as f32 / 10.0);
        prop_assert_eq!(t2, raw2 as f32 / 10.0);
    }

    #[test]
    fn classify_never_panics_on_arbitrary_lines(line in "\\PC{0,80}") {
        let _ = classify(&line);
    }

    #[test]
    fn well_formed_group_always_completes(
        flow in 0.0f32..10_000.0,
        vel in 0.0f32..100.0,
    ) {
        let mut assembler = LineRecordAssembler::new();
        prop_assert!(assembler.consume("25-06-30 08:15:00").unwrap().is_none());
        let flow_line = format!("Flow {:.3} l/s", flow);
        prop_assert!(assembler
            .consume(&flow_line)
            .unwrap()
            .is_none());

        let record = assembler
            .consume(&format!("Vel: {:.3} m/s", vel))
            .unwrap()
            .expect("terminal line must complete the group");
        prop_assert!((record.flow - flow).abs() <= 0.01);
        prop_assert!((record.velocity - vel).abs() <= 0.01);

        // Accumulator reset: the group cannot complete twice
        prop_assert!(assembler.consume("Vel: 0.5 m/s").unwrap().is_none());
    }
}

//! Integration tests for the segment buffer.

use proptest::prelude::*;
use segbuf_core::{BufferError, Config, SegmentBuffer};
use segbuf_testkit::prelude::*;
use std::io;
use std::sync::Arc;
use std::time::Duration;

#[test]
fn live_stream_window_scenario() {
    let buffer = SegmentBuffer::new(Config::new().segment_size(512).max_segments(12));

    buffer.append(&vec![0u8; 12 * 512]).unwrap();
    assert_eq!(buffer.first_id(), 0);
    assert_eq!(buffer.last_id(), 11);

    buffer.append(&vec![0u8; 2 * 512]).unwrap();
    assert_eq!(buffer.first_id(), 2);
    assert_eq!(buffer.last_id(), 13);

    let mut dest = vec![0u8; 512];
    assert!(matches!(buffer.fetch(&mut dest, 1), Err(BufferError::Miss)));
}

#[test]
fn late_joiner_reads_retained_history() {
    let buffer = filled_buffer(128, 6, 20);
    let stats = buffer.stats();
    assert_eq!((stats.first_id, stats.last_id), (14, 19));

    let mut sink = RecordingSink::new();
    for id in stats.first_id..=stats.last_id {
        assert_eq!(buffer.stream_id(&mut sink, id).unwrap(), 128);
    }

    let expected: Vec<u8> = (14..20).flat_map(|id| patterned_segment(id, 128)).collect();
    assert_eq!(sink.data(), expected);
    assert_eq!(sink.writes(), 6);
}

#[test]
fn failing_sink_is_reported_as_delivery_error() {
    let buffer = filled_buffer(32, 4, 2);

    let err = buffer
        .stream_id(&mut FailingSink::new(io::ErrorKind::ConnectionReset), 1)
        .unwrap_err();
    assert!(!err.is_request_error());
    assert!(matches!(err, BufferError::Sink(ref e) if e.kind() == io::ErrorKind::ConnectionReset));

    let err = buffer.stream_id(&mut FailingSink::default(), 7).unwrap_err();
    assert!(matches!(err, BufferError::Miss));

    // A failed delivery leaves the window alone.
    assert_eq!(buffer.first_id(), 0);
    assert_eq!(buffer.last_id(), 1);
}

#[test]
fn producer_can_io_copy_into_shared_buffer() {
    let buffer = Arc::new(SegmentBuffer::default());
    let data: Vec<u8> = (0..4).flat_map(|id| patterned_segment(id, 1024)).collect();

    io::copy(&mut &data[..], &mut &*buffer).unwrap();

    assert_eq!(buffer.last_id(), 3);
    for id in 0..4 {
        assert!(segment_matches(&buffer.segment(id).unwrap(), id));
    }
}

#[test]
fn stress_readers_never_see_torn_segments() {
    let buffer = Arc::new(SegmentBuffer::new(
        Config::new().segment_size(256).max_segments(8),
    ));
    let config = StressConfig {
        segments_per_writer: 1_000,
        writers: 2,
        readers: 4,
        reads_per_reader: 2_000,
    };

    let result = stress_concurrent_readers_writers(Arc::clone(&buffer), &config);
    result.print_summary("concurrent readers/writers");

    assert_eq!(result.total_ops, 4 * 2_000);
    assert_eq!(result.corrupt_ops, 0);
    assert_eq!(buffer.last_id(), 1_999);
    assert_eq!(buffer.first_id(), 1_992);
}

#[test]
fn stress_default_workload_on_default_buffer() {
    let buffer = Arc::new(SegmentBuffer::default());
    let config = StressConfig::default();

    let result = stress_concurrent_readers_writers(Arc::clone(&buffer), &config);
    result.print_summary("default workload");

    assert_eq!(result.total_ops, config.readers * config.reads_per_reader);
    assert_eq!(result.corrupt_ops, 0);
    let written = (config.writers * config.segments_per_writer) as i64;
    assert_eq!(buffer.last_id(), written - 1);
    assert_eq!(buffer.segment_count(), buffer.max_segments());
}

#[test]
fn slow_sinks_do_not_block_producer() {
    let buffer = Arc::new(filled_buffer(64, 4, 4));
    let delay = Duration::from_millis(400);

    let append_time = stress_slow_sinks(Arc::clone(&buffer), 4, delay);

    assert!(append_time < delay / 2, "append waited {append_time:?}");
    assert_eq!(buffer.last_id(), 4);
}

proptest! {
    #![proptest_config(PropTestConfig::default().to_proptest_config())]

    #[test]
    fn window_invariant_holds(config in config_strategy(), writes in append_sequence_strategy()) {
        let buffer = SegmentBuffer::new(config.clone());
        let capacity = config.capacity_bytes();

        for len in writes {
            let before = buffer.stats();
            let result = buffer.append(&vec![0xEE; len]);

            if !config.allow_overflow && len > capacity {
                prop_assert!(matches!(result, Err(BufferError::TooLargeWrite)));
                prop_assert_eq!(buffer.stats(), before);
                continue;
            }

            prop_assert_eq!(result.unwrap(), len);
            let stats = buffer.stats();
            prop_assert_eq!((stats.last_id - stats.first_id + 1) as usize, stats.segment_count);
            prop_assert_eq!(
                stats.segment_count * stats.segment_size + stats.pending_bytes,
                stats.byte_size
            );
            prop_assert!(stats.pending_bytes < stats.segment_size);
            prop_assert!(stats.byte_size <= capacity);
            prop_assert!(stats.first_id >= before.first_id);
            prop_assert!(stats.last_id >= before.last_id);

            if len > 0 {
                let mut dest = vec![0u8; stats.segment_size];
                prop_assert!(matches!(
                    buffer.fetch(&mut dest, stats.first_id - 1),
                    Err(BufferError::Miss)
                ));
                prop_assert!(matches!(
                    buffer.fetch(&mut dest, stats.last_id + 1),
                    Err(BufferError::Miss)
                ));
            }
        }
    }
}

#[test]
fn evicted_by_partial_tail_is_miss_not_empty() {
    let buffer = SegmentBuffer::new(Config::new().segment_size(4).max_segments(1));
    let mut dest = [0u8; 4];

    buffer.append(b"aaaa").unwrap();
    buffer.fetch(&mut dest, 0).unwrap();

    buffer.append(b"bb").unwrap();
    assert_eq!(buffer.segment_count(), 0);
    assert!(matches!(buffer.fetch(&mut dest, 0), Err(BufferError::Miss)));

    let mut sink = RecordingSink::new();
    assert!(matches!(buffer.stream_id(&mut sink, 0), Err(BufferError::Miss)));
    assert!(sink.data().is_empty());
}

proptest! {
    #![proptest_config(PropTestConfig::quick().to_proptest_config())]

    #[test]
    fn round_trip_single_segment(
        config in config_strategy(),
        seed in any::<u8>(),
    ) {
        let buffer = SegmentBuffer::new(config.clone());
        let payload: Vec<u8> = (0..config.segment_size)
            .map(|i| seed.wrapping_add(i as u8))
            .collect();
        buffer.append(&payload).unwrap();

        let mut dest = vec![0u8; config.segment_size];
        buffer.fetch(&mut dest, config.start_id).unwrap();
        prop_assert_eq!(dest, payload);
    }

    #[test]
    fn small_destination_always_rejected(
        config in config_strategy(),
        id in -2_000i64..2_000,
        written in 0i64..4,
    ) {
        let buffer = SegmentBuffer::new(config.clone());
        for n in 0..written {
            buffer.append(&patterned_segment(n, config.segment_size)).unwrap();
        }

        let mut dest = vec![0u8; config.segment_size - 1];
        prop_assert!(matches!(buffer.fetch(&mut dest, id), Err(BufferError::BufferTooSmall)));
    }

    #[test]
    fn empty_then_miss(config in config_strategy(), id in -2_000i64..2_000) {
        let buffer = SegmentBuffer::new(config.clone());
        let mut dest = vec![0u8; config.segment_size];
        prop_assert!(matches!(buffer.fetch(&mut dest, id), Err(BufferError::Empty)));

        buffer.append(&vec![1u8; config.segment_size]).unwrap();
        let result = buffer.fetch(&mut dest, id);
        if id == config.start_id {
            prop_assert!(result.is_ok());
        } else {
            prop_assert!(matches!(result, Err(BufferError::Miss)));
        }
    }
}

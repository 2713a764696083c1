//! Buffer fixtures and instrumented sinks.

use parking_lot::Mutex;
use segbuf_core::{Config, SegmentBuffer};
use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Builds one segment whose bytes encode `id`.
///
/// Byte `i` is `(id + i) mod 256`, so a segment can be checked against its
/// ID with [`segment_matches`] and a torn copy is detectable.
pub fn patterned_segment(id: i64, segment_size: usize) -> Vec<u8> {
    (0..segment_size)
        .map(|i| (id.wrapping_add(i as i64) & 0xff) as u8)
        .collect()
}

/// Returns `true` if `data` is exactly the pattern for `id`.
pub fn segment_matches(data: &[u8], id: i64) -> bool {
    data.iter()
        .enumerate()
        .all(|(i, &b)| b == (id.wrapping_add(i as i64) & 0xff) as u8)
}

/// Creates a buffer and appends `written` patterned segments, IDs starting
/// at zero.
///
/// # Panics
///
/// Panics if an append fails, which cannot happen for one-segment writes.
pub fn filled_buffer(segment_size: usize, max_segments: usize, written: i64) -> SegmentBuffer {
    let buffer = SegmentBuffer::new(
        Config::new()
            .segment_size(segment_size)
            .max_segments(max_segments),
    );
    for id in 0..written {
        buffer
            .append(&patterned_segment(id, segment_size))
            .expect("Failed to append segment");
    }
    buffer
}

/// A sink that fails every write with the given error kind.
#[derive(Debug, Clone, Copy)]
pub struct FailingSink {
    kind: io::ErrorKind,
}

impl FailingSink {
    /// Creates a sink failing with `kind`.
    pub fn new(kind: io::ErrorKind) -> Self {
        Self { kind }
    }
}

impl Default for FailingSink {
    fn default() -> Self {
        Self::new(io::ErrorKind::BrokenPipe)
    }
}

impl Write for FailingSink {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(self.kind, "sink failure"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A sink that records every chunk it receives.
///
/// Clones share the received bytes and the write counter, so a test can
/// keep a handle while the sink itself moves into a worker thread.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    data: Arc<Mutex<Vec<u8>>>,
    writes: Arc<AtomicUsize>,
}

impl RecordingSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the bytes received across all clones.
    pub fn data(&self) -> Vec<u8> {
        self.data.lock().clone()
    }

    /// Returns the number of write calls across all clones.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }
}

impl Write for RecordingSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writes.fetch_add(1, Ordering::Relaxed);
        self.data.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patterned_segment_matches_own_id() {
        let segment = patterned_segment(300, 64);
        assert!(segment_matches(&segment, 300));
        assert!(!segment_matches(&segment, 301));
    }

    #[test]
    fn filled_buffer_window() {
        let buffer = filled_buffer(8, 3, 5);
        assert_eq!(buffer.first_id(), 2);
        assert_eq!(buffer.last_id(), 4);
    }

    #[test]
    fn failing_sink_fails() {
        let mut sink = FailingSink::new(io::ErrorKind::TimedOut);
        let err = sink.write(b"x").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::TimedOut);
    }

    #[test]
    fn recording_sink_clones_share_state() {
        let mut sink = RecordingSink::new();
        let handle = sink.clone();
        sink.write_all(b"ab").unwrap();
        sink.write_all(b"cd").unwrap();
        assert_eq!(sink.data(), b"abcd");
        assert_eq!(handle.data(), b"abcd");
        assert_eq!(handle.writes(), 2);
    }

    #[test]
    fn recording_sink_handle_sees_worker_writes() {
        let buffer = filled_buffer(8, 4, 3);
        let handle = RecordingSink::new();
        let mut sink = handle.clone();

        std::thread::scope(|s| {
            s.spawn(|| {
                for id in 0..3 {
                    buffer.stream_id(&mut sink, id).unwrap();
                }
            });
        });

        let expected: Vec<u8> = (0..3).flat_map(|id| patterned_segment(id, 8)).collect();
        assert_eq!(handle.data(), expected);
        assert_eq!(handle.writes(), 3);
    }
}

//! Stress tests for SegBuf.
//!
//! These helpers hammer one buffer from several threads and verify that
//! every segment a reader receives is intact.

use crate::fixtures::{patterned_segment, segment_matches};
use parking_lot::Mutex;
use segbuf_core::{BufferError, SegmentBuffer};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Result of a stress test run.
#[derive(Debug, Clone)]
pub struct StressTestResult {
    /// Total operations performed.
    pub total_ops: usize,
    /// Successful operations.
    pub successful_ops: usize,
    /// Reads that missed or found the buffer empty.
    pub missed_ops: usize,
    /// Reads that returned bytes not matching the requested ID.
    pub corrupt_ops: usize,
    /// Total duration.
    pub duration: Duration,
    /// Operations per second.
    pub ops_per_second: f64,
}

impl StressTestResult {
    /// Creates a new result.
    pub fn new(successful: usize, missed: usize, corrupt: usize, duration: Duration) -> Self {
        let total = successful + missed + corrupt;
        let ops_per_second = if duration.as_secs_f64() > 0.0 {
            total as f64 / duration.as_secs_f64()
        } else {
            0.0
        };

        Self {
            total_ops: total,
            successful_ops: successful,
            missed_ops: missed,
            corrupt_ops: corrupt,
            duration,
            ops_per_second,
        }
    }

    /// Prints a summary of the test.
    pub fn print_summary(&self, name: &str) {
        println!("\n=== {} ===", name);
        println!("Total operations: {}", self.total_ops);
        println!("Successful: {}", self.successful_ops);
        println!("Missed: {}", self.missed_ops);
        println!("Corrupt: {}", self.corrupt_ops);
        println!("Duration: {:?}", self.duration);
        println!("Throughput: {:.2} ops/sec", self.ops_per_second);
    }
}

/// Configuration for stress tests.
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Segments appended by each writer.
    pub segments_per_writer: usize,
    /// Number of writer threads.
    pub writers: usize,
    /// Number of reader threads.
    pub readers: usize,
    /// Reads performed by each reader.
    pub reads_per_reader: usize,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            segments_per_writer: 2_000,
            writers: 1,
            readers: 4,
            reads_per_reader: 5_000,
        }
    }
}

#[derive(Default)]
struct Counters {
    successful: AtomicUsize,
    missed: AtomicUsize,
    corrupt: AtomicUsize,
}

impl Counters {
    fn record(&self, outcome: Result<bool, BufferError>) {
        let counter = match outcome {
            Ok(true) => &self.successful,
            Ok(false) => &self.corrupt,
            Err(BufferError::Miss | BufferError::Empty) => &self.missed,
            Err(_) => &self.corrupt,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Runs writers and readers concurrently against `buffer`.
///
/// Writers append whole patterned segments keyed by the ID each one
/// receives, so the buffer must be segment-aligned before the run. Readers
/// alternate between [`SegmentBuffer::fetch`] and
/// [`SegmentBuffer::stream_id`] on the newest ID.
///
/// Only reads are counted in the result.
///
/// # Panics
///
/// Panics if a worker thread panics.
pub fn stress_concurrent_readers_writers(
    buffer: Arc<SegmentBuffer>,
    config: &StressConfig,
) -> StressTestResult {
    let counters = Arc::new(Counters::default());
    // Held across "take next ID + append" so patterns line up with IDs.
    let next_id = Arc::new(Mutex::new(buffer.last_id() + 1));

    let start = Instant::now();

    let writers: Vec<_> = (0..config.writers)
        .map(|_| {
            let buffer = Arc::clone(&buffer);
            let next_id = Arc::clone(&next_id);
            let segments = config.segments_per_writer;
            thread::spawn(move || {
                for _ in 0..segments {
                    let mut id = next_id.lock();
                    buffer
                        .append(&patterned_segment(*id, buffer.segment_size()))
                        .expect("Failed to append segment");
                    *id += 1;
                }
            })
        })
        .collect();

    let readers: Vec<_> = (0..config.readers)
        .map(|r| {
            let buffer = Arc::clone(&buffer);
            let counters = Arc::clone(&counters);
            let reads = config.reads_per_reader;
            thread::spawn(move || {
                let mut dest = vec![0u8; buffer.segment_size()];
                let mut sink = Vec::with_capacity(buffer.segment_size());
                for i in 0..reads {
                    let id = buffer.last_id();
                    let outcome = if (r + i) % 2 == 0 {
                        buffer
                            .fetch(&mut dest, id)
                            .map(|()| segment_matches(&dest, id))
                    } else {
                        sink.clear();
                        buffer
                            .stream_id(&mut sink, id)
                            .map(|_| segment_matches(&sink, id))
                    };
                    counters.record(outcome);
                }
            })
        })
        .collect();

    for handle in writers.into_iter().chain(readers) {
        handle.join().expect("Thread panicked");
    }

    StressTestResult::new(
        counters.successful.load(Ordering::Relaxed),
        counters.missed.load(Ordering::Relaxed),
        counters.corrupt.load(Ordering::Relaxed),
        start.elapsed(),
    )
}

/// Streams every retained segment to fresh sinks from several threads at
/// once, while `slow` sinks sleep inside `write`.
///
/// Returns the time a concurrent append took to complete. Since sinks run
/// outside the buffer lock, this stays far below `delay`.
///
/// # Panics
///
/// Panics if the buffer is empty or a worker thread panics.
pub fn stress_slow_sinks(buffer: Arc<SegmentBuffer>, slow: usize, delay: Duration) -> Duration {
    let id = buffer.last_id();
    let handles: Vec<_> = (0..slow)
        .map(|_| {
            let buffer = Arc::clone(&buffer);
            thread::spawn(move || {
                let mut sink = SleepySink { delay };
                buffer.stream_id(&mut sink, id).expect("Failed to stream");
            })
        })
        .collect();

    // Let the sinks start sleeping before timing the append.
    thread::sleep(delay / 4);
    let start = Instant::now();
    buffer
        .append(&patterned_segment(id + 1, buffer.segment_size()))
        .expect("Failed to append segment");
    let elapsed = start.elapsed();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }
    elapsed
}

struct SleepySink {
    delay: Duration,
}

impl io::Write for SleepySink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        thread::sleep(self.delay);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

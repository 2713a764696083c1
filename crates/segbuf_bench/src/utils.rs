//! Benchmark utilities.

use rand::Rng;
use segbuf_core::{Config, SegmentBuffer};

/// Generate random stream data of the specified size.
pub fn random_data(size: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..size).map(|_| rng.gen()).collect()
}

/// Create a buffer whose window is already full.
pub fn full_buffer(segment_size: usize, max_segments: usize) -> SegmentBuffer {
    let buffer = SegmentBuffer::new(
        Config::new()
            .segment_size(segment_size)
            .max_segments(max_segments),
    );
    let data = random_data(segment_size * max_segments);
    buffer.append(&data).expect("window-sized write fits");
    buffer
}

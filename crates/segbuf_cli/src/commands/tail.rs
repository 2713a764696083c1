//! Tail command implementation.

use segbuf_core::{BufferResult, SegmentBuffer};
use std::io::{self, Write};
use std::ops::RangeInclusive;
use tracing::{info, warn};

/// Streams the newest `count` segments to stdout, oldest first.
pub fn run(buffer: &SegmentBuffer, count: usize) -> Result<(), Box<dyn std::error::Error>> {
    let mut stdout = io::stdout().lock();
    let written = write_tail(buffer, count, &mut stdout)?;
    stdout.flush()?;

    info!(count, written, "streamed tail");
    Ok(())
}

/// IDs of the newest `count` segments.
pub fn tail_range(first_id: i64, last_id: i64, count: usize) -> RangeInclusive<i64> {
    let count = i64::try_from(count).unwrap_or(i64::MAX);
    let start = last_id.saturating_sub(count).saturating_add(1).max(first_id);
    start..=last_id
}

/// Writes the newest `count` segments to `sink`, returning bytes written.
pub fn write_tail<W: Write>(
    buffer: &SegmentBuffer,
    count: usize,
    sink: &mut W,
) -> BufferResult<usize> {
    let stats = buffer.stats();
    if stats.is_empty() {
        warn!("buffer is empty, nothing to stream");
        return Ok(0);
    }

    let mut written = 0;
    for id in tail_range(stats.first_id, stats.last_id, count) {
        written += buffer.stream_id(sink, id)?;
    }
    Ok(written)
}

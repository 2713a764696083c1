//! Dump command implementation.

use segbuf_core::SegmentBuffer;
use std::io::{self, Write};
use tracing::info;

/// Streams segment `id` to stdout.
pub fn run(buffer: &SegmentBuffer, id: i64) -> Result<(), Box<dyn std::error::Error>> {
    let mut stdout = io::stdout().lock();
    let written = buffer.stream_id(&mut stdout, id)?;
    stdout.flush()?;

    info!(id, written, "dumped segment");
    Ok(())
}

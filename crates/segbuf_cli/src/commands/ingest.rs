//! Feeds an input stream into a segment buffer.
//!
//! Every other command starts here: the input is read in fixed-size chunks
//! and each chunk is appended, exactly like a live producer would.

use segbuf_core::{BufferError, Config, SegmentBuffer};
use std::fs::File;
use std::io::{self, BufReader, ErrorKind, Read};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised while ingesting the input stream.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Reading the input failed.
    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),

    /// The buffer rejected a chunk.
    #[error("append at input offset {offset} failed: {source}")]
    Append {
        /// Input offset of the rejected chunk.
        offset: u64,
        /// Buffer error.
        source: BufferError,
    },
}

/// Summary of an ingest run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Total bytes appended.
    pub bytes: u64,
    /// Number of append calls.
    pub appends: u64,
}

/// Opens `path`, or stdin when no path is given.
pub fn open_input(path: Option<&Path>) -> io::Result<Box<dyn Read>> {
    match path {
        Some(path) => Ok(Box::new(BufReader::new(File::open(path)?))),
        None => Ok(Box::new(io::stdin().lock())),
    }
}

/// Appends everything from `reader` to `buffer`, `chunk` bytes at a time.
pub fn ingest<R: Read>(
    buffer: &SegmentBuffer,
    mut reader: R,
    chunk: usize,
) -> Result<IngestReport, IngestError> {
    let mut scratch = vec![0u8; chunk.max(1)];
    let mut report = IngestReport::default();

    loop {
        let n = match reader.read(&mut scratch) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };

        buffer
            .append(&scratch[..n])
            .map_err(|source| IngestError::Append {
                offset: report.bytes,
                source,
            })?;
        report.bytes += n as u64;
        report.appends += 1;
    }

    debug!(bytes = report.bytes, appends = report.appends, "input drained");
    Ok(report)
}

/// Builds a buffer from `config` and fills it from `input`.
///
/// `chunk` defaults to one segment.
pub fn run(
    input: Option<&Path>,
    config: Config,
    chunk: Option<usize>,
) -> Result<SegmentBuffer, IngestError> {
    let buffer = SegmentBuffer::new(config);
    let chunk = chunk.unwrap_or(buffer.segment_size());
    let reader = open_input(input)?;

    let report = ingest(&buffer, reader, chunk)?;
    info!(
        bytes = report.bytes,
        first_id = buffer.first_id(),
        last_id = buffer.last_id(),
        "ingested stream"
    );

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ingest_in_segment_chunks() {
        let buffer = SegmentBuffer::new(Config::new().segment_size(4).max_segments(3));
        let input: Vec<u8> = (0..20).collect();

        let report = ingest(&buffer, &input[..], 4).unwrap();
        assert_eq!(report.bytes, 20);
        assert_eq!(report.appends, 5);
        assert_eq!(buffer.first_id(), 2);
        assert_eq!(buffer.last_id(), 4);
        assert_eq!(&buffer.segment(4).unwrap()[..], &[16, 17, 18, 19]);
    }

    #[test]
    fn ingest_unaligned_chunks() {
        let buffer = SegmentBuffer::new(Config::new().segment_size(4).max_segments(8));
        let input = [1u8; 10];

        let report = ingest(&buffer, &input[..], 3).unwrap();
        assert_eq!(report.appends, 4);
        assert_eq!(buffer.segment_count(), 2);
        assert_eq!(buffer.stats().pending_bytes, 2);
    }

    #[test]
    fn ingest_reports_rejected_chunk() {
        let buffer = SegmentBuffer::new(Config::new().segment_size(4).max_segments(1));
        let input = [0u8; 12];

        let err = ingest(&buffer, &input[..], 8).unwrap_err();
        assert!(matches!(
            err,
            IngestError::Append {
                offset: 0,
                source: BufferError::TooLargeWrite
            }
        ));
    }
}

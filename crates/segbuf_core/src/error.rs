//! Error types for segment buffer operations.

use std::io;
use thiserror::Error;

/// Result type for segment buffer operations.
pub type BufferResult<T> = Result<T, BufferError>;

/// Errors that can occur during segment buffer operations.
///
/// The first four variants describe an invalid request and never alter the
/// buffer. [`BufferError::Sink`] is reported only by
/// [`SegmentBuffer::stream_id`](crate::SegmentBuffer::stream_id) after the
/// segment was resolved, when the downstream writer failed.
#[derive(Debug, Error)]
pub enum BufferError {
    /// A single write exceeded `max_segments * segment_size` while overflow
    /// is disallowed.
    #[error("write is too large")]
    TooLargeWrite,

    /// The destination buffer is shorter than one segment.
    #[error("buffer is too small")]
    BufferTooSmall,

    /// The requested segment ID lies outside the retained window.
    #[error("buffer miss")]
    Miss,

    /// The buffer holds no bytes yet.
    #[error("buffer is empty")]
    Empty,

    /// The segment was valid but the sink failed to accept it.
    #[error("failed to forward segment to sink: {0}")]
    Sink(#[source] io::Error),
}

impl BufferError {
    /// Returns `true` if the error describes an invalid request rather than a
    /// downstream delivery failure.
    #[must_use]
    pub fn is_request_error(&self) -> bool {
        !matches!(self, Self::Sink(_))
    }
}

impl From<BufferError> for io::Error {
    fn from(err: BufferError) -> Self {
        let kind = match err {
            BufferError::Sink(inner) => return inner,
            BufferError::TooLargeWrite | BufferError::BufferTooSmall => io::ErrorKind::InvalidInput,
            BufferError::Miss | BufferError::Empty => io::ErrorKind::NotFound,
        };
        io::Error::new(kind, err)
    }
}

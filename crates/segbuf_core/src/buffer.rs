//! The segment buffer.

use crate::config::Config;
use crate::error::{BufferError, BufferResult};
use crate::stats::BufferStats;
use bytes::{Buf, Bytes, BytesMut};
use parking_lot::Mutex;
use std::fmt;
use std::io::{self, Write};
use std::ops::Range;
use tracing::{debug, trace, warn};

/// A fixed-capacity, segment-addressable in-memory stream buffer.
///
/// The buffer keeps the most recent `max_segments` segments of a byte
/// stream. Every complete segment gets a dense, monotonically increasing ID;
/// once the window is full the oldest segment is evicted for each new one.
///
/// # Thread Safety
///
/// All state sits behind one mutex. Producers and readers share the buffer
/// through an `Arc`; a reader never observes a half-applied append.
///
/// # Example
///
/// ```rust
/// use segbuf_core::{Config, SegmentBuffer};
///
/// let buffer = SegmentBuffer::new(Config::new().segment_size(4).max_segments(2));
/// buffer.append(b"aaaabbbbcccc").unwrap_err(); // larger than the window
/// buffer.append(b"aaaabbbb").unwrap();
/// buffer.append(b"cccc").unwrap();
///
/// assert_eq!(buffer.first_id(), 1);
/// assert_eq!(buffer.last_id(), 2);
///
/// let mut out = [0u8; 4];
/// buffer.fetch(&mut out, 2).unwrap();
/// assert_eq!(&out, b"cccc");
/// ```
pub struct SegmentBuffer {
    segment_size: usize,
    allow_overflow: bool,
    window: Mutex<Window>,
}

/// Mutable state guarded by the buffer lock.
struct Window {
    /// Retained segments, oldest first, plus any trailing partial segment.
    /// Eviction advances the start cursor instead of re-copying the window.
    data: BytesMut,
    first_id: i64,
    last_id: i64,
    max_segments: usize,
}

impl Window {
    fn segment_count(&self, segment_size: usize) -> usize {
        self.data.len() / segment_size
    }

    /// Maps `id` to its byte range in `data`.
    ///
    /// IDs wrap at the `i64` bounds, so window membership is tested on the
    /// wrapping distance from `first_id`.
    fn resolve(&self, id: i64, segment_size: usize) -> BufferResult<Range<usize>> {
        if self.data.is_empty() {
            return Err(BufferError::Empty);
        }
        let index = id.wrapping_sub(self.first_id) as u64;
        if index >= self.segment_count(segment_size) as u64 {
            return Err(BufferError::Miss);
        }
        let start = segment_size * index as usize;
        Ok(start..start + segment_size)
    }
}

impl SegmentBuffer {
    /// Creates a new buffer. Zero sizes in `config` fall back to defaults.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let config = config.normalized();
        Self {
            segment_size: config.segment_size,
            allow_overflow: config.allow_overflow,
            window: Mutex::new(Window {
                data: BytesMut::with_capacity(config.capacity_bytes()),
                first_id: config.start_id,
                last_id: config.start_id.wrapping_sub(1),
                max_segments: config.max_segments,
            }),
        }
    }

    /// Changes the retention limit.
    ///
    /// Already retained segments are kept; the new limit is enforced by the
    /// next [`append`](Self::append). A limit of zero is treated as one.
    pub fn set_max_segments(&self, count: usize) {
        let count = count.max(1);
        let mut window = self.window.lock();
        trace!(from = window.max_segments, to = count, "max segments changed");
        window.max_segments = count;
    }

    /// Appends stream data, evicting the oldest segments once the window
    /// exceeds `max_segments`.
    ///
    /// The payload need not be segment-aligned; a trailing partial segment
    /// becomes addressable when a later append completes it.
    ///
    /// Returns the number of bytes accepted, always `payload.len()`.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::TooLargeWrite`] if overflow is disallowed and
    /// the payload is larger than `max_segments * segment_size`. The buffer
    /// is left untouched in that case.
    pub fn append(&self, payload: &[u8]) -> BufferResult<usize> {
        let mut window = self.window.lock();
        let capacity = self.segment_size.saturating_mul(window.max_segments);

        if !self.allow_overflow && payload.len() > capacity {
            warn!(len = payload.len(), capacity, "rejected oversized write");
            return Err(BufferError::TooLargeWrite);
        }

        window.data.extend_from_slice(payload);
        let count = window.segment_count(self.segment_size);
        window.last_id = window.first_id.wrapping_add(count as i64).wrapping_sub(1);

        let mut evicted = 0usize;
        while window.data.len() > capacity && window.data.len() >= self.segment_size {
            window.data.advance(self.segment_size);
            window.first_id = window.first_id.wrapping_add(1);
            evicted += 1;
        }

        if evicted > 0 {
            debug!(
                evicted,
                first_id = window.first_id,
                last_id = window.last_id,
                "window advanced"
            );
        }
        trace!(len = payload.len(), size = window.data.len(), "append");

        Ok(payload.len())
    }

    /// Copies segment `id` into the head of `dest`.
    ///
    /// # Errors
    ///
    /// - [`BufferError::BufferTooSmall`] if `dest` is shorter than one
    ///   segment, whatever the ID
    /// - [`BufferError::Empty`] if the buffer holds no bytes at all
    /// - [`BufferError::Miss`] if `id` is outside `[first_id, last_id]`,
    ///   including while only a partial segment is held
    pub fn fetch(&self, dest: &mut [u8], id: i64) -> BufferResult<()> {
        if dest.len() < self.segment_size {
            return Err(BufferError::BufferTooSmall);
        }
        let window = self.window.lock();
        let range = window.resolve(id, self.segment_size)?;
        dest[..self.segment_size].copy_from_slice(&window.data[range]);
        Ok(())
    }

    /// Returns an owned copy of segment `id`.
    ///
    /// # Errors
    ///
    /// Same ID resolution errors as [`fetch`](Self::fetch).
    pub fn segment(&self, id: i64) -> BufferResult<Bytes> {
        let window = self.window.lock();
        let range = window.resolve(id, self.segment_size)?;
        Ok(Bytes::copy_from_slice(&window.data[range]))
    }

    /// Writes segment `id` to `sink`.
    ///
    /// The segment is copied out under the lock, and the lock is released
    /// before `sink` is called, so a slow sink never blocks other buffer
    /// operations.
    ///
    /// The sink receives the segment through `write_all`, so on success it has
    /// accepted every byte and the returned count is the segment size.
    ///
    /// # Errors
    ///
    /// - [`BufferError::Empty`] or [`BufferError::Miss`] if `id` does not
    ///   resolve
    /// - [`BufferError::Sink`] if the sink fails
    pub fn stream_id<W>(&self, sink: &mut W, id: i64) -> BufferResult<usize>
    where
        W: Write + ?Sized,
    {
        let segment = self.segment(id)?;
        sink.write_all(&segment).map_err(BufferError::Sink)?;
        Ok(segment.len())
    }

    /// Returns `true` if `id` currently resolves to a segment.
    #[must_use]
    pub fn contains(&self, id: i64) -> bool {
        self.window.lock().resolve(id, self.segment_size).is_ok()
    }

    /// Returns the segment size in bytes.
    #[must_use]
    pub fn segment_size(&self) -> usize {
        self.segment_size
    }

    /// Returns whether oversized writes are accepted.
    #[must_use]
    pub fn allow_overflow(&self) -> bool {
        self.allow_overflow
    }

    /// Returns the ID of the oldest retained segment.
    #[must_use]
    pub fn first_id(&self) -> i64 {
        self.window.lock().first_id
    }

    /// Returns the ID of the newest complete segment.
    ///
    /// Equals `first_id() - 1` (wrapping) while no complete segment is held.
    #[must_use]
    pub fn last_id(&self) -> i64 {
        self.window.lock().last_id
    }

    /// Returns the number of complete segments retained.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.window.lock().segment_count(self.segment_size)
    }

    /// Returns the current retention limit.
    #[must_use]
    pub fn max_segments(&self) -> usize {
        self.window.lock().max_segments
    }

    /// Returns the number of bytes held, including a trailing partial
    /// segment.
    #[must_use]
    pub fn byte_size(&self) -> usize {
        self.window.lock().data.len()
    }

    /// Returns a consistent snapshot of the window.
    #[must_use]
    pub fn stats(&self) -> BufferStats {
        let window = self.window.lock();
        let segment_count = window.segment_count(self.segment_size);
        BufferStats {
            first_id: window.first_id,
            last_id: window.last_id,
            segment_count,
            max_segments: window.max_segments,
            segment_size: self.segment_size,
            byte_size: window.data.len(),
            pending_bytes: window.data.len() - segment_count * self.segment_size,
        }
    }
}

impl Default for SegmentBuffer {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl fmt::Debug for SegmentBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SegmentBuffer")
            .field("allow_overflow", &self.allow_overflow)
            .field("stats", &self.stats())
            .finish()
    }
}

impl Write for &SegmentBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.append(buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Write for SegmentBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.append(buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

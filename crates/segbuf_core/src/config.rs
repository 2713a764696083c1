//! Segment buffer configuration.

/// Segment size used when a configuration leaves it at zero.
pub const DEFAULT_SEGMENT_SIZE: usize = 1024;

/// Retained segment count used when a configuration leaves it at zero.
pub const DEFAULT_MAX_SEGMENTS: usize = 8;

/// Configuration for creating a [`SegmentBuffer`](crate::SegmentBuffer).
///
/// Zero values for `segment_size` or `max_segments` are replaced by
/// [`DEFAULT_SEGMENT_SIZE`] and [`DEFAULT_MAX_SEGMENTS`] at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Bytes per segment. Fixed for the lifetime of the buffer.
    pub segment_size: usize,

    /// Maximum number of segments retained.
    pub max_segments: usize,

    /// ID assigned to the first segment written.
    pub start_id: i64,

    /// Whether a single write larger than the whole window is accepted
    /// (and trimmed) instead of rejected.
    pub allow_overflow: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            segment_size: DEFAULT_SEGMENT_SIZE,
            max_segments: DEFAULT_MAX_SEGMENTS,
            start_id: 0,
            allow_overflow: false,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the segment size in bytes.
    #[must_use]
    pub const fn segment_size(mut self, size: usize) -> Self {
        self.segment_size = size;
        self
    }

    /// Sets the maximum retained segment count.
    #[must_use]
    pub const fn max_segments(mut self, count: usize) -> Self {
        self.max_segments = count;
        self
    }

    /// Sets the ID of the first segment.
    #[must_use]
    pub const fn start_id(mut self, id: i64) -> Self {
        self.start_id = id;
        self
    }

    /// Sets whether oversized writes are accepted.
    #[must_use]
    pub const fn allow_overflow(mut self, value: bool) -> Self {
        self.allow_overflow = value;
        self
    }

    /// Returns a copy with zero sizes replaced by their defaults.
    #[must_use]
    pub const fn normalized(mut self) -> Self {
        if self.segment_size == 0 {
            self.segment_size = DEFAULT_SEGMENT_SIZE;
        }
        if self.max_segments == 0 {
            self.max_segments = DEFAULT_MAX_SEGMENTS;
        }
        self
    }

    /// Total window capacity in bytes (`segment_size * max_segments`).
    #[must_use]
    pub const fn capacity_bytes(&self) -> usize {
        self.segment_size.saturating_mul(self.max_segments)
    }
}

//! Point-in-time view of a segment buffer's window.

use serde::Serialize;

/// A consistent snapshot of a [`SegmentBuffer`](crate::SegmentBuffer).
///
/// All fields are read under a single lock acquisition, so they always
/// describe the same window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BufferStats {
    /// ID of the oldest retained segment.
    pub first_id: i64,
    /// ID of the newest complete segment (`first_id - 1` when empty).
    pub last_id: i64,
    /// Number of complete, addressable segments.
    pub segment_count: usize,
    /// Configured retention limit.
    pub max_segments: usize,
    /// Bytes per segment.
    pub segment_size: usize,
    /// Bytes held, including any trailing partial segment.
    pub byte_size: usize,
    /// Bytes of the trailing partial segment.
    pub pending_bytes: usize,
}

impl BufferStats {
    /// Returns `true` if no complete segment is retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segment_count == 0
    }

    /// Fraction of the window currently filled by complete segments.
    #[must_use]
    pub fn fill_ratio(&self) -> f64 {
        if self.max_segments == 0 {
            return 0.0;
        }
        self.segment_count as f64 / self.max_segments as f64
    }
}

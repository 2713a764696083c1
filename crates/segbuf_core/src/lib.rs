//! # SegBuf Core
//!
//! A fixed-capacity, segment-addressable in-memory buffer for live byte
//! streams.
//!
//! A producer appends stream data; the buffer cuts it into fixed-size
//! segments and numbers them with dense, increasing IDs. Only the most
//! recent `max_segments` segments are retained. Readers fetch a segment by
//! ID, either by copying it into their own buffer or by streaming it to an
//! [`std::io::Write`] sink.
//!
//! ## Design Principles
//!
//! - One lock guards the whole window; readers never see a torn update
//! - Eviction is strictly FIFO and happens only while appending
//! - Sink writes happen outside the lock
//! - Failures are values ([`BufferError`]), never panics
//!
//! ## Example
//!
//! ```rust
//! use segbuf_core::{BufferError, Config, SegmentBuffer};
//!
//! let buffer = SegmentBuffer::new(Config::new().segment_size(512).max_segments(12));
//! buffer.append(&[0u8; 12 * 512]).unwrap();
//! buffer.append(&[0u8; 2 * 512]).unwrap();
//!
//! assert_eq!(buffer.first_id(), 2);
//! assert_eq!(buffer.last_id(), 13);
//!
//! let mut segment = [0u8; 512];
//! assert!(matches!(buffer.fetch(&mut segment, 1), Err(BufferError::Miss)));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod buffer;
mod config;
mod error;
mod stats;

pub use buffer::SegmentBuffer;
pub use config::{Config, DEFAULT_MAX_SEGMENTS, DEFAULT_SEGMENT_SIZE};
pub use error::{BufferError, BufferResult};
pub use stats::BufferStats;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

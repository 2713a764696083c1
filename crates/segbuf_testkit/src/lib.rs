//! # SegBuf Testkit
//!
//! Test utilities for SegBuf.
//!
//! This crate provides:
//! - Property-based test generators using proptest
//! - Buffer fixtures and instrumented sinks
//! - Concurrent stress testing utilities
//!
//! ## Usage
//!
//! ```rust
//! use segbuf_testkit::prelude::*;
//!
//! let buffer = filled_buffer(16, 4, 6);
//! assert_eq!(buffer.first_id(), 2);
//! assert!(segment_matches(&buffer.segment(5).unwrap(), 5));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod stress;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::stress::*;
}

pub use fixtures::*;
pub use generators::*;
pub use stress::*;

//! Benchmark support for SegBuf.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod utils;

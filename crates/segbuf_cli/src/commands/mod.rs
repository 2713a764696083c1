//! CLI command implementations.

pub mod dump;
pub mod ingest;
pub mod inspect;
pub mod tail;

//! Property-based test generators using proptest.
//!
//! Provides strategies for generating buffer configurations and producer
//! write sequences.

use proptest::prelude::*;
use segbuf_core::Config;

/// Strategy for generating arbitrary payload bytes up to `max_len`.
pub fn payload_strategy(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Strategy for generating small, valid buffer configurations.
///
/// Sizes stay small so windows slide often within a short test.
pub fn config_strategy() -> impl Strategy<Value = Config> {
    (1usize..=64, 1usize..=16, -1_000i64..1_000, any::<bool>()).prop_map(
        |(segment_size, max_segments, start_id, allow_overflow)| {
            Config::new()
                .segment_size(segment_size)
                .max_segments(max_segments)
                .start_id(start_id)
                .allow_overflow(allow_overflow)
        },
    )
}

/// Strategy for generating a sequence of producer write lengths.
///
/// Lengths deliberately include unaligned and oversized writes.
pub fn append_sequence_strategy() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0usize..2_048, 1..48)
}

/// Property test configuration.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}

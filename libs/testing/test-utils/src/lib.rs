//! Shared test utilities for domain testing
//!
//! This crate provides reusable test infrastructure for the domain crates:
//! - `TestDatabase`: PostgreSQL container with automatic cleanup (feature: "postgres")
//! - `catalog`: Deterministic product catalog fixture (feature: "postgres")
//! - `TestDataBuilder`: Deterministic test data generation (always available)
//! - `assertions`: Custom assertion helpers (always available)
//!
//! # Usage
//!
//! ```rust,no_run
//! use test_utils::{TestDatabase, catalog};
//!
//! #[tokio::test]
//! async fn my_postgres_test() {
//!     let db = TestDatabase::new().await;
//!     catalog::seed_catalog(&db.connection).await.unwrap();
//! }
//! ```

use std::ops::RangeInclusive;

use rand::SeedableRng;
use rand::distr::{Distribution, Uniform};
use rand::rngs::StdRng;

// Conditionally compile database modules based on features
#[cfg(feature = "postgres")]
pub mod catalog;

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

/// Builder for test data with deterministic randomization
///
/// This ensures tests are reproducible by using seeded random data.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Create a new builder with a seed (for deterministic tests)
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Pseudo-random number in `range`, fixed for a given seed and index.
    ///
    /// An empty range yields its start.
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(7);
    /// let score = builder.number(3, 1..=5);
    /// assert!((1..=5).contains(&score));
    /// assert_eq!(score, builder.number(3, 1..=5));
    /// ```
    pub fn number(&self, index: u64, range: RangeInclusive<u64>) -> u64 {
        let mut rng = StdRng::seed_from_u64(self.seed ^ index);
        Uniform::new_inclusive(*range.start(), *range.end())
            .map(|dist| dist.sample(&mut rng))
            .unwrap_or(*range.start())
    }
}

/// Test assertion helpers
pub mod assertions {
    /// Assert that a sequence is sorted by `key`, ties broken by `id` in the same direction
    pub fn assert_ordered_by<T, K: PartialOrd>(
        items: &[T],
        key: impl Fn(&T) -> K,
        id: impl Fn(&T) -> i64,
        descending: bool,
        context: &str,
    ) {
        for pair in items.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let (ka, kb) = (key(a), key(b));
            let in_order = if ka == kb {
                if descending { id(a) > id(b) } else { id(a) < id(b) }
            } else if descending {
                ka > kb
            } else {
                ka < kb
            };
            assert!(
                in_order,
                "{}: rows {} and {} are out of order",
                context,
                id(a),
                id(b)
            );
        }
    }

    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }
}

//! Shared test utilities for the task service
//!
//! - `TestDatabase`: PostgreSQL container with the task schema applied (feature: "postgres")
//! - `TestDataBuilder`: Deterministic test data generation (always available)
//! - `assertions`: Custom assertion helpers (always available)
//!
//! ```rust,no_run
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn my_postgres_test() {
//!     let db = TestDatabase::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!
//!     let name = builder.name("task", "main");
//! }
//! ```

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

/// Builder for test data with deterministic randomization
///
/// Seeds derive from the test name so reruns produce the same values and
/// parallel tests sharing a database do not collide.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_task");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Unique name, e.g. `test-task-12345-main`
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(7);
    /// assert_eq!(builder.name("task", "main"), "test-task-7-main");
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// A year far from the current date, unique per seed, for month filters
    /// that must only see this test's rows.
    pub fn year(&self) -> i32 {
        2100 + (self.seed % 7000) as i32
    }

    /// `MM-YYYY` label for `month` of [`year`](Self::year).
    pub fn month_label(&self, month: u32) -> String {
        format!("{:02}-{}", month, self.year())
    }
}

/// Test assertion helpers
pub mod assertions {
    use serde_json::Value;

    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Assert that a response body is exactly `{"error": marker}`
    pub fn assert_error_body(body: &Value, marker: &str) {
        assert_eq!(
            body,
            &serde_json::json!({ "error": marker }),
            "expected error marker {marker}, got {body}"
        );
    }
}

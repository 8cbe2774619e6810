//! Shared test utilities for domain testing
//!
//! This crate provides reusable test infrastructure for the domain crates:
//! - `TestQdrant`: Qdrant container with automatic cleanup (feature: "qdrant")
//! - `TestDataDir`: Temporary data directory removed on drop (always available)
//! - `TestDataBuilder`: Deterministic test data generation (always available)
//! - `assertions`: Custom assertion helpers (always available)
//!
//! # Features
//!
//! - `qdrant` (default): Enables Qdrant test infrastructure
//! - `all`: Enables all container test infrastructure
//!
//! # Usage
//!
//! ```rust,no_run
//! use test_utils::{TestDataBuilder, TestDataDir, TestQdrant};
//!
//! #[tokio::test]
//! async fn my_store_test() {
//!     let qdrant = TestQdrant::new().await;
//!     let dir = TestDataDir::new();
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!
//!     let pod_id = builder.pod_id("main");
//! }
//! ```

use std::path::Path;

use tempfile::TempDir;

#[cfg(feature = "qdrant")]
mod qdrant;

#[cfg(feature = "qdrant")]
pub use qdrant::TestQdrant;

/// Builder for test data with deterministic naming
///
/// Two tests never share pod ids, and one test always gets the same ids.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Create a new builder with a seed (for deterministic tests)
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_seed_pod");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Generate a unique pod id for testing
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("my_test");
    /// let pod_id = builder.pod_id("main");
    /// assert!(pod_id.starts_with("test-pod-"));
    /// ```
    pub fn pod_id(&self, suffix: &str) -> String {
        self.name("pod", suffix)
    }

    /// Generate a unique name for testing
    ///
    /// # Arguments
    ///
    /// * `prefix` - The type of resource (e.g., "pod", "user")
    /// * `suffix` - A unique identifier within the test (e.g., "main", "backup")
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }
}

/// Temporary data directory, removed with everything in it on drop.
pub struct TestDataDir {
    dir: TempDir,
}

impl TestDataDir {
    pub fn new() -> Self {
        let dir = tempfile::Builder::new()
            .prefix("pods-test-")
            .tempdir()
            .expect("Failed to create temporary data directory");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

impl Default for TestDataDir {
    fn default() -> Self {
        Self::new()
    }
}

/// Test assertion helpers
pub mod assertions {
    /// Assert that similarity scores come best-first
    pub fn assert_descending(scores: &[f32], context: &str) {
        for pair in scores.windows(2) {
            assert!(
                pair[0] >= pair[1],
                "{}: scores not in descending order: {:?}",
                context,
                scores
            );
        }
    }

    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }
}

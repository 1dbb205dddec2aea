//! Tracing/logging setup shared by binaries and test suites.

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Initialize logging for test runs (captured per test, quiet by default).
pub fn init_for_tests() {
    tracing::init_for_tests();
}

/// Tracing configuration (filters, output format).
pub mod tracing;

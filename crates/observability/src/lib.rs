//! Process-wide logging setup for console hosts and test binaries.

/// Subscriber construction (filters, formatters).
pub mod subscriber;

/// Initialize JSON logging filtered by `RUST_LOG` (default `info`).
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    subscriber::init("info");
}

/// Human-readable logging captured by the test harness.
///
/// Safe to call from every test.
pub fn init_for_tests() {
    subscriber::init_test("debug");
}

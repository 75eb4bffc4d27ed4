//! Tracing, logging and request metrics shared by the movie tracker binaries.

/// Tracing configuration (filters, layers).
pub mod tracing;

/// Request counters and latency histograms.
pub mod metrics;

pub use crate::metrics::HttpMetrics;
pub use crate::tracing::LogFormat;

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init(format: LogFormat) {
    tracing::init(format);
}

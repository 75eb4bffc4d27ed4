//! HTTP request metrics, kept in process and exported in the Prometheus text
//! format.
//!
//! Two families are tracked:
//!
//! - `http_requests_total{method, path, status}`: counter
//! - `http_request_duration_seconds{method, path}`: histogram
//!
//! `path` should be the route template (`/api/v1/movies/:id`), not the raw
//! request path, so the label set stays bounded.

use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Upper bounds, in seconds, of the latency histogram buckets.
pub const LATENCY_BUCKETS: [f64; 10] = [0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0];

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct RequestKey {
    method: String,
    path: String,
    status: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct RouteKey {
    method: String,
    path: String,
}

/// Cumulative latency histogram for one route.
#[derive(Debug, Clone, Default)]
struct Histogram {
    /// `buckets[i]` counts observations `<= LATENCY_BUCKETS[i]`.
    buckets: [u64; LATENCY_BUCKETS.len()],
    count: u64,
    sum_seconds: f64,
}

impl Histogram {
    fn observe(&mut self, seconds: f64) {
        for (bound, bucket) in LATENCY_BUCKETS.iter().zip(self.buckets.iter_mut()) {
            if seconds <= *bound {
                *bucket += 1;
            }
        }
        self.count += 1;
        self.sum_seconds += seconds;
    }
}

#[derive(Debug, Default)]
struct Registry {
    requests: BTreeMap<RequestKey, u64>,
    latency: BTreeMap<RouteKey, Histogram>,
}

/// Per-request counters and latency histograms.
///
/// Shared behind an `Arc`; recording takes a short mutex. A poisoned lock is
/// recovered rather than reported, since a lost sample is harmless.
#[derive(Debug, Default)]
pub struct HttpMetrics {
    registry: Mutex<Registry>,
}

impl HttpMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one finished request.
    pub fn record(&self, method: &str, path: &str, status: u16, elapsed: Duration) {
        let mut registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);

        *registry
            .requests
            .entry(RequestKey {
                method: method.to_string(),
                path: path.to_string(),
                status,
            })
            .or_default() += 1;

        registry
            .latency
            .entry(RouteKey {
                method: method.to_string(),
                path: path.to_string(),
            })
            .or_default()
            .observe(elapsed.as_secs_f64());
    }

    /// Number of requests seen for one `(method, path, status)` triple.
    pub fn request_count(&self, method: &str, path: &str, status: u16) -> u64 {
        let registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        registry
            .requests
            .get(&RequestKey {
                method: method.to_string(),
                path: path.to_string(),
                status,
            })
            .copied()
            .unwrap_or(0)
    }

    /// Render every series in the Prometheus text exposition format (0.0.4).
    pub fn render(&self) -> String {
        let registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        let mut out = String::new();

        // Writing into a String cannot fail.
        let _ = writeln!(out, "# HELP http_requests_total Total HTTP requests.");
        let _ = writeln!(out, "# TYPE http_requests_total counter");
        for (key, count) in &registry.requests {
            let _ = writeln!(
                out,
                "http_requests_total{{method=\"{}\",path=\"{}\",status=\"{}\"}} {count}",
                escape(&key.method),
                escape(&key.path),
                key.status,
            );
        }

        let _ = writeln!(out, "# HELP http_request_duration_seconds HTTP request latency.");
        let _ = writeln!(out, "# TYPE http_request_duration_seconds histogram");
        for (key, histogram) in &registry.latency {
            let labels = format!(
                "method=\"{}\",path=\"{}\"",
                escape(&key.method),
                escape(&key.path)
            );
            for (bound, count) in LATENCY_BUCKETS.iter().zip(histogram.buckets.iter()) {
                let _ = writeln!(
                    out,
                    "http_request_duration_seconds_bucket{{{labels},le=\"{bound}\"}} {count}"
                );
            }
            let _ = writeln!(
                out,
                "http_request_duration_seconds_bucket{{{labels},le=\"+Inf\"}} {}",
                histogram.count
            );
            let _ = writeln!(
                out,
                "http_request_duration_seconds_sum{{{labels}}} {}",
                histogram.sum_seconds
            );
            let _ = writeln!(
                out,
                "http_request_duration_seconds_count{{{labels}}} {}",
                histogram.count
            );
        }

        out
    }
}

fn escape(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_per_method_path_and_status() {
        let metrics = HttpMetrics::new();
        metrics.record("GET", "/health", 200, Duration::from_millis(1));
        metrics.record("GET", "/health", 200, Duration::from_millis(2));
        metrics.record("GET", "/health", 500, Duration::from_millis(2));

        assert_eq!(metrics.request_count("GET", "/health", 200), 2);
        assert_eq!(metrics.request_count("GET", "/health", 500), 1);
        assert_eq!(metrics.request_count("POST", "/health", 200), 0);
    }

    #[test]
    fn histogram_buckets_are_cumulative() {
        let metrics = HttpMetrics::new();
        metrics.record("GET", "/a", 200, Duration::from_millis(3));
        metrics.record("GET", "/a", 200, Duration::from_millis(200));
        metrics.record("GET", "/a", 200, Duration::from_secs(10));

        let text = metrics.render();
        assert!(text.contains(
            "http_request_duration_seconds_bucket{method=\"GET\",path=\"/a\",le=\"0.005\"} 1"
        ));
        assert!(text.contains(
            "http_request_duration_seconds_bucket{method=\"GET\",path=\"/a\",le=\"0.25\"} 2"
        ));
        assert!(text.contains(
            "http_request_duration_seconds_bucket{method=\"GET\",path=\"/a\",le=\"5\"} 2"
        ));
        assert!(text.contains(
            "http_request_duration_seconds_bucket{method=\"GET\",path=\"/a\",le=\"+Inf\"} 3"
        ));
        assert!(text.contains("http_request_duration_seconds_count{method=\"GET\",path=\"/a\"} 3"));
    }

    #[test]
    fn render_exposes_counter_family() {
        let metrics = HttpMetrics::new();
        metrics.record("DELETE", "/api/v1/movies/:id", 204, Duration::ZERO);

        let text = metrics.render();
        assert!(text.contains("# TYPE http_requests_total counter"));
        assert!(text.contains(
            "http_requests_total{method=\"DELETE\",path=\"/api/v1/movies/:id\",status=\"204\"} 1"
        ));
    }

    #[test]
    fn label_values_are_escaped() {
        assert_eq!(escape(r#"a"b\c"#), r#"a\"b\\c"#);
    }
}

//! Prometheus-compatible metrics for the registry server.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug)]
struct MetricsInner {
    /// Total HTTP requests served.
    http_requests_total: AtomicU64,
    /// Total HTTP errors (5xx).
    http_errors_total: AtomicU64,
    /// Catalog rebuilds (one per `/api/skills` request).
    catalog_builds_total: AtomicU64,
    /// Tags dropped while aggregating.
    skipped_tags_total: AtomicU64,
    started_at: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner {
                http_requests_total: AtomicU64::new(0),
                http_errors_total: AtomicU64::new(0),
                catalog_builds_total: AtomicU64::new(0),
                skipped_tags_total: AtomicU64::new(0),
                started_at: Instant::now(),
            }),
        }
    }

    pub fn inc_http_requests(&self) {
        self.inner.http_requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_http_errors(&self) {
        self.inner.http_errors_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_catalog_builds(&self) {
        self.inner.catalog_builds_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_skipped_tags(&self, n: u64) {
        self.inner.skipped_tags_total.fetch_add(n, Ordering::Relaxed);
    }

    /// Render metrics in Prometheus text exposition format.
    pub fn render_prometheus(&self) -> String {
        let m = &self.inner;
        format!(
            r#"# HELP skr_uptime_seconds Time since the server started.
# TYPE skr_uptime_seconds gauge
skr_uptime_seconds {}

# HELP skr_http_requests_total Total HTTP requests served.
# TYPE skr_http_requests_total counter
skr_http_requests_total {}

# HELP skr_http_errors_total Total HTTP errors (5xx).
# TYPE skr_http_errors_total counter
skr_http_errors_total {}

# HELP skr_catalog_builds_total Total skill catalog aggregations.
# TYPE skr_catalog_builds_total counter
skr_catalog_builds_total {}

# HELP skr_skipped_tags_total Total store tags skipped during aggregation.
# TYPE skr_skipped_tags_total counter
skr_skipped_tags_total {}
"#,
            m.started_at.elapsed().as_secs(),
            m.http_requests_total.load(Ordering::Relaxed),
            m.http_errors_total.load(Ordering::Relaxed),
            m.catalog_builds_total.load(Ordering::Relaxed),
            m.skipped_tags_total.load(Ordering::Relaxed),
        )
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

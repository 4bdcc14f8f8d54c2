// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Prometheus metrics for zonecache.
//!
//! All metrics use the namespace prefix `zonecache_`.
//!
//! # Metrics Categories
//!
//! - **Lookup Metrics** - Cache hits and misses
//! - **Zone Fetch Metrics** - Cold-zone fetches, their outcome and duration
//! - **Provider Metrics** - Individual HTTP requests made to the provider API
//!
//! # Example
//!
//! ```rust,no_run
//! use zonecache::metrics::{gather_metrics, record_lookup};
//!
//! record_lookup(true);
//! println!("{}", gather_metrics().unwrap());
//! ```

use crate::constants::{
    LOOKUP_RESULT_HIT, LOOKUP_RESULT_MISS, METRICS_NAMESPACE, STATUS_ERROR, STATUS_SUCCESS,
};
use prometheus::{
    CounterVec, Encoder, Gauge, Histogram, HistogramOpts, Opts, Registry, TextEncoder,
};
use std::sync::LazyLock;
use std::time::Duration;

// ============================================================================
// Global Metrics Registry
// ============================================================================

/// Global Prometheus metrics registry
pub static METRICS_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

// ============================================================================
// Lookup Metrics
// ============================================================================

/// Total number of cache lookups by result
///
/// Labels:
/// - `result`: `hit` or `miss`
pub static LOOKUPS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_lookups_total"),
        "Total number of record lookups by result",
    );
    let counter = CounterVec::new(opts, &["result"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Zone Fetch Metrics
// ============================================================================

/// Total number of full-zone fetches by outcome
///
/// Labels:
/// - `status`: `success` or `error`
pub static ZONE_FETCHES_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_zone_fetches_total"),
        "Total number of full-zone record fetches by status",
    );
    let counter = CounterVec::new(opts, &["status"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Duration of full-zone fetches in seconds
pub static ZONE_FETCH_DURATION_SECONDS: LazyLock<Histogram> = LazyLock::new(|| {
    let opts = HistogramOpts::new(
        format!("{METRICS_NAMESPACE}_zone_fetch_duration_seconds"),
        "Duration of full-zone record fetches in seconds",
    )
    .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0]);
    let histogram = Histogram::with_opts(opts).unwrap();
    METRICS_REGISTRY
        .register(Box::new(histogram.clone()))
        .unwrap();
    histogram
});

/// Number of zones currently held in any cache instance of this process
pub static ZONES_CACHED: LazyLock<Gauge> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_zones_cached"),
        "Number of zones marked initialized in the record cache",
    );
    let gauge = Gauge::with_opts(opts).unwrap();
    METRICS_REGISTRY.register(Box::new(gauge.clone())).unwrap();
    gauge
});

// ============================================================================
// Provider Metrics
// ============================================================================

/// Total number of HTTP requests sent to the provider API
///
/// Labels:
/// - `status`: HTTP status code, or `transport_error`
pub static PROVIDER_REQUESTS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_provider_requests_total"),
        "Total number of provider API requests by status",
    );
    let counter = CounterVec::new(opts, &["status"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Helper Functions
// ============================================================================

/// Record a single cache lookup
///
/// # Arguments
/// * `found` - Whether the lookup returned a record
pub fn record_lookup(found: bool) {
    let result = if found {
        LOOKUP_RESULT_HIT
    } else {
        LOOKUP_RESULT_MISS
    };
    LOOKUPS_TOTAL.with_label_values(&[result]).inc();
}

/// Record a successful zone fetch
pub fn record_zone_fetch_success(duration: Duration) {
    ZONE_FETCHES_TOTAL
        .with_label_values(&[STATUS_SUCCESS])
        .inc();
    ZONE_FETCH_DURATION_SECONDS.observe(duration.as_secs_f64());
}

/// Record a failed zone fetch
pub fn record_zone_fetch_error(duration: Duration) {
    ZONE_FETCHES_TOTAL.with_label_values(&[STATUS_ERROR]).inc();
    ZONE_FETCH_DURATION_SECONDS.observe(duration.as_secs_f64());
}

/// Record that a zone was newly marked initialized
pub fn record_zone_cached() {
    ZONES_CACHED.inc();
}

/// Record that zones were dropped from a cache (retry policy or cache drop)
#[allow(clippy::cast_precision_loss)]
pub fn record_zones_released(count: usize) {
    ZONES_CACHED.sub(count as f64);
}

/// Record a provider API request outcome
///
/// # Arguments
/// * `status` - HTTP status code as text, or `transport_error`
pub fn record_provider_request(status: &str) {
    PROVIDER_REQUESTS_TOTAL.with_label_values(&[status]).inc();
}

/// Gather and encode all metrics in Prometheus text format
///
/// # Errors
/// Returns error if encoding fails
pub fn gather_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = METRICS_REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(format!("UTF-8 error: {e}")))
}

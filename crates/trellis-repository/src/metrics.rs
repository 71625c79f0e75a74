//! Metrics for the terminal cache.

use metrics::{counter, describe_counter};

/// Metric names for the data layer.
pub mod names {
    /// Terminal lookups answered from the cache.
    pub const TERMINAL_CACHE_HITS_TOTAL: &str = "trellis_terminal_cache_hits_total";
    /// Terminal lookups that fell through to the store.
    pub const TERMINAL_CACHE_MISSES_TOTAL: &str = "trellis_terminal_cache_misses_total";
    /// Cache faults that were logged and swallowed.
    pub const TERMINAL_CACHE_ERRORS_TOTAL: &str = "trellis_terminal_cache_errors_total";
}

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(
        names::TERMINAL_CACHE_HITS_TOTAL,
        "Total number of terminal lookups served from cache"
    );
    describe_counter!(
        names::TERMINAL_CACHE_MISSES_TOTAL,
        "Total number of terminal lookups that missed the cache"
    );
    describe_counter!(
        names::TERMINAL_CACHE_ERRORS_TOTAL,
        "Total number of suppressed terminal cache faults"
    );
}

/// Terminal cache metrics recorder.
#[derive(Clone)]
pub struct CacheMetrics;

impl CacheMetrics {
    /// Record a cache hit.
    pub fn hit() {
        counter!(names::TERMINAL_CACHE_HITS_TOTAL).increment(1);
    }

    /// Record a cache miss.
    pub fn miss() {
        counter!(names::TERMINAL_CACHE_MISSES_TOTAL).increment(1);
    }

    /// Record a suppressed cache fault for the given operation.
    pub fn error(operation: &'static str) {
        counter!(names::TERMINAL_CACHE_ERRORS_TOTAL, "operation" => operation).increment(1);
    }
}

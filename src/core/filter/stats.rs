//! Execution statistics reported by the filter engines

use std::time::Duration;

use serde::{Serialize, Serializer};

/// Summary of one filter run. Recomputed on every call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterStats {
    /// Records before filtering
    pub total_count: usize,
    /// Records returned
    pub filtered_count: usize,
    /// Criteria that actually constrained the run
    pub active_filter_count: usize,
    #[serde(rename = "execution_time_ms", serialize_with = "as_millis")]
    pub execution_time: Duration,
}

impl FilterStats {
    pub fn execution_ms(&self) -> f64 {
        millis(&self.execution_time)
    }
}

fn as_millis<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(millis(d))
}

fn millis(d: &Duration) -> f64 {
    d.as_nanos() as f64 / 1_000_000.0
}

/// Result cache counters
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    pub enabled: bool,
    pub size: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}

impl CacheStats {
    /// hits / (hits + misses), or 0 before any request
    pub fn compute_hit_rate(hits: u64, misses: u64) -> f64 {
        let requests = hits + misses;
        if requests > 0 {
            hits as f64 / requests as f64
        } else {
            0.0
        }
    }
}

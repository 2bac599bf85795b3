//! In-memory result cache for store-backed filter runs
//!
//! Entries are keyed by `FilterSpec::digest()` and evicted in insertion
//! order (FIFO). Reading an entry does not refresh its position.
//!
//! The cache is process-local and unsynchronized: every mutating call takes
//! `&mut self`, so sharing it across threads needs an outer `Mutex`.

use std::collections::{HashMap, VecDeque};

use tracing::debug;

use super::spec::FilterSpec;
use super::stats::CacheStats;

/// Default number of cached result sets
pub const DEFAULT_CAPACITY: usize = 100;

/// Fixed-capacity FIFO map from spec digest to a materialized result
#[derive(Debug)]
pub struct ResultCache<V> {
    capacity: usize,
    entries: HashMap<String, V>,
    /// Digests in insertion order, oldest at the front
    order: VecDeque<String>,
    hits: u64,
    misses: u64,
}

impl<V: Clone> ResultCache<V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            order: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            hits: 0,
            misses: 0,
        }
    }

    /// Look up a spec, counting a hit or a miss
    pub fn get(&mut self, spec: &FilterSpec) -> Option<V> {
        self.get_digest(&spec.digest())
    }

    /// Look up a precomputed digest, counting a hit or a miss
    pub fn get_digest(&mut self, digest: &str) -> Option<V> {
        match self.entries.get(digest) {
            Some(value) => {
                self.hits += 1;
                Some(value.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn put(&mut self, spec: &FilterSpec, value: V) {
        self.put_digest(spec.digest(), value);
    }

    /// Insert under a precomputed digest
    ///
    /// Replacing an existing digest keeps its original position. Inserting a
    /// new digest into a full cache first evicts the oldest-inserted entry.
    pub fn put_digest(&mut self, digest: String, value: V) {
        if self.capacity == 0 {
            return;
        }
        if let Some(slot) = self.entries.get_mut(&digest) {
            *slot = value;
            return;
        }
        while self.order.len() >= self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                    debug!(digest = %oldest, "result cache evicted oldest entry");
                }
                None => break,
            }
        }
        self.order.push_back(digest.clone());
        self.entries.insert(digest, value);
    }

    /// Check presence without touching the counters
    pub fn contains(&self, spec: &FilterSpec) -> bool {
        self.entries.contains_key(&spec.digest())
    }

    /// Drop every entry and reset the counters
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.hits = 0;
        self.misses = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            enabled: true,
            size: self.entries.len(),
            capacity: self.capacity,
            hits: self.hits,
            misses: self.misses,
            hit_rate: CacheStats::compute_hit_rate(self.hits, self.misses),
        }
    }
}

impl<V: Clone> Default for ResultCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

//! Store-backed category filtering with result caching
//!
//! `CategoryFilterEngine::apply` never fails: a broken store yields an empty
//! result and a logged warning, so a filter interaction cannot take the
//! sidebar down.

use std::time::Instant;

use chrono::{DateTime, Local};
use tracing::{debug, warn};

use super::cache::{ResultCache, DEFAULT_CAPACITY};
use super::compiler::{self, CompiledQuery};
use super::criterion::Scope;
use super::spec::FilterSpec;
use super::stats::{CacheStats, FilterStats};
use crate::core::config::Config;
use crate::core::model::Category;
use crate::core::store::{DateRanges, PopularityRanges, SnippetStore, StoreError};

/// Filters categories through the snippet store
pub struct CategoryFilterEngine<'a> {
    store: &'a SnippetStore,
    cache: ResultCache<Vec<Category>>,
    cache_enabled: bool,
    last_query: Option<CompiledQuery>,
    last_stats: FilterStats,
}

impl<'a> CategoryFilterEngine<'a> {
    /// Engine with caching enabled at the default capacity
    pub fn new(store: &'a SnippetStore) -> Self {
        Self::with_cache(store, true, DEFAULT_CAPACITY)
    }

    pub fn with_cache(store: &'a SnippetStore, enabled: bool, capacity: usize) -> Self {
        Self {
            store,
            cache: ResultCache::new(capacity),
            cache_enabled: enabled,
            last_query: None,
            last_stats: FilterStats::default(),
        }
    }

    /// Engine configured from the `cache_enabled`/`cache_capacity` settings
    pub fn from_config(store: &'a SnippetStore, config: &Config) -> Self {
        Self::with_cache(store, config.cache_enabled(), config.cache_capacity())
    }

    /// Filter categories against the local clock
    pub fn apply(&mut self, spec: &FilterSpec) -> (Vec<Category>, FilterStats) {
        self.apply_at(spec, Local::now())
    }

    /// Filter categories with date presets resolved against `now`
    pub fn apply_at(
        &mut self,
        spec: &FilterSpec,
        now: DateTime<Local>,
    ) -> (Vec<Category>, FilterStats) {
        let started = Instant::now();
        let active_filter_count = spec.active_count(Scope::Category);

        let digest = self.cache_enabled.then(|| spec.digest());
        if let Some(digest) = digest.as_deref() {
            if let Some(categories) = self.cache.get_digest(digest) {
                debug!(digest = %digest, count = categories.len(), "category filter cache hit");
                // Counts come from the last real execution, not from this entry
                self.last_stats = FilterStats {
                    active_filter_count,
                    execution_time: started.elapsed(),
                    ..self.last_stats.clone()
                };
                return (categories, self.last_stats.clone());
            }
        }

        let query = compiler::compile_at(spec, now);
        debug!(sql = %query.sql, params = query.params.len(), "compiled category filter");

        let result = self.execute(&query);
        self.last_query = Some(query);

        match result {
            Ok((categories, total_count)) => {
                self.last_stats = FilterStats {
                    total_count,
                    filtered_count: categories.len(),
                    active_filter_count,
                    execution_time: started.elapsed(),
                };
                if let Some(digest) = digest {
                    self.cache.put_digest(digest, categories.clone());
                }
                (categories, self.last_stats.clone())
            }
            Err(e) => {
                warn!(error = %e, "category filter failed; returning no results");
                self.last_stats = FilterStats {
                    total_count: 0,
                    filtered_count: 0,
                    active_filter_count,
                    execution_time: started.elapsed(),
                };
                (vec![], self.last_stats.clone())
            }
        }
    }

    /// Run the filtered selection and the unconditional total count
    fn execute(&self, query: &CompiledQuery) -> Result<(Vec<Category>, usize), StoreError> {
        let categories = self.store.query_categories(query)?;
        let total = self.store.count_categories()?;
        Ok((categories, total))
    }

    /// Stats of the most recent `apply`
    pub fn filter_stats(&self) -> &FilterStats {
        &self.last_stats
    }

    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            enabled: self.cache_enabled,
            ..self.cache.stats()
        }
    }

    /// Statement and parameters of the most recent compiled query
    pub fn last_query(&self) -> Option<&CompiledQuery> {
        self.last_query.as_ref()
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn is_cache_enabled(&self) -> bool {
        self.cache_enabled
    }

    /// Toggle caching; disabling also drops cached entries
    pub fn set_cache_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.cache.clear();
        }
        self.cache_enabled = enabled;
    }

    // =========================================================================
    // Filter control population (uncached)
    // =========================================================================

    pub fn available_colors(&self) -> Vec<String> {
        self.store.available_colors()
    }

    pub fn date_ranges(&self) -> DateRanges {
        self.store.date_ranges()
    }

    pub fn popularity_ranges(&self) -> PopularityRanges {
        self.store.popularity_ranges()
    }
}

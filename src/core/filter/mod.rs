//! Filtering engines for the snippet sidebar
//!
//! Categories are filtered in the store through compiled SQL with a digest-keyed
//! result cache in front. Items are filtered in memory with ordered predicates.

pub mod cache;
pub mod category;
pub mod compiler;
pub mod criterion;
pub mod item;
pub mod spec;
pub mod stats;

pub use cache::{ResultCache, DEFAULT_CAPACITY};
pub use category::CategoryFilterEngine;
pub use compiler::{compile, compile_at, CompiledQuery};
pub use criterion::{CompareOp, Criterion, DatePreset, FilterKey, MatchMode, Scope};
pub use item::ItemPredicateEngine;
pub use spec::FilterSpec;
pub use stats::{CacheStats, FilterStats};

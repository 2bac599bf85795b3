//! Core module - snippet records, store access and filtering engines

pub mod config;
pub mod filter;
pub mod model;
pub mod store;

pub use config::{Config, ConfigError};
pub use filter::{
    CacheStats, CategoryFilterEngine, CompiledQuery, Criterion, FilterKey, FilterSpec,
    FilterStats, ItemPredicateEngine, MatchMode, ResultCache, Scope,
};
pub use model::{Category, Item, ItemType};
pub use store::{SnippetStore, StoreError};

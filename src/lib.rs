//! snipbar: filtering and caching for a clipboard snippet sidebar
//!
//! Categories and items live in a SQLite snippet store. Category filters are
//! compiled to parameterized SQL and memoized by a FIFO result cache; item
//! filters run in memory over a loaded category.

pub mod cli;
pub mod core;

//! CLI command implementations

pub mod categories;
pub mod completions;
pub mod config;
pub mod facets;
pub mod init;
pub mod items;

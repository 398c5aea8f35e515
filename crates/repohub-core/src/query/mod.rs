//! Discovery queries.
//!
//! A query is a URL whose query string may carry
//! `filePattern=<glob>|<glob>|...`. Only that key is interpreted.

mod mangle;
mod matcher;

pub use mangle::{filter_patterns, mangle};
pub use matcher::{filter, FileFilter, FilterPattern};

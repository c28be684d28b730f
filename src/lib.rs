//! Song-list-to-playlist matching pipeline.
//!
//! Reads a plain-text song list, normalizes and parses each line, searches a
//! music catalog for candidates, scores and selects the best match, and
//! assembles the results (in input order) into a playlist plus a report.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints for the local/embedded server
//! - `aggregator` - reassembles worker output back into input order
//! - `catalog` - catalog HTTP client, retry policy, OAuth
//! - `cli` - command-line interface implementations
//! - `config` - configuration loading and validation
//! - `coordinator` - bounded worker pool driving the matching pipeline
//! - `error` - typed error taxonomy
//! - `matcher` - scoring and candidate selection
//! - `normalize` - text normalization (full/half-width, diacritics, CJK)
//! - `parser` - input-line grammar
//! - `report` - report file rendering
//! - `server` - local HTTP server
//! - `types` - shared data model

pub mod aggregator;
pub mod api;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod matcher;
pub mod normalize;
pub mod parser;
pub mod report;
pub mod server;
pub mod types;

/// A convenient Result type alias for operations that may fail.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message and exits the process with code 1. Only use this
/// for fatal errors surfaced before `main`'s own exit-code mapping runs.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}

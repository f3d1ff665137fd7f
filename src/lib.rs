//! Ripple-Crawl: a depth-bounded concurrent crawler
//!
//! This crate crawls a link graph from a seed identifier, fanning out one
//! concurrent task per discovered link, deduplicating visits across every
//! branch, and joining on the whole task tree before returning. It also
//! ships a few small concurrency and stream utilities (tree equivalence via
//! concurrent producers, a ROT13 reader, a Fibonacci generator and a
//! greeting generator with an injected random source).

pub mod config;
pub mod crawler;
pub mod fibonacci;
pub mod greetings;
pub mod output;
pub mod rot13;
pub mod state;
pub mod tree;

use thiserror::Error;

/// Main error type for Ripple-Crawl operations
#[derive(Debug, Error)]
pub enum RippleError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors produced by a [`crawler::Fetcher`]
///
/// A fetch error is always local to the branch that produced it: the crawler
/// reports it and stops that branch, nothing more.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("expected HTML from {url}, got {content_type}")]
    ContentMismatch { url: String, content_type: String },

    #[error("network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("{0}")]
    Other(String),
}

/// Errors from the greeting generator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GreetingError {
    #[error("empty name")]
    EmptyName,
}

/// Result type alias for Ripple-Crawl operations
pub type Result<T> = std::result::Result<T, RippleError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, Coordinator, FetchedPage, Fetcher, HttpFetcher, StaticFetcher};
pub use output::{CollectingSink, ConsoleSink, CrawlReport, CrawlStats, ReportSink};
pub use state::{CrawlTask, TaskOutcome, VisitedSet};
pub use tree::{same_content, walk, Tree};

//! Output module for crawl reports and summaries
//!
//! This module handles:
//! - The report sink every crawl task writes to
//! - Console, JSON-lines and in-memory sinks
//! - Crawl statistics and markdown summaries

mod markdown;
mod sinks;
pub mod stats;
mod traits;

pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use sinks::{CollectingSink, ConsoleSink, JsonLinesSink, TeeSink};
pub use stats::{print_statistics, CrawlStats};
pub use traits::{CrawlReport, CrawlSummary, OutputError, OutputResult, ReportOutcome, ReportSink};

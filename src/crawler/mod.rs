//! Crawler module for depth-bounded concurrent crawling
//!
//! This module contains the core crawling logic, including:
//! - The fetch capability and its HTTP and fixture implementations
//! - HTML parsing and link extraction for the HTTP fetcher
//! - Recursive task fan-out with a counted join barrier

mod barrier;
mod coordinator;
mod fetcher;
mod fixture;
mod parser;

pub use barrier::{JoinBarrier, PendingGuard};
pub use coordinator::Coordinator;
pub use fetcher::{build_http_client, FetchedPage, Fetcher, HttpFetcher};
pub use fixture::StaticFetcher;
pub use parser::{parse_html, ParsedPage};

use crate::config::{Config, FetcherKind};
use crate::output::{CrawlStats, ReportSink};
use crate::{ConfigError, Result};
use std::sync::Arc;
use std::time::Duration;

/// Crawls from `seed`, following links at most `max_depth` hops
///
/// Every distinct identifier reachable within the bound is fetched at most
/// once, however many paths lead to it. Pages and fetch errors go to `sink`;
/// the call returns only after every spawned task has finished.
///
/// # Example
///
/// ```
/// use ripple_crawl::crawler::{crawl, StaticFetcher};
/// use ripple_crawl::output::CollectingSink;
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() {
/// let fetcher = Arc::new(StaticFetcher::sample());
/// let sink = Arc::new(CollectingSink::new());
/// crawl("https://golang.org/", 4, fetcher, sink.clone()).await;
/// assert_eq!(sink.found().len(), 4);
/// # }
/// ```
pub async fn crawl(seed: &str, max_depth: u32, fetcher: Arc<dyn Fetcher>, sink: Arc<dyn ReportSink>) {
    Coordinator::new(fetcher, sink).run(seed, max_depth).await;
}

/// Builds the fetcher described by the configuration
///
/// # Returns
///
/// * `Ok(Arc<dyn Fetcher>)` - The fixture or HTTP fetcher
/// * `Err(RippleError)` - Missing user agent or HTTP client failure
pub fn build_fetcher(config: &Config) -> Result<Arc<dyn Fetcher>> {
    match config.fetcher.kind {
        FetcherKind::Fixture => {
            let fetcher = StaticFetcher::from_entries(&config.pages)
                .with_latency(Duration::from_millis(config.fetcher.latency_ms));
            Ok(Arc::new(fetcher))
        }
        FetcherKind::Http => {
            let user_agent = config.user_agent.as_ref().ok_or_else(|| {
                ConfigError::Validation("[user-agent] is required for the http fetcher".to_string())
            })?;
            let fetcher =
                HttpFetcher::new(user_agent, Duration::from_secs(config.fetcher.timeout_secs))?;
            Ok(Arc::new(fetcher))
        }
    }
}

/// Runs the crawl described by the configuration
///
/// # Example
///
/// ```no_run
/// use ripple_crawl::config::load_config;
/// use ripple_crawl::crawler::run_crawl;
/// use ripple_crawl::output::ConsoleSink;
/// use std::path::Path;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("crawl.toml"))?;
/// let stats = run_crawl(&config, Arc::new(ConsoleSink)).await?;
/// println!("{} pages", stats.fetched);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config, sink: Arc<dyn ReportSink>) -> Result<CrawlStats> {
    let fetcher = build_fetcher(config)?;
    Ok(Coordinator::new(fetcher, sink)
        .run(&config.crawler.seed, config.crawler.max_depth)
        .await)
}

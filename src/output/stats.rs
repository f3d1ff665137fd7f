//! Crawl statistics
//!
//! This module provides the counters a crawl accumulates and a console
//! rendering of them.

use std::time::Duration;

/// Counters for a finished crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// The seed identifier
    pub seed: String,

    /// The depth bound the crawl ran with
    pub max_depth: u32,

    /// Distinct identifiers marked visited
    pub visited: usize,

    /// Pages fetched successfully
    pub fetched: usize,

    /// Fetches that failed
    pub failed: usize,

    /// Tasks that found their identifier already visited
    pub deduplicated: usize,

    /// Tasks marked visited with no depth left to fetch
    pub depth_exhausted: usize,

    /// Wall-clock time from spawn of the seed task to the join
    pub elapsed: Duration,
}

impl CrawlStats {
    /// Total number of tasks that ran
    pub fn tasks(&self) -> usize {
        self.fetched + self.failed + self.deduplicated + self.depth_exhausted
    }

    /// Number of fetcher calls
    pub fn fetch_calls(&self) -> usize {
        self.fetched + self.failed
    }

    /// Successful fetches as a percentage of all fetch calls
    pub fn success_rate(&self) -> f64 {
        let calls = self.fetch_calls();
        if calls == 0 {
            return 0.0;
        }
        (self.fetched as f64 / calls as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStats) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Seed: {}", stats.seed);
    println!("  Max depth: {}", stats.max_depth);
    println!("  Identifiers visited: {}", stats.visited);
    println!("  Tasks run: {}", stats.tasks());
    println!("  Elapsed: {:?}", stats.elapsed);
    println!();

    println!("Tasks by Outcome:");
    println!("  Fetched: {}", stats.fetched);
    println!("  Failed: {}", stats.failed);
    println!("  Already visited: {}", stats.deduplicated);
    println!("  Depth exhausted: {}", stats.depth_exhausted);
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} fetches succeeded)",
        stats.success_rate(),
        stats.fetched,
        stats.fetch_calls()
    );
}

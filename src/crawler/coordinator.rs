//! Crawler coordinator - recursive fan-out and join
//!
//! Each identifier is processed by its own tokio task:
//! 1. Check-and-mark the identifier in the shared [`VisitedSet`]
//! 2. Stop if it was already marked, or if no depth is left
//! 3. Fetch it and report the page (or the error)
//! 4. Spawn one child task per discovered identifier, one hop deeper
//!
//! The coordinator waits on a [`JoinBarrier`] that every task enters before
//! it is spawned, so `run` only returns once the whole task tree is done.

use crate::crawler::barrier::JoinBarrier;
use crate::crawler::fetcher::Fetcher;
use crate::output::{CrawlReport, CrawlStats, ReportSink};
use crate::state::{CrawlTask, TaskOutcome, VisitedSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Runs crawls against one fetcher, reporting into one sink
pub struct Coordinator {
    fetcher: Arc<dyn Fetcher>,
    sink: Arc<dyn ReportSink>,
}

/// State shared by every task of a single crawl
struct CrawlContext {
    fetcher: Arc<dyn Fetcher>,
    sink: Arc<dyn ReportSink>,
    visited: VisitedSet,
    barrier: Arc<JoinBarrier>,
    counters: OutcomeCounters,
}

#[derive(Default)]
struct OutcomeCounters {
    fetched: AtomicUsize,
    failed: AtomicUsize,
    deduplicated: AtomicUsize,
    depth_exhausted: AtomicUsize,
}

impl OutcomeCounters {
    fn record(&self, outcome: TaskOutcome) {
        let counter = match outcome {
            TaskOutcome::AlreadyVisited => &self.deduplicated,
            TaskOutcome::DepthExhausted => &self.depth_exhausted,
            TaskOutcome::Fetched { .. } => &self.fetched,
            TaskOutcome::Failed => &self.failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

impl Coordinator {
    /// Creates a new coordinator
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Capability used to fetch each page
    /// * `sink` - Receives one report per fetch attempt
    pub fn new(fetcher: Arc<dyn Fetcher>, sink: Arc<dyn ReportSink>) -> Self {
        Self { fetcher, sink }
    }

    /// Crawls from `seed`, following links at most `max_depth` hops
    ///
    /// A fresh visited set is created for every call. Fetch errors are
    /// reported to the sink and end only their own branch; they never fail
    /// the crawl.
    ///
    /// With `max_depth = 0` the seed is marked visited but never fetched.
    ///
    /// Must be called within a tokio runtime.
    pub async fn run(&self, seed: &str, max_depth: u32) -> CrawlStats {
        let ctx = Arc::new(CrawlContext {
            fetcher: Arc::clone(&self.fetcher),
            sink: Arc::clone(&self.sink),
            visited: VisitedSet::new(),
            barrier: JoinBarrier::new(),
            counters: OutcomeCounters::default(),
        });

        tracing::info!("Starting crawl from {} (max depth {})", seed, max_depth);
        let start_time = Instant::now();

        spawn_task(&ctx, CrawlTask::new(seed, max_depth));
        ctx.barrier.wait().await;

        let stats = CrawlStats {
            seed: seed.to_string(),
            max_depth,
            visited: ctx.visited.len(),
            fetched: ctx.counters.fetched.load(Ordering::Relaxed),
            failed: ctx.counters.failed.load(Ordering::Relaxed),
            deduplicated: ctx.counters.deduplicated.load(Ordering::Relaxed),
            depth_exhausted: ctx.counters.depth_exhausted.load(Ordering::Relaxed),
            elapsed: start_time.elapsed(),
        };

        tracing::info!(
            "Crawl completed: {} visited, {} fetched, {} failed in {:?}",
            stats.visited,
            stats.fetched,
            stats.failed,
            stats.elapsed
        );

        stats
    }
}

/// Registers `task` with the barrier and spawns it
fn spawn_task(ctx: &Arc<CrawlContext>, task: CrawlTask) {
    let guard = ctx.barrier.enter();
    let ctx = Arc::clone(ctx);

    tokio::spawn(async move {
        let _guard = guard;
        let outcome = process_task(&ctx, &task).await;
        ctx.counters.record(outcome);
        tracing::debug!("{} (depth {}): {}", task.id, task.depth, outcome);
    });
}

async fn process_task(ctx: &Arc<CrawlContext>, task: &CrawlTask) -> TaskOutcome {
    if !ctx.visited.check_and_mark(&task.id) {
        return TaskOutcome::AlreadyVisited;
    }

    let Some(child_depth) = task.depth.checked_sub(1) else {
        return TaskOutcome::DepthExhausted;
    };

    match ctx.fetcher.fetch(&task.id).await {
        Ok(page) => {
            let links = page.links.len();
            ctx.sink.report(CrawlReport::found(
                task.id.clone(),
                task.depth,
                page.body,
                page.links.clone(),
            ));

            for link in page.links {
                spawn_task(ctx, CrawlTask::new(link, child_depth));
            }

            TaskOutcome::Fetched { links }
        }
        Err(e) => {
            tracing::warn!("Failed to fetch {}: {}", task.id, e);
            ctx.sink
                .report(CrawlReport::failed(task.id.clone(), task.depth, e.to_string()));
            TaskOutcome::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::StaticFetcher;
    use crate::output::CollectingSink;

    fn coordinator(fetcher: StaticFetcher) -> (Coordinator, Arc<StaticFetcher>, Arc<CollectingSink>) {
        let fetcher = Arc::new(fetcher);
        let sink = Arc::new(CollectingSink::new());
        let coordinator = Coordinator::new(fetcher.clone(), sink.clone());
        (coordinator, fetcher, sink)
    }

    #[tokio::test]
    async fn test_depth_one_fetches_seed_only() {
        let (coordinator, fetcher, sink) =
            coordinator(StaticFetcher::new().with_page("A", "pageA", ["B", "C"]));

        let stats = coordinator.run("A", 1).await;

        assert_eq!(fetcher.called_ids(), vec!["A".to_string()]);
        assert_eq!(sink.found(), vec!["A".to_string()]);
        // Children are marked but not fetched
        assert_eq!(stats.visited, 3);
        assert_eq!(stats.depth_exhausted, 2);
    }

    #[tokio::test]
    async fn test_self_link_is_deduplicated() {
        let (coordinator, fetcher, _sink) =
            coordinator(StaticFetcher::new().with_page("A", "pageA", ["A", "A"]));

        let stats = coordinator.run("A", 5).await;

        assert_eq!(fetcher.calls("A"), 1);
        assert_eq!(stats.deduplicated, 2);
        assert_eq!(stats.tasks(), 3);
    }

    #[tokio::test]
    async fn test_report_carries_remaining_depth() {
        let (coordinator, _fetcher, sink) = coordinator(
            StaticFetcher::new()
                .with_page("A", "pageA", ["B"])
                .with_page("B", "pageB", Vec::<String>::new()),
        );

        coordinator.run("A", 3).await;

        let mut depths: Vec<(String, u32)> = sink
            .reports()
            .into_iter()
            .map(|r| (r.id, r.depth))
            .collect();
        depths.sort();
        assert_eq!(depths, vec![("A".to_string(), 3), ("B".to_string(), 2)]);
    }

    #[tokio::test]
    async fn test_each_run_uses_fresh_visited_set() {
        let (coordinator, fetcher, _sink) =
            coordinator(StaticFetcher::new().with_page("A", "pageA", Vec::<String>::new()));

        coordinator.run("A", 1).await;
        coordinator.run("A", 1).await;

        assert_eq!(fetcher.calls("A"), 2);
    }
}

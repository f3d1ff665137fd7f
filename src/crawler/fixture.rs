//! In-memory fetcher serving a fixed page table

use crate::config::PageEntry;
use crate::crawler::fetcher::{FetchedPage, Fetcher};
use crate::FetchError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Fetcher backed by a fixed `id -> page` table
///
/// Unknown identifiers fail with [`FetchError::NotFound`]. Every call is
/// counted per identifier so callers can check how often each page was
/// requested.
#[derive(Debug, Default)]
pub struct StaticFetcher {
    pages: HashMap<String, FetchedPage>,
    latency: Duration,
    calls: Mutex<HashMap<String, usize>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a page to the table
    pub fn with_page<I, S>(mut self, id: impl Into<String>, body: impl Into<String>, links: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(id, FetchedPage::new(body, links));
        self
    }

    pub fn insert(&mut self, id: impl Into<String>, page: FetchedPage) {
        self.pages.insert(id.into(), page);
    }

    /// Delays every fetch, so concurrent branches overlap
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Builds the table from `[[page]]` config entries
    pub fn from_entries(entries: &[PageEntry]) -> Self {
        entries.iter().fold(Self::new(), |fetcher, entry| {
            fetcher.with_page(entry.id.clone(), entry.body.clone(), entry.links.iter().cloned())
        })
    }

    /// The golang.org page table, rooted at `https://golang.org/`
    ///
    /// `https://golang.org/cmd/` is linked but absent, so a crawl of depth
    /// two or more reports one failure.
    pub fn sample() -> Self {
        Self::new()
            .with_page(
                "https://golang.org/",
                "The Go Programming Language",
                ["https://golang.org/pkg/", "https://golang.org/cmd/"],
            )
            .with_page(
                "https://golang.org/pkg/",
                "Packages",
                [
                    "https://golang.org/",
                    "https://golang.org/cmd/",
                    "https://golang.org/pkg/fmt/",
                    "https://golang.org/pkg/os/",
                ],
            )
            .with_page(
                "https://golang.org/pkg/fmt/",
                "Package fmt",
                ["https://golang.org/", "https://golang.org/pkg/"],
            )
            .with_page(
                "https://golang.org/pkg/os/",
                "Package os",
                ["https://golang.org/", "https://golang.org/pkg/"],
            )
    }

    /// Number of pages in the table
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// How many times `id` was fetched
    pub fn calls(&self, id: &str) -> usize {
        self.lock_calls().get(id).copied().unwrap_or(0)
    }

    /// Total number of fetch calls
    pub fn total_calls(&self) -> usize {
        self.lock_calls().values().sum()
    }

    /// Sorted identifiers that were fetched at least once
    pub fn called_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.lock_calls().keys().cloned().collect();
        ids.sort();
        ids
    }

    fn lock_calls(&self) -> MutexGuard<'_, HashMap<String, usize>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Fetcher for StaticFetcher {
    async fn fetch(&self, id: &str) -> Result<FetchedPage, FetchError> {
        *self.lock_calls().entry(id.to_string()).or_insert(0) += 1;

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        self.pages
            .get(id)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(id.to_string()))
    }
}

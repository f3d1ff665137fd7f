/// Task definitions for the crawl
///
/// A task is the unit of work the crawler spawns: one identifier together
/// with the number of hops it may still go.
use std::fmt;

/// An in-flight unit of work
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CrawlTask {
    /// Identifier of the page to visit
    pub id: String,

    /// Remaining depth; 0 means the page is marked but never fetched
    pub depth: u32,
}

impl CrawlTask {
    pub fn new(id: impl Into<String>, depth: u32) -> Self {
        Self {
            id: id.into(),
            depth,
        }
    }
}

/// How a task terminated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskOutcome {
    // ===== No Fetch =====
    /// Another branch already marked this identifier
    AlreadyVisited,

    /// Marked visited, but no depth left to fetch it
    DepthExhausted,

    // ===== Fetched =====
    /// Page fetched and reported; one child spawned per discovered link
    Fetched {
        /// Number of children spawned
        links: usize,
    },

    /// Fetch failed; the error was reported and no children were spawned
    Failed,
}

impl TaskOutcome {
    /// Short label used in logs
    pub fn label(&self) -> &'static str {
        match self {
            Self::AlreadyVisited => "already_visited",
            Self::DepthExhausted => "depth_exhausted",
            Self::Fetched { .. } => "fetched",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for TaskOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

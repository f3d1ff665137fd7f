//! State module for tracking crawl progress
//!
//! This module provides the shared and per-task state used while a crawl runs.
//!
//! # Components
//!
//! - `VisitedSet`: Records which identifiers have begun processing (shared by every task)
//! - `CrawlTask`: A unit of work, an identifier plus its remaining depth
//! - `TaskOutcome`: How a task terminated

mod task;
mod visited;

// Re-export main types
pub use task::{CrawlTask, TaskOutcome};
pub use visited::VisitedSet;

//! Report sink trait and report types
//!
//! This module defines the trait interface for report sinks and the data
//! structures they receive and summarize.

use crate::output::stats::CrawlStats;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// What a task had to say about its identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportOutcome {
    /// The page was fetched
    Found {
        /// Page content
        body: String,
        /// Identifiers discovered on the page, in page order
        links: Vec<String>,
    },

    /// The fetch failed
    Failed {
        /// Rendered fetch error
        reason: String,
    },
}

/// One report emitted by a crawl task
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrawlReport {
    /// The identifier the report is about
    pub id: String,

    /// Remaining depth of the task that produced the report
    pub depth: u32,

    #[serde(flatten)]
    pub outcome: ReportOutcome,

    pub reported_at: DateTime<Utc>,
}

impl CrawlReport {
    pub fn found(id: impl Into<String>, depth: u32, body: impl Into<String>, links: Vec<String>) -> Self {
        Self {
            id: id.into(),
            depth,
            outcome: ReportOutcome::Found {
                body: body.into(),
                links,
            },
            reported_at: Utc::now(),
        }
    }

    pub fn failed(id: impl Into<String>, depth: u32, reason: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            depth,
            outcome: ReportOutcome::Failed {
                reason: reason.into(),
            },
            reported_at: Utc::now(),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self.outcome, ReportOutcome::Found { .. })
    }
}

/// Sink for crawl reports
///
/// Tasks report concurrently and in no particular order, so implementations
/// must tolerate concurrent calls. Reporting cannot fail from the crawler's
/// point of view: a sink that hits an error deals with it itself.
pub trait ReportSink: Send + Sync {
    /// Records one report
    fn report(&self, report: CrawlReport);
}

/// Everything known about a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub config_hash: Option<String>,
    pub stats: CrawlStats,

    /// Fetched pages keyed by identifier
    pub pages: BTreeMap<String, String>,

    /// Failed fetches keyed by identifier
    pub errors: BTreeMap<String, String>,
}

impl CrawlSummary {
    /// Builds a summary from the stats returned by the crawl and the reports
    /// collected while it ran
    pub fn from_reports(
        stats: CrawlStats,
        reports: &[CrawlReport],
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        let mut pages = BTreeMap::new();
        let mut errors = BTreeMap::new();

        for report in reports {
            match &report.outcome {
                ReportOutcome::Found { body, .. } => {
                    pages.insert(report.id.clone(), body.clone());
                }
                ReportOutcome::Failed { reason } => {
                    errors.insert(report.id.clone(), reason.clone());
                }
            }
        }

        Self {
            started_at,
            finished_at,
            config_hash: None,
            stats,
            pages,
            errors,
        }
    }

    pub fn with_config_hash(mut self, hash: impl Into<String>) -> Self {
        self.config_hash = Some(hash.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_serializes_flat() {
        let report = CrawlReport::found("A", 3, "pageA", vec!["B".to_string()]);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["id"], "A");
        assert_eq!(json["depth"], 3);
        assert_eq!(json["kind"], "found");
        assert_eq!(json["body"], "pageA");
        assert_eq!(json["links"][0], "B");
        assert!(json["reported_at"].is_string());
    }

    #[test]
    fn test_failed_report_serializes_reason() {
        let report = CrawlReport::failed("A", 1, "not found: A");
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["kind"], "failed");
        assert_eq!(json["reason"], "not found: A");
        assert!(!report.is_found());
    }

    #[test]
    fn test_summary_from_reports() {
        let now = Utc::now();
        let reports = vec![
            CrawlReport::found("A", 2, "pageA", vec![]),
            CrawlReport::failed("B", 1, "not found: B"),
            CrawlReport::found("C", 1, "pageC", vec![]),
        ];

        let summary = CrawlSummary::from_reports(CrawlStats::default(), &reports, now, now)
            .with_config_hash("abc123");

        assert_eq!(summary.pages.len(), 2);
        assert_eq!(summary.pages["C"], "pageC");
        assert_eq!(summary.errors["B"], "not found: B");
        assert_eq!(summary.config_hash.as_deref(), Some("abc123"));
    }
}

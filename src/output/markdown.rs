//! Markdown summary generation
//!
//! This module generates human-readable markdown summaries of a crawl,
//! including statistics, fetched pages and failed fetches.

use crate::output::traits::{CrawlSummary, OutputResult};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes a markdown summary of the crawl to `output_path`
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(OutputError)` - Failed to write summary
pub fn generate_markdown_summary(summary: &CrawlSummary, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(summary);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl summary as markdown
pub fn format_markdown_summary(summary: &CrawlSummary) -> String {
    let stats = &summary.stats;
    let mut md = String::new();

    md.push_str("# Ripple-Crawl Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Seed**: {}\n", stats.seed));
    md.push_str(&format!("- **Max Depth**: {}\n", stats.max_depth));
    md.push_str(&format!("- **Started**: {}\n", summary.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", summary.finished_at.to_rfc3339()));
    md.push_str(&format!(
        "- **Duration**: {} ms\n",
        (summary.finished_at - summary.started_at).num_milliseconds()
    ));
    if let Some(hash) = &summary.config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push('\n');

    // Overall statistics
    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Identifiers Visited**: {}\n", stats.visited));
    md.push_str(&format!("- **Tasks Run**: {}\n", stats.tasks()));
    md.push_str(&format!("- **Fetch Calls**: {}\n", stats.fetch_calls()));
    md.push_str(&format!("- **Success Rate**: {:.2}%\n\n", stats.success_rate()));

    md.push_str("## Task Outcomes\n\n");
    md.push_str("| Outcome | Count |\n");
    md.push_str("|---------|-------|\n");
    md.push_str(&format!("| Fetched | {} |\n", stats.fetched));
    md.push_str(&format!("| Failed | {} |\n", stats.failed));
    md.push_str(&format!("| Already Visited | {} |\n", stats.deduplicated));
    md.push_str(&format!("| Depth Exhausted | {} |\n\n", stats.depth_exhausted));

    if !summary.pages.is_empty() {
        md.push_str("## Pages\n\n");
        md.push_str("| Identifier | Content |\n");
        md.push_str("|------------|---------|\n");
        for (id, body) in &summary.pages {
            md.push_str(&format!("| {} | {} |\n", id, escape_cell(body)));
        }
        md.push('\n');
    }

    if !summary.errors.is_empty() {
        md.push_str("## Errors\n\n");
        md.push_str("| Identifier | Reason |\n");
        md.push_str("|------------|--------|\n");
        for (id, reason) in &summary.errors {
            md.push_str(&format!("| {} | {} |\n", id, escape_cell(reason)));
        }
        md.push('\n');
    }

    md
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::stats::CrawlStats;
    use crate::output::traits::CrawlReport;
    use chrono::{TimeZone, Utc};
    use std::time::Duration;

    fn create_test_summary() -> CrawlSummary {
        let stats = CrawlStats {
            seed: "https://golang.org/".to_string(),
            max_depth: 4,
            visited: 5,
            fetched: 4,
            failed: 1,
            deduplicated: 7,
            depth_exhausted: 0,
            elapsed: Duration::from_millis(3),
        };
        let reports = vec![
            CrawlReport::found("https://golang.org/", 4, "The Go Programming Language", vec![]),
            CrawlReport::failed(
                "https://golang.org/cmd/",
                2,
                "not found: https://golang.org/cmd/",
            ),
        ];
        let started = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let finished = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 1).unwrap();

        CrawlSummary::from_reports(stats, &reports, started, finished).with_config_hash("abc123")
    }

    #[test]
    fn test_format_markdown_summary() {
        let markdown = format_markdown_summary(&create_test_summary());

        assert!(markdown.contains("# Ripple-Crawl Summary"));
        assert!(markdown.contains("- **Seed**: https://golang.org/"));
        assert!(markdown.contains("- **Duration**: 1000 ms"));
        assert!(markdown.contains("- **Config Hash**: abc123"));
        assert!(markdown.contains("| Already Visited | 7 |"));
    }

    #[test]
    fn test_markdown_lists_pages_and_errors() {
        let markdown = format_markdown_summary(&create_test_summary());

        assert!(markdown.contains("## Pages"));
        assert!(markdown.contains("| https://golang.org/ | The Go Programming Language |"));
        assert!(markdown.contains("## Errors"));
        assert!(markdown.contains("not found: https://golang.org/cmd/"));
    }

    #[test]
    fn test_markdown_escapes_pipes() {
        assert_eq!(escape_cell("a|b\nc"), "a\\|b c");
    }

    #[test]
    fn test_generate_markdown_summary_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.md");

        generate_markdown_summary(&create_test_summary(), &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# Ripple-Crawl Summary"));
    }
}

//! Report sink implementations

use crate::output::traits::{CrawlReport, OutputResult, ReportOutcome, ReportSink};
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Prints `found: <id> "<body>"` to stdout and failures to stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl ReportSink for ConsoleSink {
    fn report(&self, report: CrawlReport) {
        match &report.outcome {
            ReportOutcome::Found { body, .. } => println!("found: {} {:?}", report.id, body),
            ReportOutcome::Failed { reason } => eprintln!("{}", reason),
        }
    }
}

/// Writes each report as one JSON object per line
pub struct JsonLinesSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Consumes the sink and returns the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_report(&self, report: &CrawlReport) -> OutputResult<()> {
        let line = serde_json::to_string(report)?;
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(writer, "{}", line)?;
        Ok(())
    }
}

impl<W: Write + Send> ReportSink for JsonLinesSink<W> {
    fn report(&self, report: CrawlReport) {
        if let Err(e) = self.write_report(&report) {
            tracing::warn!("Failed to write report for {}: {}", report.id, e);
        }
    }
}

/// Keeps every report in memory
#[derive(Debug, Default)]
pub struct CollectingSink {
    reports: Mutex<Vec<CrawlReport>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every report received so far, in arrival order
    pub fn reports(&self) -> Vec<CrawlReport> {
        self.lock().clone()
    }

    /// Sorted identifiers of every fetched page
    pub fn found(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .lock()
            .iter()
            .filter(|r| r.is_found())
            .map(|r| r.id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// `(id, reason)` for every failed fetch, sorted by identifier
    pub fn failures(&self) -> Vec<(String, String)> {
        let mut failures: Vec<(String, String)> = self
            .lock()
            .iter()
            .filter_map(|r| match &r.outcome {
                ReportOutcome::Failed { reason } => Some((r.id.clone(), reason.clone())),
                ReportOutcome::Found { .. } => None,
            })
            .collect();
        failures.sort();
        failures
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<CrawlReport>> {
        self.reports.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ReportSink for CollectingSink {
    fn report(&self, report: CrawlReport) {
        self.lock().push(report);
    }
}

/// Forwards every report to each of its sinks
#[derive(Default, Clone)]
pub struct TeeSink {
    sinks: Vec<Arc<dyn ReportSink>>,
}

impl TeeSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: Arc<dyn ReportSink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl ReportSink for TeeSink {
    fn report(&self, report: CrawlReport) {
        if let Some((last, rest)) = self.sinks.split_last() {
            for sink in rest {
                sink.report(report.clone());
            }
            last.report(report);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::traits::OutputError;

    #[test]
    fn test_collecting_sink() {
        let sink = CollectingSink::new();
        assert!(sink.is_empty());

        sink.report(CrawlReport::found("B", 1, "pageB", vec![]));
        sink.report(CrawlReport::failed("C", 1, "not found: C"));
        sink.report(CrawlReport::found("A", 2, "pageA", vec!["B".to_string()]));

        assert_eq!(sink.len(), 3);
        assert_eq!(sink.found(), vec!["A".to_string(), "B".to_string()]);
        assert_eq!(
            sink.failures(),
            vec![("C".to_string(), "not found: C".to_string())]
        );
        assert_eq!(sink.reports()[0].id, "B");
    }

    #[test]
    fn test_json_lines_sink() {
        let sink = JsonLinesSink::new(Vec::new());
        sink.report(CrawlReport::found("A", 1, "pageA", vec![]));
        sink.report(CrawlReport::failed("B", 0, "boom"));

        let output = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["id"], "A");
        assert_eq!(first["kind"], "found");

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["reason"], "boom");
    }

    struct BrokenWriter;

    impl Write for BrokenWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_json_lines_write_failure_is_io_error() {
        let sink = JsonLinesSink::new(BrokenWriter);
        let result = sink.write_report(&CrawlReport::found("A", 1, "pageA", vec![]));
        assert!(matches!(result, Err(OutputError::Io(_))));

        // Reporting swallows the error
        sink.report(CrawlReport::failed("B", 0, "boom"));
    }

    #[test]
    fn test_tee_sink_forwards_to_all() {
        let left = Arc::new(CollectingSink::new());
        let right = Arc::new(CollectingSink::new());
        let tee = TeeSink::new().with(left.clone()).with(right.clone());

        tee.report(CrawlReport::found("A", 1, "pageA", vec![]));

        assert_eq!(left.found(), vec!["A".to_string()]);
        assert_eq!(right.found(), vec!["A".to_string()]);
    }

    #[test]
    fn test_empty_tee_is_noop() {
        TeeSink::new().report(CrawlReport::failed("A", 0, "ignored"));
    }
}

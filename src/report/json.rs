//! Machine-readable report output.

use camino::Utf8PathBuf;

use crate::github::TriageError;
use crate::scan::ScanReport;

use super::{ReportSink, write_output};

/// File written by [`JsonReportSink`].
pub const JSON_REPORT_FILE: &str = "scan.json";

/// Writes the report as pretty-printed JSON.
#[derive(Debug, Clone)]
pub struct JsonReportSink {
    output_dir: Utf8PathBuf,
}

impl JsonReportSink {
    /// Creates a sink writing into `output_dir`.
    #[must_use]
    pub fn new(output_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

impl ReportSink for JsonReportSink {
    fn publish(&self, report: &ScanReport) -> Result<(), TriageError> {
        let body = serde_json::to_string_pretty(report).map_err(|error| TriageError::Io {
            message: format!("failed to serialise report: {error}"),
        })?;
        write_output(&self.output_dir, JSON_REPORT_FILE, &body)
    }
}

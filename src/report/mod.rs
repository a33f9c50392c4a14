//! Report sinks consuming a finished [`ScanReport`].
//!
//! A scan hands its report to every configured sink once the whole batch
//! has been classified; sinks never see partial results.

pub mod html;
pub mod json;

use std::fs;

use camino::Utf8Path;

use crate::github::TriageError;
use crate::scan::ScanReport;

pub use html::HtmlReportSink;
pub use json::JsonReportSink;

/// Destination for a finished scan report.
pub trait ReportSink {
    /// Publishes `report`.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::Io`] when output cannot be written and
    /// [`TriageError::Template`] when rendering fails.
    fn publish(&self, report: &ScanReport) -> Result<(), TriageError>;
}

fn write_output(directory: &Utf8Path, file_name: &str, contents: &str) -> Result<(), TriageError> {
    fs::create_dir_all(directory).map_err(|error| TriageError::Io {
        message: format!("failed to create {directory}: {error}"),
    })?;

    let path = directory.join(file_name);
    fs::write(&path, contents).map_err(|error| TriageError::Io {
        message: format!("failed to write {path}: {error}"),
    })?;
    tracing::info!(%path, "report written");
    Ok(())
}

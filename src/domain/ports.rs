use crate::core::report::CalibrationReport;
use crate::utils::error::Result;
use std::path::PathBuf;

/// Destination for a finalized calibration report.
pub trait ReportWriter {
    /// Short format name used in logs and file extensions (`csv`, `json`).
    fn format(&self) -> &'static str;

    /// Writes the report and returns where it was written.
    fn write_report(&self, report: &CalibrationReport) -> Result<PathBuf>;
}

use crate::core::report::CalibrationReport;
use crate::domain::ports::ReportWriter;
use crate::utils::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// `<TAG>_<YYYY-MM-DD>.<ext>`, with anything outside `[A-Za-z0-9_-]` replaced by `_`.
pub fn report_file_name(report: &CalibrationReport, extension: &str) -> String {
    let tag: String = report
        .tag
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{}_{}.{}", tag, report.date.format("%Y-%m-%d"), extension)
}

fn prepare_target(base_path: &Path, file_name: String) -> Result<PathBuf> {
    fs::create_dir_all(base_path)?;
    Ok(base_path.join(file_name))
}

/// Writes the results table as CSV, one row per reading.
#[derive(Debug, Clone)]
pub struct CsvReportWriter {
    base_path: PathBuf,
}

impl CsvReportWriter {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

impl ReportWriter for CsvReportWriter {
    fn format(&self) -> &'static str {
        "csv"
    }

    fn write_report(&self, report: &CalibrationReport) -> Result<PathBuf> {
        let path = prepare_target(&self.base_path, report_file_name(report, self.format()))?;
        let mut writer = csv::Writer::from_path(&path)?;
        for row in report.rows() {
            writer.serialize(row)?;
        }
        writer.flush()?;

        tracing::info!("CSV report for {} written to {}", report.tag, path.display());
        Ok(path)
    }
}

/// Writes the whole report, including verdict and range, as pretty JSON.
#[derive(Debug, Clone)]
pub struct JsonReportWriter {
    base_path: PathBuf,
}

impl JsonReportWriter {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

impl ReportWriter for JsonReportWriter {
    fn format(&self) -> &'static str {
        "json"
    }

    fn write_report(&self, report: &CalibrationReport) -> Result<PathBuf> {
        let path = prepare_target(&self.base_path, report_file_name(report, self.format()))?;
        let json = serde_json::to_string_pretty(report)?;
        fs::write(&path, json)?;

        tracing::info!("JSON report for {} written to {}", report.tag, path.display());
        Ok(path)
    }
}

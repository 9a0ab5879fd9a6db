pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub mod ui;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{CsvReportWriter, JsonReportWriter};
pub use config::sheet::CalibrationSheet;
pub use crate::core::{
    calibrator::Calibrator, report::CalibrationReport, session::CalibrationSession,
};
pub use utils::error::{CalibrationError, NoDataError, Result, ValidationError};

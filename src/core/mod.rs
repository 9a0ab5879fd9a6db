pub mod calibrator;
pub mod report;
pub mod session;
pub mod signal;
pub mod verdict;

pub use crate::domain::model::{
    CalibrationPoint, CalibrationResult, Direction, MeasurementRange, Severity, TransmitterType,
    Verdict,
};
pub use crate::domain::ports::ReportWriter;
pub use crate::utils::error::Result;

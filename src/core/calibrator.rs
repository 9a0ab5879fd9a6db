use crate::core::report::CalibrationReport;
use crate::core::session::CalibrationSession;
use crate::domain::model::{CalibrationPoint, Direction, MeasurementRange, TransmitterType};
use crate::utils::error::{CalibrationError, Result, ValidationError};
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibratorState {
    Unconfigured,
    Configured,
    Finalized,
}

/// Owns the single active session and its latest report.
///
/// `Unconfigured → Configured → Finalized`, and back to `Configured` with a
/// fresh session whenever a new configuration is accepted.
#[derive(Debug, Default)]
pub struct Calibrator {
    session: Option<CalibrationSession>,
    report: Option<CalibrationReport>,
}

impl Calibrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CalibratorState {
        match (&self.session, &self.report) {
            (None, _) => CalibratorState::Unconfigured,
            (Some(_), None) => CalibratorState::Configured,
            (Some(_), Some(_)) => CalibratorState::Finalized,
        }
    }

    pub fn session(&self) -> Option<&CalibrationSession> {
        self.session.as_ref()
    }

    pub fn report(&self) -> Option<&CalibrationReport> {
        self.report.as_ref()
    }

    /// Starts a new session. A rejected configuration leaves the current one in place.
    pub fn configure(
        &mut self,
        tag: impl Into<String>,
        transmitter_type: TransmitterType,
        range: MeasurementRange,
        tolerance: f64,
    ) -> std::result::Result<&CalibrationSession, ValidationError> {
        let session = match CalibrationSession::start(tag, transmitter_type, range, tolerance) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("Configuration rejected: {}", e);
                return Err(e);
            }
        };

        tracing::info!(
            "Calibration started for {} ({}), range {} .. {} {}, max error {}%",
            session.tag(),
            session.transmitter_type(),
            session.range().lower_value,
            session.range().upper_value,
            session.range().unit,
            session.tolerance()
        );

        self.report = None;
        Ok(self.session.insert(session))
    }

    fn session_mut(&mut self) -> Result<&mut CalibrationSession> {
        self.session.as_mut().ok_or(CalibrationError::NotConfigured)
    }

    pub fn record(
        &mut self,
        direction: Direction,
        point: CalibrationPoint,
        measured_ma: f64,
    ) -> Result<()> {
        self.session_mut()?.record(direction, point, measured_ma);
        Ok(())
    }

    pub fn forget(&mut self, direction: Direction, point: CalibrationPoint) -> Result<()> {
        self.session_mut()?.forget(direction, point);
        Ok(())
    }

    /// Computes results and verdict for the current readings.
    pub fn finalize(&mut self, date: NaiveDate) -> Result<&CalibrationReport> {
        let session = self.session.as_ref().ok_or(CalibrationError::NotConfigured)?;
        let report = CalibrationReport::from_session(session, date)?;

        tracing::info!(
            "Calibration of {} finalized: {} points, max error {:.3}%, verdict {}",
            report.tag,
            report.results.len(),
            report.verdict.max_abs_error,
            report.verdict
        );

        Ok(self.report.insert(report))
    }
}

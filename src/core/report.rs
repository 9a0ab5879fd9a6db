use crate::core::session::CalibrationSession;
use crate::core::signal::severity;
use crate::core::verdict::verdict;
use crate::domain::model::{
    CalibrationResult, Direction, MeasurementRange, Severity, TransmitterType, Verdict,
};
use crate::utils::error::NoDataError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A finalized calibration: identification, ordered results and verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationReport {
    pub tag: String,
    pub transmitter_type: TransmitterType,
    pub range: MeasurementRange,
    pub tolerance: f64,
    pub date: NaiveDate,
    pub results: Vec<CalibrationResult>,
    pub verdict: Verdict,
}

/// Display strings for one table row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    #[serde(rename = "Sweep")]
    pub sweep: String,
    #[serde(rename = "Point (%)")]
    pub point: String,
    #[serde(rename = "Process Value")]
    pub process_value: String,
    #[serde(rename = "Std (mA)")]
    pub standard_ma: String,
    #[serde(rename = "Measured (mA)")]
    pub measured_ma: String,
    #[serde(rename = "Error (%)")]
    pub error: String,
    #[serde(skip)]
    pub severity: Severity,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    pub ideal: Vec<(f64, f64)>,
    pub up: Vec<(f64, f64)>,
    pub down: Vec<(f64, f64)>,
}

pub fn format_value(value: f64) -> String {
    format!("{:.3}", value)
}

pub fn format_error(error_pct: f64) -> String {
    format!("{:+.3}%", error_pct)
}

impl ResultRow {
    pub fn from_result(result: &CalibrationResult) -> Self {
        Self {
            sweep: result.direction.label().to_string(),
            point: format!("{}", result.percent),
            process_value: format_value(result.process_value),
            standard_ma: format_value(result.standard_ma),
            measured_ma: format_value(result.measured_ma),
            error: format_error(result.error_pct),
            severity: severity(result.error_pct),
        }
    }
}

impl CalibrationReport {
    pub fn from_session(
        session: &CalibrationSession,
        date: NaiveDate,
    ) -> Result<Self, NoDataError> {
        let results = session.finalize();
        let verdict = verdict(&results, session.tolerance())?;

        Ok(Self {
            tag: session.tag().to_string(),
            transmitter_type: session.transmitter_type(),
            range: session.range().clone(),
            tolerance: session.tolerance(),
            date,
            results,
            verdict,
        })
    }

    pub fn rows(&self) -> Vec<ResultRow> {
        self.results.iter().map(ResultRow::from_result).collect()
    }

    pub fn max_error_display(&self) -> String {
        format!("{:.3}%", self.verdict.max_abs_error)
    }

    pub fn results_for(&self, direction: Direction) -> impl Iterator<Item = &CalibrationResult> {
        self.results.iter().filter(move |r| r.direction == direction)
    }

    /// Ideal line through the Up sweep's standard signals, plus one measured line per sweep.
    pub fn chart_series(&self) -> ChartSeries {
        let ideal = self
            .results_for(Direction::Up)
            .map(|r| (r.process_value, r.standard_ma))
            .collect();
        let measured = |direction: Direction| -> Vec<(f64, f64)> {
            self.results_for(direction)
                .map(|r| (r.process_value, r.measured_ma))
                .collect()
        };

        ChartSeries {
            ideal,
            up: measured(Direction::Up),
            down: measured(Direction::Down),
        }
    }

    pub fn chart_title(&self) -> String {
        format!("Calibration Chart - {}", self.tag)
    }

    pub fn x_axis_title(&self) -> String {
        format!("Process Value ({})", self.range.unit)
    }

    pub fn y_axis_title(&self) -> &'static str {
        "Output Signal (mA)"
    }
}

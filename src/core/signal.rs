//! Standard 4–20 mA signal model and error normalization.

use crate::domain::model::Severity;

pub const SIGNAL_LOW_MA: f64 = 4.0;
pub const SIGNAL_HIGH_MA: f64 = 20.0;
/// Nominal signal span (20 − 4 mA). Errors are normalized to this, not to the process span.
pub const SIGNAL_SPAN_MA: f64 = SIGNAL_HIGH_MA - SIGNAL_LOW_MA;

pub const WARN_THRESHOLD_PCT: f64 = 1.0;
pub const CRITICAL_THRESHOLD_PCT: f64 = 2.0;

/// Ideal output for `percent` of span. Not clamped to 0..=100.
pub fn standard_ma(percent: f64) -> f64 {
    SIGNAL_LOW_MA + (percent / 100.0) * SIGNAL_SPAN_MA
}

/// Signed error in percent of the signal span; positive means the transmitter reads high.
pub fn error_percent(measured_ma: f64, standard_ma: f64) -> f64 {
    (measured_ma - standard_ma) / SIGNAL_SPAN_MA * 100.0
}

pub fn severity(error_pct: f64) -> Severity {
    let magnitude = error_pct.abs();
    if magnitude < WARN_THRESHOLD_PCT {
        Severity::Ok
    } else if magnitude < CRITICAL_THRESHOLD_PCT {
        Severity::Warn
    } else {
        Severity::Critical
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TransmitterType {
    #[default]
    Pressure,
    Level,
    Temperature,
    Flow,
    #[serde(rename = "Differential Pressure")]
    DifferentialPressure,
}

impl TransmitterType {
    pub const ALL: [TransmitterType; 5] = [
        TransmitterType::Pressure,
        TransmitterType::Level,
        TransmitterType::Temperature,
        TransmitterType::Flow,
        TransmitterType::DifferentialPressure,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TransmitterType::Pressure => "Pressure",
            TransmitterType::Level => "Level",
            TransmitterType::Temperature => "Temperature",
            TransmitterType::Flow => "Flow",
            TransmitterType::DifferentialPressure => "Differential Pressure",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        let idx = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for TransmitterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown transmitter type '{0}' (expected Pressure, Level, Temperature, Flow or Differential Pressure)")]
pub struct ParseTransmitterTypeError(pub String);

impl FromStr for TransmitterType {
    type Err = ParseTransmitterTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "pressure" => Ok(TransmitterType::Pressure),
            "level" => Ok(TransmitterType::Level),
            "temperature" => Ok(TransmitterType::Temperature),
            "flow" => Ok(TransmitterType::Flow),
            "differentialpressure" | "dp" => Ok(TransmitterType::DifferentialPressure),
            _ => Err(ParseTransmitterTypeError(s.to_string())),
        }
    }
}

/// Physical span of the measured quantity (LRV..URV).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRange {
    pub lower_value: f64,
    pub upper_value: f64,
    pub unit: String,
}

impl MeasurementRange {
    pub fn new(lower_value: f64, upper_value: f64, unit: impl Into<String>) -> Self {
        Self {
            lower_value,
            upper_value,
            unit: unit.into(),
        }
    }

    pub fn span(&self) -> f64 {
        self.upper_value - self.lower_value
    }

    pub fn process_value(&self, percent: f64) -> f64 {
        self.lower_value + (percent / 100.0) * self.span()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn label(self) -> &'static str {
        match self {
            Direction::Up => "Up",
            Direction::Down => "Down",
        }
    }

    /// Points in the order the sweep visits them.
    pub fn points(self) -> [CalibrationPoint; 5] {
        match self {
            Direction::Up => CalibrationPoint::ALL,
            Direction::Down => {
                let mut points = CalibrationPoint::ALL;
                points.reverse();
                points
            }
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum CalibrationPoint {
    P0,
    P25,
    P50,
    P75,
    P100,
}

impl CalibrationPoint {
    pub const ALL: [CalibrationPoint; 5] = [
        CalibrationPoint::P0,
        CalibrationPoint::P25,
        CalibrationPoint::P50,
        CalibrationPoint::P75,
        CalibrationPoint::P100,
    ];

    pub fn as_u8(self) -> u8 {
        match self {
            CalibrationPoint::P0 => 0,
            CalibrationPoint::P25 => 25,
            CalibrationPoint::P50 => 50,
            CalibrationPoint::P75 => 75,
            CalibrationPoint::P100 => 100,
        }
    }

    pub fn percent(self) -> f64 {
        f64::from(self.as_u8())
    }

    pub(crate) fn index(self) -> usize {
        match self {
            CalibrationPoint::P0 => 0,
            CalibrationPoint::P25 => 1,
            CalibrationPoint::P50 => 2,
            CalibrationPoint::P75 => 3,
            CalibrationPoint::P100 => 4,
        }
    }
}

impl fmt::Display for CalibrationPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_u8())
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{0} is not a calibration point (expected 0, 25, 50, 75 or 100)")]
pub struct InvalidPointError(pub u8);

impl TryFrom<u8> for CalibrationPoint {
    type Error = InvalidPointError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        CalibrationPoint::ALL
            .into_iter()
            .find(|p| p.as_u8() == value)
            .ok_or(InvalidPointError(value))
    }
}

impl From<CalibrationPoint> for u8 {
    fn from(point: CalibrationPoint) -> Self {
        point.as_u8()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub direction: Direction,
    pub point: CalibrationPoint,
    pub measured_ma: Option<f64>,
}

/// One row of the results table, derived from a recorded measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationResult {
    pub direction: Direction,
    pub percent: f64,
    pub process_value: f64,
    pub standard_ma: f64,
    pub measured_ma: f64,
    pub error_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub max_abs_error: f64,
    pub tolerance: f64,
    pub passed: bool,
}

impl Verdict {
    pub fn label(&self) -> &'static str {
        if self.passed {
            "PASS"
        } else {
            "FAIL"
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error magnitude class used to color result cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Ok,
    Warn,
    Critical,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transmitter_type_parsing() {
        assert_eq!("pressure".parse::<TransmitterType>(), Ok(TransmitterType::Pressure));
        assert_eq!(" Flow ".parse::<TransmitterType>(), Ok(TransmitterType::Flow));
        assert_eq!(
            "Differential Pressure".parse::<TransmitterType>(),
            Ok(TransmitterType::DifferentialPressure)
        );
        assert_eq!(
            "differential-pressure".parse::<TransmitterType>(),
            Ok(TransmitterType::DifferentialPressure)
        );
        assert!("viscosity".parse::<TransmitterType>().is_err());
    }

    #[test]
    fn test_transmitter_type_cycles() {
        assert_eq!(TransmitterType::Pressure.next(), TransmitterType::Level);
        assert_eq!(
            TransmitterType::DifferentialPressure.next(),
            TransmitterType::Pressure
        );
        assert_eq!(
            TransmitterType::Pressure.previous(),
            TransmitterType::DifferentialPressure
        );
    }

    #[test]
    fn test_process_value() {
        let range = MeasurementRange::new(0.0, 100.0, "Bar");
        assert_eq!(range.process_value(25.0), 25.0);

        let range = MeasurementRange::new(10.0, 50.0, "Bar");
        assert_eq!(range.process_value(25.0), 20.0);
        assert_eq!(range.span(), 40.0);
    }

    #[test]
    fn test_calibration_point_conversion() {
        assert_eq!(CalibrationPoint::try_from(75), Ok(CalibrationPoint::P75));
        assert_eq!(CalibrationPoint::try_from(30), Err(InvalidPointError(30)));
        assert_eq!(CalibrationPoint::P100.percent(), 100.0);
        assert_eq!(CalibrationPoint::P25.to_string(), "25%");
    }

    #[test]
    fn test_sweep_order() {
        let down: Vec<u8> = Direction::Down.points().iter().map(|p| p.as_u8()).collect();
        assert_eq!(down, vec![100, 75, 50, 25, 0]);
        let up: Vec<u8> = Direction::Up.points().iter().map(|p| p.as_u8()).collect();
        assert_eq!(up, vec![0, 25, 50, 75, 100]);
    }
}

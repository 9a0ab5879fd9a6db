use crate::core::calibrator::Calibrator;
use crate::domain::model::{CalibrationPoint, Direction, MeasurementRange, TransmitterType};
use crate::utils::error::{CalibrationError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_UNIT: &str = "Bar";
pub const DEFAULT_MAX_ERROR: f64 = 2.0;
pub const MAX_ERROR_LIMIT: f64 = 10.0;

/// A calibration recorded offline: configuration plus readings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationSheet {
    pub instrument: InstrumentConfig,
    #[serde(default)]
    pub measurements: Vec<SheetReading>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentConfig {
    pub r#type: TransmitterType,
    pub tag: String,
    pub lower_range_value: f64,
    pub upper_range_value: f64,
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(default = "default_max_error")]
    pub max_error: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SheetReading {
    pub sweep: Direction,
    /// Kept as a raw number so a bad point is reported by `validate`, not as a parse error.
    pub point: u8,
    pub measured_ma: f64,
}

fn default_unit() -> String {
    DEFAULT_UNIT.to_string()
}

fn default_max_error() -> f64 {
    DEFAULT_MAX_ERROR
}

/// Tags are stored trimmed and upper-cased, e.g. `pt-101a` becomes `PT-101A`.
pub fn normalize_tag(tag: &str) -> String {
    tag.trim().to_uppercase()
}

impl CalibrationSheet {
    /// Loads a sheet from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CalibrationError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut sheet: CalibrationSheet =
            toml::from_str(content).map_err(|e| CalibrationError::ConfigValidationError {
                field: "toml_parsing".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;
        sheet.instrument.tag = normalize_tag(&sheet.instrument.tag);
        Ok(sheet)
    }

    pub fn range(&self) -> MeasurementRange {
        MeasurementRange::new(
            self.instrument.lower_range_value,
            self.instrument.upper_range_value,
            self.instrument.unit.clone(),
        )
    }

    /// Configures `calibrator` from the sheet and records every reading in file order.
    pub fn apply(&self, calibrator: &mut Calibrator) -> Result<()> {
        calibrator.configure(
            self.instrument.tag.clone(),
            self.instrument.r#type,
            self.range(),
            self.instrument.max_error,
        )?;

        for reading in &self.measurements {
            let point = CalibrationPoint::try_from(reading.point).map_err(|e| {
                CalibrationError::InvalidConfigValueError {
                    field: "measurements.point".to_string(),
                    value: reading.point.to_string(),
                    reason: e.to_string(),
                }
            })?;
            calibrator.record(reading.sweep, point, reading.measured_ma)?;
        }

        tracing::debug!(
            "Applied sheet for {} with {} readings",
            self.instrument.tag,
            self.measurements.len()
        );
        Ok(())
    }
}

impl Validate for CalibrationSheet {
    fn validate(&self) -> Result<()> {
        let instrument = &self.instrument;
        validation::validate_finite("instrument.lower_range_value", instrument.lower_range_value)?;
        validation::validate_finite("instrument.upper_range_value", instrument.upper_range_value)?;
        validation::validate_range(
            "instrument.max_error",
            instrument.max_error,
            0.0,
            MAX_ERROR_LIMIT,
        )?;

        for reading in &self.measurements {
            if let Err(e) = CalibrationPoint::try_from(reading.point) {
                return Err(CalibrationError::InvalidConfigValueError {
                    field: "measurements.point".to_string(),
                    value: reading.point.to_string(),
                    reason: e.to_string(),
                });
            }
            validation::validate_finite("measurements.measured_ma", reading.measured_ma)?;
        }

        Ok(())
    }
}

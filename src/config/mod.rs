pub mod sheet;

#[cfg(feature = "cli")]
use crate::domain::model::TransmitterType;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

/// Command line of the interactive calibrator. The values prefill the configuration form.
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "procal")]
#[command(about = "Interactive 4-20 mA transmitter calibration recorder")]
pub struct CliConfig {
    #[arg(long, default_value = "Pressure")]
    pub transmitter_type: TransmitterType,

    #[arg(long, default_value = "")]
    pub tag: String,

    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    pub lrv: f64,

    #[arg(long, default_value = "100", allow_negative_numbers = true)]
    pub urv: f64,

    #[arg(long, default_value = sheet::DEFAULT_UNIT)]
    pub unit: String,

    #[arg(long, default_value = "2.0", help = "Maximum allowable error in percent of span")]
    pub max_error: f64,

    #[arg(long, default_value = "./output", help = "Directory for exported reports")]
    pub output_path: String,

    #[arg(long, help = "Write JSON logs to this file")]
    pub log_file: Option<PathBuf>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_finite("lrv", self.lrv)?;
        validation::validate_finite("urv", self.urv)?;
        validation::validate_range("max_error", self.max_error, 0.0, sheet::MAX_ERROR_LIMIT)?;
        validation::validate_path("output_path", &self.output_path)?;
        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let config = CliConfig::parse_from(["procal"]);
        assert_eq!(config.transmitter_type, TransmitterType::Pressure);
        assert_eq!(config.tag, "");
        assert_eq!(config.lrv, 0.0);
        assert_eq!(config.urv, 100.0);
        assert_eq!(config.unit, "Bar");
        assert_eq!(config.max_error, 2.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_overrides() {
        let config = CliConfig::parse_from([
            "procal",
            "--transmitter-type",
            "differential-pressure",
            "--tag",
            "PDT-301",
            "--lrv",
            "-50",
            "--urv",
            "50",
            "--unit",
            "mbar",
            "--max-error",
            "0.5",
        ]);
        assert_eq!(config.transmitter_type, TransmitterType::DifferentialPressure);
        assert_eq!(config.lrv, -50.0);
        assert_eq!(config.max_error, 0.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_rejects_large_tolerance() {
        let config = CliConfig::parse_from(["procal", "--max-error", "15"]);
        assert!(config.validate().is_err());
    }
}

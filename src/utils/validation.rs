use crate::utils::error::{CalibrationError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(CalibrationError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(CalibrationError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    // Written so that NaN fails as well.
    if !(value >= min && value <= max) {
        return Err(CalibrationError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_finite(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(CalibrationError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value must be a finite number".to_string(),
        });
    }
    Ok(())
}

/// Parses a required numeric form field.
pub fn parse_number(field_name: &str, raw: &str) -> Result<f64> {
    let trimmed = raw.trim();
    let value = trimmed
        .parse::<f64>()
        .map_err(|_| CalibrationError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: trimmed.to_string(),
            reason: "Value must be a number".to_string(),
        })?;
    validate_finite(field_name, value)?;
    Ok(value)
}

/// Parses an optional numeric form field; blank input means "not entered".
pub fn parse_optional_number(field_name: &str, raw: &str) -> Result<Option<f64>> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_number(field_name, raw).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_range() {
        assert!(validate_range("max_error", 2.0, 0.0, 10.0).is_ok());
        assert!(validate_range("max_error", 0.0, 0.0, 10.0).is_ok());
        assert!(validate_range("max_error", 10.0, 0.0, 10.0).is_ok());
        assert!(validate_range("max_error", 10.5, 0.0, 10.0).is_err());
        assert!(validate_range("max_error", -0.1, 0.0, 10.0).is_err());
        assert!(validate_range("max_error", f64::NAN, 0.0, 10.0).is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("output_path", "./output").is_ok());
        assert!(validate_path("output_path", "").is_err());
        assert!(validate_path("output_path", "bad\0path").is_err());
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("lrv", " 12.5 ").unwrap(), 12.5);
        assert_eq!(parse_number("lrv", "-3").unwrap(), -3.0);
        assert!(parse_number("lrv", "abc").is_err());
        assert!(parse_number("lrv", "").is_err());
        assert!(parse_number("lrv", "NaN").is_err());
        assert!(parse_number("lrv", "inf").is_err());
    }

    #[test]
    fn test_parse_optional_number() {
        assert_eq!(parse_optional_number("up 0%", "   ").unwrap(), None);
        assert_eq!(parse_optional_number("up 0%", "4.002").unwrap(), Some(4.002));
        assert!(parse_optional_number("up 0%", "4,0").is_err());
    }
}

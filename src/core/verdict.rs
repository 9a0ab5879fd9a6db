use crate::domain::model::{CalibrationResult, Verdict};
use crate::utils::error::NoDataError;

/// Grades the largest absolute error against `tolerance` (inclusive).
pub fn verdict(results: &[CalibrationResult], tolerance: f64) -> Result<Verdict, NoDataError> {
    let max_abs_error = results
        .iter()
        .map(|r| r.error_pct.abs())
        .reduce(f64::max)
        .ok_or(NoDataError)?;

    Ok(Verdict {
        max_abs_error,
        tolerance,
        passed: max_abs_error <= tolerance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Direction;

    fn result(error_pct: f64) -> CalibrationResult {
        CalibrationResult {
            direction: Direction::Up,
            percent: 0.0,
            process_value: 0.0,
            standard_ma: 4.0,
            measured_ma: 4.0,
            error_pct,
        }
    }

    #[test]
    fn test_empty_results_is_no_data() {
        assert_eq!(verdict(&[], 2.0), Err(NoDataError));
    }

    #[test]
    fn test_max_uses_absolute_value() {
        let v = verdict(&[result(0.5), result(-1.75), result(1.2)], 2.0).unwrap();
        assert_eq!(v.max_abs_error, 1.75);
        assert!(v.passed);
        assert_eq!(v.label(), "PASS");
    }

    #[test]
    fn test_tolerance_is_inclusive() {
        let v = verdict(&[result(2.0)], 2.0).unwrap();
        assert!(v.passed);

        let v = verdict(&[result(-2.0001)], 2.0).unwrap();
        assert!(!v.passed);
        assert_eq!(v.to_string(), "FAIL");
    }

    #[test]
    fn test_zero_tolerance() {
        assert!(verdict(&[result(0.0)], 0.0).unwrap().passed);
        assert!(!verdict(&[result(0.001)], 0.0).unwrap().passed);
    }
}

use crate::core::signal::{error_percent, standard_ma};
use crate::domain::model::{
    CalibrationPoint, CalibrationResult, Direction, Measurement, MeasurementRange, TransmitterType,
};
use crate::utils::error::ValidationError;

/// Configuration plus the readings entered so far for both sweeps.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationSession {
    tag: String,
    transmitter_type: TransmitterType,
    range: MeasurementRange,
    tolerance: f64,
    up: [Option<f64>; 5],
    down: [Option<f64>; 5],
}

impl CalibrationSession {
    pub fn start(
        tag: impl Into<String>,
        transmitter_type: TransmitterType,
        range: MeasurementRange,
        tolerance: f64,
    ) -> Result<Self, ValidationError> {
        let tag = tag.into();
        if tag.trim().is_empty() {
            return Err(ValidationError::EmptyTag);
        }
        // Negated so that a NaN bound is rejected too.
        if !(range.upper_value > range.lower_value) {
            return Err(ValidationError::InvertedRange {
                lower: range.lower_value,
                upper: range.upper_value,
            });
        }

        Ok(Self {
            tag,
            transmitter_type,
            range,
            tolerance,
            up: [None; 5],
            down: [None; 5],
        })
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn transmitter_type(&self) -> TransmitterType {
        self.transmitter_type
    }

    pub fn range(&self) -> &MeasurementRange {
        &self.range
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    fn slots(&self, direction: Direction) -> &[Option<f64>; 5] {
        match direction {
            Direction::Up => &self.up,
            Direction::Down => &self.down,
        }
    }

    fn slots_mut(&mut self, direction: Direction) -> &mut [Option<f64>; 5] {
        match direction {
            Direction::Up => &mut self.up,
            Direction::Down => &mut self.down,
        }
    }

    /// Sets the reading for a slot, replacing any earlier one. Any value is accepted.
    pub fn record(&mut self, direction: Direction, point: CalibrationPoint, measured_ma: f64) {
        tracing::debug!(
            "Recording {} {} = {} mA for {}",
            direction,
            point,
            measured_ma,
            self.tag
        );
        self.slots_mut(direction)[point.index()] = Some(measured_ma);
    }

    pub fn forget(&mut self, direction: Direction, point: CalibrationPoint) {
        tracing::debug!("Clearing {} {} for {}", direction, point, self.tag);
        self.slots_mut(direction)[point.index()] = None;
    }

    pub fn measurement(&self, direction: Direction, point: CalibrationPoint) -> Option<f64> {
        self.slots(direction)[point.index()]
    }

    /// All ten slots in canonical order, entered or not.
    pub fn measurements(&self) -> Vec<Measurement> {
        [Direction::Up, Direction::Down]
            .into_iter()
            .flat_map(|direction| {
                direction.points().into_iter().map(move |point| Measurement {
                    direction,
                    point,
                    measured_ma: self.measurement(direction, point),
                })
            })
            .collect()
    }

    pub fn recorded_count(&self) -> usize {
        self.up.iter().chain(self.down.iter()).flatten().count()
    }

    /// Results for every entered slot: Up sweep 0→100 %, then Down sweep 100→0 %.
    pub fn finalize(&self) -> Vec<CalibrationResult> {
        self.measurements()
            .into_iter()
            .filter_map(|m| {
                let measured_ma = m.measured_ma?;
                let percent = m.point.percent();
                let standard = standard_ma(percent);
                Some(CalibrationResult {
                    direction: m.direction,
                    percent,
                    process_value: self.range.process_value(percent),
                    standard_ma: standard,
                    measured_ma,
                    error_pct: error_percent(measured_ma, standard),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> CalibrationSession {
        CalibrationSession::start(
            "PT-101A",
            TransmitterType::Pressure,
            MeasurementRange::new(0.0, 100.0, "Bar"),
            2.0,
        )
        .unwrap()
    }

    #[test]
    fn test_start_rejects_empty_tag() {
        let range = MeasurementRange::new(0.0, 100.0, "Bar");
        assert_eq!(
            CalibrationSession::start("", TransmitterType::Level, range.clone(), 2.0),
            Err(ValidationError::EmptyTag)
        );
        assert_eq!(
            CalibrationSession::start("   ", TransmitterType::Level, range, 2.0),
            Err(ValidationError::EmptyTag)
        );
    }

    #[test]
    fn test_start_rejects_inverted_range() {
        let result = CalibrationSession::start(
            "LT-200",
            TransmitterType::Level,
            MeasurementRange::new(50.0, 50.0, "m"),
            2.0,
        );
        assert_eq!(
            result,
            Err(ValidationError::InvertedRange {
                lower: 50.0,
                upper: 50.0
            })
        );

        let result = CalibrationSession::start(
            "LT-200",
            TransmitterType::Level,
            MeasurementRange::new(80.0, 20.0, "m"),
            2.0,
        );
        assert!(matches!(result, Err(ValidationError::InvertedRange { .. })));
    }

    #[test]
    fn test_start_accepts_tiny_span() {
        let session = CalibrationSession::start(
            "LT-200",
            TransmitterType::Level,
            MeasurementRange::new(50.0, 50.0001, "m"),
            2.0,
        )
        .unwrap();
        assert_eq!(session.recorded_count(), 0);
        assert!(session.finalize().is_empty());
    }

    #[test]
    fn test_record_overwrites() {
        let mut session = session();
        session.record(Direction::Up, CalibrationPoint::P50, 12.3);
        session.record(Direction::Up, CalibrationPoint::P50, 11.9);

        assert_eq!(session.measurement(Direction::Up, CalibrationPoint::P50), Some(11.9));
        assert_eq!(session.measurement(Direction::Down, CalibrationPoint::P50), None);
        assert_eq!(session.recorded_count(), 1);
    }

    #[test]
    fn test_record_accepts_implausible_values() {
        let mut session = session();
        session.record(Direction::Down, CalibrationPoint::P0, -250.0);
        let results = session.finalize();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].error_pct, (-250.0 - 4.0) / 16.0 * 100.0);
    }

    #[test]
    fn test_forget_excludes_slot() {
        let mut session = session();
        session.record(Direction::Up, CalibrationPoint::P0, 4.0);
        session.record(Direction::Up, CalibrationPoint::P25, 8.0);
        session.forget(Direction::Up, CalibrationPoint::P0);

        let results = session.finalize();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].percent, 25.0);
    }

    #[test]
    fn test_finalize_partial_up_sweep() {
        let mut session = session();
        session.record(Direction::Up, CalibrationPoint::P100, 20.0);
        session.record(Direction::Up, CalibrationPoint::P0, 4.0);

        let percents: Vec<f64> = session.finalize().iter().map(|r| r.percent).collect();
        assert_eq!(percents, vec![0.0, 100.0]);
    }

    #[test]
    fn test_finalize_canonical_order() {
        let mut session = session();
        for point in CalibrationPoint::ALL {
            session.record(Direction::Down, point, 12.0);
            session.record(Direction::Up, point, 12.0);
        }

        let order: Vec<(Direction, f64)> = session
            .finalize()
            .iter()
            .map(|r| (r.direction, r.percent))
            .collect();
        assert_eq!(
            order,
            vec![
                (Direction::Up, 0.0),
                (Direction::Up, 25.0),
                (Direction::Up, 50.0),
                (Direction::Up, 75.0),
                (Direction::Up, 100.0),
                (Direction::Down, 100.0),
                (Direction::Down, 75.0),
                (Direction::Down, 50.0),
                (Direction::Down, 25.0),
                (Direction::Down, 0.0),
            ]
        );
    }

    #[test]
    fn test_finalize_uses_process_range() {
        let mut session = CalibrationSession::start(
            "TT-9",
            TransmitterType::Temperature,
            MeasurementRange::new(10.0, 50.0, "°C"),
            1.0,
        )
        .unwrap();
        session.record(Direction::Up, CalibrationPoint::P25, 8.0);

        let result = session.finalize()[0];
        assert_eq!(result.process_value, 20.0);
        assert_eq!(result.standard_ma, 8.0);
        assert_eq!(result.error_pct, 0.0);
    }
}

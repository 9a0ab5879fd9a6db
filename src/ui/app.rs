use crate::adapters::export::CsvReportWriter;
use crate::config::sheet::{normalize_tag, MAX_ERROR_LIMIT};
use crate::config::CliConfig;
use crate::core::calibrator::Calibrator;
use crate::domain::model::{CalibrationPoint, Direction, MeasurementRange, TransmitterType};
use crate::domain::ports::ReportWriter;
use crate::utils::error::{ErrorSeverity, Result};
use crate::utils::validation::{parse_number, parse_optional_number, validate_range};
use chrono::{Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    TransmitterType,
    Tag,
    LowerRange,
    UpperRange,
    Unit,
    MaxError,
    Reading(Direction, CalibrationPoint),
}

impl Field {
    pub const CONFIG: [Field; 6] = [
        Field::TransmitterType,
        Field::Tag,
        Field::LowerRange,
        Field::UpperRange,
        Field::Unit,
        Field::MaxError,
    ];

    pub fn is_config(self) -> bool {
        !matches!(self, Field::Reading(..))
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::TransmitterType => "Type",
            Field::Tag => "Tag",
            Field::LowerRange => "LRV",
            Field::UpperRange => "URV",
            Field::Unit => "Unit",
            Field::MaxError => "Max error %",
            Field::Reading(Direction::Up, _) => "Up",
            Field::Reading(Direction::Down, _) => "Down",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
}

/// Raw text of the configuration sidebar.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigForm {
    pub transmitter_type: TransmitterType,
    pub tag: String,
    pub lrv: String,
    pub urv: String,
    pub unit: String,
    pub max_error: String,
}

impl Default for ConfigForm {
    fn default() -> Self {
        Self {
            transmitter_type: TransmitterType::Pressure,
            tag: String::new(),
            lrv: "0.000".to_string(),
            urv: "100.000".to_string(),
            unit: "Bar".to_string(),
            max_error: "2.0".to_string(),
        }
    }
}

impl From<&CliConfig> for ConfigForm {
    fn from(config: &CliConfig) -> Self {
        Self {
            transmitter_type: config.transmitter_type,
            tag: config.tag.clone(),
            lrv: format!("{:.3}", config.lrv),
            urv: format!("{:.3}", config.urv),
            unit: config.unit.clone(),
            max_error: format!("{:.1}", config.max_error),
        }
    }
}

pub struct App {
    form: ConfigForm,
    readings: BTreeMap<(Direction, CalibrationPoint), String>,
    calibrator: Calibrator,
    focus: Field,
    status: Option<StatusMessage>,
    output_path: PathBuf,
    last_export: Option<PathBuf>,
    should_quit: bool,
}

impl App {
    pub fn new(form: ConfigForm, output_path: impl Into<PathBuf>) -> Self {
        Self {
            form,
            readings: BTreeMap::new(),
            calibrator: Calibrator::new(),
            focus: Field::TransmitterType,
            status: None,
            output_path: output_path.into(),
            last_export: None,
            should_quit: false,
        }
    }

    pub fn from_config(config: &CliConfig) -> Self {
        Self::new(ConfigForm::from(config), &config.output_path)
    }

    pub fn form(&self) -> &ConfigForm {
        &self.form
    }

    pub fn calibrator(&self) -> &Calibrator {
        &self.calibrator
    }

    pub fn focus(&self) -> Field {
        self.focus
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn last_export(&self) -> Option<&Path> {
        self.last_export.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn reading_input(&self, direction: Direction, point: CalibrationPoint) -> &str {
        self.readings
            .get(&(direction, point))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// `"25% (25.00 Bar)"`, using the active session's range.
    pub fn reading_label(&self, point: CalibrationPoint) -> String {
        match self.calibrator.session() {
            Some(session) => {
                let range = session.range();
                format!(
                    "{}% ({:.2} {})",
                    point.as_u8(),
                    range.process_value(point.percent()),
                    range.unit
                )
            }
            None => point.to_string(),
        }
    }

    fn focus_order(&self) -> Vec<Field> {
        let mut order = Field::CONFIG.to_vec();
        if self.calibrator.session().is_some() {
            for direction in [Direction::Up, Direction::Down] {
                order.extend(
                    direction
                        .points()
                        .into_iter()
                        .map(|point| Field::Reading(direction, point)),
                );
            }
        }
        order
    }

    fn move_focus(&mut self, forward: bool) {
        let order = self.focus_order();
        let current = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (current + 1) % order.len()
        } else {
            (current + order.len() - 1) % order.len()
        };
        self.focus = order[next];
    }

    fn focused_buffer_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            Field::TransmitterType => None,
            Field::Tag => Some(&mut self.form.tag),
            Field::LowerRange => Some(&mut self.form.lrv),
            Field::UpperRange => Some(&mut self.form.urv),
            Field::Unit => Some(&mut self.form.unit),
            Field::MaxError => Some(&mut self.form.max_error),
            Field::Reading(direction, point) => {
                Some(self.readings.entry((direction, point)).or_default())
            }
        }
    }

    fn set_status(&mut self, level: StatusLevel, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            level,
            text: text.into(),
        });
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Char('s') if ctrl => self.export_csv(),
            KeyCode::Tab | KeyCode::Down => self.move_focus(true),
            KeyCode::BackTab | KeyCode::Up => self.move_focus(false),
            KeyCode::Left if self.focus == Field::TransmitterType => {
                self.form.transmitter_type = self.form.transmitter_type.previous();
            }
            KeyCode::Right if self.focus == Field::TransmitterType => {
                self.form.transmitter_type = self.form.transmitter_type.next();
            }
            KeyCode::Enter => {
                if self.focus.is_config() {
                    self.submit_configuration();
                } else {
                    self.submit_readings(Local::now().date_naive());
                }
            }
            KeyCode::Backspace => {
                if let Some(buffer) = self.focused_buffer_mut() {
                    buffer.pop();
                }
            }
            KeyCode::Char(c) if !ctrl => {
                if let Some(buffer) = self.focused_buffer_mut() {
                    buffer.push(c);
                }
            }
            _ => {}
        }
    }

    pub fn submit_configuration(&mut self) {
        match self.try_configure() {
            Ok(tag) => {
                self.readings.clear();
                self.last_export = None;
                self.focus = Field::Reading(Direction::Up, CalibrationPoint::P0);
                self.set_status(
                    StatusLevel::Info,
                    format!(
                        "Calibration started for {}. Enter the mA readings and press Enter.",
                        tag
                    ),
                );
            }
            Err(e) => self.set_status(StatusLevel::Error, e.user_friendly_message()),
        }
    }

    fn try_configure(&mut self) -> Result<String> {
        let lower = parse_number("Lower Range Value (LRV)", &self.form.lrv)?;
        let upper = parse_number("Upper Range Value (URV)", &self.form.urv)?;
        let tolerance = parse_number("Max error", &self.form.max_error)?;
        validate_range("Max error", tolerance, 0.0, MAX_ERROR_LIMIT)?;

        self.form.tag = normalize_tag(&self.form.tag);
        let range = MeasurementRange::new(lower, upper, self.form.unit.trim());
        let session = self.calibrator.configure(
            self.form.tag.clone(),
            self.form.transmitter_type,
            range,
            tolerance,
        )?;
        Ok(session.tag().to_string())
    }

    pub fn submit_readings(&mut self, date: NaiveDate) {
        match self.try_submit_readings(date) {
            Ok(summary) => self.set_status(StatusLevel::Info, summary),
            Err(e) => {
                let level = if e.severity() == ErrorSeverity::Low {
                    StatusLevel::Warning
                } else {
                    StatusLevel::Error
                };
                self.set_status(level, e.user_friendly_message());
            }
        }
    }

    fn try_submit_readings(&mut self, date: NaiveDate) -> Result<String> {
        // Parse every field before touching the session so one typo records nothing.
        let mut parsed = Vec::with_capacity(10);
        for direction in [Direction::Up, Direction::Down] {
            for point in direction.points() {
                let field_name = format!("{} {}", direction, point);
                let value =
                    parse_optional_number(&field_name, self.reading_input(direction, point))?;
                parsed.push((direction, point, value));
            }
        }

        for (direction, point, value) in parsed {
            match value {
                Some(measured_ma) => self.calibrator.record(direction, point, measured_ma)?,
                None => self.calibrator.forget(direction, point)?,
            }
        }

        let report = self.calibrator.finalize(date)?;
        Ok(format!(
            "Report ready: {} points, max error {}, verdict {}. Ctrl-S saves it as CSV.",
            report.results.len(),
            report.max_error_display(),
            report.verdict
        ))
    }

    pub fn export_csv(&mut self) {
        let Some(report) = self.calibrator.report() else {
            self.set_status(
                StatusLevel::Warning,
                "Nothing to export yet. Submit the readings first.",
            );
            return;
        };

        let writer = CsvReportWriter::new(&self.output_path);
        match writer.write_report(report) {
            Ok(path) => {
                self.set_status(
                    StatusLevel::Info,
                    format!("Report saved to {}", path.display()),
                );
                self.last_export = Some(path);
            }
            Err(e) => {
                tracing::error!("CSV export failed: {}", e);
                self.set_status(StatusLevel::Error, e.user_friendly_message());
            }
        }
    }
}

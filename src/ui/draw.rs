//! Terminal rendering of the calibration form and report.

use super::app::{App, Field, StatusLevel};
use crate::core::calibrator::CalibratorState;
use crate::core::report::CalibrationReport;
use crate::domain::model::{Direction as Sweep, Severity};
use ratatui::{prelude::*, widgets::*};

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().bg(Color::DarkGray).fg(Color::White).bold()
    } else {
        Style::default()
    }
}

fn severity_style(severity: Severity) -> Style {
    match severity {
        Severity::Ok => Style::default().fg(Color::Green).bold(),
        Severity::Warn => Style::default().fg(Color::Yellow).bold(),
        Severity::Critical => Style::default().fg(Color::Red).bold(),
    }
}

fn draw_placeholder(f: &mut Frame, area: Rect, title: &str, message: &str) {
    let p = Paragraph::new(message)
        .style(Style::default().fg(Color::DarkGray))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    f.render_widget(p, area);
}

pub fn draw(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Min(10),   // body
            Constraint::Length(1), // status
            Constraint::Length(1), // keys
        ])
        .split(f.area());

    draw_title(f, rows[0]);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(36), Constraint::Min(40)])
        .split(rows[1]);
    draw_config(f, cols[0], app);
    draw_main(f, cols[1], app);

    draw_status(f, rows[2], app);
    draw_keys(f, rows[3]);
}

fn draw_title(f: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" ProCal ", Style::default().bold().fg(Color::Cyan)),
        Span::styled(
            " transmitter calibration with interactive report ",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title);
    f.render_widget(block, area);
}

fn draw_config(f: &mut Frame, area: Rect, app: &App) {
    let form = app.form();
    let mut lines = Vec::new();

    for field in Field::CONFIG {
        let value = match field {
            Field::TransmitterType => format!("< {} >", form.transmitter_type),
            Field::Tag => form.tag.clone(),
            Field::LowerRange => form.lrv.clone(),
            Field::UpperRange => form.urv.clone(),
            Field::Unit => form.unit.clone(),
            Field::MaxError => form.max_error.clone(),
            Field::Reading(..) => continue,
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{:<12}", field.label()), Style::default().bold()),
            Span::styled(value, focus_style(app.focus() == field)),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from("Enter: start calibration".dark_gray()));
    lines.push(Line::from("Left/Right: change type".dark_gray()));

    let p = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Configuration "),
    );
    f.render_widget(p, area);
}

fn draw_main(f: &mut Frame, area: Rect, app: &App) {
    let calibrator = app.calibrator();
    let Some(session) = calibrator.session() else {
        draw_placeholder(
            f,
            area,
            " Welcome ",
            "Fill in the configuration on the left and press Enter to start a calibration.",
        );
        return;
    };

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(8)])
        .split(area);

    let form_title = format!(
        " Readings: {}  Range {} .. {} {}  Type {} ",
        session.tag(),
        session.range().lower_value,
        session.range().upper_value,
        session.range().unit,
        session.transmitter_type()
    );
    let form_block = Block::default().borders(Borders::ALL).title(form_title);
    let inner = form_block.inner(parts[0]);
    f.render_widget(form_block, parts[0]);

    let sweeps = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);
    draw_sweep(f, sweeps[0], app, Sweep::Up);
    draw_sweep(f, sweeps[1], app, Sweep::Down);

    match (calibrator.state(), calibrator.report()) {
        (CalibratorState::Finalized, Some(report)) => draw_report(f, parts[1], report),
        _ => draw_placeholder(
            f,
            parts[1],
            " Report ",
            "Enter mA readings (blank fields are skipped) and press Enter to build the report.",
        ),
    }
}

fn draw_sweep(f: &mut Frame, area: Rect, app: &App, direction: Sweep) {
    let heading = match direction {
        Sweep::Up => "Up (rising)",
        Sweep::Down => "Down (falling)",
    };
    let mut lines = vec![Line::from(Span::styled(heading, Style::default().bold()))];

    for point in direction.points() {
        let input = app.reading_input(direction, point);
        let focused = app.focus() == Field::Reading(direction, point);
        let value = if input.is_empty() && !focused {
            Span::styled("Input mA...", Style::default().fg(Color::DarkGray))
        } else {
            Span::styled(format!("{:<8}", input), focus_style(focused))
        };
        lines.push(Line::from(vec![
            Span::raw(format!("{:<22}", app.reading_label(point))),
            value,
        ]));
    }

    f.render_widget(Paragraph::new(lines), area);
}

fn draw_report(f: &mut Frame, area: Rect, report: &CalibrationReport) {
    let table_height = report.results.len() as u16 + 3;
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(table_height),
            Constraint::Min(6),
        ])
        .split(area);

    draw_cards(f, parts[0], report);
    draw_table(f, parts[1], report);
    draw_chart(f, parts[2], report);
}

fn draw_cards(f: &mut Frame, area: Rect, report: &CalibrationReport) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(30),
            Constraint::Percentage(40),
        ])
        .split(area);

    let tag = Paragraph::new(format!("Tag: {}", report.tag))
        .block(Block::default().borders(Borders::ALL));
    let date = Paragraph::new(format!("Date: {}", report.date.format("%Y-%m-%d")))
        .block(Block::default().borders(Borders::ALL));

    let verdict_color = if report.verdict.passed {
        Color::Green
    } else {
        Color::Red
    };
    let verdict = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" Verdict: {} ", report.verdict),
            Style::default().bold().fg(Color::Black).bg(verdict_color),
        ),
        Span::raw(format!("  max error {}", report.max_error_display())),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(verdict_color)),
    );

    f.render_widget(tag, cards[0]);
    f.render_widget(date, cards[1]);
    f.render_widget(verdict, cards[2]);
}

fn draw_table(f: &mut Frame, area: Rect, report: &CalibrationReport) {
    let rows: Vec<Row> = report
        .rows()
        .into_iter()
        .map(|row| {
            let error_style = severity_style(row.severity);
            Row::new(vec![
                Cell::from(row.sweep),
                Cell::from(row.point),
                Cell::from(row.process_value),
                Cell::from(row.standard_ma),
                Cell::from(row.measured_ma),
                Cell::from(row.error).style(error_style),
            ])
        })
        .collect();

    let header = Row::new(vec![
        "Sweep".to_string(),
        "Point (%)".to_string(),
        format!("PV ({})", report.range.unit),
        "Std (mA)".to_string(),
        "Measured (mA)".to_string(),
        "Error (%)".to_string(),
    ])
    .style(Style::default().bold().fg(Color::DarkGray));

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Length(10),
            Constraint::Length(14),
            Constraint::Length(9),
            Constraint::Length(14),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Results  (max error {}) ", report.max_error_display())),
    );

    f.render_widget(table, area);
}

/// Y bounds always include the 4–20 mA band, padded slightly.
fn signal_bounds(points: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = points.fold((4.0_f64, 20.0_f64), |(lo, hi), y| (lo.min(y), hi.max(y)));
    (lo - 0.5, hi + 0.5)
}

fn draw_chart(f: &mut Frame, area: Rect, report: &CalibrationReport) {
    let series = report.chart_series();

    let datasets = vec![
        Dataset::default()
            .name("Ideal")
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Gray))
            .data(&series.ideal),
        Dataset::default()
            .name("Measured (Up)")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Blue))
            .data(&series.up),
        Dataset::default()
            .name("Measured (Down)")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Green))
            .data(&series.down),
    ];

    let x_min = report.range.lower_value;
    let x_max = report.range.upper_value;
    let (y_min, y_max) = signal_bounds(
        series
            .ideal
            .iter()
            .chain(series.up.iter())
            .chain(series.down.iter())
            .map(|(_, y)| *y),
    );

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", report.chart_title())),
        )
        .x_axis(
            Axis::default()
                .title(Span::styled(
                    report.x_axis_title(),
                    Style::default().fg(Color::DarkGray),
                ))
                .bounds([x_min, x_max])
                .labels(vec![
                    Line::from(format!("{x_min:.1}")),
                    Line::from(format!("{:.1}", (x_min + x_max) / 2.0)),
                    Line::from(format!("{x_max:.1}")),
                ]),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled(
                    report.y_axis_title(),
                    Style::default().fg(Color::DarkGray),
                ))
                .bounds([y_min, y_max])
                .labels(vec![
                    Line::from(format!("{y_min:.1}")),
                    Line::from(format!("{:.1}", (y_min + y_max) / 2.0)),
                    Line::from(format!("{y_max:.1}")),
                ]),
        );

    f.render_widget(chart, area);
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let Some(status) = app.status() else {
        return;
    };
    let style = match status.level {
        StatusLevel::Info => Style::default().fg(Color::Green),
        StatusLevel::Warning => Style::default().fg(Color::Yellow),
        StatusLevel::Error => Style::default().fg(Color::Red).bold(),
    };
    f.render_widget(Paragraph::new(format!(" {}", status.text)).style(style), area);
}

fn draw_keys(f: &mut Frame, area: Rect) {
    let keys = Line::from(vec![
        Span::styled(" Tab", Style::default().bold()),
        Span::raw(" next  "),
        Span::styled("Shift-Tab", Style::default().bold()),
        Span::raw(" previous  "),
        Span::styled("Enter", Style::default().bold()),
        Span::raw(" submit  "),
        Span::styled("Ctrl-S", Style::default().bold()),
        Span::raw(" save CSV  "),
        Span::styled("Esc", Style::default().bold()),
        Span::raw(" quit"),
    ]);
    let p = Paragraph::new(keys).style(Style::default().fg(Color::DarkGray));
    f.render_widget(p, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::app::ConfigForm;
    use chrono::NaiveDate;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;

    fn render(app: &App) -> String {
        let backend = TestBackend::new(140, 48);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();

        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content
            .chunks(width)
            .map(|line| line.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
    }

    fn finalized_app(last_reading: &str) -> App {
        let mut app = App::new(
            ConfigForm {
                tag: "PT-101A".to_string(),
                ..ConfigForm::default()
            },
            "./output",
        );
        app.submit_configuration();
        for reading in ["4.0", "8.0", "12.0", "16.0", last_reading] {
            type_text(&mut app, reading);
            app.handle_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE));
        }
        app.submit_readings(NaiveDate::from_ymd_opt(2024, 5, 17).unwrap());
        app
    }

    #[test]
    fn severity_style_colors() {
        assert_eq!(severity_style(Severity::Ok).fg, Some(Color::Green));
        assert_eq!(severity_style(Severity::Warn).fg, Some(Color::Yellow));
        assert_eq!(severity_style(Severity::Critical).fg, Some(Color::Red));
    }

    #[test]
    fn signal_bounds_include_nominal_band() {
        assert_eq!(signal_bounds([8.0, 12.0].into_iter()), (3.5, 20.5));
        assert_eq!(signal_bounds([2.0, 22.0].into_iter()), (1.5, 22.5));
    }

    #[test]
    fn renders_welcome_before_configuration() {
        let app = App::new(ConfigForm::default(), "./output");
        let screen = render(&app);
        assert!(screen.contains("Configuration"));
        assert!(screen.contains("< Pressure >"));
        assert!(screen.contains("Fill in the configuration"));
    }

    #[test]
    fn renders_measurement_form_labels() {
        let mut app = App::new(
            ConfigForm {
                tag: "LT-7".to_string(),
                lrv: "10".to_string(),
                urv: "50".to_string(),
                unit: "m".to_string(),
                ..ConfigForm::default()
            },
            "./output",
        );
        app.submit_configuration();
        let screen = render(&app);
        assert!(screen.contains("Up (rising)"));
        assert!(screen.contains("Down (falling)"));
        assert!(screen.contains("25% (20.00 m)"));
        assert!(screen.contains("Input mA..."));
    }

    #[test]
    fn renders_passing_report() {
        let screen = render(&finalized_app("20.1"));
        assert!(screen.contains("Verdict: PASS"));
        assert!(screen.contains("+0.625%"));
        assert!(screen.contains("Date: 2024-05-17"));
        assert!(screen.contains("Calibration Chart - PT-101A"));
    }

    #[test]
    fn renders_failing_report() {
        let screen = render(&finalized_app("20.5"));
        assert!(screen.contains("Verdict: FAIL"));
        assert!(screen.contains("+3.125%"));
        assert!(screen.contains("3.125%"));
    }

    #[test]
    fn renders_status_message() {
        let mut app = App::new(ConfigForm::default(), "./output");
        app.submit_configuration();
        assert!(render(&app).contains("Tag item is required."));
    }
}

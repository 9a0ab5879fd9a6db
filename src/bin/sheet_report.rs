use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, ValueEnum};
use procal::core::report::CalibrationReport;
use procal::domain::ports::ReportWriter;
use procal::utils::error::{CalibrationError, ErrorSeverity};
use procal::utils::{logger, validation::Validate};
use procal::{CalibrationSheet, Calibrator, CsvReportWriter, JsonReportWriter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Print the report to stdout only
    Table,
    /// Also write the results table as CSV
    Csv,
    /// Also write the full report as JSON
    Json,
}

#[derive(Parser)]
#[command(name = "sheet-report")]
#[command(about = "Grade a calibration sheet (TOML) and print or export the report")]
struct Args {
    /// Path to the calibration sheet
    #[arg(short, long, default_value = "calibration.toml")]
    sheet: String,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Directory for exported reports
    #[arg(long, default_value = "./output")]
    output_path: String,

    /// Calibration date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn print_report(report: &CalibrationReport) {
    println!("Tag:    {}", report.tag);
    println!("Type:   {}", report.transmitter_type);
    println!(
        "Range:  {} .. {} {}",
        report.range.lower_value, report.range.upper_value, report.range.unit
    );
    println!("Date:   {}", report.date.format("%Y-%m-%d"));
    println!();
    println!(
        "{:<6} {:>9} {:>14} {:>9} {:>13} {:>10}",
        "Sweep",
        "Point (%)",
        format!("PV ({})", report.range.unit),
        "Std (mA)",
        "Measured (mA)",
        "Error (%)"
    );
    for row in report.rows() {
        println!(
            "{:<6} {:>9} {:>14} {:>9} {:>13} {:>10}",
            row.sweep, row.point, row.process_value, row.standard_ma, row.measured_ma, row.error
        );
    }
    println!();
    println!("Max error: {} (allowed {}%)", report.max_error_display(), report.tolerance);

    let icon = if report.verdict.passed { "✅" } else { "❌" };
    println!("{} Verdict: {}", icon, report.verdict);
}

fn exit_with(e: &CalibrationError) -> ! {
    tracing::error!(
        "❌ Calibration report failed: {} (Severity: {:?})",
        e,
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 4,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    tracing::info!("📁 Loading calibration sheet from: {}", args.sheet);
    let sheet = match CalibrationSheet::from_file(&args.sheet) {
        Ok(sheet) => sheet,
        Err(e) => {
            eprintln!("❌ Failed to load sheet '{}': {}", args.sheet, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if let Err(e) = sheet.validate() {
        exit_with(&e);
    }

    let mut calibrator = Calibrator::new();
    if let Err(e) = sheet.apply(&mut calibrator) {
        exit_with(&e);
    }

    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    let report = match calibrator.finalize(date) {
        Ok(report) => report,
        Err(e) => exit_with(&e),
    };

    print_report(report);

    let writer: Option<Box<dyn ReportWriter>> = match args.format {
        OutputFormat::Table => None,
        OutputFormat::Csv => Some(Box::new(CsvReportWriter::new(&args.output_path))),
        OutputFormat::Json => Some(Box::new(JsonReportWriter::new(&args.output_path))),
    };

    if let Some(writer) = writer {
        let path = writer
            .write_report(report)
            .with_context(|| format!("failed to write {} report", writer.format()))?;
        println!("📁 Report saved to: {}", path.display());
    }

    Ok(())
}

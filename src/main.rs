use anyhow::Context;
use clap::Parser;
use procal::ui::{self, app::App};
use procal::utils::{logger, validation::Validate};
use procal::CliConfig;

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // The form owns the terminal, so logs only go to a file when one is requested.
    if let Some(log_file) = &config.log_file {
        logger::init_file_logger(config.verbose, log_file)
            .with_context(|| format!("cannot open log file {}", log_file.display()))?;
    }

    tracing::info!("Starting procal");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let mut app = App::from_config(&config);
    ui::run(&mut app).context("terminal session failed")?;

    if let Some(path) = app.last_export() {
        println!("📁 Last report saved to: {}", path.display());
    }

    Ok(())
}

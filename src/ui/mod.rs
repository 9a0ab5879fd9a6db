//! Interactive terminal front end.

pub mod app;
pub mod draw;

use crate::utils::error::Result;
use app::App;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;

type Tui = Terminal<CrosstermBackend<Stdout>>;

fn setup_terminal() -> io::Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn restore_terminal(terminal: &mut Tui) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}

fn event_loop(terminal: &mut Tui, app: &mut App) -> io::Result<()> {
    while !app.should_quit() {
        terminal.draw(|f| draw::draw(f, app))?;

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                // Windows also reports key releases.
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
    }
    Ok(())
}

/// Runs the form until the user quits. The terminal is restored even if drawing fails.
pub fn run(app: &mut App) -> Result<()> {
    let mut terminal = setup_terminal()?;
    tracing::info!("Interactive session started");

    let outcome = event_loop(&mut terminal, app);
    let restored = restore_terminal(&mut terminal);

    outcome?;
    restored?;
    tracing::info!("Interactive session ended");
    Ok(())
}

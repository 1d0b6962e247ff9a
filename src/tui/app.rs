use anyhow::Result;
use crossterm::ExecutableCommand;
use crossterm::cursor::Show;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use scopeguard::defer;
use std::io::stdout;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::display::LiveDisplay;
use crate::monitor::{CompletedSession, SessionController, spawn_key_listener};
use crate::probe::Prober;
use crate::state::{RunningStatistics, Session};
use crate::tui::theme::Theme;
use crate::tui::views::LiveView;

/// Terminal display that redraws the whole frame every cycle
pub struct TuiDisplay<B: Backend> {
    terminal: Terminal<B>,
    theme: Theme,
}

impl<B: Backend> TuiDisplay<B> {
    pub fn new(terminal: Terminal<B>, theme: Theme) -> Self {
        Self { terminal, theme }
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }
}

impl<B> LiveDisplay for TuiDisplay<B>
where
    B: Backend,
    B::Error: Send + Sync + 'static,
{
    fn render(&mut self, session: &Session, stats: &RunningStatistics) -> Result<()> {
        // Full-frame redraw: drop whatever the previous frame left on screen
        self.terminal.clear()?;
        let theme = &self.theme;
        self.terminal
            .draw(|f| f.render_widget(LiveView::new(session, stats, theme), f.area()))?;
        Ok(())
    }
}

/// Run a monitoring session inside the alternate screen.
///
/// The terminal is restored on every exit path before the caller writes any
/// report output.
pub async fn run_tui<P: Prober>(
    config: Config,
    prober: P,
    theme: Theme,
    cancel: CancellationToken,
) -> Result<CompletedSession> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;

    // Ensure terminal is restored on any exit (success, error, or panic)
    defer! {
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
        let _ = stdout().execute(Show);
    }

    let input = spawn_key_listener(cancel.clone())?;

    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend)?;
    let display = TuiDisplay::new(terminal, theme);

    let completed = SessionController::new(config, prober, display, cancel.clone())
        .run()
        .await;

    // The loop is over; release the input thread before leaving raw mode
    cancel.cancel();
    if input.join().is_err() {
        tracing::warn!("input thread panicked");
    }

    Ok(completed)
}

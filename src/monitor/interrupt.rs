//! Interrupt sources folded into one cancellation token.
//!
//! SIGINT arrives through tokio's signal handler. While the terminal is in raw
//! mode Ctrl+C is delivered as a key press instead, so a small input thread
//! watches for it (and for `q`/`Esc`) and cancels the same token.

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::thread::JoinHandle;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// How often the input thread rechecks the token when no key arrives
const INPUT_POLL: Duration = Duration::from_millis(100);

/// Cancel `cancel` on the first Ctrl+C / SIGINT
pub fn spawn_signal_listener(cancel: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            _ = cancel.cancelled() => {}
            res = tokio::signal::ctrl_c() => {
                match res {
                    Ok(()) => tracing::info!("interrupt received"),
                    Err(e) => tracing::warn!(error = %e, "failed to listen for Ctrl+C"),
                }
                cancel.cancel();
            }
        }
    })
}

/// Whether a key press asks the session to stop
pub fn is_stop_key(code: KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Watch terminal input and cancel on a stop key. Exits once the token is
/// cancelled from anywhere.
pub fn spawn_key_listener(cancel: CancellationToken) -> std::io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("liveping-input".to_string())
        .spawn(move || {
            while !cancel.is_cancelled() {
                let ready = match event::poll(INPUT_POLL) {
                    Ok(ready) => ready,
                    Err(e) => {
                        tracing::warn!(error = %e, "terminal input unavailable");
                        break;
                    }
                };
                if !ready {
                    continue;
                }
                match event::read() {
                    Ok(Event::Key(key))
                        if key.kind == KeyEventKind::Press
                            && is_stop_key(key.code, key.modifiers) =>
                    {
                        tracing::info!(key = ?key.code, "stop key pressed");
                        cancel.cancel();
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to read terminal input");
                        break;
                    }
                }
            }
        })
}

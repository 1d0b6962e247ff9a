//! Live display seam used by the session controller.
//!
//! The terminal UI lives in [`crate::tui`]; [`StreamDisplay`] is the plain
//! line-per-probe fallback for pipes and dumb terminals.

pub mod stream;

pub use stream::StreamDisplay;

use anyhow::Result;

use crate::state::{RunningStatistics, Session};

/// Draws the current session state once per cycle.
///
/// A failed render is reported to the caller, which logs it and keeps going.
pub trait LiveDisplay {
    fn render(&mut self, session: &Session, stats: &RunningStatistics) -> Result<()>;
}

impl<D: LiveDisplay + ?Sized> LiveDisplay for &mut D {
    fn render(&mut self, session: &Session, stats: &RunningStatistics) -> Result<()> {
        (**self).render(session, stats)
    }
}

/// Format an optional latency for display
pub fn format_ms(value: Option<f64>) -> String {
    match value {
        Some(ms) => format!("{:.2}", ms),
        None => "-".to_string(),
    }
}

/// Strip control characters so raw ping output cannot inject terminal escapes
pub fn sanitize_display(s: &str) -> String {
    s.chars().filter(|c| !c.is_control()).collect()
}

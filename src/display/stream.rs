use anyhow::Result;
use std::io::Write;

use crate::display::{LiveDisplay, format_ms};
use crate::state::{ProbeStatus, RunningStatistics, Session};

/// Prints one line per probe, for `--no-tui` and non-interactive output
pub struct StreamDisplay<W: Write> {
    writer: W,
    header_written: bool,
}

impl<W: Write> StreamDisplay<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            header_written: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> LiveDisplay for StreamDisplay<W> {
    fn render(&mut self, session: &Session, stats: &RunningStatistics) -> Result<()> {
        if !self.header_written {
            writeln!(self.writer, "PING {} (Ctrl+C to stop and write reports)", session.target)?;
            self.header_written = true;
        }

        let Some(last) = session.last() else {
            return Ok(());
        };

        let result = match last.status {
            ProbeStatus::Success => format!("{:>8} ms", format_ms(last.latency_ms)),
            ProbeStatus::Failed => format!(
                "{:>11}",
                last.failure.map(|f| f.label()).unwrap_or("failed")
            ),
        };

        writeln!(
            self.writer,
            "#{:<5} {}  {}  sent {} lost {} ({:.1}%)  min {} avg {} max {}",
            last.sequence,
            last.observed_at.format("%H:%M:%S"),
            result,
            stats.sent,
            stats.lost,
            stats.loss_pct,
            format_ms(stats.min_ms),
            format_ms(stats.avg_ms),
            format_ms(stats.max_ms),
        )?;
        self.writer.flush()?;
        Ok(())
    }
}

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::probe::EXEC_MARGIN;
use crate::tui::Theme;

/// Default probe target
pub const DEFAULT_TARGET: &str = "8.8.8.8";

/// Ping a host on a fixed cadence with a live latency chart, then write CSV and PNG reports
#[derive(Parser, Debug, Clone)]
#[command(name = "liveping")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Host to probe (IP address or hostname)
    #[arg(short = 't', long = "target", default_value = DEFAULT_TARGET)]
    pub target: String,

    /// Stop after this many seconds (default: run until Ctrl+C)
    #[arg(short = 'T', long = "time")]
    pub time: Option<u64>,

    /// Probe interval in seconds
    #[arg(short = 'i', long = "interval", default_value = "1.0")]
    pub interval: f64,

    /// Per-probe timeout in seconds
    #[arg(long = "timeout", default_value = "10")]
    pub timeout: f64,

    /// Directory for the CSV and PNG reports
    #[arg(short = 'o', long = "output-dir")]
    pub output_dir: Option<PathBuf>,

    /// Ping program to run
    #[arg(long = "ping-program", default_value = "ping")]
    pub ping_program: String,

    /// Disable TUI (one line per probe)
    #[arg(long = "no-tui")]
    pub no_tui: bool,

    /// Color theme (default, dracula, nord, monochrome, matrix)
    #[arg(long = "theme")]
    pub theme: Option<String>,

    /// Write logs to this file instead of stderr
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Get probe interval as Duration
    pub fn interval_duration(&self) -> Duration {
        Duration::from_secs_f64(self.interval)
    }

    /// Get timeout as Duration
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs_f64(self.timeout)
    }

    /// Get the time budget, if any
    pub fn time_limit(&self) -> Option<Duration> {
        self.time.map(Duration::from_secs)
    }

    /// Validate arguments
    pub fn validate(&self) -> Result<(), String> {
        if self.target.trim().is_empty() {
            return Err("Target cannot be empty".into());
        }

        if self.target.starts_with('-') {
            return Err(format!("Invalid target: {}", self.target));
        }

        if !self.interval.is_finite() || self.interval <= 0.0 {
            return Err("Interval must be positive".into());
        }
        if Duration::try_from_secs_f64(self.interval).is_err() {
            return Err(format!("Interval too large: {}", self.interval));
        }

        if !self.timeout.is_finite() || self.timeout <= 0.0 {
            return Err("Timeout must be positive".into());
        }
        // The executor waits timeout + margin before giving up on ping
        let timeout_fits = Duration::try_from_secs_f64(self.timeout)
            .ok()
            .and_then(|t| t.checked_add(EXEC_MARGIN))
            .is_some();
        if !timeout_fits {
            return Err(format!("Timeout too large: {}", self.timeout));
        }

        if let Some(ref theme) = self.theme
            && !Theme::is_known(theme)
        {
            return Err(format!(
                "Unknown theme '{}' (available: {})",
                theme,
                Theme::list().join(", ")
            ));
        }

        if self.ping_program.trim().is_empty() {
            return Err("Ping program cannot be empty".into());
        }

        Ok(())
    }
}

use std::path::PathBuf;
use std::time::Duration;

use crate::cli::Args;

/// Runtime configuration derived from CLI args and saved preferences
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Host handed to the ping program
    pub target: String,
    /// Delay between probe starts
    pub interval: Duration,
    /// Per-probe timeout given to ping
    pub timeout: Duration,
    /// Stop after this long (None = until interrupted)
    pub time_limit: Option<Duration>,
    /// Where reports are written
    pub output_dir: PathBuf,
}

impl From<&Args> for Config {
    fn from(args: &Args) -> Self {
        Self {
            target: args.target.trim().to_string(),
            interval: args.interval_duration(),
            timeout: args.timeout_duration(),
            time_limit: args.time_limit(),
            output_dir: args.output_dir.clone().unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

impl Config {
    /// Fall back to a saved output directory when none was given on the command line
    pub fn with_default_output_dir(mut self, args: &Args, saved: Option<&PathBuf>) -> Self {
        if args.output_dir.is_none()
            && let Some(dir) = saved
        {
            self.output_dir = dir.clone();
        }
        self
    }
}

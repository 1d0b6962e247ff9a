//! Latency extraction from ping output.
//!
//! `ping` prints its round-trip time in a locale dependent way. Each known
//! spelling is one entry in [`LATENCY_PATTERNS`]; they are tried in order and
//! the first one that yields a number wins.

use regex::Regex;
use std::sync::OnceLock;

use crate::probe::executor::{EXEC_ERROR_PREFIX, RawProbe, TIMEOUT_OUTPUT};
use crate::state::{FailureKind, Observation};

/// Known latency labels, most common first.
///
/// `[=<]` also accepts the Windows `time<1ms` form, which is read as its bound.
pub const LATENCY_PATTERNS: &[&str] = &[
    // English, every Unix ping and English Windows
    r"time[=<]\s*([\d.]+)\s*ms",
    // Spanish Windows
    r"[Tt]iempo[=<]\s*([\d.]+)\s*ms",
    // German Windows
    r"Zeit[=<]\s*([\d.]+)\s*ms",
    // French Windows
    r"temps[=<]\s*([\d.]+)\s*ms",
    // Portuguese / Italian Windows
    r"tempo[=<]\s*([\d.]+)\s*ms",
];

fn latency_regexes() -> &'static [Regex] {
    static REGEXES: OnceLock<Vec<Regex>> = OnceLock::new();
    REGEXES.get_or_init(|| {
        LATENCY_PATTERNS
            .iter()
            .map(|p| Regex::new(p).expect("failed to compile latency regex"))
            .collect()
    })
}

/// Extract the round-trip time in milliseconds, or `None` if the output
/// carries no recognizable latency.
pub fn parse_latency(output: &str) -> Option<f64> {
    latency_regexes().iter().find_map(|re| {
        re.captures(output)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok())
    })
}

/// Turn raw executor output into an observation for the session
pub fn classify(raw: &RawProbe) -> Observation {
    if let Some(latency_ms) = parse_latency(&raw.stdout) {
        return Observation::Reply { latency_ms };
    }

    let failure = if raw.stdout == TIMEOUT_OUTPUT {
        FailureKind::Timeout
    } else if raw.stdout.starts_with(EXEC_ERROR_PREFIX) {
        FailureKind::ExecutionError
    } else {
        FailureKind::NoReply
    };

    Observation::Lost {
        failure,
        diagnostic: format!(
            "STDOUT: '{}' | STDERR: '{}'",
            raw.stdout.trim(),
            raw.stderr.trim()
        ),
    }
}

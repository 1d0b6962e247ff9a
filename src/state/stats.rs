//! Running latency and loss statistics.
//!
//! Statistics are a pure function of the session history and are recomputed
//! from the full snapshot every cycle, so there is nothing to keep in sync.

use super::session::ProbeOutcome;

/// Smallest latency used for the chart ceiling, so a fast LAN host still gets a
/// readable y axis.
pub const PLOT_FLOOR_MS: f64 = 5.0;

/// Headroom applied on top of the observed maximum
pub const PLOT_HEADROOM: f64 = 1.1;

/// Y-axis ceiling shown before any probe succeeded
pub const PLOT_PLACEHOLDER_MS: f64 = 50.0;

/// Aggregate statistics over a session snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningStatistics {
    pub sent: u64,
    pub lost: u64,
    pub loss_pct: f64,
    pub min_ms: Option<f64>,
    pub max_ms: Option<f64>,
    pub avg_ms: Option<f64>,
}

impl RunningStatistics {
    pub fn compute(snapshot: &[ProbeOutcome]) -> Self {
        let sent = snapshot.len() as u64;

        let mut received: u64 = 0;
        let mut sum = 0.0;
        let mut min: Option<f64> = None;
        let mut max: Option<f64> = None;

        for latency in snapshot.iter().filter_map(|o| o.latency_ms) {
            received += 1;
            sum += latency;
            min = Some(min.map_or(latency, |m| m.min(latency)));
            max = Some(max.map_or(latency, |m| m.max(latency)));
        }

        let lost = sent - received;
        let loss_pct = if sent == 0 {
            0.0
        } else {
            lost as f64 / sent as f64 * 100.0
        };
        let avg = if received == 0 {
            None
        } else {
            Some(sum / received as f64)
        };

        Self {
            sent,
            lost,
            loss_pct,
            min_ms: min,
            max_ms: max,
            avg_ms: avg,
        }
    }

    /// Number of successful probes
    pub fn received(&self) -> u64 {
        self.sent - self.lost
    }

    /// Upper bound for a latency y axis
    pub fn plot_ceiling(&self) -> f64 {
        match self.max_ms {
            Some(max) => max.max(PLOT_FLOOR_MS) * PLOT_HEADROOM,
            None => PLOT_PLACEHOLDER_MS,
        }
    }
}

use chrono::Local;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::display::LiveDisplay;
use crate::probe::{Prober, classify};
use crate::state::{RunningStatistics, Session};

/// Why a session stopped probing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    TimeLimit,
    Interrupted,
}

impl StopReason {
    pub fn label(&self) -> &'static str {
        match self {
            Self::TimeLimit => "time limit reached",
            Self::Interrupted => "interrupted",
        }
    }
}

/// Controller lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    StoppingByTimeLimit,
    StoppingByInterrupt,
    Terminated,
}

/// Everything a finished session hands to the report emitter
#[derive(Debug, Clone)]
pub struct CompletedSession {
    pub session: Session,
    pub stop_reason: StopReason,
    /// Wall time spent in the loop
    pub elapsed: Duration,
}

/// Drives the probe → record → render cycle at a fixed cadence.
///
/// One probe is in flight at a time and it is never preempted. The
/// cancellation token is checked before each probe, after each render and while
/// sleeping, so an interrupt is honored within one probe timeout.
pub struct SessionController<P, D> {
    config: Config,
    prober: P,
    display: D,
    cancel: CancellationToken,
    state: SessionState,
}

impl<P, D> SessionController<P, D>
where
    P: Prober,
    D: LiveDisplay,
{
    pub fn new(config: Config, prober: P, display: D, cancel: CancellationToken) -> Self {
        Self {
            config,
            prober,
            display,
            cancel,
            state: SessionState::Running,
        }
    }

    fn transition(&mut self, next: SessionState) {
        if self.state != next {
            tracing::info!(from = ?self.state, to = ?next, "session state change");
            self.state = next;
        }
    }

    /// Run until the time budget is spent or the token is cancelled.
    ///
    /// Consumes the controller: `Terminated` is final.
    pub async fn run(mut self) -> CompletedSession {
        let loop_start = Instant::now();
        let budget_end = self
            .config
            .time_limit
            .and_then(|limit| loop_start.checked_add(limit));
        let mut session = Session::new(self.config.target.clone());

        tracing::info!(
            target_host = %session.target,
            interval = ?self.config.interval,
            timeout = ?self.config.timeout,
            time_limit = ?self.config.time_limit,
            "session started"
        );

        while self.state == SessionState::Running {
            if self.cancel.is_cancelled() {
                self.transition(SessionState::StoppingByInterrupt);
                break;
            }
            if let Some(limit) = self.config.time_limit
                && loop_start.elapsed() >= limit
            {
                self.transition(SessionState::StoppingByTimeLimit);
                break;
            }

            let cycle_start = Instant::now();
            self.cycle(&mut session).await;

            if self.cancel.is_cancelled() {
                self.transition(SessionState::StoppingByInterrupt);
                break;
            }

            // Next-deadline scheduling: an overrunning cycle sleeps zero.
            // The time budget can end the wait before the next cycle is due.
            let next = cycle_start.checked_add(self.config.interval);
            tokio::select! {
                _ = self.cancel.cancelled() => {}
                _ = sleep_until_opt(next) => {}
                _ = sleep_until_opt(budget_end) => {}
            }
        }

        let stop_reason = match self.state {
            SessionState::StoppingByTimeLimit => StopReason::TimeLimit,
            _ => StopReason::Interrupted,
        };
        self.transition(SessionState::Terminated);

        CompletedSession {
            session,
            stop_reason,
            elapsed: loop_start.elapsed(),
        }
    }

    async fn cycle(&mut self, session: &mut Session) {
        let raw = self
            .prober
            .execute(&self.config.target, self.config.timeout)
            .await;
        let outcome = session.record(classify(&raw), Local::now());
        tracing::debug!(
            seq = outcome.sequence,
            status = outcome.status.label(),
            latency_ms = ?outcome.latency_ms,
            "probe complete"
        );

        let stats = RunningStatistics::compute(session.snapshot());
        if let Err(e) = self.display.render(session, &stats) {
            tracing::warn!(error = %e, "failed to render live view");
        }
    }
}

/// Sleep until `deadline`, or forever when there is none
async fn sleep_until_opt(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

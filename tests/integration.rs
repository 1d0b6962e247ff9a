//! Integration tests for the probe→record→render loop
//!
//! These tests drive the session controller with scripted probers under
//! paused tokio time, so no network access or real `ping` is needed.

use anyhow::anyhow;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use liveping::config::Config;
use liveping::display::LiveDisplay;
use liveping::export::{CSV_HEADER, emit_reports, finish_session};
use liveping::monitor::{SessionController, StopReason};
use liveping::probe::{PingExecutor, Prober, RawProbe};
use liveping::state::{FailureKind, ProbeStatus, RunningStatistics, Session};

fn test_config(time_limit: Option<Duration>) -> Config {
    Config {
        target: "8.8.8.8".to_string(),
        interval: Duration::from_secs(1),
        timeout: Duration::from_secs(2),
        time_limit,
        output_dir: PathBuf::from("."),
    }
}

fn reply(ms: &str) -> RawProbe {
    RawProbe::completed(
        format!(
            "PING 8.8.8.8 (8.8.8.8) 56(84) bytes of data.\n\
             64 bytes from 8.8.8.8: icmp_seq=1 ttl=117 time={} ms\n",
            ms
        ),
        "",
    )
}

/// Replays a fixed script of raw outputs, optionally taking time per probe
struct ScriptedProber {
    script: Vec<RawProbe>,
    calls: AtomicUsize,
    delay: Duration,
    /// Cancel this token once this many probes have been issued
    cancel_after: Option<(usize, CancellationToken)>,
}

impl ScriptedProber {
    fn new(script: Vec<RawProbe>) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
            delay: Duration::ZERO,
            cancel_after: None,
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn cancel_after(mut self, probes: usize, cancel: CancellationToken) -> Self {
        self.cancel_after = Some((probes, cancel));
        self
    }
}

impl Prober for ScriptedProber {
    async fn execute(&self, _host: &str, _timeout: Duration) -> RawProbe {
        let i = self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if let Some((limit, cancel)) = &self.cancel_after
            && i + 1 >= *limit
        {
            cancel.cancel();
        }
        self.script[i % self.script.len()].clone()
    }
}

/// Remembers what it was asked to draw
#[derive(Default)]
struct RecordingDisplay {
    frames: Vec<(usize, RunningStatistics)>,
}

impl LiveDisplay for RecordingDisplay {
    fn render(&mut self, session: &Session, stats: &RunningStatistics) -> anyhow::Result<()> {
        self.frames.push((session.len(), *stats));
        Ok(())
    }
}

/// Fails every frame
struct BrokenDisplay {
    attempts: usize,
}

impl LiveDisplay for BrokenDisplay {
    fn render(&mut self, _session: &Session, _stats: &RunningStatistics) -> anyhow::Result<()> {
        self.attempts += 1;
        Err(anyhow!("terminal went away"))
    }
}

/// Stdout after the reader went away
struct ClosedPipe;

impl Write for ClosedPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::from(io::ErrorKind::BrokenPipe))
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::from(io::ErrorKind::BrokenPipe))
    }
}

#[tokio::test(start_paused = true)]
async fn test_mixed_outcomes_scenario() {
    let cancel = CancellationToken::new();
    let script = vec![
        reply("10"),
        RawProbe::timeout(),
        reply("20"),
        RawProbe::completed("", "ping: unknown host nowhere"),
        reply("15"),
    ];
    let prober = ScriptedProber::new(script).cancel_after(5, cancel.clone());
    let mut display = RecordingDisplay::default();

    let completed = SessionController::new(test_config(None), prober, &mut display, cancel)
        .run()
        .await;

    assert_eq!(completed.stop_reason, StopReason::Interrupted);

    let outcomes = completed.session.snapshot();
    assert_eq!(outcomes.len(), 5);
    let sequences: Vec<u64> = outcomes.iter().map(|o| o.sequence).collect();
    assert_eq!(sequences, vec![1, 2, 3, 4, 5]);

    assert_eq!(outcomes[1].status, ProbeStatus::Failed);
    assert_eq!(outcomes[1].failure, Some(FailureKind::Timeout));
    assert_eq!(outcomes[3].failure, Some(FailureKind::NoReply));
    assert!(
        outcomes[3]
            .diagnostic
            .as_deref()
            .unwrap()
            .contains("unknown host")
    );

    let stats = RunningStatistics::compute(outcomes);
    assert_eq!(stats.sent, 5);
    assert_eq!(stats.lost, 2);
    assert!((stats.loss_pct - 40.0).abs() < 1e-9);
    assert_eq!(stats.min_ms, Some(10.0));
    assert_eq!(stats.max_ms, Some(20.0));
    assert!((stats.avg_ms.unwrap() - 15.0).abs() < 1e-9);

    // The last frame shows the same statistics the report will
    assert_eq!(display.frames.last().map(|(_, s)| *s), Some(stats));
}

#[tokio::test(start_paused = true)]
async fn test_time_limit_bounds_probe_count() {
    let prober = ScriptedProber::new(vec![reply("5")]);
    let mut display = RecordingDisplay::default();

    let completed = SessionController::new(
        test_config(Some(Duration::from_secs(3))),
        prober,
        &mut display,
        CancellationToken::new(),
    )
    .run()
    .await;

    assert_eq!(completed.stop_reason, StopReason::TimeLimit);
    assert_eq!(completed.session.len(), 3);
    assert!(completed.elapsed >= Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn test_display_rendered_once_per_cycle() {
    let prober = ScriptedProber::new(vec![reply("7"), RawProbe::timeout()]);
    let mut display = RecordingDisplay::default();

    SessionController::new(
        test_config(Some(Duration::from_secs(4))),
        prober,
        &mut display,
        CancellationToken::new(),
    )
    .run()
    .await;

    let lens: Vec<usize> = display.frames.iter().map(|(len, _)| *len).collect();
    assert_eq!(lens, vec![1, 2, 3, 4]);
    let sent: Vec<u64> = display.frames.iter().map(|(_, s)| s.sent).collect();
    assert_eq!(sent, vec![1, 2, 3, 4]);
}

#[tokio::test(start_paused = true)]
async fn test_slow_probe_does_not_add_full_interval() {
    // Each probe takes 1.5s against a 1s interval: no extra sleep between them
    let prober = ScriptedProber::new(vec![reply("1500")]).with_delay(Duration::from_millis(1500));
    let mut display = RecordingDisplay::default();

    let completed = SessionController::new(
        test_config(Some(Duration::from_secs(5))),
        prober,
        &mut display,
        CancellationToken::new(),
    )
    .run()
    .await;

    // Probes start at 0, 1.5, 3.0 and 4.5s
    assert_eq!(completed.session.len(), 4);
    assert_eq!(completed.stop_reason, StopReason::TimeLimit);
}

#[tokio::test(start_paused = true)]
async fn test_interrupt_during_probe_keeps_that_outcome() {
    let cancel = CancellationToken::new();
    // The interrupt lands while the first probe is in flight
    let prober = ScriptedProber::new(vec![RawProbe::timeout()])
        .with_delay(Duration::from_millis(300))
        .cancel_after(1, cancel.clone());
    let mut display = RecordingDisplay::default();

    let completed = SessionController::new(test_config(None), prober, &mut display, cancel)
        .run()
        .await;

    assert_eq!(completed.stop_reason, StopReason::Interrupted);
    let outcomes = completed.session.snapshot();
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].status, ProbeStatus::Failed);
    assert_eq!(outcomes[0].failure, Some(FailureKind::Timeout));
}

#[tokio::test(start_paused = true)]
async fn test_interrupt_wakes_sleeping_loop() {
    let cancel = CancellationToken::new();
    let mut config = test_config(None);
    config.interval = Duration::from_secs(60);

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(5)).await;
        trigger.cancel();
    });

    let prober = ScriptedProber::new(vec![reply("3")]);
    let mut display = RecordingDisplay::default();
    let completed = SessionController::new(config, prober, &mut display, cancel)
        .run()
        .await;

    assert_eq!(completed.stop_reason, StopReason::Interrupted);
    assert_eq!(completed.session.len(), 1);
    assert!(completed.elapsed < Duration::from_secs(60));
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_before_start_probes_nothing() {
    let cancel = CancellationToken::new();
    cancel.cancel();

    let prober = ScriptedProber::new(vec![reply("3")]);
    let mut display = RecordingDisplay::default();
    let completed = SessionController::new(test_config(None), prober, &mut display, cancel)
        .run()
        .await;

    assert_eq!(completed.stop_reason, StopReason::Interrupted);
    assert!(completed.session.is_empty());
    assert!(display.frames.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_render_failure_does_not_stop_session() {
    let prober = ScriptedProber::new(vec![reply("9")]);
    let mut display = BrokenDisplay { attempts: 0 };

    let completed = SessionController::new(
        test_config(Some(Duration::from_secs(2))),
        prober,
        &mut display,
        CancellationToken::new(),
    )
    .run()
    .await;

    assert_eq!(completed.session.len(), 2);
    assert_eq!(display.attempts, 2);
}

#[tokio::test(start_paused = true)]
async fn test_zero_time_limit_still_writes_reports() {
    let prober = ScriptedProber::new(vec![reply("3")]);
    let mut display = RecordingDisplay::default();

    let completed = SessionController::new(
        test_config(Some(Duration::ZERO)),
        prober,
        &mut display,
        CancellationToken::new(),
    )
    .run()
    .await;

    assert_eq!(completed.stop_reason, StopReason::TimeLimit);
    assert!(completed.session.is_empty());

    let dir = tempfile::tempdir().unwrap();
    let results = emit_reports(&completed.session, dir.path());
    assert_eq!(results.len(), 2);

    let csv = std::fs::read_to_string(results[0].as_ref().unwrap()).unwrap();
    assert_eq!(csv.trim_end(), CSV_HEADER);
    assert!(results[1].as_ref().unwrap().exists());
}

#[cfg(unix)]
#[tokio::test]
async fn test_executor_output_without_latency_is_no_reply() {
    // `echo` exits cleanly but never prints a latency
    let executor = PingExecutor::with_program("echo");
    let cancel = CancellationToken::new();
    let mut display = RecordingDisplay::default();

    let mut config = test_config(None);
    config.target = "localhost".to_string();
    config.interval = Duration::from_millis(10);

    let trigger = cancel.clone();
    let handle = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let completed = SessionController::new(config, executor, &mut display, cancel)
        .run()
        .await;
    handle.await.unwrap();

    let first = &completed.session.snapshot()[0];
    assert_eq!(first.status, ProbeStatus::Failed);
    assert_eq!(first.failure, Some(FailureKind::NoReply));
    assert!(first.diagnostic.as_deref().unwrap().contains("localhost"));
}

#[tokio::test(start_paused = true)]
async fn test_time_limit_ends_long_sleep() {
    let mut config = test_config(Some(Duration::from_secs(5)));
    config.interval = Duration::from_secs(60);

    let prober = ScriptedProber::new(vec![reply("4")]);
    let mut display = RecordingDisplay::default();
    let completed = SessionController::new(config, prober, &mut display, CancellationToken::new())
        .run()
        .await;

    assert_eq!(completed.stop_reason, StopReason::TimeLimit);
    assert_eq!(completed.session.len(), 1);
    assert!(completed.elapsed >= Duration::from_secs(5));
    assert!(completed.elapsed < Duration::from_secs(6));
}

#[tokio::test(start_paused = true)]
async fn test_closed_stdout_still_writes_reports() {
    let prober = ScriptedProber::new(vec![reply("12"), RawProbe::timeout()]);
    let mut display = RecordingDisplay::default();
    let completed = SessionController::new(
        test_config(Some(Duration::from_secs(2))),
        prober,
        &mut display,
        CancellationToken::new(),
    )
    .run()
    .await;

    let dir = tempfile::tempdir().unwrap();
    let results = finish_session(&completed, dir.path(), ClosedPipe);

    assert_eq!(results.len(), 2);
    let csv = std::fs::read_to_string(results[0].as_ref().unwrap()).unwrap();
    assert_eq!(csv.lines().count(), 3);
    assert!(results[1].as_ref().unwrap().exists());
}

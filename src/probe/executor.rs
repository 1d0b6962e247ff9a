use std::future::Future;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::error::ProbeError;

/// Raw stdout reported when the wrapper budget expired
pub const TIMEOUT_OUTPUT: &str = "Timeout";

/// Prefix of the raw stdout reported when `ping` could not be run
pub const EXEC_ERROR_PREFIX: &str = "Error executing ping: ";

/// Extra time granted on top of ping's own timeout before the child is killed
pub const EXEC_MARGIN: Duration = Duration::from_secs(1);

/// Text produced by one probe attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawProbe {
    pub stdout: String,
    pub stderr: String,
}

impl RawProbe {
    pub fn completed(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    pub fn timeout() -> Self {
        Self::completed(TIMEOUT_OUTPUT, "")
    }

    pub fn execution_error(cause: impl std::fmt::Display) -> Self {
        Self::completed(format!("{}{}", EXEC_ERROR_PREFIX, cause), "")
    }
}

/// Something that can send one probe to a host and report what happened.
///
/// Implementations must never fail: every problem is described in the
/// returned [`RawProbe`].
pub trait Prober {
    fn execute(&self, host: &str, timeout: Duration) -> impl Future<Output = RawProbe> + Send;
}

/// Platform family, which decides the ping flag spelling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Posix,
    Windows,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Posix
        }
    }
}

/// Build the arguments for a single-shot ping
pub fn ping_args(platform: Platform, host: &str, timeout: Duration) -> Vec<String> {
    match platform {
        Platform::Windows => vec![
            "-n".to_string(),
            "1".to_string(),
            "-w".to_string(),
            timeout.as_millis().max(1).to_string(),
            host.to_string(),
        ],
        Platform::Posix => {
            // -W only takes whole seconds
            let secs = timeout.as_secs() + u64::from(timeout.subsec_nanos() > 0);
            vec![
                "-c".to_string(),
                "1".to_string(),
                "-W".to_string(),
                secs.max(1).to_string(),
                host.to_string(),
            ]
        }
    }
}

/// Runs the operating system's `ping` program once per probe
#[derive(Debug, Clone)]
pub struct PingExecutor {
    program: String,
    platform: Platform,
}

impl PingExecutor {
    /// Ping binary to run: a path or a name on `PATH`
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            platform: Platform::current(),
        }
    }

    async fn run(&self, host: &str, timeout: Duration) -> Result<RawProbe, ProbeError> {
        let budget = timeout + EXEC_MARGIN;
        let output = Command::new(&self.program)
            .args(ping_args(self.platform, host, timeout))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        // Dropping the output future on expiry kills the child
        let output = tokio::time::timeout(budget, output)
            .await
            .map_err(|_| ProbeError::TimedOut(budget))??;

        Ok(RawProbe::completed(
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        ))
    }
}

impl Prober for PingExecutor {
    async fn execute(&self, host: &str, timeout: Duration) -> RawProbe {
        match self.run(host, timeout).await {
            Ok(raw) => raw,
            Err(ProbeError::TimedOut(budget)) => {
                tracing::debug!(host, ?budget, "ping exceeded wrapper budget");
                RawProbe::timeout()
            }
            Err(e @ ProbeError::Spawn(_)) => {
                tracing::warn!(host, program = %self.program, error = %e, "failed to execute ping");
                RawProbe::execution_error(e)
            }
        }
    }
}

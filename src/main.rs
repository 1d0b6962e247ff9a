use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{Write, stdout};
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

use liveping::cli::Args;
use liveping::config::Config;
use liveping::display::StreamDisplay;
use liveping::export::finish_session;
use liveping::monitor::{CompletedSession, SessionController, spawn_signal_listener};
use liveping::prefs::Prefs;
use liveping::probe::PingExecutor;
use liveping::tui::{Theme, run_tui};

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

/// Logs go to `--log-file` when given. Without one the TUI stays silent
/// unless RUST_LOG asks otherwise, since stderr shares the alternate screen.
fn init_logging(args: &Args) -> Result<()> {
    let default_filter = if args.log_file.is_some() {
        "info"
    } else if args.no_tui {
        "warn"
    } else {
        "off"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let builder = tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter);

    match args.log_file {
        Some(ref path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    init_logging(&args)?;

    // Load saved preferences
    let mut prefs = Prefs::load();

    // Determine theme: CLI override > saved preference > default
    let theme_name = args
        .theme
        .as_deref()
        .or(prefs.theme.as_deref())
        .unwrap_or("default");
    let theme = Theme::by_name(theme_name);

    let config = Config::from(&args).with_default_output_dir(&args, prefs.output_dir.as_ref());
    let output_dir = config.output_dir.clone();

    // Cancellation token for graceful shutdown
    let cancel = CancellationToken::new();
    let signal = spawn_signal_listener(cancel.clone());

    let prober = PingExecutor::with_program(args.ping_program.clone());

    let completed = if args.no_tui {
        run_streaming_mode(config, prober, cancel.clone()).await
    } else {
        run_tui(config, prober, theme.clone(), cancel.clone()).await?
    };

    // Release the signal task
    cancel.cancel();
    let _ = signal.await;

    // Remember an explicitly chosen theme (best effort, don't fail on save error)
    if args.theme.is_some() {
        prefs.theme = Some(theme.name().to_string());
        if let Err(e) = prefs.save() {
            tracing::warn!(error = %e, "failed to save preferences");
        }
    }

    // Reports first; a closed stdout must not cost the collected session
    let results = finish_session(&completed, &output_dir, stdout().lock());
    for e in results.iter().filter_map(|r| r.as_ref().err()) {
        let _ = writeln!(std::io::stderr(), "Warning: {}", e);
    }

    Ok(())
}

/// Run without the TUI, one line per probe on stdout
async fn run_streaming_mode(
    config: Config,
    prober: PingExecutor,
    cancel: CancellationToken,
) -> CompletedSession {
    let display = StreamDisplay::new(stdout());
    SessionController::new(config, prober, display, cancel)
        .run()
        .await
}

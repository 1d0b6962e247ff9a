use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::display::format_ms;
use crate::error::ReportError;
use crate::export::chart::save_chart;
use crate::export::csv::export_csv;
use crate::monitor::CompletedSession;
use crate::state::{RunningStatistics, Session};

/// Replace anything that is not safe in a file name
pub fn sanitize_host(host: &str) -> String {
    host.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// (csv, png) file names for a session, keyed by host and start time
pub fn report_filenames(session: &Session) -> (String, String) {
    let host = sanitize_host(&session.target);
    let stamp = session.started_at.format("%Y%m%d_%H%M%S");
    (
        format!("ping_results_{}_{}.csv", host, stamp),
        format!("ping_chart_{}_{}.png", host, stamp),
    )
}

fn io_error(path: &Path, source: std::io::Error) -> ReportError {
    ReportError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Write the CSV artifact
pub fn write_csv_file(session: &Session, path: &Path) -> Result<(), ReportError> {
    let file = File::create(path).map_err(|e| io_error(path, e))?;
    export_csv(session, BufWriter::new(file)).map_err(|e| io_error(path, e))
}

/// Write the PNG chart artifact
pub fn write_chart_file(session: &Session, path: &Path) -> Result<(), ReportError> {
    save_chart(session, path).map_err(|source| ReportError::Chart {
        path: path.to_path_buf(),
        source,
    })
}

/// Write both report artifacts into `dir`.
///
/// Each artifact is attempted independently: a failed CSV does not prevent
/// the chart and vice versa. Results come back in (csv, png) order.
pub fn emit_reports(session: &Session, dir: &Path) -> Vec<Result<PathBuf, ReportError>> {
    if let Err(e) = fs::create_dir_all(dir) {
        tracing::warn!(dir = %dir.display(), error = %e, "could not create output directory");
    }

    let (csv_name, png_name) = report_filenames(session);
    let csv_path = dir.join(csv_name);
    let png_path = dir.join(png_name);

    let csv = write_csv_file(session, &csv_path).map(|()| csv_path);
    let png = write_chart_file(session, &png_path).map(|()| png_path);

    for result in [&csv, &png] {
        match result {
            Ok(path) => tracing::info!(path = %path.display(), "report written"),
            Err(e) => tracing::error!(error = %e, "report failed"),
        }
    }

    vec![csv, png]
}

/// Print a short end-of-session summary
pub fn generate_summary<W: Write>(completed: &CompletedSession, mut writer: W) -> std::io::Result<()> {
    let session = &completed.session;
    let stats = RunningStatistics::compute(session.snapshot());

    writeln!(writer, "liveping summary for {}", session.target)?;
    writeln!(
        writer,
        "Started: {}",
        session.started_at.format("%Y-%m-%d %H:%M:%S")
    )?;
    writeln!(
        writer,
        "Duration: {:.1}s ({})",
        completed.elapsed.as_secs_f64(),
        completed.stop_reason.label()
    )?;
    writeln!(
        writer,
        "{:>6} {:>6} {:>6} {:>6} {:>8} {:>8} {:>8}",
        "Sent", "Recv", "Lost", "Loss%", "Min", "Avg", "Max"
    )?;
    writeln!(
        writer,
        "{:>6} {:>6} {:>6} {:>5.1}% {:>8} {:>8} {:>8}",
        stats.sent,
        stats.received(),
        stats.lost,
        stats.loss_pct,
        format_ms(stats.min_ms),
        format_ms(stats.avg_ms),
        format_ms(stats.max_ms)
    )?;

    Ok(())
}

/// Write both artifacts, then print the summary and saved paths to `out`.
///
/// The reports are written first and console output is best effort, so a
/// closed stdout never costs the collected session.
pub fn finish_session<W: Write>(
    completed: &CompletedSession,
    dir: &Path,
    mut out: W,
) -> Vec<Result<PathBuf, ReportError>> {
    let results = emit_reports(&completed.session, dir);
    if let Err(e) = print_outcome(completed, &results, &mut out) {
        tracing::warn!(error = %e, "failed to print session summary");
    }
    results
}

fn print_outcome<W: Write>(
    completed: &CompletedSession,
    results: &[Result<PathBuf, ReportError>],
    mut out: W,
) -> std::io::Result<()> {
    writeln!(out)?;
    generate_summary(completed, &mut out)?;
    writeln!(out)?;
    for path in results.iter().filter_map(|r| r.as_ref().ok()) {
        writeln!(out, "\u{2714} saved {}", path.display())?;
    }
    out.flush()
}

use std::io::Write;

use crate::state::Session;

/// CSV header, one row per probe follows
pub const CSV_HEADER: &str = "timestamp,probe_number,latency_ms,status";

/// Export every outcome of the session as CSV
pub fn export_csv<W: Write>(session: &Session, mut writer: W) -> std::io::Result<()> {
    writeln!(writer, "{}", CSV_HEADER)?;

    for outcome in session.snapshot() {
        let latency = outcome
            .latency_ms
            .map(|ms| ms.to_string())
            .unwrap_or_default();

        writeln!(
            writer,
            "{},{},{},{}",
            outcome.observed_at.format("%Y-%m-%dT%H:%M:%S%.6f"),
            outcome.sequence,
            latency,
            outcome.status.label()
        )?;
    }

    writer.flush()
}

//! Typed errors for probing and report writing.
//!
//! Probe errors never leave the sampling loop: they are folded into a failed
//! outcome. Report errors are surfaced per artifact once the loop is over.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Failure to obtain output from the ping program.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The program could not be started or waited on.
    #[error("{0}")]
    Spawn(#[from] std::io::Error),

    /// The program outlived the wrapper budget and was killed.
    #[error("ping did not finish within {0:?}")]
    TimedOut(Duration),
}

/// Failure to write one of the final report artifacts.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Filesystem error while writing an artifact.
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The chart image could not be encoded or saved.
    #[error("failed to save chart {path}: {source}")]
    Chart {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}


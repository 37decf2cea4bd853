//! Command-line encoder for cluster log events.
//!
//! Reads newline-delimited JSON events (each tagged with `"kind"`), seals
//! them according to the configured [`HashPolicy`](objadmin_log::HashPolicy),
//! and writes one encoded line per event in canonical or JSON form.

pub mod config;

use std::io::{BufRead, Write};

use objadmin_log::{from_json, to_json, Canonical, LogError, LogEvent, Sealer};
use thiserror::Error;

use crate::config::{Config, ConfigError, OutputFormat};

/// Errors that abort an encoding run.
#[derive(Debug, Error)]
pub enum CliError {
    /// Reading input or writing output failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An input line is not a valid event.
    #[error("line {line}: {source}")]
    Decode {
        line: usize,
        #[source]
        source: LogError,
    },

    /// An event could not be serialized.
    #[error(transparent)]
    Log(#[from] LogError),
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Events decoded and written.
    pub processed: usize,
    /// Events that received an integrity hash.
    pub sealed: usize,
    /// Input lines skipped as undecodable.
    pub skipped: usize,
}

/// Renders a single event in the requested format.
///
/// # Errors
///
/// Returns `LogError::Serialization` if JSON output fails.
pub fn render(event: &LogEvent, format: OutputFormat) -> Result<String, LogError> {
    match format {
        OutputFormat::Canonical => Ok(event.canonical()),
        OutputFormat::Json => to_json(event),
    }
}

/// Encodes every event in `input` and writes the results to `output`.
///
/// Blank lines are ignored. Undecodable lines abort the run with
/// [`CliError::Decode`] unless `output.skip_invalid` is set, in which case
/// they are logged and counted.
///
/// # Errors
///
/// Returns `CliError` on I/O failure or on the first undecodable line.
pub fn run<R, W>(config: &Config, input: R, mut output: W) -> Result<RunSummary, CliError>
where
    R: BufRead,
    W: Write,
{
    let sealer = Sealer::with_policy(config.hashing);
    let mut summary = RunSummary::default();

    for (index, line) in input.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let line_no = index + 1;

        let mut event: LogEvent = match from_json(trimmed) {
            Ok(event) => event,
            Err(e) if config.output.skip_invalid => {
                tracing::warn!(line = line_no, error = %e, "skipping undecodable event");
                summary.skipped += 1;
                continue;
            }
            Err(e) => {
                return Err(CliError::Decode {
                    line: line_no,
                    source: e,
                })
            }
        };

        if sealer.seal_event(&mut event) {
            summary.sealed += 1;
        }
        writeln!(output, "{}", render(&event, config.output.format)?)?;
        summary.processed += 1;
    }

    output.flush()?;
    tracing::info!(
        processed = summary.processed,
        sealed = summary.sealed,
        skipped = summary.skipped,
        "encoding finished"
    );
    Ok(summary)
}

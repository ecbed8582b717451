//! Error handling for the `umiclusterer` CLI.
//!
//! Ingest errors (malformed input files) and core errors (clustering/consensus
//! invariant violations) are both fatal at the CLI boundary, but are kept as
//! distinct variants so logs and exit messages can say which layer failed.

use std::path::PathBuf;

use thiserror::Error;
use umi_core::CoreError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Input file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Failed to read alignment file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed alignment record: {0}")]
    MalformedRecord(String),

    #[error("Paired-end input is not supported: {0}")]
    UnsupportedLayout(String),

    #[error("Input file contains no usable reads: {0}")]
    EmptyInput(String),

    #[error("Clustering/consensus error: {0}")]
    Core(#[from] CoreError),

    #[error("Failed to start worker pool: {0}")]
    WorkerPool(String),

    #[error("Run cancelled before completion; no output written")]
    Cancelled,
}

pub type CliResult<T> = Result<T, CliError>;

/// Appends a short, actionable hint to select error variants, in the style of
/// the wider tool family's CLI error reporting.
pub fn format_error_with_suggestion(error: &CliError) -> String {
    let mut message = error.to_string();
    match error {
        CliError::FileNotFound { path } => {
            message.push_str(&format!(
                "\n  suggestion: check that '{}' exists and is readable",
                path.display()
            ));
        }
        CliError::UnsupportedLayout(_) => {
            message.push_str(
                "\n  suggestion: this tool processes single-end alignments only; \
                 split or re-map paired-end data before clustering",
            );
        }
        CliError::EmptyInput(_) => {
            message.push_str("\n  suggestion: confirm the input file has mapped, single-end records");
        }
        _ => {}
    }
    message
}

//! Error taxonomy for the clustering and consensus core.
//!
//! Mirrors the fatal/non-fatal split of the wider tool: variants here are the
//! ones the core itself can raise. `EmptyInput`/`InputMissing`/`UnsupportedLayout`
//! belong to the ingest collaborator and are not modelled here.

use thiserror::Error;

/// Errors raised while clustering reads or building a consensus read.
#[derive(Debug, Error)]
pub enum CoreError {
    /// UMIs within a single input did not share a common length.
    #[error("Malformed UMI: {0}")]
    MalformedUmi(String),

    /// A cluster had no usable reads (e.g. a member lacking a query sequence).
    /// Logged and skipped by callers rather than propagated as fatal.
    #[error("Empty cluster: {0}")]
    EmptyCluster(String),

    /// `partition_by_reference` was handed zero reads. Distinct from
    /// `EmptyCluster`: this is a fatal, whole-run condition, not a single
    /// skippable cluster.
    #[error("No reads to partition: {0}")]
    EmptyInput(String),

    /// Post-voting invariant violation: consensus sequence/quality length mismatch.
    #[error("Consensus length mismatch: sequence has {sequence_len} bases, quality has {quality_len}")]
    ConsensusLengthMismatch {
        sequence_len: usize,
        quality_len: usize,
    },

    /// Post-clustering read-count integrity check failed.
    #[error("Integrity mismatch: {input_reads} input reads but {clustered_reads} reads across clusters")]
    IntegrityMismatch {
        input_reads: usize,
        clustered_reads: usize,
    },
}

/// Convenience alias used throughout the core.
pub type CoreResult<T> = Result<T, CoreError>;

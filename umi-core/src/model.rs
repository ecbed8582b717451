//! Core data types: the aligned-read input entity, CIGAR operations, clusters,
//! and the consensus output entity.

use crate::error::{CoreError, CoreResult};

/// A single CIGAR operation, numbered as in the SAM specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Match = 0,
    Ins = 1,
    Del = 2,
    Skip = 3,
    Soft = 4,
    Hard = 5,
}

/// One (operation, length) run in a CIGAR string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CigarOp {
    pub op: Op,
    pub len: usize,
}

impl CigarOp {
    pub fn new(op: Op, len: usize) -> Self {
        Self { op, len }
    }
}

/// An ordered list of CIGAR operations.
pub type Cigar = Vec<CigarOp>;

/// A single-end aligned read, as handed to the core by the ingest collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedRead {
    /// Opaque identifier; its final underscore-delimited token is the UMI.
    pub id: String,
    /// Reference-sequence name.
    pub reference: String,
    /// 0-based reference start (inclusive).
    pub start: u64,
    /// 0-based reference end (exclusive).
    pub end: u64,
    /// Upper-case base string over {A,C,G,T,N}.
    pub sequence: String,
    /// Per-base quality, same length as `sequence`, no ASCII offset.
    pub quality: Vec<u8>,
    /// CIGAR operations describing how `sequence` aligns to the reference.
    pub cigar: Cigar,
}

impl AlignedRead {
    /// The UMI: the final underscore-delimited token of `id`.
    ///
    /// Returns `None` if `id` contains no underscore, which the caller should
    /// treat as a malformed-UMI input error.
    pub fn umi(&self) -> Option<&str> {
        self.id.rsplit_once('_').map(|(_, umi)| umi)
    }

    /// The stable identity tuple carried from ingest through clustering, used
    /// for integrity checks and for disambiguating multi-mapped reads that
    /// share a query name. See the design notes on multimapper reconciliation.
    pub fn identity_key(&self) -> (&str, &str, u64, u64) {
        (&self.id, &self.reference, self.start, self.end)
    }
}

/// Checks that every read's UMI is present and that all UMIs share one length.
///
/// A fatal input error per the ingest error taxonomy; the core enforces it
/// because both the distance engine and the cluster engine assume a single
/// UMI length `L`.
pub fn validate_umis(reads: &[AlignedRead]) -> CoreResult<()> {
    let mut expected_len: Option<usize> = None;
    for read in reads {
        let umi = read
            .umi()
            .ok_or_else(|| CoreError::MalformedUmi(format!("read '{}' has no UMI suffix", read.id)))?;
        if umi.is_empty() {
            return Err(CoreError::MalformedUmi(format!(
                "read '{}' has an empty UMI suffix",
                read.id
            )));
        }
        match expected_len {
            None => expected_len = Some(umi.len()),
            Some(len) if len != umi.len() => {
                return Err(CoreError::MalformedUmi(format!(
                    "mixed UMI lengths: expected {}, read '{}' has UMI of length {}",
                    len,
                    read.id,
                    umi.len()
                )))
            }
            Some(_) => {}
        }
    }
    Ok(())
}

/// A non-empty, ordered group of reads believed to originate from one molecule.
///
/// All members share the same `reference`. Created once by the cluster engine
/// and consumed exactly once by the consensus engine.
#[derive(Debug, Clone)]
pub struct Cluster {
    reads: Vec<AlignedRead>,
}

impl Cluster {
    /// Builds a cluster from a non-empty vector of same-reference reads.
    ///
    /// Panics if `reads` is empty or spans more than one reference: both are
    /// programming errors in the cluster engine, not recoverable input errors.
    pub fn new(reads: Vec<AlignedRead>) -> Self {
        assert!(!reads.is_empty(), "a cluster must have at least one read");
        let reference = &reads[0].reference;
        assert!(
            reads.iter().all(|r| &r.reference == reference),
            "all cluster members must share the same reference"
        );
        Self { reads }
    }

    pub fn reads(&self) -> &[AlignedRead] {
        &self.reads
    }

    pub fn len(&self) -> usize {
        self.reads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reads.is_empty()
    }

    pub fn reference(&self) -> &str {
        &self.reads[0].reference
    }

    pub fn into_reads(self) -> Vec<AlignedRead> {
        self.reads
    }
}

/// The single consensus read produced per cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsensusRead {
    /// Copied from the longest input read of the cluster (ties broken by first-seen).
    pub id: String,
    /// String over {A,C,G,T,N}; no gap or insertion markers.
    pub sequence: String,
    /// Per-base quality, parallel to `sequence`, no ASCII offset.
    pub quality: Vec<u8>,
}

impl ConsensusRead {
    /// Validates the terminal invariant `len(sequence) == len(quality)`.
    pub fn validate(&self) -> CoreResult<()> {
        if self.sequence.chars().count() != self.quality.len() {
            return Err(CoreError::ConsensusLengthMismatch {
                sequence_len: self.sequence.chars().count(),
                quality_len: self.quality.len(),
            });
        }
        Ok(())
    }
}

//! Consensus construction: pads every cluster member against its own CIGAR,
//! aligns each to one anchor read's coordinate frame, then votes base-by-base.

pub mod align;
pub mod pad;
pub mod vote;

use crate::error::CoreResult;
use crate::model::{AlignedRead, Cluster, ConsensusRead};

/// Reduces one cluster to its single consensus read.
///
/// Every member is padded against its own CIGAR first; the anchor is then
/// the member with the longest *padded* sequence, ties broken by first
/// appearance in the cluster. Its id is copied onto the consensus read and
/// its padded form sets the column coordinate frame every other member is
/// aligned against.
pub fn build_consensus(cluster: &Cluster, vote_weights: (f64, f64)) -> CoreResult<ConsensusRead> {
    let reads = cluster.reads();
    let padded: Vec<(Vec<char>, Vec<u8>)> = reads.iter().map(pad::seq_pad).collect();
    let anchor_idx = select_anchor_index(&padded);
    let id = reads[anchor_idx].id.clone();
    let anchor_seq = &padded[anchor_idx].0;

    if anchor_seq.is_empty() {
        return Err(crate::error::CoreError::EmptyCluster(format!(
            "anchor read '{id}' padded to an empty sequence"
        )));
    }

    let mut columns: Vec<Vec<(char, u8)>> = vec![Vec::new(); anchor_seq.len()];
    for idx in 0..reads.len() {
        let (seq, qual) = &padded[idx];
        let (row_seq, row_qual) = if idx == anchor_idx {
            (seq.clone(), qual.clone())
        } else {
            align::align_to_anchor(anchor_seq, seq, qual)
        };
        for (col, (ch, q)) in columns.iter_mut().zip(row_seq.iter().zip(row_qual.iter())) {
            col.push((*ch, *q));
        }
    }

    let mut sequence = String::with_capacity(anchor_seq.len());
    let mut quality = Vec::with_capacity(anchor_seq.len());
    for column in &columns {
        if let Some((base, q)) = vote::vote_column(column, vote_weights) {
            if base != 'p' {
                sequence.push(base);
                quality.push(q);
            }
        }
    }

    let consensus = ConsensusRead { id, sequence, quality };
    consensus.validate()?;
    Ok(consensus)
}

fn select_anchor_index(padded: &[(Vec<char>, Vec<u8>)]) -> usize {
    padded
        .iter()
        .enumerate()
        .max_by_key(|(idx, (seq, _))| (seq.len(), std::cmp::Reverse(*idx)))
        .map(|(idx, _)| idx)
        .expect("cluster is non-empty by construction")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CigarOp, Op};

    fn read(id: &str, sequence: &str, quality: Vec<u8>) -> AlignedRead {
        AlignedRead {
            id: id.to_string(),
            reference: "chr1".to_string(),
            start: 0,
            end: sequence.len() as u64,
            sequence: sequence.to_string(),
            quality,
            cigar: Vec::new(),
        }
    }

    #[test]
    fn singleton_cluster_consensus_equals_the_read() {
        let cluster = Cluster::new(vec![read("R1_AAAA", "ACGT", vec![30, 30, 30, 30])]);
        let consensus = build_consensus(&cluster, (0.5, 0.5)).unwrap();
        assert_eq!(consensus.id, "R1_AAAA");
        assert_eq!(consensus.sequence, "ACGT");
        assert_eq!(consensus.quality, vec![30, 30, 30, 30]);
    }

    #[test]
    fn two_identical_reads_emit_the_raw_mean_quality_per_base() {
        let cluster = Cluster::new(vec![
            read("R1_AAAA", "ACGT", vec![20, 20, 20, 20]),
            read("R2_AAAA", "ACGT", vec![40, 40, 40, 40]),
        ]);
        let consensus = build_consensus(&cluster, (0.5, 0.5)).unwrap();
        assert_eq!(consensus.sequence, "ACGT");
        // mean(20, 40) = 30 at every column
        assert_eq!(consensus.quality, vec![30, 30, 30, 30]);
    }

    #[test]
    fn anchor_is_the_longest_read_by_padded_sequence_length() {
        let cluster = Cluster::new(vec![
            read("SHORT_AAAA", "AC", vec![30, 30]),
            read("LONG_AAAA", "ACGT", vec![30, 30, 30, 30]),
        ]);
        let consensus = build_consensus(&cluster, (0.5, 0.5)).unwrap();
        assert_eq!(consensus.id, "LONG_AAAA");
    }

    #[test]
    fn anchor_selection_uses_padded_length_not_raw_length() {
        // Raw sequence is shorter, but a CIGAR deletion pads it past the
        // plain read's length, so it must be picked as the anchor.
        let mut padded_by_deletion = read("PADDED_AAAA", "ACT", vec![30, 30, 30]);
        padded_by_deletion.cigar = vec![
            CigarOp::new(Op::Match, 1),
            CigarOp::new(Op::Del, 2),
            CigarOp::new(Op::Match, 2),
        ];
        let plain = read("PLAIN_AAAA", "ACTG", vec![30, 30, 30, 30]);
        let cluster = Cluster::new(vec![plain, padded_by_deletion]);
        let consensus = build_consensus(&cluster, (0.5, 0.5)).unwrap();
        assert_eq!(consensus.id, "PADDED_AAAA");
    }

    #[test]
    fn majority_real_base_outvotes_a_minority_deletion() {
        // Two reads match "ACGGT" plainly; one has a deletion at the third
        // position the others don't share. The majority real base must win.
        let plain_a = read("R1_AAAA", "ACGGT", vec![30, 30, 30, 30, 30]);
        let plain_b = read("R2_AAAA", "ACGGT", vec![30, 30, 30, 30, 30]);
        let mut deleted = read("R3_AAAA", "ACGT", vec![30, 30, 30, 30]);
        deleted.cigar = vec![
            CigarOp::new(Op::Match, 2),
            CigarOp::new(Op::Del, 1),
            CigarOp::new(Op::Match, 2),
        ];
        let cluster = Cluster::new(vec![plain_a, plain_b, deleted]);
        let consensus = build_consensus(&cluster, (0.5, 0.5)).unwrap();
        assert_eq!(consensus.sequence, "ACGGT");
    }
}

//! Groups reads by reference name into independent work units.
//!
//! Partitioning by reference is a correctness requirement, not an optimisation:
//! two reads on different references are never in the same cluster regardless
//! of UMI similarity, so clustering must never see reads across a partition
//! boundary.

use std::collections::HashMap;

use crate::error::{CoreError, CoreResult};
use crate::model::AlignedRead;

/// One partition's worth of reads, in ingest order, tagged with the reference
/// name and the header-order rank used to restore a deterministic output order.
#[derive(Debug, Clone)]
pub struct Partition {
    pub reference: String,
    pub order: usize,
    pub reads: Vec<AlignedRead>,
}

/// Splits `reads` into one partition per reference, preserving ingest order
/// within each partition.
///
/// `reference_order` gives the rank of each reference (typically the order in
/// which it appears in the alignment file's header); references absent from it
/// are ordered after all known references, by first appearance in `reads`.
/// Empty input is a fatal error: a `Partitioner` never emits work for zero reads.
pub fn partition_by_reference(
    reads: Vec<AlignedRead>,
    reference_order: &HashMap<String, usize>,
) -> CoreResult<Vec<Partition>> {
    if reads.is_empty() {
        return Err(CoreError::EmptyInput("no reads found".to_string()));
    }

    let mut by_reference: HashMap<String, Vec<AlignedRead>> = HashMap::new();
    let mut first_seen_order: Vec<String> = Vec::new();
    for read in reads {
        if !by_reference.contains_key(&read.reference) {
            first_seen_order.push(read.reference.clone());
        }
        by_reference.entry(read.reference.clone()).or_default().push(read);
    }

    let next_rank = reference_order.values().copied().max().map_or(0, |m| m + 1);
    let mut partitions: Vec<Partition> = first_seen_order
        .into_iter()
        .enumerate()
        .filter_map(|(seen_idx, reference)| {
            by_reference.remove(&reference).map(|reads| {
                let order = reference_order
                    .get(&reference)
                    .copied()
                    .unwrap_or(next_rank + seen_idx);
                Partition {
                    reference,
                    order,
                    reads,
                }
            })
        })
        .collect();

    partitions.sort_by_key(|p| p.order);
    Ok(partitions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(id: &str, reference: &str) -> AlignedRead {
        AlignedRead {
            id: id.to_string(),
            reference: reference.to_string(),
            start: 0,
            end: 10,
            sequence: "ACGTACGTAC".to_string(),
            quality: vec![30; 10],
            cigar: Vec::new(),
        }
    }

    #[test]
    fn empty_input_is_fatal() {
        let order = HashMap::new();
        assert!(partition_by_reference(Vec::new(), &order).is_err());
    }

    #[test]
    fn splits_by_reference_preserving_order() {
        let reads = vec![
            read("R1_AAAA", "chr2"),
            read("R2_AAAA", "chr1"),
            read("R3_AAAA", "chr2"),
        ];
        let mut order = HashMap::new();
        order.insert("chr1".to_string(), 0);
        order.insert("chr2".to_string(), 1);

        let partitions = partition_by_reference(reads, &order).unwrap();
        assert_eq!(partitions.len(), 2);
        assert_eq!(partitions[0].reference, "chr1");
        assert_eq!(partitions[1].reference, "chr2");
        assert_eq!(partitions[1].reads.len(), 2);
        assert_eq!(partitions[1].reads[0].id, "R1_AAAA");
        assert_eq!(partitions[1].reads[1].id, "R3_AAAA");
    }

    #[test]
    fn unknown_references_are_ordered_after_known_ones() {
        let reads = vec![read("R1_AAAA", "chrX"), read("R2_AAAA", "chr1")];
        let mut order = HashMap::new();
        order.insert("chr1".to_string(), 0);

        let partitions = partition_by_reference(reads, &order).unwrap();
        assert_eq!(partitions[0].reference, "chr1");
        assert_eq!(partitions[1].reference, "chrX");
    }
}

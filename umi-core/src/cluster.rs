//! Complete-linkage hierarchical agglomerative clustering over a single partition.
//!
//! Each read starts as its own singleton cluster; at every step the two live
//! clusters whose complete-linkage (maximum pairwise) distance is smallest are
//! merged, until every remaining pair exceeds the cut threshold `T + W`. The
//! cluster-to-cluster distance is maintained incrementally with the
//! Lance-Williams complete-link update `d(k, i∪j) = max(d(k,i), d(k,j))`.

use crate::distance::{hybrid_distance, DistanceParams};
use crate::error::{CoreError, CoreResult};
use crate::model::{AlignedRead, Cluster};

/// Clusters one partition's reads under complete linkage, cut at `T + W`.
///
/// Zero reads yield no clusters; exactly one read yields a single singleton
/// cluster without running the algorithm. Output clusters are ordered by
/// their smallest-index member, and within each cluster members retain the
/// ingest order of the partition.
pub fn cluster_partition(reads: Vec<AlignedRead>, params: DistanceParams) -> Vec<Cluster> {
    let n = reads.len();
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![Cluster::new(reads)];
    }

    let threshold = params.cluster_threshold();
    let mut cd = pairwise_matrix(&reads, params);
    let mut clusters: Vec<Vec<usize>> = (0..n).map(|i| vec![i]).collect();

    while clusters.len() > 1 {
        let (i, j) = match find_merge_pair(&clusters, &cd, threshold) {
            Some(pair) => pair,
            None => break,
        };

        let merged = merge_sorted(&clusters[i], &clusters[j]);
        for k in 0..clusters.len() {
            if k == i || k == j {
                continue;
            }
            let updated = cd[i][k].max(cd[j][k]);
            cd[i][k] = updated;
            cd[k][i] = updated;
        }

        clusters[i] = merged;
        clusters.remove(j);
        cd.remove(j);
        for row in cd.iter_mut() {
            row.remove(j);
        }
    }

    clusters.sort_by_key(|members| members[0]);

    let mut slots: Vec<Option<AlignedRead>> = reads.into_iter().map(Some).collect();
    clusters
        .into_iter()
        .map(|members| {
            let group = members
                .into_iter()
                .map(|idx| slots[idx].take().expect("each read belongs to exactly one cluster"))
                .collect();
            Cluster::new(group)
        })
        .collect()
}

/// Verifies that the total read count across clusters matches the partition's
/// input count. A mismatch is a fatal internal error (§5, "Integrity check").
pub fn verify_integrity(input_reads: usize, clusters: &[Cluster]) -> CoreResult<()> {
    let clustered_reads: usize = clusters.iter().map(Cluster::len).sum();
    if clustered_reads != input_reads {
        return Err(CoreError::IntegrityMismatch {
            input_reads,
            clustered_reads,
        });
    }
    Ok(())
}

fn pairwise_matrix(reads: &[AlignedRead], params: DistanceParams) -> Vec<Vec<u64>> {
    let n = reads.len();
    let mut matrix = vec![vec![0u64; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d = hybrid_distance(&reads[i], &reads[j], params);
            matrix[i][j] = d;
            matrix[j][i] = d;
        }
    }
    matrix
}

/// Finds the pair of live clusters to merge next: smallest complete-linkage
/// distance at or under `threshold`, ties broken by the lexicographically
/// smallest merged, sorted member-index vector (smaller lowest-indexed member,
/// then the next, and so on).
fn find_merge_pair(clusters: &[Vec<usize>], cd: &[Vec<u64>], threshold: u64) -> Option<(usize, usize)> {
    let k = clusters.len();
    let mut best: Option<(usize, usize)> = None;
    let mut best_dist = u64::MAX;
    let mut best_key: Vec<usize> = Vec::new();

    for i in 0..k {
        for j in (i + 1)..k {
            let dist = cd[i][j];
            if dist > threshold {
                continue;
            }
            let key = merge_sorted(&clusters[i], &clusters[j]);
            let is_better = match dist.cmp(&best_dist) {
                std::cmp::Ordering::Less => true,
                std::cmp::Ordering::Equal => key < best_key,
                std::cmp::Ordering::Greater => false,
            };
            if is_better {
                best_dist = dist;
                best_key = key;
                best = Some((i, j));
            }
        }
    }

    best
}

fn merge_sorted(a: &[usize], b: &[usize]) -> Vec<usize> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let (mut ai, mut bi) = (0, 0);
    while ai < a.len() && bi < b.len() {
        if a[ai] <= b[bi] {
            out.push(a[ai]);
            ai += 1;
        } else {
            out.push(b[bi]);
            bi += 1;
        }
    }
    out.extend_from_slice(&a[ai..]);
    out.extend_from_slice(&b[bi..]);
    out
}

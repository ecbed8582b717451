//! The hybrid UMI/coordinate distance used to drive clustering.

use crate::model::AlignedRead;

/// Any distance strictly greater than `T + W` is treated as "not in range".
/// 999 is required for bit-exact reproduction of the original tool; any value
/// `>= T + W + 1` is semantically equivalent.
pub const SENTINEL: u64 = 999;

/// Parameters shared by the distance engine and the cluster engine.
#[derive(Debug, Clone, Copy)]
pub struct DistanceParams {
    /// UMI Hamming-distance threshold `T`.
    pub umi_threshold: u64,
    /// Coordinate window `W`.
    pub coord_window: u64,
}

impl DistanceParams {
    pub fn new(umi_threshold: u64, coord_window: u64) -> Self {
        Self {
            umi_threshold,
            coord_window,
        }
    }

    /// The complete-linkage cut threshold `T + W`.
    pub fn cluster_threshold(&self) -> u64 {
        self.umi_threshold + self.coord_window
    }
}

/// Hamming distance between two equal-length strings, counted byte-wise.
///
/// Panics if the strings differ in length; callers must have already
/// validated that all UMIs in an input share one length.
fn hamming(a: &str, b: &str) -> u64 {
    assert_eq!(a.len(), b.len(), "hamming distance requires equal-length UMIs");
    a.bytes().zip(b.bytes()).filter(|(x, y)| x != y).count() as u64
}

/// The hybrid distance between two reads drawn from the same partition.
///
/// Returns [`SENTINEL`] whenever the UMI distance exceeds `T`, the references
/// differ, or the coordinate distance exceeds `W`; otherwise returns
/// `umi_distance + coord_distance`.
pub fn hybrid_distance(x: &AlignedRead, y: &AlignedRead, params: DistanceParams) -> u64 {
    let umi_d = match (x.umi(), y.umi()) {
        (Some(ux), Some(uy)) => hamming(ux, uy),
        _ => return SENTINEL,
    };
    if umi_d > params.umi_threshold {
        return SENTINEL;
    }
    if x.reference != y.reference {
        return SENTINEL;
    }

    let start_d = x.start.abs_diff(y.start);
    let end_d = x.end.abs_diff(y.end);
    let coord_d = (start_d + end_d) / 2;
    if coord_d > params.coord_window {
        return SENTINEL;
    }

    umi_d + coord_d
}

/// Materialises the condensed upper-triangular distance vector for a partition,
/// row-major with `i < j`, length `n(n-1)/2`.
pub fn condensed_distances(reads: &[AlignedRead], params: DistanceParams) -> Vec<u64> {
    let n = reads.len();
    let mut out = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            out.push(hybrid_distance(&reads[i], &reads[j], params));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(id: &str, reference: &str, start: u64, end: u64) -> AlignedRead {
        AlignedRead {
            id: id.to_string(),
            reference: reference.to_string(),
            start,
            end,
            sequence: "ACGT".to_string(),
            quality: vec![30, 30, 30, 30],
            cigar: Vec::new(),
        }
    }

    #[test]
    fn condensed_distances_is_row_major_upper_triangular() {
        let reads = vec![
            read("R1_AAAA", "chr1", 100, 120),
            read("R2_AAAA", "chr1", 100, 120),
            read("R3_TTTT", "chr1", 100, 120),
        ];
        let out = condensed_distances(&reads, DistanceParams::new(1, 5));
        // n=3 -> n(n-1)/2 = 3 entries, ordered (0,1), (0,2), (1,2).
        assert_eq!(out.len(), 3);
        assert_eq!(out[0], 0); // R1 vs R2: identical UMI and coordinates
        assert_eq!(out[1], SENTINEL); // R1 vs R3: UMI Hamming distance 4 > T=1
        assert_eq!(out[2], SENTINEL); // R2 vs R3: same
    }

    #[test]
    fn identical_umi_and_coordinates_gives_zero_distance() {
        let a = read("R1_AAAA", "chr1", 100, 120);
        let b = read("R2_AAAA", "chr1", 100, 120);
        let d = hybrid_distance(&a, &b, DistanceParams::new(1, 5));
        assert_eq!(d, 0);
    }

    #[test]
    fn umi_distance_beyond_threshold_is_sentinel() {
        let a = read("R1_AAAA", "chr1", 100, 120);
        let b = read("R2_TTTT", "chr1", 100, 120);
        let d = hybrid_distance(&a, &b, DistanceParams::new(1, 5));
        assert_eq!(d, SENTINEL);
    }

    #[test]
    fn coordinate_window_exceeded_is_sentinel() {
        let a = read("R1_AAAA", "chr1", 100, 120);
        let b = read("R2_AAAA", "chr1", 200, 220);
        let d = hybrid_distance(&a, &b, DistanceParams::new(1, 5));
        assert_eq!(d, SENTINEL);
    }

    #[test]
    fn different_reference_is_sentinel_regardless_of_params() {
        let a = read("R1_AAAA", "chr1", 100, 120);
        let b = read("R2_AAAA", "chr2", 100, 120);
        let d = hybrid_distance(&a, &b, DistanceParams::new(99, 99));
        assert_eq!(d, SENTINEL);
    }

    #[test]
    fn coord_distance_uses_integer_division() {
        let a = read("R1_AAAA", "chr1", 100, 121);
        let b = read("R2_AAAA", "chr1", 100, 120);
        // |start diff| + |end diff| = 0 + 1 = 1, / 2 = 0 (integer division)
        let d = hybrid_distance(&a, &b, DistanceParams::new(1, 5));
        assert_eq!(d, 0);
    }
}

//! Column-wise base and quality voting.
//!
//! Every column of the aligned cluster is scored over a fixed six-way,
//! case-folded symbol space `{A, C, G, T, N, p}`. The winning symbol's raw
//! mean quality (not the quantisation bucket used to pick it) is what gets
//! emitted, matching the reference tool's `int(qual_per_base[base])`.

const SYMBOLS: [char; 6] = ['A', 'C', 'G', 'T', 'N', 'p'];
const P_INDEX: usize = 5;

fn symbol_index(ch: char) -> usize {
    let folded = if ch == 'p' { 'p' } else { ch.to_ascii_uppercase() };
    SYMBOLS
        .iter()
        .position(|&s| s == folded)
        .unwrap_or_else(|| panic!("unexpected symbol '{ch}' in a padded, aligned column"))
}

fn quantize(mean_q: f64) -> u8 {
    if mean_q >= 30.0 {
        8
    } else if mean_q >= 20.0 {
        6
    } else if mean_q >= 15.0 {
        4
    } else {
        2
    }
}

/// Votes one column of a cluster's aligned reads.
///
/// `entries` are the `(base, quality)` pairs contributed by every read in the
/// cluster for this anchor column; a read that doesn't reach this column
/// contributes the literal `'p'` placeholder rather than being omitted, so
/// `entries.len()` is always the cluster size. Returns `None` only when
/// `entries` is empty. A winning `'p'` is a valid, common outcome: the
/// caller should then drop this column from the consensus rather than emit
/// a placeholder base.
pub fn vote_column(entries: &[(char, u8)], weights: (f64, f64)) -> Option<(char, u8)> {
    if entries.is_empty() {
        return None;
    }
    let n_total = entries.len() as f64;

    let mut counts = [0usize; 6];
    let mut qual_sums = [0u64; 6];
    for &(ch, q) in entries {
        let idx = symbol_index(ch);
        counts[idx] += 1;
        qual_sums[idx] += q as u64;
    }

    let mut raw_mean_q = [0f64; 6];
    for i in 0..6 {
        if counts[i] > 0 {
            raw_mean_q[i] = qual_sums[i] as f64 / counts[i] as f64;
        }
    }

    let real_means: Vec<f64> = (0..P_INDEX).filter(|&i| counts[i] > 0).map(|i| raw_mean_q[i]).collect();
    let p_adjusted_q = if real_means.is_empty() {
        0.0
    } else {
        real_means.iter().sum::<f64>() / real_means.len() as f64 - 5.0
    };

    let (n_weight, q_weight) = weights;
    let mut best_idx: Option<usize> = None;
    let mut best_score = f64::NEG_INFINITY;

    for i in 0..6 {
        if counts[i] == 0 {
            continue;
        }
        let n_score = 10.0 * counts[i] as f64 / n_total;
        let scoring_q = if i == P_INDEX { p_adjusted_q } else { raw_mean_q[i] };
        let combined = n_weight * n_score + q_weight * quantize(scoring_q) as f64;
        if combined > best_score {
            best_score = combined;
            best_idx = Some(i);
        }
    }

    let winner = best_idx.expect("at least one symbol has a non-zero count when entries is non-empty");
    let emitted_quality = raw_mean_q[winner].floor() as u8;
    Some((SYMBOLS[winner], emitted_quality))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_contributors_is_none() {
        assert_eq!(vote_column(&[], (0.5, 0.5)), None);
    }

    #[test]
    fn unanimous_column_wins_with_its_own_mean_quality() {
        let entries = [('A', 30), ('A', 30)];
        assert_eq!(vote_column(&entries, (0.5, 0.5)), Some(('A', 30)));
    }

    #[test]
    fn tie_breaks_toward_earlier_symbol_in_fixed_priority() {
        let entries = [('A', 30), ('C', 30)];
        assert_eq!(vote_column(&entries, (0.5, 0.5)), Some(('A', 30)));
    }

    #[test]
    fn emitted_quality_is_the_raw_mean_not_the_quantisation_bucket() {
        // mean = (21 + 29) / 2 = 25, which buckets to 6, but the emitted
        // quality must be the raw floored mean, 25.
        let entries = [('A', 21), ('A', 29)];
        assert_eq!(vote_column(&entries, (0.5, 0.5)), Some(('A', 25)));
    }

    #[test]
    fn majority_real_base_beats_minority_deletion_placeholder() {
        let entries = [('A', 40), ('A', 20), ('p', 0)];
        let (base, _) = vote_column(&entries, (0.5, 0.5)).unwrap();
        assert_eq!(base, 'A');
    }

    #[test]
    fn lowercase_insertion_and_uppercase_match_fold_to_the_same_symbol() {
        let entries = [('a', 30), ('A', 30)];
        assert_eq!(vote_column(&entries, (0.5, 0.5)), Some(('A', 30)));
    }

    #[test]
    fn unanimous_deletion_wins_as_p() {
        let entries = [('p', 0), ('p', 0)];
        let (base, _) = vote_column(&entries, (0.5, 0.5)).unwrap();
        assert_eq!(base, 'p');
    }
}

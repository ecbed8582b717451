//! Needleman-Wunsch global alignment of a padded read against the anchor's
//! coordinate frame.
//!
//! Gap penalty is -1, match score is +1 for equal characters or when either
//! character is the deletion placeholder `'p'`, 0 otherwise. Traceback ties
//! are broken diagonal over up over left (the row consuming a base the
//! anchor has no column for, before the anchor consuming a column the row
//! doesn't reach), matching the forward recurrence so the chosen path is
//! always the one the score matrix actually describes.
//!
//! Only the row's alignment is retained, and the anchor itself is never
//! modified: wherever the anchor needs a column the row doesn't reach, the
//! row is padded with the literal `'p'` placeholder (quality `0`) rather than
//! a silent gap, so it still takes part in column voting exactly like a
//! CIGAR-introduced deletion. Wherever the row has extra content the anchor
//! has no column for, that content is dropped. The returned vectors therefore
//! always have exactly `anchor.len()` entries.

fn char_score(a: char, b: char) -> i64 {
    if a == b || a == 'p' || b == 'p' {
        1
    } else {
        0
    }
}

/// Aligns `row`/`row_qual` onto the anchor's `anchor.len()` columns.
pub fn align_to_anchor(anchor: &[char], row: &[char], row_qual: &[u8]) -> (Vec<char>, Vec<u8>) {
    let n = anchor.len();
    let m = row.len();

    let mut score = vec![vec![0i64; m + 1]; n + 1];
    for i in 1..=n {
        score[i][0] = -(i as i64);
    }
    for j in 1..=m {
        score[0][j] = -(j as i64);
    }
    for i in 1..=n {
        for j in 1..=m {
            let diag = score[i - 1][j - 1] + char_score(anchor[i - 1], row[j - 1]);
            let up = score[i - 1][j] - 1;
            let left = score[i][j - 1] - 1;
            score[i][j] = diag.max(up).max(left);
        }
    }

    let mut row_seq_aln = Vec::with_capacity(n);
    let mut row_qual_aln = Vec::with_capacity(n);

    let (mut i, mut j) = (n, m);
    while i > 0 || j > 0 {
        if i > 0 && j > 0 && score[i][j] == score[i - 1][j - 1] + char_score(anchor[i - 1], row[j - 1]) {
            row_seq_aln.push(row[j - 1]);
            row_qual_aln.push(row_qual[j - 1]);
            i -= 1;
            j -= 1;
        } else if j > 0 && score[i][j] == score[i][j - 1] - 1 {
            // Row has a position the anchor has no column for; dropped.
            j -= 1;
        } else {
            row_seq_aln.push('p');
            row_qual_aln.push(0);
            i -= 1;
        }
    }
    row_seq_aln.reverse();
    row_qual_aln.reverse();

    debug_assert_eq!(row_seq_aln.len(), n);
    (row_seq_aln, row_qual_aln)
}

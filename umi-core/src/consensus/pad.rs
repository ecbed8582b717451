//! CIGAR-based sequence padding ("seq_pad").
//!
//! Expands a read's query sequence against its own CIGAR so that matched
//! bases, inserted bases, and deleted reference positions are all visible as
//! distinct symbols, ready to be aligned against an anchor and voted on
//! column-by-column.

use crate::model::{AlignedRead, Op};

/// Expands `read.sequence`/`read.quality` per `read.cigar`:
///
/// - `M` (match/mismatch): emits the base upper-cased, with its real quality.
/// - `I` (insertion): emits the base lower-cased, with its real quality.
/// - `D` (deletion): emits the literal placeholder `'p'` with quality `0`;
///   there is no base to measure.
/// - `N`/`S`/`H` (skip, soft clip, hard clip): emit nothing.
///
/// A read with no CIGAR at all (as in hand-built test fixtures) is treated as
/// one long match spanning the whole query sequence.
pub fn seq_pad(read: &AlignedRead) -> (Vec<char>, Vec<u8>) {
    let bases: Vec<char> = read.sequence.chars().collect();
    let quals = &read.quality;

    if read.cigar.is_empty() {
        return (
            bases.iter().map(|c| c.to_ascii_uppercase()).collect(),
            quals.clone(),
        );
    }

    let mut out_seq = Vec::with_capacity(bases.len());
    let mut out_qual = Vec::with_capacity(quals.len());
    let mut qi = 0usize;

    for op in &read.cigar {
        match op.op {
            Op::Match => {
                for _ in 0..op.len {
                    out_seq.push(bases[qi].to_ascii_uppercase());
                    out_qual.push(quals[qi]);
                    qi += 1;
                }
            }
            Op::Ins => {
                for _ in 0..op.len {
                    out_seq.push(bases[qi].to_ascii_lowercase());
                    out_qual.push(quals[qi]);
                    qi += 1;
                }
            }
            Op::Del => {
                for _ in 0..op.len {
                    out_seq.push('p');
                    out_qual.push(0);
                }
            }
            Op::Soft => {
                qi += op.len;
            }
            Op::Skip | Op::Hard => {}
        }
    }

    (out_seq, out_qual)
}

//! Command-line argument definitions.

use std::path::PathBuf;

use clap::Parser;

/// UMI- and coordinate-aware consensus clustering for single-end aligned reads.
#[derive(Parser, Debug)]
#[command(name = "umiclusterer", version, about)]
pub struct Cli {
    /// Input SAM/BAM alignment file (coordinate-sorted, single-end).
    pub input: PathBuf,

    /// Output FASTQ file; writes to stdout if omitted.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Worker thread count, capped at the available core count.
    #[arg(short = 'j', long, default_value_t = 1)]
    pub threads: usize,

    /// UMI Hamming-distance threshold `T`.
    #[arg(short = 't', long = "threshold", default_value_t = 1)]
    pub umi_threshold: u64,

    /// Coordinate window `W`.
    #[arg(short = 'w', long = "window", default_value_t = 5)]
    pub coord_window: u64,

    /// Enable debug-level logging.
    #[arg(short, long)]
    pub debug: bool,

    /// Column-vote weights as `n_weight,q_weight`.
    #[arg(long = "vote-weights", value_parser = parse_vote_weights, default_value = "0.5,0.5")]
    pub vote_weights: (f64, f64),

    /// Emit a bare `+` separator line instead of the joined raw per-base
    /// quality integers.
    #[arg(long)]
    pub no_raw_quality_line: bool,
}

fn parse_vote_weights(s: &str) -> Result<(f64, f64), String> {
    let (n, q) = s
        .split_once(',')
        .ok_or_else(|| format!("expected 'n_weight,q_weight', got '{s}'"))?;
    let n: f64 = n.trim().parse().map_err(|_| format!("invalid n_weight: '{n}'"))?;
    let q: f64 = q.trim().parse().map_err(|_| format!("invalid q_weight: '{q}'"))?;
    Ok((n, q))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_weights() {
        assert_eq!(parse_vote_weights("0.5,0.5"), Ok((0.5, 0.5)));
        assert_eq!(parse_vote_weights("0.25, 0.75"), Ok((0.25, 0.75)));
    }

    #[test]
    fn rejects_malformed_weights() {
        assert!(parse_vote_weights("0.5").is_err());
        assert!(parse_vote_weights("a,b").is_err());
    }
}

//! Alignment-file ingest: SAM, BAM, and gzip-compressed SAM, converted into
//! the core's file-agnostic [`AlignedRead`] values.
//!
//! Unmapped records are silently skipped, matching common alignment-tool
//! conventions. A paired-end record is a fatal, whole-file condition: this
//! tool's distance model and consensus construction assume single-end reads
//! throughout, so ingest refuses to guess at a pairing strategy.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use noodles::bam;
use noodles::bgzf;
use noodles::sam::{self as sam, alignment::Record, alignment::record::cigar::op::Kind, header::Header};

use umi_core::model::{AlignedRead, Cigar, CigarOp, Op};
use umi_core::validate_umis;

use crate::error::{CliError, CliResult};

/// Ingested reads plus the reference-name rank table derived from the file's
/// `@SQ` header order, used downstream to restore deterministic output order.
pub struct IngestOutput {
    pub reads: Vec<AlignedRead>,
    pub reference_order: HashMap<String, usize>,
}

/// Reads `path`, auto-detecting BAM, gzip-compressed SAM, or plain SAM by
/// extension, and validates the result as a non-empty, UMI-tagged, single-end
/// read set.
pub fn ingest(path: &Path) -> CliResult<IngestOutput> {
    if !path.exists() {
        return Err(CliError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let path_str = path.to_string_lossy();
    let (reads, reference_order) = if path_str.ends_with(".bam") {
        ingest_bam(path)?
    } else if path_str.ends_with(".sam.gz") {
        ingest_sam_gz(path)?
    } else {
        ingest_sam(path)?
    };

    if reads.is_empty() {
        return Err(CliError::EmptyInput(format!(
            "{} contains no mapped, single-end reads",
            path.display()
        )));
    }

    validate_umis(&reads)?;

    Ok(IngestOutput { reads, reference_order })
}

fn ingest_sam(path: &Path) -> CliResult<(Vec<AlignedRead>, HashMap<String, usize>)> {
    let mut reader = sam::io::reader::Builder::default().build_from_path(path)?;
    let header = reader.read_header()?;
    let order = reference_order_from_header(&header);
    let reads = parse_sam_records(reader, &header)?;
    Ok((reads, order))
}

fn ingest_sam_gz(path: &Path) -> CliResult<(Vec<AlignedRead>, HashMap<String, usize>)> {
    let file = File::open(path)?;
    let decoder = BufReader::new(MultiGzDecoder::new(file));
    let mut reader = sam::io::Reader::new(decoder);
    let header = reader.read_header()?;
    let order = reference_order_from_header(&header);
    let reads = parse_sam_records(reader, &header)?;
    Ok((reads, order))
}

fn ingest_bam(path: &Path) -> CliResult<(Vec<AlignedRead>, HashMap<String, usize>)> {
    let mut reader = File::open(path).map(bgzf::Reader::new).map(bam::io::Reader::new)?;
    let header = reader.read_header()?;
    let order = reference_order_from_header(&header);
    let reads = parse_bam_records(reader, &header)?;
    Ok((reads, order))
}

fn reference_order_from_header(header: &Header) -> HashMap<String, usize> {
    header
        .reference_sequences()
        .iter()
        .enumerate()
        .map(|(idx, (name, _))| (name.to_string(), idx))
        .collect()
}

fn parse_sam_records<R: BufRead>(mut reader: sam::io::Reader<R>, header: &Header) -> CliResult<Vec<AlignedRead>> {
    let mut reads = Vec::new();
    for result in reader.records(header) {
        let record = result?;
        if let Some(read) = record_to_read(&record, header)? {
            reads.push(read);
        }
    }
    Ok(reads)
}

fn parse_bam_records<R: Read>(
    mut reader: bam::io::Reader<bgzf::Reader<R>>,
    header: &Header,
) -> CliResult<Vec<AlignedRead>> {
    let mut reads = Vec::new();
    for result in reader.records(header) {
        let record = result.map_err(|e| CliError::MalformedRecord(e.to_string()))?;
        if let Some(read) = record_to_read(&record, header)? {
            reads.push(read);
        }
    }
    Ok(reads)
}

fn record_to_read(record: &dyn Record, header: &Header) -> CliResult<Option<AlignedRead>> {
    if record.flags().is_unmapped() {
        return Ok(None);
    }
    if record.flags().is_segmented() {
        let name = record.name().map(|n| n.to_string()).unwrap_or_else(|| "<unnamed>".to_string());
        return Err(CliError::UnsupportedLayout(name));
    }

    let reference_sequence_id = record
        .reference_sequence_id()
        .ok_or_else(|| CliError::MalformedRecord("missing reference sequence id".to_string()))?;
    let reference = header
        .reference_sequences()
        .get_index(reference_sequence_id)
        .map(|(name, _)| name.to_string())
        .ok_or_else(|| CliError::MalformedRecord("reference sequence id out of range".to_string()))?;

    let start = record
        .alignment_start()
        .map(|pos| (pos.get() - 1) as u64)
        .ok_or_else(|| CliError::MalformedRecord("missing alignment start".to_string()))?;

    let id = record
        .name()
        .map(|n| n.to_string())
        .ok_or_else(|| CliError::MalformedRecord("missing query name".to_string()))?;

    let mut sequence = String::with_capacity(record.sequence().len());
    for base in record.sequence().iter() {
        let base = base.map_err(|e| CliError::MalformedRecord(e.to_string()))?;
        sequence.push(char::from(base).to_ascii_uppercase());
    }

    let mut quality = Vec::with_capacity(record.quality_scores().len());
    for score in record.quality_scores().iter() {
        let score = score.map_err(|e| CliError::MalformedRecord(e.to_string()))?;
        quality.push(score);
    }

    let (cigar, ref_len) = translate_cigar(&record.cigar())?;
    let end = if cigar.is_empty() {
        start + sequence.chars().count() as u64
    } else {
        start + ref_len
    };

    Ok(Some(AlignedRead {
        id,
        reference,
        start,
        end,
        sequence,
        quality,
        cigar,
    }))
}

/// Translates a SAM/BAM CIGAR into the core's operation list, also returning
/// the total reference-consumed length (used to derive `end`).
fn translate_cigar(cigar: &dyn sam::alignment::record::Cigar) -> CliResult<(Cigar, u64)> {
    let mut ops = Vec::new();
    let mut ref_len = 0u64;

    for op in cigar.iter() {
        let op = op.map_err(|e| CliError::MalformedRecord(format!("invalid CIGAR operation: {e}")))?;
        let len = op.len();
        let mapped = match op.kind() {
            Kind::Match | Kind::SequenceMatch | Kind::SequenceMismatch => {
                ref_len += len as u64;
                Op::Match
            }
            Kind::Insertion => Op::Ins,
            Kind::Deletion => {
                ref_len += len as u64;
                Op::Del
            }
            Kind::Skip => {
                ref_len += len as u64;
                Op::Skip
            }
            Kind::SoftClip => Op::Soft,
            Kind::HardClip | Kind::Pad => Op::Hard,
        };
        ops.push(CigarOp::new(mapped, len));
    }

    Ok((ops, ref_len))
}

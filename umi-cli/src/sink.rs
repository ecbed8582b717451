//! FASTQ-shaped output sink.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use umi_core::ConsensusRead;

/// Writes consensus reads as four-line FASTQ-shaped records.
pub struct FastqSink<W: Write> {
    writer: W,
    raw_quality_line: bool,
}

impl FastqSink<BufWriter<File>> {
    pub fn to_file(path: &Path, raw_quality_line: bool) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            raw_quality_line,
        })
    }
}

impl FastqSink<BufWriter<io::Stdout>> {
    pub fn to_stdout(raw_quality_line: bool) -> Self {
        Self {
            writer: BufWriter::new(io::stdout()),
            raw_quality_line,
        }
    }
}

impl<W: Write> FastqSink<W> {
    /// Writes one record: `@id`, sequence, a `+` line, and the Phred+33
    /// quality line.
    ///
    /// When `raw_quality_line` is set, the raw per-base integer quality
    /// values are concatenated directly onto the `+` line (no separators),
    /// matching the reference tool's plus-line convention. The final line is
    /// always the Phred+33 ASCII-encoded quality string.
    pub fn write(&mut self, read: &ConsensusRead) -> io::Result<()> {
        writeln!(self.writer, "@{}", read.id)?;
        writeln!(self.writer, "{}", read.sequence)?;
        if self.raw_quality_line {
            let joined: String = read.quality.iter().map(|q| q.to_string()).collect();
            writeln!(self.writer, "+{joined}")?;
        } else {
            writeln!(self.writer, "+")?;
        }
        let encoded: String = read.quality.iter().map(|&q| (q.min(93) + 33) as char).collect();
        writeln!(self.writer, "{encoded}")?;
        Ok(())
    }

    pub fn write_all<'a>(&mut self, reads: impl IntoIterator<Item = &'a ConsensusRead>) -> io::Result<()> {
        for read in reads {
            self.write(read)?;
        }
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plus_line_carries_joined_raw_qualities_by_default() {
        let mut buf = Vec::new();
        {
            let mut sink = FastqSink {
                writer: &mut buf,
                raw_quality_line: true,
            };
            let read = ConsensusRead {
                id: "R1_AAAA".to_string(),
                sequence: "AC".to_string(),
                quality: vec![0, 30],
            };
            sink.write(&read).unwrap();
        }
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "@R1_AAAA");
        assert_eq!(lines[1], "AC");
        assert_eq!(lines[2], "+030");
        assert_eq!(lines[3], "!?");
    }

    #[test]
    fn plus_line_is_bare_when_raw_quality_line_is_disabled() {
        let mut buf = Vec::new();
        {
            let mut sink = FastqSink {
                writer: &mut buf,
                raw_quality_line: false,
            };
            let read = ConsensusRead {
                id: "R1_AAAA".to_string(),
                sequence: "ACGT".to_string(),
                quality: vec![5, 5, 5, 5],
            };
            sink.write(&read).unwrap();
        }
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[2], "+");
        assert_eq!(lines[3], "&&&&");
    }
}

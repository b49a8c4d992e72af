use crate::designs::CandidateLine;
use anyhow::{Context, Result};
use std::io::Write;

/// A writer for candidate-line files, the inverse of the reader: one line
/// per candidate line, kind tag first, then the point identifiers.
///
/// Numeric point identifiers are written in increasing value order (the
/// historical files list grid cells that way); other identifiers fall back
/// to lexicographic order.
#[derive(Default)]
pub struct CandidateLinesWriter;

impl CandidateLinesWriter {
    /// Writes candidate lines to a writer.
    pub fn write(&self, writer: &mut dyn Write, lines: &[CandidateLine]) -> Result<()> {
        let context = "while writing a candidate-line file";
        for line in lines {
            let mut points = line.points().collect::<Vec<_>>();
            if points.iter().all(|p| p.parse::<usize>().is_ok()) {
                points.sort_by_key(|p| p.parse::<usize>().unwrap());
            }
            write!(writer, "{}", line.kind().tag()).context(context)?;
            for p in points {
                write!(writer, " {}", p).context(context)?;
            }
            writeln!(writer).context(context)?;
        }
        writer.flush().context(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::designs::LineKind;
    use crate::io::CandidateLinesReader;

    #[test]
    fn test_write_numeric_points_in_value_order() {
        let lines = vec![
            CandidateLine::new(LineKind::Relational, ["10", "2", "31"]),
            CandidateLine::new(LineKind::NonRelational, ["4", "15"]),
        ];
        let mut out = Vec::new();
        CandidateLinesWriter::default().write(&mut out, &lines).unwrap();
        assert_eq!("R 2 10 31\nN 4 15\n", String::from_utf8(out).unwrap());
    }

    #[test]
    fn test_round_trip_through_the_reader() {
        let lines = vec![CandidateLine::new(LineKind::Relational, ["a", "b"])];
        let mut out = Vec::new();
        CandidateLinesWriter::default().write(&mut out, &lines).unwrap();
        let read_back = CandidateLinesReader::default()
            .read(&mut out.as_slice())
            .unwrap();
        assert_eq!(lines, read_back);
    }
}

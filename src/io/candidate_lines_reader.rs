use crate::designs::{CandidateLine, LineKind};
use anyhow::{anyhow, Context, Result};
use std::io::{BufRead, BufReader, Read};

/// A reader for candidate-line files.
///
/// Each non-blank line describes one candidate line: a leading `R`
/// (relational) or `N` (non-relational) tag, then the whitespace-separated
/// point identifiers.
///
/// # Example
///
/// ```
/// # use molsat::io::CandidateLinesReader;
/// let content = "R 1 13 25\nN 2 14 26\n";
/// let lines = CandidateLinesReader::default()
///     .read(&mut content.as_bytes())
///     .expect("invalid candidate-line file");
/// assert_eq!(2, lines.len());
/// ```
#[derive(Default)]
pub struct CandidateLinesReader;

impl CandidateLinesReader {
    /// Reads a candidate-line file.
    ///
    /// Errors identify the offending 1-based line.
    pub fn read(&self, reader: &mut dyn Read) -> Result<Vec<CandidateLine>> {
        let br = BufReader::new(reader);
        let mut lines = Vec::new();
        for (i, line) in br.lines().enumerate() {
            let context = || format!("while reading line with index {}", i);
            let l = line.with_context(context)?;
            let l = l.trim();
            if l.is_empty() {
                continue;
            }
            let tag = l.chars().next().unwrap();
            let kind = LineKind::from_tag(tag)
                .ok_or_else(|| anyhow!(r#"unrecognized line kind tag "{}""#, tag))
                .with_context(context)?;
            let points = l[tag.len_utf8()..]
                .split_whitespace()
                .map(str::to_string)
                .collect::<Vec<_>>();
            if points.is_empty() {
                return Err(anyhow!("candidate line with no points")).with_context(context);
            }
            lines.push(CandidateLine::new(kind, points));
        }
        Ok(lines)
    }
}

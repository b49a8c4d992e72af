use super::{ClauseSink, Literal};
use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use std::{
    fmt::Display,
    fs::File,
    io::{Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};

/// The number of clauses buffered before a flush to the backing file.
const DEFAULT_BATCH_CAPACITY: usize = 100_000;

/// The width of the header slot, newline excluded.
///
/// Wide enough for `p cnf` followed by two 64-bit decimal counts.
const HEADER_SLOT_LEN: usize = 63;

/// The counts of a sealed CNF instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CnfSummary {
    /// The number of variables declared in the instance header.
    pub n_vars: usize,
    /// The number of clauses written to the instance.
    pub n_clauses: u64,
}

impl Display for CnfSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} variables and {} clauses", self.n_vars, self.n_clauses)
    }
}

/// A [`ClauseSink`] streaming its clauses to a DIMACS file.
///
/// Clauses are serialized to text at this boundary only, and appended to an
/// in-memory batch flushed every [`DEFAULT_BATCH_CAPACITY`] clauses, keeping
/// peak memory bounded whatever the instance size. Since the true counts are
/// only known once the whole instance is built, the writer reserves a
/// fixed-width header slot at the start of the file and patches it in place
/// when [`finalize`](Self::finalize) seals the instance.
pub struct DimacsWriter {
    file: File,
    path: PathBuf,
    batch: String,
    batch_clauses: usize,
    batch_capacity: usize,
    n_clauses: u64,
    highest_var: usize,
}

impl DimacsWriter {
    /// Creates a writer over a new file at the given path.
    ///
    /// An existing file at this path is truncated.
    pub fn create<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        Self::with_batch_capacity(path, DEFAULT_BATCH_CAPACITY)
    }

    /// Creates a writer flushing every `batch_capacity` clauses.
    pub fn with_batch_capacity<P>(path: P, batch_capacity: usize) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref().to_path_buf();
        let mut file = File::create(&path)
            .with_context(|| format!("while creating the CNF file {:?}", path))?;
        let mut slot = String::with_capacity(HEADER_SLOT_LEN + 1);
        slot.push_str("p cnf");
        while slot.len() < HEADER_SLOT_LEN {
            slot.push(' ');
        }
        slot.push('\n');
        file.write_all(slot.as_bytes())
            .with_context(|| format!("while reserving the header slot of {:?}", path))?;
        Ok(Self {
            file,
            path,
            batch: String::new(),
            batch_clauses: 0,
            batch_capacity,
            n_clauses: 0,
            highest_var: 0,
        })
    }

    /// Returns the path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the number of clauses added so far.
    pub fn n_clauses(&self) -> u64 {
        self.n_clauses
    }

    fn flush_batch(&mut self) -> Result<()> {
        if self.batch.is_empty() {
            return Ok(());
        }
        self.file
            .write_all(self.batch.as_bytes())
            .with_context(|| format!("while flushing clauses to {:?}", self.path))?;
        debug!(
            "flushed {} clauses to {:?} ({} so far)",
            self.batch_clauses, self.path, self.n_clauses
        );
        self.batch.clear();
        self.batch_clauses = 0;
        Ok(())
    }

    /// Seals the instance: flushes the remaining clauses and patches the
    /// header slot with the true counts.
    ///
    /// The declared variable count is the caller's (the allocator's), since
    /// allocated variables may legally appear in no clause; it must not be
    /// lower than the highest variable actually emitted.
    pub fn finalize(mut self, n_vars: usize) -> Result<CnfSummary> {
        if n_vars < self.highest_var {
            return Err(anyhow!(
                "declared variable count {} is lower than the highest emitted variable {}",
                n_vars,
                self.highest_var
            ));
        }
        self.flush_batch()?;
        let header = format!("p cnf {} {}", n_vars, self.n_clauses);
        self.file
            .seek(SeekFrom::Start(0))
            .with_context(|| format!("while seeking back to the header of {:?}", self.path))?;
        self.file
            .write_all(header.as_bytes())
            .with_context(|| format!("while patching the header of {:?}", self.path))?;
        self.file
            .flush()
            .with_context(|| format!("while sealing {:?}", self.path))?;
        let summary = CnfSummary {
            n_vars,
            n_clauses: self.n_clauses,
        };
        info!("sealed CNF file {:?} with {}", self.path, summary);
        Ok(summary)
    }
}

impl ClauseSink for DimacsWriter {
    fn add_clause(&mut self, clause: Vec<Literal>) -> Result<bool> {
        if clause.is_empty() {
            return Ok(false);
        }
        for l in &clause {
            self.highest_var = usize::max(self.highest_var, usize::from(l.var()));
            self.batch.push_str(&format!("{} ", l));
        }
        self.batch.push_str("0\n");
        self.n_clauses += 1;
        self.batch_clauses += 1;
        if self.batch_clauses >= self.batch_capacity {
            self.flush_batch()?;
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause;
    use assert_fs::TempDir;

    fn read_lines(path: &Path) -> Vec<String> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_header_matches_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("instance.cnf");
        let mut writer = DimacsWriter::create(&path).unwrap();
        assert!(writer.add_clause(clause![1, 2]).unwrap());
        assert!(writer.add_clause(clause![-1, -2]).unwrap());
        let summary = writer.finalize(2).unwrap();
        assert_eq!(2, summary.n_vars);
        assert_eq!(2, summary.n_clauses);
        let lines = read_lines(&path);
        assert_eq!("p cnf 2 2", lines[0].trim_end());
        assert_eq!("1 2 0", lines[1]);
        assert_eq!("-1 -2 0", lines[2]);
        assert_eq!(3, lines.len());
    }

    #[test]
    fn test_empty_clause_is_not_counted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("instance.cnf");
        let mut writer = DimacsWriter::create(&path).unwrap();
        assert!(!writer.add_clause(clause![]).unwrap());
        assert!(writer.add_clause(clause![1]).unwrap());
        let summary = writer.finalize(1).unwrap();
        assert_eq!(1, summary.n_clauses);
        let lines = read_lines(&path);
        assert_eq!("p cnf 1 1", lines[0].trim_end());
        assert_eq!(2, lines.len());
    }

    #[test]
    fn test_batched_flushes_preserve_content() {
        let dir = TempDir::new().unwrap();
        let batched_path = dir.path().join("batched.cnf");
        let oneshot_path = dir.path().join("oneshot.cnf");
        let mut batched = DimacsWriter::with_batch_capacity(&batched_path, 2).unwrap();
        let mut oneshot = DimacsWriter::create(&oneshot_path).unwrap();
        for i in 1..=5isize {
            batched.add_clause(clause![i, -(i + 1)]).unwrap();
            oneshot.add_clause(clause![i, -(i + 1)]).unwrap();
        }
        batched.finalize(6).unwrap();
        oneshot.finalize(6).unwrap();
        assert_eq!(
            std::fs::read_to_string(&batched_path).unwrap(),
            std::fs::read_to_string(&oneshot_path).unwrap()
        );
    }

    #[test]
    fn test_declared_vars_may_exceed_emitted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("instance.cnf");
        let mut writer = DimacsWriter::create(&path).unwrap();
        writer.add_clause(clause![1]).unwrap();
        let summary = writer.finalize(10).unwrap();
        assert_eq!(10, summary.n_vars);
        assert_eq!("p cnf 10 1", read_lines(&path)[0].trim_end());
    }

    #[test]
    fn test_declared_vars_below_emitted_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("instance.cnf");
        let mut writer = DimacsWriter::create(&path).unwrap();
        writer.add_clause(clause![1, 2, 3]).unwrap();
        assert!(writer.finalize(2).is_err());
    }
}

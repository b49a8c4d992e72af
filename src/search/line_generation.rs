use crate::designs::{CandidateLine, Template};
use crate::encodings::{LineGenerationEncoder, LineGenerationOptions, VariableAllocator};
use crate::sat::{DimacsWriter, ExternalSolver, SolverOutputReader};
use anyhow::{Context, Result};
use log::{info, warn};
use std::{fs::File, path::Path};

/// The result of a line-generation run.
pub struct LineGenerationReport {
    /// The candidate lines decoded from the enumerated solutions.
    pub lines: Vec<CandidateLine>,
    /// The solution count claimed by the oracle, when reported.
    pub n_reported_solutions: Option<usize>,
    /// The process time reported by the oracle, in seconds.
    pub process_time: Option<f64>,
}

/// Runs a line-generation search: encodes the permutation-matrix instance
/// over a template, seals the CNF file, blocks on the enumerating oracle,
/// then decodes every reported solution into a candidate line.
///
/// The number of primary grid variables is passed to the oracle as its
/// `--order` enumeration hint; any other flag (such as a negative-polarity
/// mode) belongs to the solver's configured options.
pub fn generate_lines(
    template: &Template,
    options: LineGenerationOptions,
    solver: &ExternalSolver,
    cnf_path: &Path,
    result_path: &Path,
) -> Result<LineGenerationReport> {
    let mut writer = DimacsWriter::create(cnf_path)?;
    let mut allocator = VariableAllocator::new();
    let encoder = LineGenerationEncoder::new(template, options);
    let variables = encoder.encode(&mut writer, &mut allocator)?;
    let summary = writer.finalize(allocator.n_vars())?;
    let hint = variables.n_grid_vars().to_string();
    solver.run_with_extra_options(
        cnf_path,
        result_path,
        &["--order".to_string(), hint],
    )?;
    let mut result_file = File::open(result_path)
        .with_context(|| format!("while opening the result file {:?}", result_path))?;
    let output = SolverOutputReader::new(summary.n_vars).read(&mut result_file)?;
    let lines = output
        .enumerated()
        .iter()
        .map(|solution| variables.decode_line(solution))
        .collect::<Vec<_>>();
    if let Some(n) = output.n_reported_solutions() {
        if n != lines.len() {
            warn!(
                "the oracle claims {} solutions but reported {} of them",
                n,
                lines.len()
            );
        }
    }
    info!("decoded {} candidate line(s)", lines.len());
    Ok(LineGenerationReport {
        lines,
        n_reported_solutions: output.n_reported_solutions(),
        process_time: output.process_time(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::designs::LineKind;
    use assert_fs::TempDir;
    use std::path::PathBuf;

    #[test]
    fn test_enumerated_solutions_become_lines() {
        if !cfg!(target_family = "unix") {
            return;
        }
        let output = "c New solution: 1 4 0\nc New solution: 2 3 0\nc Number of solutions: 2\ns UNSATISFIABLE";
        let solver = ExternalSolver::new(
            PathBuf::from("sh"),
            vec!["-c".to_string(), format!("printf '{}\n'", output)],
        );
        let mut template = Template::new(2);
        template.push_layer(vec![vec![1, 1], vec![1, 1]]);
        let options = LineGenerationOptions {
            kind: LineKind::Relational,
            frequency_layer: 0,
            bucket_counts: Some(vec![]),
        };
        let dir = TempDir::new().unwrap();
        let report = generate_lines(
            &template,
            options,
            &solver,
            &dir.path().join("instance.cnf"),
            &dir.path().join("result.txt"),
        )
        .unwrap();
        assert_eq!(2, report.lines.len());
        assert_eq!(Some(2), report.n_reported_solutions);
        assert_eq!(LineKind::Relational, report.lines[0].kind());
        assert!(report.lines[0].contains("1"));
        assert!(report.lines[0].contains("4"));
        assert!(report.lines[1].contains("2"));
        assert!(report.lines[1].contains("3"));
    }
}

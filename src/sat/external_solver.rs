use anyhow::{Context, Result};
use log::{info, warn};
use std::{
    fs::File,
    path::{Path, PathBuf},
    process::{Command, ExitStatus, Stdio},
    time::Instant,
};

/// The external SAT oracle, invoked as a subprocess.
///
/// The oracle is given the configured options, passed through verbatim,
/// followed by the sealed CNF file path as its positional argument. Its
/// combined standard output and error streams are captured into a result
/// file which is later read back by the solution decoder; no interpretation
/// of the output happens here.
///
/// A non-zero termination status is surfaced to the caller but is not an
/// error: SAT solvers conventionally exit with 10 (satisfiable) or 20
/// (unsatisfiable).
pub struct ExternalSolver {
    program: PathBuf,
    options: Vec<String>,
}

impl ExternalSolver {
    /// Builds a new external solver.
    ///
    /// The `program` argument is the path to the solver executable, and
    /// `options` the CLI options passed verbatim before the CNF file path
    /// on each invocation.
    pub fn new(program: PathBuf, options: Vec<String>) -> Self {
        Self { program, options }
    }

    /// Runs the oracle on a sealed CNF file, capturing its output into
    /// `result_path`.
    pub fn run(&self, cnf_path: &Path, result_path: &Path) -> Result<ExitStatus> {
        self.run_with_extra_options(cnf_path, result_path, &[])
    }

    /// Runs the oracle with additional options appended after the configured
    /// ones (used for per-run hints such as `--order` or `--only-neg`).
    pub fn run_with_extra_options(
        &self,
        cnf_path: &Path,
        result_path: &Path,
        extra_options: &[String],
    ) -> Result<ExitStatus> {
        let result_file = File::create(result_path)
            .with_context(|| format!("while creating the result file {:?}", result_path))?;
        let stderr_file = result_file
            .try_clone()
            .with_context(|| format!("while duplicating the result file {:?}", result_path))?;
        info!(
            "launching solver {:?} on {:?} (options: {:?})",
            self.program,
            cnf_path,
            self.options
                .iter()
                .chain(extra_options.iter())
                .collect::<Vec<_>>()
        );
        let start = Instant::now();
        let status = Command::new(&self.program)
            .args(&self.options)
            .args(extra_options)
            .arg(cnf_path)
            .stdout(Stdio::from(result_file))
            .stderr(Stdio::from(stderr_file))
            .status()
            .with_context(|| format!("while launching the solver {:?}", self.program))?;
        info!(
            "solver terminated with status {} after {:.2}s; output captured in {:?}",
            status,
            start.elapsed().as_secs_f64(),
            result_path
        );
        if !status.success() {
            warn!(
                "solver exited with a non-zero status ({}); this is expected from SAT solvers reporting their verdict through the exit code",
                status
            );
        }
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;

    fn echo_solver(options: &[&str]) -> Option<ExternalSolver> {
        if cfg!(target_family = "unix") {
            Some(ExternalSolver::new(
                PathBuf::from("echo"),
                options.iter().map(|s| s.to_string()).collect(),
            ))
        } else {
            None
        }
    }

    #[test]
    fn test_output_is_captured() {
        let solver = match echo_solver(&["s", "UNSATISFIABLE"]) {
            Some(s) => s,
            None => return,
        };
        let dir = TempDir::new().unwrap();
        let cnf = dir.path().join("instance.cnf");
        std::fs::write(&cnf, "p cnf 1 1\n1 0\n").unwrap();
        let result = dir.path().join("result.txt");
        let status = solver.run(&cnf, &result).unwrap();
        assert!(status.success());
        let captured = std::fs::read_to_string(&result).unwrap();
        assert!(captured.contains("s UNSATISFIABLE"));
    }

    #[test]
    fn test_extra_options_are_passed_through() {
        let solver = match echo_solver(&[]) {
            Some(s) => s,
            None => return,
        };
        let dir = TempDir::new().unwrap();
        let cnf = dir.path().join("instance.cnf");
        std::fs::write(&cnf, "p cnf 0 0\n").unwrap();
        let result = dir.path().join("result.txt");
        solver
            .run_with_extra_options(
                &cnf,
                &result,
                &["--only-neg".to_string(), "--order".to_string(), "100".to_string()],
            )
            .unwrap();
        let captured = std::fs::read_to_string(&result).unwrap();
        assert!(captured.contains("--only-neg --order 100"));
    }

    #[test]
    fn test_missing_program_is_an_error() {
        let solver = ExternalSolver::new(PathBuf::from("/nonexistent/solver"), vec![]);
        let dir = TempDir::new().unwrap();
        let cnf = dir.path().join("instance.cnf");
        std::fs::write(&cnf, "p cnf 0 0\n").unwrap();
        assert!(solver.run(&cnf, &dir.path().join("result.txt")).is_err());
    }
}

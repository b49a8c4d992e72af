use crate::designs::{SquareSystem, SquareSystemDefect, Template};
use crate::encodings::{SquareConstraintsEncoder, SquareEncodingOptions, VariableAllocator};
use crate::sat::{DimacsWriter, ExternalSolver, SolverOutputReader, SolvingResult};
use anyhow::{Context, Result};
use log::{error, info};
use std::{fs::File, path::Path};

/// The outcome of a square-system refinement search.
pub enum SquareSearchOutcome {
    /// The oracle found a model; the decoded squares are provided, along
    /// with the defect found by the independent validation, if any.
    Satisfiable {
        /// The decoded square system.
        system: SquareSystem,
        /// The validation defect, if the decoded system is invalid.
        defect: Option<SquareSystemDefect>,
    },
    /// The template admits no refinement.
    Unsatisfiable,
    /// The oracle gave no verdict, or a verdict without a model.
    Unknown,
}

/// Runs a refinement search: encodes the square system over a template,
/// seals the CNF file, blocks on the oracle, then decodes and validates the
/// outcome.
///
/// When a third square witnesses orthogonality, the designated pair checked
/// by the validator is the second and third squares.
pub fn search_squares(
    template: Option<&Template>,
    options: SquareEncodingOptions,
    solver: &ExternalSolver,
    cnf_path: &Path,
    result_path: &Path,
) -> Result<SquareSearchOutcome> {
    let orthogonal_pair = if options.n_squares >= 3 {
        Some((1, 2))
    } else {
        None
    };
    let mut writer = DimacsWriter::create(cnf_path)?;
    let mut allocator = VariableAllocator::new();
    let encoder = SquareConstraintsEncoder::new(template, options);
    let variables = encoder.encode(&mut writer, &mut allocator)?;
    let summary = writer.finalize(allocator.n_vars())?;
    solver.run(cnf_path, result_path)?;
    let mut result_file = File::open(result_path)
        .with_context(|| format!("while opening the result file {:?}", result_path))?;
    let output = SolverOutputReader::new(summary.n_vars).read(&mut result_file)?;
    match output.into_result() {
        SolvingResult::Satisfiable(model) => {
            let system = variables.decode(&model);
            let defect = system.validate(orthogonal_pair).err();
            match &defect {
                None => info!(
                    "decoded {} valid square(s) of order {}",
                    system.n_squares(),
                    system.order()
                ),
                Some(d) => error!(
                    "the decoded squares violate the design invariants ({}); this reveals an encoding defect",
                    d
                ),
            }
            Ok(SquareSearchOutcome::Satisfiable { system, defect })
        }
        SolvingResult::Unsatisfiable => {
            info!("the template admits no refinement");
            Ok(SquareSearchOutcome::Unsatisfiable)
        }
        SolvingResult::Unknown => Ok(SquareSearchOutcome::Unknown),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encodings::SymbolIndexer;
    use assert_fs::TempDir;
    use std::path::PathBuf;

    fn fake_solver(output: &str) -> Option<ExternalSolver> {
        if cfg!(target_family = "unix") {
            Some(ExternalSolver::new(
                PathBuf::from("sh"),
                vec!["-c".to_string(), format!("printf '{}\n'", output)],
            ))
        } else {
            None
        }
    }

    fn single_square_options(order: usize) -> SquareEncodingOptions {
        SquareEncodingOptions {
            order,
            n_squares: 1,
            template_clauses: false,
            relational_symbols: 1,
        }
    }

    fn model_line(cells: &[(usize, usize, usize)], order: usize) -> String {
        let indexer = SymbolIndexer::new(1, order);
        let mut literals = cells
            .iter()
            .map(|&(r, c, s)| usize::from(indexer.variable_at(0, r, c, s)).to_string())
            .collect::<Vec<_>>();
        literals.push("0".to_string());
        format!("s SATISFIABLE\nv {}", literals.join(" "))
    }

    #[test]
    fn test_valid_latin_square_is_decoded() {
        let model = model_line(&[(0, 0, 0), (0, 1, 1), (1, 0, 1), (1, 1, 0)], 2);
        let solver = match fake_solver(&model) {
            Some(s) => s,
            None => return,
        };
        let dir = TempDir::new().unwrap();
        let outcome = search_squares(
            None,
            single_square_options(2),
            &solver,
            &dir.path().join("instance.cnf"),
            &dir.path().join("result.txt"),
        )
        .unwrap();
        match outcome {
            SquareSearchOutcome::Satisfiable { system, defect } => {
                assert_eq!(None, defect);
                assert_eq!(Some(0), system.symbol(0, 0, 0));
                assert_eq!(Some(0), system.symbol(0, 1, 1));
            }
            _ => panic!("expected a satisfiable outcome"),
        }
    }

    #[test]
    fn test_row_uniqueness_violation_is_flagged_despite_sat_verdict() {
        let model = model_line(&[(0, 0, 0), (0, 1, 0), (1, 0, 1), (1, 1, 1)], 2);
        let solver = match fake_solver(&model) {
            Some(s) => s,
            None => return,
        };
        let dir = TempDir::new().unwrap();
        let outcome = search_squares(
            None,
            single_square_options(2),
            &solver,
            &dir.path().join("instance.cnf"),
            &dir.path().join("result.txt"),
        )
        .unwrap();
        match outcome {
            SquareSearchOutcome::Satisfiable { defect, .. } => {
                assert!(matches!(
                    defect,
                    Some(SquareSystemDefect::RowDuplicate { square: 0, row: 0, symbol: 0 })
                ));
            }
            _ => panic!("expected a satisfiable outcome"),
        }
    }

    #[test]
    fn test_unsat_outcome() {
        let solver = match fake_solver("s UNSATISFIABLE") {
            Some(s) => s,
            None => return,
        };
        let dir = TempDir::new().unwrap();
        let outcome = search_squares(
            None,
            single_square_options(2),
            &solver,
            &dir.path().join("instance.cnf"),
            &dir.path().join("result.txt"),
        )
        .unwrap();
        assert!(matches!(outcome, SquareSearchOutcome::Unsatisfiable));
    }
}

use crate::designs::{NetDefect, NetSolution, ParallelClass};
use crate::encodings::{NetConstraintsEncoder, NetEncodingOptions, VariableAllocator};
use crate::sat::{DimacsWriter, ExternalSolver, SolverOutputReader, SolvingResult};
use anyhow::{Context, Result};
use log::{error, info};
use std::{fs::File, path::Path};

/// The outcome of a net search.
pub enum NetSearchOutcome {
    /// The oracle found a model; the decoded selection is provided, along
    /// with the defect found by the independent validation, if any. A
    /// defect on a satisfiable instance reveals an encoding bug.
    Satisfiable {
        /// The decoded line selection.
        solution: NetSolution,
        /// The validation defect, if the decoded selection is invalid.
        defect: Option<NetDefect>,
    },
    /// No net refines the given candidate lines.
    Unsatisfiable,
    /// The oracle gave no verdict, or a verdict without a model.
    Unknown,
}

/// Runs a net search: encodes the candidate lines of two parallel classes,
/// seals the CNF file, blocks on the oracle, then decodes and validates the
/// outcome.
pub fn search_net(
    classes: [&ParallelClass; 2],
    options: NetEncodingOptions,
    solver: &ExternalSolver,
    cnf_path: &Path,
    result_path: &Path,
) -> Result<NetSearchOutcome> {
    let mut writer = DimacsWriter::create(cnf_path)?;
    let mut allocator = VariableAllocator::new();
    let encoder = NetConstraintsEncoder::new(classes[0], classes[1], options);
    let variables = encoder.encode(&mut writer, &mut allocator)?;
    let summary = writer.finalize(allocator.n_vars())?;
    solver.run(cnf_path, result_path)?;
    let mut result_file = File::open(result_path)
        .with_context(|| format!("while opening the result file {:?}", result_path))?;
    let output = SolverOutputReader::new(summary.n_vars).read(&mut result_file)?;
    match output.into_result() {
        SolvingResult::Satisfiable(model) => {
            let solution = variables.decode(&model);
            info!("the oracle selected {} lines", solution.n_selected());
            let defect = solution.validate(classes).err();
            if let Some(d) = &defect {
                error!(
                    "the decoded selection violates the net invariants ({}); this reveals an encoding defect",
                    d
                );
            }
            Ok(NetSearchOutcome::Satisfiable { solution, defect })
        }
        SolvingResult::Unsatisfiable => {
            info!("no net refines the given candidate lines");
            Ok(NetSearchOutcome::Unsatisfiable)
        }
        SolvingResult::Unknown => Ok(NetSearchOutcome::Unknown),
    }
}

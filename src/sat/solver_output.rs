use super::{Assignment, Variable};
use anyhow::{anyhow, Context, Result};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use std::io::{BufRead, BufReader, Read};

lazy_static! {
    static ref N_SOLUTIONS_PATTERN: Regex = Regex::new(r"^c Number of solutions:\s*(\d+)").unwrap();
    static ref NEW_SOLUTION_PATTERN: Regex = Regex::new(r"^c New solution:\s*(.*)$").unwrap();
    static ref PROCESS_TIME_PATTERN: Regex =
        Regex::new(r"^c\s+(?:total\s+)?process[ -]time.*?([0-9]+(?:\.[0-9]+)?)\s*seconds").unwrap();
}

/// The outcome of a solver run, as read back from its captured output.
#[derive(Debug, PartialEq)]
pub enum SolvingResult {
    /// The instance is satisfiable; the model is provided.
    Satisfiable(Assignment),
    /// The instance is unsatisfiable.
    Unsatisfiable,
    /// No verdict, or a satisfiability verdict without a model section.
    Unknown,
}

impl SolvingResult {
    /// Returns the underlying model if it exists, or [`Option::None`].
    ///
    /// # Panics
    ///
    /// Panics if the result is [`SolvingResult::Unknown`].
    pub fn unwrap_model(self) -> Option<Assignment> {
        match self {
            SolvingResult::Satisfiable(assignment) => Some(assignment),
            SolvingResult::Unsatisfiable => None,
            SolvingResult::Unknown => {
                panic!(r#"cannot unwrap a model when the solver returned "Unknown""#)
            }
        }
    }
}

/// The content of a captured solver output file.
#[derive(Debug)]
pub struct SolverOutput {
    result: SolvingResult,
    enumerated: Vec<Vec<Variable>>,
    n_reported_solutions: Option<usize>,
    process_time: Option<f64>,
}

impl SolverOutput {
    /// Returns the satisfiability outcome.
    pub fn result(&self) -> &SolvingResult {
        &self.result
    }

    /// Consumes this output, returning the satisfiability outcome.
    pub fn into_result(self) -> SolvingResult {
        self.result
    }

    /// Returns the solutions reported by an enumerating oracle, one set of
    /// positive variables per solution.
    pub fn enumerated(&self) -> &[Vec<Variable>] {
        &self.enumerated
    }

    /// Returns the solution count claimed by an enumerating oracle.
    pub fn n_reported_solutions(&self) -> Option<usize> {
        self.n_reported_solutions
    }

    /// Returns the process time reported by the oracle, in seconds.
    pub fn process_time(&self) -> Option<f64> {
        self.process_time
    }
}

/// A reader for captured solver output files.
///
/// The reader recognizes the verdict line (`s ` prefix), the model lines
/// (`v ` prefix, signed literals terminated by a zero sentinel, possibly
/// split across lines) and the comment lines (`c ` prefix) carrying solver
/// statistics and, for enumerating oracles, the solutions themselves.
/// Output oddities that are expected from an oracle (no verdict, a verdict
/// without a model) yield [`SolvingResult::Unknown`]; only output that
/// contradicts the instance (out-of-range or unparsable literals, several
/// verdicts) is an error.
pub struct SolverOutputReader {
    n_vars: usize,
}

impl SolverOutputReader {
    /// Builds a reader for the output of a run over an instance involving
    /// `n_vars` variables.
    pub fn new(n_vars: usize) -> Self {
        Self { n_vars }
    }

    /// Reads a captured solver output.
    pub fn read(&self, reader: &mut dyn Read) -> Result<SolverOutput> {
        let br = BufReader::new(reader);
        let mut status = None;
        let mut assignment = vec![None; self.n_vars];
        let mut model_seen = false;
        let mut model_complete = false;
        let mut enumerated = Vec::new();
        let mut n_reported_solutions = None;
        let mut process_time = None;
        for (i, line) in br.lines().enumerate() {
            let context = || format!("while reading solver output line {}", i + 1);
            let line = line.with_context(context)?;
            if line == "s SATISFIABLE" || line == "s UNSATISFIABLE" {
                if status.is_some() {
                    return Err(anyhow!("multiple verdict lines")).with_context(context);
                }
                status = Some(line == "s SATISFIABLE");
            } else if line == "v" || line.starts_with("v ") {
                model_seen = true;
                self.read_model_literals(&line, &mut assignment, &mut model_complete)
                    .with_context(context)?;
            } else if line.starts_with('c') {
                if let Some(c) = NEW_SOLUTION_PATTERN.captures(&line) {
                    enumerated
                        .push(self.read_solution_line(c.get(1).unwrap().as_str()).with_context(context)?);
                } else if let Some(c) = N_SOLUTIONS_PATTERN.captures(&line) {
                    n_reported_solutions = c.get(1).unwrap().as_str().parse::<usize>().ok();
                } else if let Some(c) = PROCESS_TIME_PATTERN.captures(&line) {
                    process_time = c.get(1).unwrap().as_str().parse::<f64>().ok();
                }
            } else if !line.trim().is_empty() {
                debug!("ignoring unrecognized solver output line {:?}", line);
            }
        }
        let result = match status {
            Some(true) if model_seen => SolvingResult::Satisfiable(Assignment::new(assignment)),
            Some(true) => SolvingResult::Unknown,
            Some(false) => SolvingResult::Unsatisfiable,
            None => SolvingResult::Unknown,
        };
        Ok(SolverOutput {
            result,
            enumerated,
            n_reported_solutions,
            process_time,
        })
    }

    fn read_model_literals(
        &self,
        line: &str,
        assignment: &mut [Option<bool>],
        model_complete: &mut bool,
    ) -> Result<()> {
        for w in line.split_ascii_whitespace().skip(1) {
            let n = w
                .parse::<isize>()
                .map_err(|_| anyhow!(r#""{}" is not a literal"#, w))?;
            if n == 0 {
                if *model_complete {
                    return Err(anyhow!("multiple zeroes in the model section"));
                }
                *model_complete = true;
            } else {
                let v = n.unsigned_abs() - 1;
                if v >= self.n_vars {
                    return Err(anyhow!(
                        "the model involves variable {} but the instance has {} variables",
                        n.unsigned_abs(),
                        self.n_vars
                    ));
                }
                assignment[v] = Some(n > 0);
            }
        }
        Ok(())
    }

    fn read_solution_line(&self, content: &str) -> Result<Vec<Variable>> {
        let mut solution = Vec::new();
        for w in content.split_ascii_whitespace() {
            let n = w
                .parse::<isize>()
                .map_err(|_| anyhow!(r#""{}" is not a literal in an enumerated solution"#, w))?;
            if n == 0 {
                break;
            }
            if n > 0 {
                solution.push(Variable::from(n));
            }
        }
        Ok(solution)
    }
}

//! The SAT boundary: CNF types, clause sinks, the DIMACS file writer, the
//! external oracle runner and the solver output reader.

mod dimacs_writer;
pub use dimacs_writer::CnfSummary;
pub use dimacs_writer::DimacsWriter;

mod external_solver;
pub use external_solver::ExternalSolver;

mod literals;
pub use literals::Assignment;
pub use literals::Literal;
pub use literals::Variable;

mod sink;
pub use sink::ClauseSink;
pub use sink::CnfBuffer;

mod solver_output;
pub use solver_output::SolverOutput;
pub use solver_output::SolverOutputReader;
pub use solver_output::SolvingResult;

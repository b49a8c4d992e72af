//! The combinatorial-design data model: candidate lines and parallel
//! classes, templates, and the decoded solutions with their validators.

mod candidate_line;
pub use candidate_line::CandidateLine;
pub use candidate_line::LineKind;

mod net_solution;
pub use net_solution::NetDefect;
pub use net_solution::NetSolution;

mod parallel_class;
pub use parallel_class::IntersectionTable;
pub use parallel_class::ParallelClass;

mod square_system;
pub use square_system::SquareSystem;
pub use square_system::SquareSystemDefect;

mod template;
pub use template::Template;

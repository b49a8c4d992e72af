//! The batch search pipelines: build an instance, seal the CNF file, block
//! on the oracle, decode and validate the outcome.

mod line_generation;
pub use line_generation::generate_lines;
pub use line_generation::LineGenerationReport;

mod net_search;
pub use net_search::search_net;
pub use net_search::NetSearchOutcome;

mod square_search;
pub use square_search::search_squares;
pub use square_search::SquareSearchOutcome;

//! The constraint-to-CNF compiler: variable allocation, logical primitives,
//! the cardinality encoder, the grid index mappers and the domain constraint
//! encoders.

mod cardinality;
pub use cardinality::add_at_least_at_most;
pub use cardinality::add_exactly;

mod grid_indexing;
pub use grid_indexing::CellIndexer;
pub use grid_indexing::SymbolIndexer;

mod line_generation_encoder;
pub use line_generation_encoder::LineGenerationEncoder;
pub use line_generation_encoder::LineGenerationOptions;
pub use line_generation_encoder::LineGenerationVariables;

mod net_constraints_encoder;
pub use net_constraints_encoder::ClassSizes;
pub use net_constraints_encoder::CoverageMode;
pub use net_constraints_encoder::NetConstraintsEncoder;
pub use net_constraints_encoder::NetEncodingOptions;
pub use net_constraints_encoder::NetVariables;
pub use net_constraints_encoder::PairwiseStyle;

mod primitives;
pub use primitives::add_implication;
pub use primitives::add_xor;

mod square_constraints_encoder;
pub use square_constraints_encoder::SquareConstraintsEncoder;
pub use square_constraints_encoder::SquareEncodingOptions;
pub use square_constraints_encoder::SquareVariables;

mod variable_allocator;
pub use variable_allocator::VariableAllocator;

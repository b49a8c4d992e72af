use super::{add_exactly, CellIndexer, VariableAllocator};
use crate::designs::{CandidateLine, LineKind, Template};
use crate::sat::{ClauseSink, Variable};
use anyhow::Result;
use log::info;
use std::collections::BTreeMap;

/// The configuration of a line-generation run.
pub struct LineGenerationOptions {
    /// The kind of lines to generate.
    pub kind: LineKind,
    /// The template layer gating cell eligibility.
    pub frequency_layer: usize,
    /// The exact selected-cell count per template weight, or
    /// [`Option::None`] for the historical defaults of the kind.
    pub bucket_counts: Option<Vec<(usize, usize)>>,
}

impl LineGenerationOptions {
    /// Builds the options for a kind and frequency layer, with the default
    /// weight buckets.
    pub fn new(kind: LineKind, frequency_layer: usize) -> Self {
        Self {
            kind,
            frequency_layer,
            bucket_counts: None,
        }
    }

    fn bucket_counts(&self) -> Vec<(usize, usize)> {
        match &self.bucket_counts {
            Some(counts) => counts.clone(),
            None => match self.kind {
                LineKind::Relational => vec![(4, 1), (2, 9)],
                LineKind::NonRelational => vec![(2, 6), (0, 4)],
            },
        }
    }
}

/// The encoder turning a template into the CNF constraints of a
/// candidate-line generation run.
///
/// One variable is assigned per grid cell; the selected cells must form a
/// permutation matrix (one per row and per column), restricted to the cells
/// the designated frequency layer makes eligible for the requested line
/// kind, with exact counts per template-weight bucket. Enumerating the
/// models of this instance enumerates the candidate lines of the template.
pub struct LineGenerationEncoder<'a> {
    template: &'a Template,
    options: LineGenerationOptions,
}

impl<'a> LineGenerationEncoder<'a> {
    /// Builds an encoder over a loaded template.
    pub fn new(template: &'a Template, options: LineGenerationOptions) -> Self {
        Self { template, options }
    }

    /// Encodes the generation constraints, returning the cell mapping for
    /// later decoding.
    pub fn encode(
        &self,
        sink: &mut dyn ClauseSink,
        allocator: &mut VariableAllocator,
    ) -> Result<LineGenerationVariables> {
        let order = self.template.order();
        let indexer = CellIndexer::new(order);
        allocator.reserve(indexer.n_cells());
        info!(
            "enforcing a permutation matrix over the {}x{} grid",
            order, order
        );
        for x in 0..order {
            let row_vars = (0..order)
                .map(|c| indexer.variable_at(x, c))
                .collect::<Vec<_>>();
            add_exactly(sink, allocator, &row_vars, 1)?;
            let col_vars = (0..order)
                .map(|r| indexer.variable_at(r, x))
                .collect::<Vec<_>>();
            add_exactly(sink, allocator, &col_vars, 1)?;
        }
        info!(
            "gating cells by layer {} for {} lines",
            self.options.frequency_layer,
            self.options.kind.as_ref()
        );
        let mut weight_buckets: BTreeMap<usize, Vec<Variable>> = BTreeMap::new();
        for r in 0..order {
            for c in 0..order {
                let gate = self.template.bit(self.options.frequency_layer, r, c);
                let excluded = match self.options.kind {
                    LineKind::Relational => gate == 0,
                    LineKind::NonRelational => gate == 1,
                };
                if excluded {
                    sink.add_clause(vec![indexer.variable_at(r, c).negative_lit()])?;
                } else {
                    weight_buckets
                        .entry(self.template.weight(r, c))
                        .or_default()
                        .push(indexer.variable_at(r, c));
                }
            }
        }
        for (weight, count) in self.options.bucket_counts() {
            let variables = weight_buckets.get(&weight).cloned().unwrap_or_default();
            info!(
                "enforcing exactly {} selected cell(s) of weight {} (among {})",
                count,
                weight,
                variables.len()
            );
            add_exactly(sink, allocator, &variables, count)?;
        }
        Ok(LineGenerationVariables {
            indexer,
            kind: self.options.kind,
        })
    }
}

/// The cell mapping of an encoded generation run, used to decode the
/// enumerated solutions.
pub struct LineGenerationVariables {
    indexer: CellIndexer,
    kind: LineKind,
}

impl LineGenerationVariables {
    /// Returns the number of primary grid variables, used as the oracle's
    /// enumeration-ordering hint.
    pub fn n_grid_vars(&self) -> usize {
        self.indexer.n_cells()
    }

    /// Translates an enumerated solution (the positive variables of one
    /// model) into a candidate line.
    ///
    /// Auxiliary counter variables are dropped; the surviving cell
    /// identifiers become the line's points, matching the candidate-line
    /// file format.
    pub fn decode_line(&self, solution: &[Variable]) -> CandidateLine {
        let points = solution
            .iter()
            .filter(|v| usize::from(**v) <= self.indexer.n_cells())
            .map(|v| usize::from(*v).to_string())
            .collect::<Vec<_>>();
        CandidateLine::new(self.kind, points)
    }
}

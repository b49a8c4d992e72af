use super::{add_implication, SymbolIndexer, VariableAllocator};
use crate::designs::{SquareSystem, Template};
use crate::sat::{Assignment, ClauseSink};
use anyhow::Result;
use log::info;

/// The configuration of a square-system refinement run.
pub struct SquareEncodingOptions {
    /// The grid order.
    pub order: usize,
    /// The number of squares (the third one witnesses orthogonality).
    pub n_squares: usize,
    /// Whether the template cell domains are enforced.
    pub template_clauses: bool,
    /// The number of symbols of the relational range.
    pub relational_symbols: usize,
}

impl SquareEncodingOptions {
    /// Builds the historical defaults for the given order: three squares
    /// and a four-symbol relational range.
    pub fn new(order: usize) -> Self {
        Self {
            order,
            n_squares: 3,
            template_clauses: true,
            relational_symbols: 4,
        }
    }
}

/// The encoder turning a template into the CNF constraints of a
/// square-system refinement.
///
/// Each layer of a [`SymbolIndexer`] domain holds one square. The template
/// layers (when enforced) pin the symbol ranges of the first squares'
/// cells; each square carries the Latin constraints along its three
/// directions; the third square witnesses the orthogonality of the first
/// two through triple implications.
pub struct SquareConstraintsEncoder<'a> {
    template: Option<&'a Template>,
    options: SquareEncodingOptions,
}

impl<'a> SquareConstraintsEncoder<'a> {
    /// Builds an encoder, over a template or from scratch.
    pub fn new(template: Option<&'a Template>, options: SquareEncodingOptions) -> Self {
        if let Some(t) = template {
            assert!(
                t.order() == options.order,
                "the template order ({}) does not match the grid order ({})",
                t.order(),
                options.order
            );
            assert!(
                t.n_layers() <= options.n_squares,
                "the template holds more layers ({}) than there are squares ({})",
                t.n_layers(),
                options.n_squares
            );
        }
        Self { template, options }
    }

    /// Encodes the refinement constraints, returning the symbol mapping for
    /// later decoding.
    pub fn encode(
        &self,
        sink: &mut dyn ClauseSink,
        allocator: &mut VariableAllocator,
    ) -> Result<SquareVariables> {
        let order = self.options.order;
        let indexer = SymbolIndexer::new(self.options.n_squares, order);
        allocator.reserve(indexer.n_vars());
        if self.options.template_clauses {
            if let Some(template) = self.template {
                self.encode_template_domains(sink, &indexer, template)?;
            }
        }
        self.encode_latin_constraints(sink, &indexer)?;
        if self.options.n_squares >= 3 {
            self.encode_orthogonality(sink, &indexer)?;
        }
        Ok(SquareVariables { indexer })
    }

    /// Pins each templated cell to exactly one symbol of its range: the
    /// relational range for relational cells, its complement otherwise.
    fn encode_template_domains(
        &self,
        sink: &mut dyn ClauseSink,
        indexer: &SymbolIndexer,
        template: &Template,
    ) -> Result<()> {
        let order = self.options.order;
        let split = self.options.relational_symbols;
        info!(
            "pinning cell domains from {} template layer(s) (relational range: {} symbols)",
            template.n_layers(),
            split
        );
        for layer in 0..template.n_layers() {
            for row in 0..order {
                for col in 0..order {
                    let relational = template.bit(layer, row, col) == 1;
                    let (allowed, forbidden) = if relational {
                        ((0..split), (split..order))
                    } else {
                        ((split..order), (0..split))
                    };
                    for s in forbidden {
                        sink.add_clause(vec![indexer
                            .variable_at(layer, row, col, s)
                            .negative_lit()])?;
                    }
                    let allowed = allowed.collect::<Vec<_>>();
                    for (i, &s) in allowed.iter().enumerate() {
                        for &t in &allowed[i + 1..] {
                            sink.add_clause(vec![
                                indexer.variable_at(layer, row, col, s).negative_lit(),
                                indexer.variable_at(layer, row, col, t).negative_lit(),
                            ])?;
                        }
                    }
                    sink.add_clause(
                        allowed
                            .iter()
                            .map(|&s| indexer.variable_at(layer, row, col, s).lit())
                            .collect(),
                    )?;
                }
            }
        }
        Ok(())
    }

    /// Enforces the Latin property of every square: along cells (one symbol
    /// per cell), rows and columns (each symbol once), through at-least-one
    /// clauses and pairwise exclusions.
    fn encode_latin_constraints(
        &self,
        sink: &mut dyn ClauseSink,
        indexer: &SymbolIndexer,
    ) -> Result<()> {
        let order = self.options.order;
        info!(
            "enforcing the Latin property over {} square(s) of order {}",
            self.options.n_squares, order
        );
        for l in 0..self.options.n_squares {
            for x in 0..order {
                for y in 0..order {
                    let mut cell_clause = Vec::with_capacity(order);
                    let mut row_clause = Vec::with_capacity(order);
                    let mut col_clause = Vec::with_capacity(order);
                    for z in 0..order {
                        cell_clause.push(indexer.variable_at(l, x, y, z).lit());
                        row_clause.push(indexer.variable_at(l, x, z, y).lit());
                        col_clause.push(indexer.variable_at(l, z, x, y).lit());
                        for w in z + 1..order {
                            sink.add_clause(vec![
                                indexer.variable_at(l, x, y, z).negative_lit(),
                                indexer.variable_at(l, x, y, w).negative_lit(),
                            ])?;
                            sink.add_clause(vec![
                                indexer.variable_at(l, x, z, y).negative_lit(),
                                indexer.variable_at(l, x, w, y).negative_lit(),
                            ])?;
                            sink.add_clause(vec![
                                indexer.variable_at(l, z, x, y).negative_lit(),
                                indexer.variable_at(l, w, x, y).negative_lit(),
                            ])?;
                        }
                    }
                    sink.add_clause(cell_clause)?;
                    sink.add_clause(row_clause)?;
                    sink.add_clause(col_clause)?;
                }
            }
        }
        Ok(())
    }

    /// Ties the third square to the first two: its cell (i, j) holds i'
    /// exactly when the first square's row i' matches the second square's
    /// cell (i, j) on the shared symbol.
    fn encode_orthogonality(
        &self,
        sink: &mut dyn ClauseSink,
        indexer: &SymbolIndexer,
    ) -> Result<()> {
        let order = self.options.order;
        info!("enforcing orthogonality through the witness square");
        for i in 0..order {
            for i_prime in 0..order {
                for j in 0..order {
                    for k in 0..order {
                        let p = indexer.variable_at(0, i_prime, j, k).lit();
                        let q = indexer.variable_at(1, i, j, k).lit();
                        let z = indexer.variable_at(2, i, j, i_prime).lit();
                        add_implication(sink, &[z, p], &[q])?;
                        add_implication(sink, &[z, q], &[p])?;
                        add_implication(sink, &[p, q], &[z])?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// The symbol mapping of an encoded refinement, used to decode models.
pub struct SquareVariables {
    indexer: SymbolIndexer,
}

impl SquareVariables {
    /// Returns the underlying symbol mapping.
    pub fn indexer(&self) -> &SymbolIndexer {
        &self.indexer
    }

    /// Translates a model back into the square system it describes.
    ///
    /// Positive grid variables set their cell's symbol; variables beyond
    /// the grid block are auxiliary and ignored.
    pub fn decode(&self, assignment: &Assignment) -> SquareSystem {
        let mut system = SquareSystem::new(self.indexer.n_layers(), self.indexer.order());
        for (id, value) in assignment.iter() {
            if value == Some(true) && id <= self.indexer.n_vars() {
                let (layer, row, col, symbol) = self.indexer.position_of(id.into());
                system.set(layer, row, col, symbol);
            }
        }
        system
    }
}

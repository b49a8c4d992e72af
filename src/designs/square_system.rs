use std::fmt::Display;

/// A defect found while validating a decoded square system.
///
/// Such a defect on a solver-reported satisfiable instance reveals an
/// encoding bug; it is reported distinctly from an unsatisfiable verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SquareSystemDefect {
    /// A cell the model assigned no symbol to.
    UnassignedCell {
        /// The square the cell belongs to.
        square: usize,
        /// The cell row.
        row: usize,
        /// The cell column.
        col: usize,
    },
    /// A symbol appearing more than once in a row.
    RowDuplicate {
        /// The square the row belongs to.
        square: usize,
        /// The row holding the duplicate.
        row: usize,
        /// The duplicated symbol.
        symbol: usize,
    },
    /// A symbol appearing more than once in a column.
    ColumnDuplicate {
        /// The square the column belongs to.
        square: usize,
        /// The column holding the duplicate.
        col: usize,
        /// The duplicated symbol.
        symbol: usize,
    },
    /// A symbol pair appearing at two cells of the designated square pair.
    DuplicateSymbolPair {
        /// The first cell involved.
        first: (usize, usize),
        /// The second cell involved.
        second: (usize, usize),
    },
}

impl Display for SquareSystemDefect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SquareSystemDefect::UnassignedCell { square, row, col } => {
                write!(f, "cell ({}, {}) of square {} has no symbol", row, col, square)
            }
            SquareSystemDefect::RowDuplicate { square, row, symbol } => write!(
                f,
                "symbol {} appears more than once in row {} of square {}",
                symbol, row, square
            ),
            SquareSystemDefect::ColumnDuplicate { square, col, symbol } => write!(
                f,
                "symbol {} appears more than once in column {} of square {}",
                symbol, col, square
            ),
            SquareSystemDefect::DuplicateSymbolPair { first, second } => write!(
                f,
                "cells ({}, {}) and ({}, {}) hold the same symbol pair",
                first.0, first.1, second.0, second.1
            ),
        }
    }
}

/// A stack of symbol grids decoded from a solver model.
///
/// Cells are optional since a model may leave grid variables unassigned;
/// validation treats a missing symbol as a defect.
pub struct SquareSystem {
    order: usize,
    squares: Vec<Vec<Vec<Option<usize>>>>,
}

impl SquareSystem {
    /// Builds a system of `n_squares` empty squares of the given order.
    pub fn new(n_squares: usize, order: usize) -> Self {
        Self {
            order,
            squares: vec![vec![vec![None; order]; order]; n_squares],
        }
    }

    /// Sets the symbol held by a cell.
    ///
    /// # Panics
    ///
    /// Panics if any coordinate or the symbol is out of range.
    pub fn set(&mut self, square: usize, row: usize, col: usize, symbol: usize) {
        assert!(
            square < self.squares.len() && row < self.order && col < self.order && symbol < self.order,
            "cell ({}, {}, {}) or symbol {} is out of range",
            square,
            row,
            col,
            symbol
        );
        self.squares[square][row][col] = Some(symbol);
    }

    /// Returns the symbol held by a cell, if any.
    pub fn symbol(&self, square: usize, row: usize, col: usize) -> Option<usize> {
        self.squares[square][row][col]
    }

    /// Returns the number of squares.
    pub fn n_squares(&self) -> usize {
        self.squares.len()
    }

    /// Returns the order of the squares.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Checks the Latin property of every square, then the orthogonality of
    /// the designated square pair, if any.
    ///
    /// The checks are independent of the solver: they re-derive the design
    /// invariants from the decoded grids alone.
    pub fn validate(
        &self,
        orthogonal_pair: Option<(usize, usize)>,
    ) -> Result<(), SquareSystemDefect> {
        for square in 0..self.squares.len() {
            self.validate_latin(square)?;
        }
        match orthogonal_pair {
            Some((first, second)) => self.validate_orthogonal(first, second),
            None => Ok(()),
        }
    }

    fn validate_latin(&self, square: usize) -> Result<(), SquareSystemDefect> {
        for row in 0..self.order {
            let mut seen = vec![false; self.order];
            for col in 0..self.order {
                match self.squares[square][row][col] {
                    None => return Err(SquareSystemDefect::UnassignedCell { square, row, col }),
                    Some(symbol) => {
                        if seen[symbol] {
                            return Err(SquareSystemDefect::RowDuplicate { square, row, symbol });
                        }
                        seen[symbol] = true;
                    }
                }
            }
        }
        for col in 0..self.order {
            let mut seen = vec![false; self.order];
            for row in 0..self.order {
                if let Some(symbol) = self.squares[square][row][col] {
                    if seen[symbol] {
                        return Err(SquareSystemDefect::ColumnDuplicate { square, col, symbol });
                    }
                    seen[symbol] = true;
                }
            }
        }
        Ok(())
    }

    fn validate_orthogonal(&self, first: usize, second: usize) -> Result<(), SquareSystemDefect> {
        let mut seen: Vec<Option<(usize, usize)>> = vec![None; self.order * self.order];
        for row in 0..self.order {
            for col in 0..self.order {
                let (s1, s2) = match (
                    self.squares[first][row][col],
                    self.squares[second][row][col],
                ) {
                    (Some(s1), Some(s2)) => (s1, s2),
                    _ => {
                        return Err(SquareSystemDefect::UnassignedCell {
                            square: first,
                            row,
                            col,
                        })
                    }
                };
                let pair = s1 * self.order + s2;
                match seen[pair] {
                    Some(other) => {
                        return Err(SquareSystemDefect::DuplicateSymbolPair {
                            first: other,
                            second: (row, col),
                        })
                    }
                    None => seen[pair] = Some((row, col)),
                }
            }
        }
        Ok(())
    }
}

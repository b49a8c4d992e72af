use super::Literal;
use anyhow::Result;

/// A trait for objects accumulating the clauses of a CNF instance.
///
/// Sinks refuse zero-length clauses: such a clause is an unconditional
/// contradiction and must never reach an instance. The refusal is silent
/// (the function returns `Ok(false)`), as callers rely on it to skip no-op
/// constraint branches.
pub trait ClauseSink {
    /// Adds a clause to the instance under construction.
    ///
    /// Returns `Ok(true)` if the clause was added, `Ok(false)` if it was
    /// empty, and an error if the underlying storage failed.
    fn add_clause(&mut self, clause: Vec<Literal>) -> Result<bool>;
}

/// An in-memory CNF instance.
///
/// This sink keeps its clauses as typed literal sequences, making it suited
/// to small instances and to the semantic verification of encodings: it can
/// evaluate itself under a full assignment, decide satisfiability under a
/// partial one, and count the models of a variable prefix.
#[derive(Default)]
pub struct CnfBuffer {
    clauses: Vec<Vec<Literal>>,
    n_vars: usize,
}

impl CnfBuffer {
    /// Builds a new, empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the clauses added so far.
    pub fn clauses(&self) -> &[Vec<Literal>] {
        &self.clauses
    }

    /// Returns the number of clauses added so far.
    pub fn n_clauses(&self) -> usize {
        self.clauses.len()
    }

    /// Returns the highest variable id involved in the instance.
    pub fn n_vars(&self) -> usize {
        self.n_vars
    }

    /// Declares variables up to the given id, even if no clause involves them.
    pub fn reserve(&mut self, new_max_id: usize) {
        self.n_vars = usize::max(self.n_vars, new_max_id);
    }

    /// Evaluates the instance under a full assignment.
    ///
    /// `values[i]` gives the value of the variable of id `i + 1`.
    ///
    /// # Panics
    ///
    /// Panics if the assignment involves fewer variables than the instance.
    pub fn satisfied_by(&self, values: &[bool]) -> bool {
        assert!(
            values.len() >= self.n_vars,
            "assignment covers {} variables but the instance involves {}",
            values.len(),
            self.n_vars
        );
        self.clauses
            .iter()
            .all(|cl| cl.iter().any(|l| values[usize::from(l.var()) - 1] == l.polarity()))
    }

    /// Checks whether the instance admits a model extending the given
    /// partial assignment.
    pub fn is_satisfiable_with(&self, fixed: &[(usize, bool)]) -> bool {
        let mut assignment = vec![None; self.n_vars];
        for (v, b) in fixed {
            assignment[*v - 1] = Some(*b);
        }
        self.search(&mut assignment)
    }

    /// Counts the assignments of the variables `1..=n_prefix` that extend to
    /// a model of the instance.
    pub fn count_models_over(&self, n_prefix: usize) -> usize {
        let mut n_models = 0;
        for mask in 0u64..(1 << n_prefix) {
            let fixed = (0..n_prefix)
                .map(|i| (i + 1, mask & (1 << i) != 0))
                .collect::<Vec<_>>();
            if self.is_satisfiable_with(&fixed) {
                n_models += 1;
            }
        }
        n_models
    }

    fn search(&self, assignment: &mut Vec<Option<bool>>) -> bool {
        loop {
            let mut changed = false;
            for cl in &self.clauses {
                let mut satisfied = false;
                let mut unassigned = None;
                let mut n_unassigned = 0;
                for l in cl {
                    match assignment[usize::from(l.var()) - 1] {
                        Some(v) if v == l.polarity() => {
                            satisfied = true;
                            break;
                        }
                        Some(_) => {}
                        None => {
                            n_unassigned += 1;
                            unassigned = Some(*l);
                        }
                    }
                }
                if satisfied {
                    continue;
                }
                match n_unassigned {
                    0 => return false,
                    1 => {
                        let l = unassigned.unwrap();
                        assignment[usize::from(l.var()) - 1] = Some(l.polarity());
                        changed = true;
                    }
                    _ => {}
                }
            }
            if !changed {
                break;
            }
        }
        match assignment.iter().position(|v| v.is_none()) {
            None => true,
            Some(i) => [true, false].into_iter().any(|value| {
                let mut extended = assignment.clone();
                extended[i] = Some(value);
                self.search(&mut extended)
            }),
        }
    }
}

impl ClauseSink for CnfBuffer {
    fn add_clause(&mut self, clause: Vec<Literal>) -> Result<bool> {
        if clause.is_empty() {
            return Ok(false);
        }
        clause
            .iter()
            .for_each(|l| self.n_vars = usize::max(self.n_vars, usize::from(l.var())));
        self.clauses.push(clause);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause;

    #[test]
    fn test_empty_clause_is_refused() {
        let mut buffer = CnfBuffer::new();
        assert!(!buffer.add_clause(clause![]).unwrap());
        assert_eq!(0, buffer.n_clauses());
    }

    #[test]
    fn test_n_vars_follows_literals() {
        let mut buffer = CnfBuffer::new();
        buffer.add_clause(clause![1, -3]).unwrap();
        assert_eq!(3, buffer.n_vars());
        buffer.reserve(5);
        assert_eq!(5, buffer.n_vars());
    }

    #[test]
    fn test_satisfied_by() {
        let mut buffer = CnfBuffer::new();
        buffer.add_clause(clause![1, 2]).unwrap();
        buffer.add_clause(clause![-1, -2]).unwrap();
        assert!(buffer.satisfied_by(&[true, false]));
        assert!(buffer.satisfied_by(&[false, true]));
        assert!(!buffer.satisfied_by(&[true, true]));
        assert!(!buffer.satisfied_by(&[false, false]));
    }

    #[test]
    fn test_satisfiability() {
        let mut buffer = CnfBuffer::new();
        buffer.add_clause(clause![1, 2]).unwrap();
        buffer.add_clause(clause![-1, 2]).unwrap();
        assert!(buffer.is_satisfiable_with(&[]));
        assert!(buffer.is_satisfiable_with(&[(2, true)]));
        assert!(!buffer.is_satisfiable_with(&[(2, false)]));
    }

    #[test]
    fn test_count_models() {
        let mut buffer = CnfBuffer::new();
        buffer.add_clause(clause![1, 2]).unwrap();
        buffer.add_clause(clause![-1, -2]).unwrap();
        assert_eq!(2, buffer.count_models_over(2));
    }
}

use crate::sat::Variable;

/// A source of fresh boolean variables.
///
/// Identifiers are handed out in strictly increasing order starting at 1 and
/// are never reused. The allocator serves both the primary grid/selection
/// variables and the auxiliary counter variables created by the cardinality
/// encoder; callers never need to distinguish the two.
#[derive(Default)]
pub struct VariableAllocator {
    n_vars: usize,
}

impl VariableAllocator {
    /// Builds an allocator whose first fresh variable is 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a fresh variable.
    pub fn fresh(&mut self) -> Variable {
        self.n_vars += 1;
        Variable::from(self.n_vars)
    }

    /// Advances the allocator past a block of externally assigned
    /// identifiers (typically an index mapper's contiguous grid block), so
    /// that later fresh variables never collide with it.
    pub fn reserve(&mut self, max_assigned_id: usize) {
        self.n_vars = usize::max(self.n_vars, max_assigned_id);
    }

    /// Returns the number of variables allocated so far.
    pub fn n_vars(&self) -> usize {
        self.n_vars
    }
}

use super::{CandidateLine, LineKind};
use std::collections::BTreeMap;

/// A parallel class: a named collection of candidate lines competing for
/// selection, with an inverted point-to-lines index.
///
/// Lines are identified by their 0-based insertion index. The point index is
/// kept sorted so that iterating over the points of a class is
/// deterministic, which in turn makes encodings reproducible clause for
/// clause.
pub struct ParallelClass {
    name: String,
    lines: Vec<CandidateLine>,
    point_to_lines: BTreeMap<String, Vec<usize>>,
}

impl ParallelClass {
    /// Builds an empty class with the given name.
    pub fn new<S>(name: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            name: name.into(),
            lines: Vec::new(),
            point_to_lines: BTreeMap::new(),
        }
    }

    /// Builds a class from a set of lines.
    pub fn with_lines<S>(name: S, lines: Vec<CandidateLine>) -> Self
    where
        S: Into<String>,
    {
        let mut class = Self::new(name);
        lines.into_iter().for_each(|l| class.add_line(l));
        class
    }

    /// Adds a line to the class, indexing its points.
    pub fn add_line(&mut self, line: CandidateLine) {
        let id = self.lines.len();
        for p in line.points() {
            self.point_to_lines
                .entry(p.to_string())
                .or_default()
                .push(id);
        }
        self.lines.push(line);
    }

    /// Returns the name of the class.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of lines of the class.
    pub fn n_lines(&self) -> usize {
        self.lines.len()
    }

    /// Returns the lines of the class.
    pub fn lines(&self) -> &[CandidateLine] {
        &self.lines
    }

    /// Returns a line given its index.
    pub fn line(&self, id: usize) -> &CandidateLine {
        &self.lines[id]
    }

    /// Returns the number of lines of the given kind.
    pub fn n_lines_of_kind(&self, kind: LineKind) -> usize {
        self.lines.iter().filter(|l| l.kind() == kind).count()
    }

    /// Iterates over the points covered by at least one line of the class,
    /// in lexicographic order.
    pub fn points(&self) -> impl Iterator<Item = &str> {
        self.point_to_lines.keys().map(String::as_str)
    }

    /// Returns the indices of the lines containing a point.
    pub fn lines_through(&self, point: &str) -> &[usize] {
        self.point_to_lines
            .get(point)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// The pairwise intersection sizes between the lines of two classes.
///
/// Sizes are computed once at construction; pairwise loops over thousands of
/// candidate lines make any per-query recomputation the dominant cost of an
/// encoding run.
pub struct IntersectionTable {
    n_cols: usize,
    sizes: Vec<u32>,
}

impl IntersectionTable {
    /// Computes the table between two classes (which may be the same one).
    pub fn between(rows: &ParallelClass, cols: &ParallelClass) -> Self {
        let n_cols = cols.n_lines();
        let mut sizes = Vec::with_capacity(rows.n_lines() * n_cols);
        for row_line in rows.lines() {
            for col_line in cols.lines() {
                sizes.push(row_line.intersection_size(col_line) as u32);
            }
        }
        Self { n_cols, sizes }
    }

    /// Returns the intersection size between line `i` of the row class and
    /// line `j` of the column class.
    pub fn size(&self, i: usize, j: usize) -> usize {
        self.sizes[i * self.n_cols + j] as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_class() -> ParallelClass {
        ParallelClass::with_lines(
            "A",
            vec![
                CandidateLine::new(LineKind::Relational, ["1", "2"]),
                CandidateLine::new(LineKind::NonRelational, ["2", "3"]),
                CandidateLine::new(LineKind::NonRelational, ["4"]),
            ],
        )
    }

    #[test]
    fn test_point_index() {
        let class = sample_class();
        assert_eq!(3, class.n_lines());
        assert_eq!(&[0], class.lines_through("1"));
        assert_eq!(&[0, 1], class.lines_through("2"));
        assert_eq!(&[2], class.lines_through("4"));
        assert!(class.lines_through("9").is_empty());
        assert_eq!(vec!["1", "2", "3", "4"], class.points().collect::<Vec<_>>());
    }

    #[test]
    fn test_kind_counts() {
        let class = sample_class();
        assert_eq!(1, class.n_lines_of_kind(LineKind::Relational));
        assert_eq!(2, class.n_lines_of_kind(LineKind::NonRelational));
    }

    #[test]
    fn test_intersection_table() {
        let class = sample_class();
        let table = IntersectionTable::between(&class, &class);
        assert_eq!(2, table.size(0, 0));
        assert_eq!(1, table.size(0, 1));
        assert_eq!(1, table.size(1, 0));
        assert_eq!(0, table.size(0, 2));
    }
}

use super::ParallelClass;
use std::fmt::Display;

/// A defect found while validating a decoded net solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetDefect {
    /// Two selected lines of the same class share at least one point.
    OverlappingLines {
        /// The class name.
        class: String,
        /// The first line index.
        first: usize,
        /// The second line index.
        second: usize,
        /// The size of their intersection.
        intersection: usize,
    },
    /// Two selected lines of different classes do not meet in exactly one
    /// point.
    IncompatibleLines {
        /// The line index in the first class.
        first: usize,
        /// The line index in the second class.
        second: usize,
        /// The size of their intersection.
        intersection: usize,
    },
    /// A point no selected line of a class covers.
    UncoveredPoint {
        /// The class name.
        class: String,
        /// The uncovered point.
        point: String,
    },
}

impl Display for NetDefect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetDefect::OverlappingLines {
                class,
                first,
                second,
                intersection,
            } => write!(
                f,
                "lines {} and {} of class {} share {} point(s)",
                first, second, class, intersection
            ),
            NetDefect::IncompatibleLines {
                first,
                second,
                intersection,
            } => write!(
                f,
                "cross-class lines {} and {} meet in {} point(s) instead of one",
                first, second, intersection
            ),
            NetDefect::UncoveredPoint { class, point } => {
                write!(f, "point {} is covered by no selected line of class {}", point, class)
            }
        }
    }
}

/// The line selection decoded from a net search model: per class, the
/// indices of the selected candidate lines.
pub struct NetSolution {
    selected: Vec<Vec<usize>>,
}

impl NetSolution {
    /// Builds a solution from the selected line indices of each class.
    pub fn new(selected: Vec<Vec<usize>>) -> Self {
        Self { selected }
    }

    /// Returns the selected line indices of a class.
    pub fn selected(&self, class: usize) -> &[usize] {
        &self.selected[class]
    }

    /// Returns the total number of selected lines.
    pub fn n_selected(&self) -> usize {
        self.selected.iter().map(Vec::len).sum()
    }

    /// Checks the net invariants over the selected lines, independently of
    /// the solver: pairwise disjointness within each class, single-point
    /// intersection across the two classes, and point coverage per class.
    pub fn validate(&self, classes: [&ParallelClass; 2]) -> Result<(), NetDefect> {
        for (c, class) in classes.iter().enumerate() {
            let selected = &self.selected[c];
            for (i, &first) in selected.iter().enumerate() {
                for &second in &selected[i + 1..] {
                    let intersection = class.line(first).intersection_size(class.line(second));
                    if intersection > 0 {
                        return Err(NetDefect::OverlappingLines {
                            class: class.name().to_string(),
                            first,
                            second,
                            intersection,
                        });
                    }
                }
            }
        }
        for &first in &self.selected[0] {
            for &second in &self.selected[1] {
                let intersection = classes[0]
                    .line(first)
                    .intersection_size(classes[1].line(second));
                if intersection != 1 {
                    return Err(NetDefect::IncompatibleLines {
                        first,
                        second,
                        intersection,
                    });
                }
            }
        }
        for (c, class) in classes.iter().enumerate() {
            for point in classes[0].points().chain(classes[1].points()) {
                if !self.selected[c]
                    .iter()
                    .any(|&id| class.line(id).contains(point))
                {
                    return Err(NetDefect::UncoveredPoint {
                        class: class.name().to_string(),
                        point: point.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::designs::{CandidateLine, LineKind};

    fn class(name: &str, lines: &[&[&str]]) -> ParallelClass {
        ParallelClass::with_lines(
            name,
            lines
                .iter()
                .map(|points| CandidateLine::new(LineKind::Relational, points.iter().copied()))
                .collect(),
        )
    }

    #[test]
    fn test_valid_net() {
        let a = class("A", &[&["1", "2"], &["3", "4"]]);
        let b = class("B", &[&["1", "3"], &["2", "4"]]);
        let solution = NetSolution::new(vec![vec![0, 1], vec![0, 1]]);
        assert_eq!(Ok(()), solution.validate([&a, &b]));
        assert_eq!(4, solution.n_selected());
    }

    #[test]
    fn test_overlapping_lines_are_flagged() {
        let a = class("A", &[&["1", "2"], &["2", "3"]]);
        let b = class("B", &[&["1", "3"]]);
        let solution = NetSolution::new(vec![vec![0, 1], vec![0]]);
        assert!(matches!(
            solution.validate([&a, &b]),
            Err(NetDefect::OverlappingLines { intersection: 1, .. })
        ));
    }

    #[test]
    fn test_incompatible_cross_lines_are_flagged() {
        let a = class("A", &[&["1", "2"]]);
        let b = class("B", &[&["1", "2"]]);
        let solution = NetSolution::new(vec![vec![0], vec![0]]);
        assert!(matches!(
            solution.validate([&a, &b]),
            Err(NetDefect::IncompatibleLines { intersection: 2, .. })
        ));
    }

    #[test]
    fn test_uncovered_point_is_flagged() {
        let a = class("A", &[&["1", "2"], &["3"]]);
        let b = class("B", &[&["1", "3"]]);
        let solution = NetSolution::new(vec![vec![0], vec![0]]);
        assert!(matches!(
            solution.validate([&a, &b]),
            Err(NetDefect::UncoveredPoint { .. })
        ));
    }
}

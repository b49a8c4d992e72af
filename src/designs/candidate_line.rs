use std::collections::BTreeSet;
use strum_macros::{AsRefStr, EnumString};

/// The two kinds of candidate lines.
///
/// Relational lines cross the symbol cells selected by a template relation;
/// non-relational lines avoid them. The kind drives both the template gating
/// during line generation and the per-kind size cardinalities of a net
/// search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum LineKind {
    /// A line built over the relational cells of a template.
    Relational,
    /// A line built over the non-relational cells of a template.
    NonRelational,
}

impl LineKind {
    /// Returns the single-character tag used by candidate-line files.
    pub fn tag(&self) -> char {
        match self {
            LineKind::Relational => 'R',
            LineKind::NonRelational => 'N',
        }
    }

    /// Returns the kind associated with a candidate-line file tag.
    pub fn from_tag(tag: char) -> Option<Self> {
        match tag {
            'R' => Some(LineKind::Relational),
            'N' => Some(LineKind::NonRelational),
            _ => None,
        }
    }
}

/// A candidate line: an unordered set of point identifiers, tagged by kind.
///
/// Candidate lines are proposed subsets of points satisfying local design
/// constraints; a search selects some of them to form parallel classes. Two
/// lines are *compatible* (orthogonal) if their point sets intersect in
/// exactly one point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateLine {
    kind: LineKind,
    points: BTreeSet<String>,
}

impl CandidateLine {
    /// Builds a candidate line from its kind and points.
    ///
    /// Duplicate points are collapsed (the point set is unordered).
    pub fn new<I, S>(kind: LineKind, points: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind,
            points: points.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the kind of the line.
    pub fn kind(&self) -> LineKind {
        self.kind
    }

    /// Returns the points of the line.
    pub fn points(&self) -> impl Iterator<Item = &str> {
        self.points.iter().map(String::as_str)
    }

    /// Returns the number of points of the line.
    pub fn n_points(&self) -> usize {
        self.points.len()
    }

    /// Checks whether the line contains a point.
    pub fn contains(&self, point: &str) -> bool {
        self.points.contains(point)
    }

    /// Returns the size of the intersection of the point sets of two lines.
    pub fn intersection_size(&self, other: &CandidateLine) -> usize {
        self.points.intersection(&other.points).count()
    }
}

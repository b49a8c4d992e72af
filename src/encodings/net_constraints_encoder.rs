use super::{add_at_least_at_most, add_exactly, add_implication, VariableAllocator};
use crate::designs::{IntersectionTable, LineKind, NetSolution, ParallelClass};
use crate::sat::{Assignment, ClauseSink, Variable};
use anyhow::Result;
use log::{debug, info};
use std::collections::BTreeSet;
use strum_macros::{AsRefStr, EnumString};

/// The point-coverage policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum CoverageMode {
    /// Every point is covered by at least one selected line per class.
    AtLeastOne,
    /// Every point is covered by exactly one selected line per class (the
    /// exact-partition mode, through the cardinality encoder).
    ExactlyOne,
}

/// The two equivalent renderings of a "never select both" constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum PairwiseStyle {
    /// A single clause negating both selection variables.
    ForbidClause,
    /// Two mutual implications, each selection forbidding the other.
    MutualImplications,
}

/// The selected-line count constraints of one parallel class.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassSizes {
    /// The exact number of relational lines to select, if constrained.
    pub relational: Option<usize>,
    /// The exact number of non-relational lines to select, if constrained.
    pub non_relational: Option<usize>,
}

impl ClassSizes {
    fn of_kind(&self, kind: LineKind) -> Option<usize> {
        match kind {
            LineKind::Relational => self.relational,
            LineKind::NonRelational => self.non_relational,
        }
    }
}

/// The configuration of a net encoding run.
///
/// Every constraint family can be disabled; the defaults match the
/// historical searches (at-least-one coverage, mutual implications, all
/// families but the size cardinalities).
pub struct NetEncodingOptions {
    /// The coverage policy, or [`Option::None`] to skip the family.
    pub coverage: Option<CoverageMode>,
    /// The rendering used for pairwise forbidding constraints.
    pub pairwise_style: PairwiseStyle,
    /// Whether within-class disjointness is enforced.
    pub disjointness: bool,
    /// Whether cross-class orthogonality (and orphan removal) is enforced.
    pub orthogonality: bool,
    /// The per-class selected-line counts.
    pub class_sizes: [ClassSizes; 2],
}

impl Default for NetEncodingOptions {
    fn default() -> Self {
        Self {
            coverage: Some(CoverageMode::AtLeastOne),
            pairwise_style: PairwiseStyle::MutualImplications,
            disjointness: true,
            orthogonality: true,
            class_sizes: [ClassSizes::default(); 2],
        }
    }
}

/// The encoder turning two parallel classes of candidate lines into the CNF
/// constraints of a net search.
///
/// One selection variable is allocated per line, first class first, so the
/// selection block is contiguous from 1 on a fresh allocator. The constraint
/// families are emitted in a fixed order (coverage, disjointness,
/// orthogonality, size cardinalities), making the encoding reproducible
/// clause for clause.
pub struct NetConstraintsEncoder<'a> {
    classes: [&'a ParallelClass; 2],
    options: NetEncodingOptions,
}

impl<'a> NetConstraintsEncoder<'a> {
    /// Builds an encoder over two parallel classes.
    pub fn new(
        first: &'a ParallelClass,
        second: &'a ParallelClass,
        options: NetEncodingOptions,
    ) -> Self {
        Self {
            classes: [first, second],
            options,
        }
    }

    /// Encodes the configured constraint families, returning the selection
    /// variables for later decoding.
    pub fn encode(
        &self,
        sink: &mut dyn ClauseSink,
        allocator: &mut VariableAllocator,
    ) -> Result<NetVariables> {
        let selection: [Vec<Variable>; 2] = [
            (0..self.classes[0].n_lines())
                .map(|_| allocator.fresh())
                .collect(),
            (0..self.classes[1].n_lines())
                .map(|_| allocator.fresh())
                .collect(),
        ];
        info!(
            "assigned selection variables to {} + {} candidate lines",
            selection[0].len(),
            selection[1].len()
        );
        if let Some(mode) = self.options.coverage {
            self.encode_coverage(sink, allocator, &selection, mode)?;
        }
        if self.options.disjointness {
            self.encode_disjointness(sink, &selection)?;
        }
        if self.options.orthogonality {
            self.encode_orthogonality(sink, &selection)?;
        }
        self.encode_class_sizes(sink, allocator, &selection)?;
        Ok(NetVariables { selection })
    }

    fn encode_coverage(
        &self,
        sink: &mut dyn ClauseSink,
        allocator: &mut VariableAllocator,
        selection: &[Vec<Variable>; 2],
        mode: CoverageMode,
    ) -> Result<()> {
        info!("enforcing {} point coverage for each class", mode.as_ref());
        let points = self.classes[0]
            .points()
            .chain(self.classes[1].points())
            .collect::<BTreeSet<_>>();
        for point in points {
            for (c, class) in self.classes.iter().enumerate() {
                let support = class
                    .lines_through(point)
                    .iter()
                    .map(|&id| selection[c][id])
                    .collect::<Vec<_>>();
                match mode {
                    CoverageMode::AtLeastOne if !support.is_empty() => {
                        sink.add_clause(support.iter().map(|v| v.lit()).collect())?;
                    }
                    // an unsupported point admits no cover; the degenerate
                    // counter makes the instance unsatisfiable
                    CoverageMode::AtLeastOne => {
                        add_at_least_at_most(sink, allocator, &support, 1, 1)?;
                    }
                    CoverageMode::ExactlyOne => {
                        add_exactly(sink, allocator, &support, 1)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn encode_disjointness(
        &self,
        sink: &mut dyn ClauseSink,
        selection: &[Vec<Variable>; 2],
    ) -> Result<()> {
        for (c, class) in self.classes.iter().enumerate() {
            info!(
                "forbidding intersecting line pairs within class {}",
                class.name()
            );
            let table = IntersectionTable::between(class, class);
            for i in 0..class.n_lines() {
                for j in i + 1..class.n_lines() {
                    if table.size(i, j) > 0 {
                        self.forbid_pair(sink, selection[c][i], selection[c][j])?;
                    }
                }
                if i % 100 == 0 {
                    debug!("class {}: {}/{} lines", class.name(), i, class.n_lines());
                }
            }
        }
        Ok(())
    }

    fn encode_orthogonality(
        &self,
        sink: &mut dyn ClauseSink,
        selection: &[Vec<Variable>; 2],
    ) -> Result<()> {
        info!("enforcing single-point intersections across classes");
        let table = IntersectionTable::between(self.classes[0], self.classes[1]);
        let mut has_partner = [
            vec![false; self.classes[0].n_lines()],
            vec![false; self.classes[1].n_lines()],
        ];
        for i in 0..self.classes[0].n_lines() {
            for j in 0..self.classes[1].n_lines() {
                if table.size(i, j) == 1 {
                    has_partner[0][i] = true;
                    has_partner[1][j] = true;
                } else {
                    self.forbid_pair(sink, selection[0][i], selection[1][j])?;
                }
            }
            if i % 100 == 0 {
                debug!("cross pairs: {}/{} lines", i, self.classes[0].n_lines());
            }
        }
        info!("removing orphan lines");
        for (c, class_partners) in has_partner.iter().enumerate() {
            for (id, partnered) in class_partners.iter().enumerate() {
                if !partnered {
                    sink.add_clause(vec![selection[c][id].negative_lit()])?;
                }
            }
        }
        Ok(())
    }

    fn encode_class_sizes(
        &self,
        sink: &mut dyn ClauseSink,
        allocator: &mut VariableAllocator,
        selection: &[Vec<Variable>; 2],
    ) -> Result<()> {
        for (c, class) in self.classes.iter().enumerate() {
            for kind in [LineKind::Relational, LineKind::NonRelational] {
                if let Some(count) = self.options.class_sizes[c].of_kind(kind) {
                    info!(
                        "enforcing exactly {} {} line(s) in class {}",
                        count,
                        kind.as_ref(),
                        class.name()
                    );
                    let variables = class
                        .lines()
                        .iter()
                        .enumerate()
                        .filter(|(_, l)| l.kind() == kind)
                        .map(|(id, _)| selection[c][id])
                        .collect::<Vec<_>>();
                    add_exactly(sink, allocator, &variables, count)?;
                }
            }
        }
        Ok(())
    }

    fn forbid_pair(&self, sink: &mut dyn ClauseSink, a: Variable, b: Variable) -> Result<()> {
        match self.options.pairwise_style {
            PairwiseStyle::ForbidClause => {
                sink.add_clause(vec![a.negative_lit(), b.negative_lit()])?;
            }
            PairwiseStyle::MutualImplications => {
                add_implication(sink, &[a.lit()], &[b.negative_lit()])?;
                add_implication(sink, &[b.lit()], &[a.negative_lit()])?;
            }
        }
        Ok(())
    }
}

/// The selection variables of an encoded net search, used to decode models.
pub struct NetVariables {
    selection: [Vec<Variable>; 2],
}

impl NetVariables {
    /// Returns the selection variables of a class.
    pub fn class_variables(&self, class: usize) -> &[Variable] {
        &self.selection[class]
    }

    /// Translates a model back into the selected line indices per class.
    pub fn decode(&self, assignment: &Assignment) -> NetSolution {
        let selected = self
            .selection
            .iter()
            .map(|class_vars| {
                class_vars
                    .iter()
                    .enumerate()
                    .filter(|(_, v)| assignment.value_of(**v) == Some(true))
                    .map(|(id, _)| id)
                    .collect()
            })
            .collect();
        NetSolution::new(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::designs::CandidateLine;
    use crate::sat::{Assignment, CnfBuffer};

    fn class(name: &str, lines: &[&[&str]]) -> ParallelClass {
        ParallelClass::with_lines(
            name,
            lines
                .iter()
                .map(|points| CandidateLine::new(LineKind::Relational, points.iter().copied()))
                .collect(),
        )
    }

    fn encode_into_buffer(
        first: &ParallelClass,
        second: &ParallelClass,
        options: NetEncodingOptions,
    ) -> (CnfBuffer, NetVariables) {
        let mut buffer = CnfBuffer::new();
        let mut allocator = VariableAllocator::new();
        let encoder = NetConstraintsEncoder::new(first, second, options);
        let variables = encoder.encode(&mut buffer, &mut allocator).unwrap();
        buffer.reserve(allocator.n_vars());
        (buffer, variables)
    }

    #[test]
    fn test_intersecting_lines_of_a_class_are_never_both_selected() {
        let a = class("A", &[&["1", "2"], &["2", "3"]]);
        let b = class("B", &[&["1", "3"]]);
        let options = NetEncodingOptions {
            coverage: None,
            ..NetEncodingOptions::default()
        };
        let (buffer, _) = encode_into_buffer(&a, &b, options);
        // selection variables 1 and 2 stand for the two lines of class A
        assert!(!buffer.is_satisfiable_with(&[(1, true), (2, true)]));
        assert!(buffer.is_satisfiable_with(&[(1, true), (2, false)]));
    }

    #[test]
    fn test_both_pairwise_styles_are_equivalent() {
        let a = class("A", &[&["1", "2"], &["2", "3"]]);
        let b = class("B", &[&["1", "3"]]);
        let buffers = [PairwiseStyle::ForbidClause, PairwiseStyle::MutualImplications].map(|style| {
            let options = NetEncodingOptions {
                coverage: None,
                pairwise_style: style,
                ..NetEncodingOptions::default()
            };
            encode_into_buffer(&a, &b, options).0
        });
        for mask in 0u32..8 {
            let fixed = (0..3)
                .map(|i| (i + 1, mask & (1 << i) != 0))
                .collect::<Vec<_>>();
            assert_eq!(
                buffers[0].is_satisfiable_with(&fixed),
                buffers[1].is_satisfiable_with(&fixed),
                "selection {:?}",
                fixed
            );
        }
    }

    #[test]
    fn test_uncovered_point_makes_the_instance_unsatisfiable() {
        let a = class("A", &[&["p"]]);
        let b = class("B", &[&["q"]]);
        let options = NetEncodingOptions {
            disjointness: false,
            orthogonality: false,
            ..NetEncodingOptions::default()
        };
        let (buffer, _) = encode_into_buffer(&a, &b, options);
        assert!(!buffer.is_satisfiable_with(&[]));
    }

    #[test]
    fn test_compatible_pair_is_a_model() {
        let a = class("A", &[&["1", "2"]]);
        let b = class("B", &[&["2", "3"]]);
        let options = NetEncodingOptions {
            // point 3 has no support in class A: restrict coverage by hand
            coverage: None,
            ..NetEncodingOptions::default()
        };
        let (buffer, _) = encode_into_buffer(&a, &b, options);
        assert!(buffer.is_satisfiable_with(&[(1, true), (2, true)]));
    }

    #[test]
    fn test_orphan_lines_are_forced_false() {
        // the second line of A meets no line of B in exactly one point
        let a = class("A", &[&["1", "2"], &["4", "5"]]);
        let b = class("B", &[&["1", "3"]]);
        let options = NetEncodingOptions {
            coverage: None,
            disjointness: false,
            ..NetEncodingOptions::default()
        };
        let (buffer, _) = encode_into_buffer(&a, &b, options);
        assert!(!buffer.is_satisfiable_with(&[(2, true)]));
        assert!(buffer.is_satisfiable_with(&[(1, true)]));
    }

    #[test]
    fn test_exactly_one_coverage_forbids_double_cover() {
        // both lines of A hold point 1; each alone covers everything it must
        let a = class("A", &[&["1"], &["1"]]);
        let b = class("B", &[&["1"]]);
        let options = NetEncodingOptions {
            coverage: Some(CoverageMode::ExactlyOne),
            disjointness: false,
            orthogonality: false,
            ..NetEncodingOptions::default()
        };
        let (buffer, _) = encode_into_buffer(&a, &b, options);
        assert!(!buffer.is_satisfiable_with(&[(1, true), (2, true)]));
        assert!(buffer.is_satisfiable_with(&[(1, true), (2, false)]));
    }

    #[test]
    fn test_class_size_cardinalities() {
        let a = class("A", &[&["1"], &["2"], &["3"]]);
        let b = class("B", &[&["1"]]);
        let options = NetEncodingOptions {
            coverage: None,
            disjointness: false,
            orthogonality: false,
            class_sizes: [
                ClassSizes {
                    relational: Some(2),
                    non_relational: None,
                },
                ClassSizes::default(),
            ],
            ..NetEncodingOptions::default()
        };
        let (buffer, _) = encode_into_buffer(&a, &b, options);
        // 3 ways of selecting exactly 2 of the 3 class-A lines, B free
        assert_eq!(6, buffer.count_models_over(4));
    }

    #[test]
    fn test_encoding_is_reproducible() {
        let a = class("A", &[&["1", "2"], &["3", "4"]]);
        let b = class("B", &[&["1", "3"], &["2", "4"]]);
        let (first, _) = encode_into_buffer(&a, &b, NetEncodingOptions::default());
        let (second, _) = encode_into_buffer(&a, &b, NetEncodingOptions::default());
        assert_eq!(first.clauses(), second.clauses());
        assert!(first.n_clauses() > 0);
    }

    #[test]
    fn test_encoding_twice_writes_byte_identical_cnf_files() {
        use crate::sat::DimacsWriter;
        use assert_fs::TempDir;
        let a = class("A", &[&["1", "2"], &["3", "4"]]);
        let b = class("B", &[&["1", "3"], &["2", "4"]]);
        let dir = TempDir::new().unwrap();
        let paths = [dir.path().join("first.cnf"), dir.path().join("second.cnf")];
        for path in &paths {
            let mut writer = DimacsWriter::with_batch_capacity(path, 4).unwrap();
            let mut allocator = VariableAllocator::new();
            NetConstraintsEncoder::new(&a, &b, NetEncodingOptions::default())
                .encode(&mut writer, &mut allocator)
                .unwrap();
            writer.finalize(allocator.n_vars()).unwrap();
        }
        assert_eq!(
            std::fs::read(&paths[0]).unwrap(),
            std::fs::read(&paths[1]).unwrap()
        );
    }

    #[test]
    fn test_decode_selects_positive_variables() {
        let a = class("A", &[&["1", "2"], &["3", "4"]]);
        let b = class("B", &[&["1", "3"]]);
        let (_, variables) = encode_into_buffer(&a, &b, NetEncodingOptions::default());
        let assignment = Assignment::new(vec![Some(true), Some(false), Some(true)]);
        let solution = variables.decode(&assignment);
        assert_eq!(&[0], solution.selected(0));
        assert_eq!(&[0], solution.selected(1));
    }
}

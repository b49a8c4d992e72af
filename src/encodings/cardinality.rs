use super::{add_implication, VariableAllocator};
use crate::sat::{ClauseSink, Variable};
use anyhow::Result;

/// Enforces that among the given variables, at least `minimum` and at most
/// `maximum` are true, through a sequential-counter encoding.
///
/// Auxiliary variables `s[i][j]` mean "at least j of the first i inputs are
/// true", for i in [0, n] and j in [0, maximum + 1]. Base clauses fix
/// `s[i][0]`, forbid `s[0][j]` for j ≥ 1, require `s[n][j]` up to the
/// minimum and forbid `s[i][maximum + 1]`; propagation clauses make the
/// counter monotone, and for j ≤ minimum the converse clauses force every
/// reached count to be witnessed by a true input. The cost is
/// O(n × maximum) auxiliary variables and clauses, the dominant driver for
/// large instances.
///
/// An empty variable set with `minimum ≥ 1` degenerates to contradictory
/// unit clauses over the auxiliary column: the instance becomes
/// unsatisfiable without any empty clause being emitted.
///
/// # Panics
///
/// Panics if `minimum > maximum`.
pub fn add_at_least_at_most(
    sink: &mut dyn ClauseSink,
    allocator: &mut VariableAllocator,
    variables: &[Variable],
    minimum: usize,
    maximum: usize,
) -> Result<()> {
    assert!(
        minimum <= maximum,
        "cardinality bounds [{}, {}] are inverted",
        minimum,
        maximum
    );
    let n = variables.len();
    let k = maximum + 1;
    let counter: Vec<Vec<Variable>> = (0..=n)
        .map(|_| (0..=k).map(|_| allocator.fresh()).collect())
        .collect();
    for row in counter.iter() {
        sink.add_clause(vec![row[0].lit()])?;
    }
    for j in 1..=k {
        sink.add_clause(vec![counter[0][j].negative_lit()])?;
    }
    for j in 1..=minimum {
        sink.add_clause(vec![counter[n][j].lit()])?;
    }
    for row in counter.iter().skip(1) {
        sink.add_clause(vec![row[k].negative_lit()])?;
    }
    for i in 1..=n {
        let x = variables[i - 1].lit();
        for j in 1..=k {
            add_implication(sink, &[counter[i - 1][j].lit()], &[counter[i][j].lit()])?;
            add_implication(
                sink,
                &[x, counter[i - 1][j - 1].lit()],
                &[counter[i][j].lit()],
            )?;
            if j <= minimum {
                add_implication(
                    sink,
                    &[counter[i][j].lit()],
                    &[counter[i - 1][j].lit(), x],
                )?;
                add_implication(sink, &[counter[i][j].lit()], &[counter[i - 1][j - 1].lit()])?;
            }
        }
    }
    Ok(())
}

/// Enforces an exact count of true variables among the given ones.
pub fn add_exactly(
    sink: &mut dyn ClauseSink,
    allocator: &mut VariableAllocator,
    variables: &[Variable],
    count: usize,
) -> Result<()> {
    add_at_least_at_most(sink, allocator, variables, count, count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::CnfBuffer;
    use paste::paste;

    fn encode(n: usize, minimum: usize, maximum: usize) -> (CnfBuffer, usize) {
        let mut buffer = CnfBuffer::new();
        let mut allocator = VariableAllocator::new();
        let variables = (0..n).map(|_| allocator.fresh()).collect::<Vec<_>>();
        add_at_least_at_most(&mut buffer, &mut allocator, &variables, minimum, maximum).unwrap();
        buffer.reserve(allocator.n_vars());
        (buffer, allocator.n_vars())
    }

    fn check_exact_semantics(n: usize, minimum: usize, maximum: usize) {
        let (buffer, _) = encode(n, minimum, maximum);
        for mask in 0u64..(1 << n) {
            let fixed = (0..n)
                .map(|i| (i + 1, mask & (1 << i) != 0))
                .collect::<Vec<_>>();
            let n_true = mask.count_ones() as usize;
            let expected = n_true >= minimum && n_true <= maximum;
            assert_eq!(
                expected,
                buffer.is_satisfiable_with(&fixed),
                "bounds [{}, {}] over {} inputs, {} true",
                minimum,
                maximum,
                n,
                n_true
            );
        }
    }

    #[test]
    fn test_exact_semantics_for_small_inputs() {
        for n in 0..=6 {
            for minimum in 0..=n {
                for maximum in minimum..=n {
                    check_exact_semantics(n, minimum, maximum);
                }
            }
        }
    }

    macro_rules! check_bounds_over_eight {
        ($($min: literal, $max: literal);+) => {
            $(
                paste! {
                    #[test]
                    fn [<test_bounds_ $min _ $max _over_eight_inputs>]() {
                        check_exact_semantics(8, $min, $max);
                    }
                }
            )+
        };
    }
    check_bounds_over_eight!(0, 8; 1, 1; 2, 5; 8, 8);

    #[test]
    fn test_canonical_counter_witness_is_a_model() {
        let n = 8;
        let (minimum, maximum) = (2, 5);
        let (buffer, n_vars) = encode(n, minimum, maximum);
        let k = maximum + 1;
        for mask in 0u64..(1 << n) {
            let n_true = mask.count_ones() as usize;
            if n_true < minimum || n_true > maximum {
                continue;
            }
            let mut values = vec![false; n_vars];
            for i in 0..n {
                values[i] = mask & (1 << i) != 0;
            }
            // s[i][j] <=> at least j of the first i inputs are true
            for i in 0..=n {
                let count = (0..i).filter(|b| mask & (1 << b) != 0).count();
                for j in 0..=k {
                    values[n + i * (k + 1) + j] = count >= j;
                }
            }
            assert!(buffer.satisfied_by(&values), "{} true inputs", n_true);
        }
    }

    #[test]
    fn test_auxiliary_variable_cost() {
        let (_, n_vars) = encode(5, 1, 2);
        assert_eq!(5 + 6 * 4, n_vars);
    }

    #[test]
    fn test_empty_input_with_positive_minimum_is_unsatisfiable() {
        let (buffer, _) = encode(0, 1, 1);
        assert!(!buffer.is_satisfiable_with(&[]));
    }

    #[test]
    fn test_empty_input_with_zero_minimum_is_satisfiable() {
        let (buffer, _) = encode(0, 0, 0);
        assert!(buffer.is_satisfiable_with(&[]));
    }

    #[test]
    #[should_panic(expected = "inverted")]
    fn test_inverted_bounds() {
        encode(2, 2, 1);
    }
}

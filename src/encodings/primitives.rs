use crate::sat::{ClauseSink, Literal};
use anyhow::Result;

/// Adds the clause encoding `(a1 ∧ … ∧ an) → (c1 ∨ … ∨ cm)`: every
/// antecedent is negated, every consequent kept as-is.
///
/// Returns `Ok(false)` without emitting anything when both sides are empty.
pub fn add_implication(
    sink: &mut dyn ClauseSink,
    antecedents: &[Literal],
    consequents: &[Literal],
) -> Result<bool> {
    let mut cl = Vec::with_capacity(antecedents.len() + consequents.len());
    cl.extend(antecedents.iter().map(|l| l.negate()));
    cl.extend_from_slice(consequents);
    sink.add_clause(cl)
}

/// Adds the clauses making the exclusive-or of a chain of literals hold:
/// the resulting sub-formula is satisfied iff an odd number of the chain's
/// literals are true.
///
/// One clause is emitted per even-size subset of chain positions, obtained
/// by flipping the signs at the subset; this forbids exactly the
/// even-parity assignments, 2^(k−1) clauses in total. Subsets are walked
/// iteratively through a bitmask counter.
///
/// # Panics
///
/// Panics on an empty chain (an always-false constraint is a programming
/// error) and on chains of 64 literals or more.
pub fn add_xor(sink: &mut dyn ClauseSink, chain: &[Literal]) -> Result<()> {
    assert!(!chain.is_empty(), "cannot build an exclusive-or over no literals");
    assert!(chain.len() < 64, "exclusive-or chains are bounded by 63 literals");
    for mask in 0u64..(1 << chain.len()) {
        if mask.count_ones() % 2 != 0 {
            continue;
        }
        let cl = chain
            .iter()
            .enumerate()
            .map(|(i, l)| if mask & (1 << i) != 0 { l.negate() } else { *l })
            .collect();
        sink.add_clause(cl)?;
    }
    Ok(())
}

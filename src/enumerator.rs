//! Enumerates propositional formulae up to a size bound, testing each against
//! the empty theory and discarding anything that is a structural
//! specialization of an axiom already found.

use std::collections::HashMap;

use log::{debug, trace};

use crate::formula::Formula;
use crate::logic::{DecisionConfig, Logic};
use crate::theory::Theory;

fn size(f: &Formula) -> usize {
    match f.kind() {
        None => 0,
        Some(_) => 1 + (0..f.operand_count()).map(|i| size(&f.operand(i))).sum::<usize>(),
    }
}

fn prop_index(name: &str) -> Option<usize> {
    name.strip_prefix('p').and_then(|rest| rest.parse().ok())
}

/// The number of distinct propositional indices used in `f`, i.e. one more
/// than the highest `p`-index occurring, or 0 if `f` has no propositions.
fn degree(f: &Formula) -> usize {
    if let Some(name) = f.prop_name() {
        return prop_index(name).map_or(0, |i| i + 1);
    }
    if f.const_value().is_some() {
        return 0;
    }
    (0..f.operand_count()).map(|i| degree(&f.operand(i))).max().unwrap_or(0)
}

/// Generates every canonical injective remapping of `0..rhs_degree` into the
/// shared index space `0..`, where each rhs index either reuses one of the
/// first `lhs_degree` indices already in scope or introduces the next fresh
/// index in order. This is what keeps renamings from producing duplicate
/// formulae that differ only by which fresh symbol was picked first.
fn all_perms(rhs_degree: usize, lhs_degree: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    let mut current = Vec::with_capacity(rhs_degree);
    fn rec(pos: usize, rhs_degree: usize, next_fresh: usize, current: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if pos == rhs_degree {
            out.push(current.clone());
            return;
        }
        for v in 0..next_fresh {
            current.push(v);
            rec(pos + 1, rhs_degree, next_fresh, current, out);
            current.pop();
        }
        current.push(next_fresh);
        rec(pos + 1, rhs_degree, next_fresh + 1, current, out);
        current.pop();
    }
    rec(0, rhs_degree, lhs_degree, &mut current, &mut out);
    out
}

/// Rebuilds `f` with every `Prop("p{i}")` renamed to `Prop("p{perm[i]}")`.
/// `f` must be acyclic, which every enumerator-generated formula is by construction.
fn apply_perm(f: &Formula, perm: &[usize]) -> Formula {
    if let Some(name) = f.prop_name() {
        let i = prop_index(name).expect("enumerator propositions are always named p{i}");
        return Formula::prop(format!("p{}", perm[i]));
    }
    if let Some(c) = f.const_value() {
        return Formula::constant(c);
    }
    let kind = f.kind().unwrap().clone();
    let operands: Vec<Formula> = (0..f.operand_count()).map(|i| apply_perm(&f.operand(i), perm)).collect();
    rebuild(&kind, f.logic_override(), operands)
}

fn rebuild(kind: &crate::formula::OpKind, logic: Option<Logic>, operands: Vec<Formula>) -> Formula {
    use crate::formula::OpKind::*;
    match kind {
        And => match logic {
            Some(l) => Formula::and_in(l, operands),
            None => Formula::and(operands),
        },
        WeakAnd => Formula::weak_and(operands),
        Or => match logic {
            Some(l) => Formula::or_in(l, operands),
            None => Formula::or(operands),
        },
        WeakOr => Formula::weak_or(operands),
        Implies => {
            let mut it = operands.into_iter();
            let lhs = it.next().unwrap();
            let rhs = it.next().unwrap();
            match logic {
                Some(l) => Formula::implies_in(l, lhs, rhs),
                None => Formula::implies(lhs, rhs),
            }
        }
        Equiv => {
            let mut it = operands.into_iter();
            let lhs = it.next().unwrap();
            let rhs = it.next().unwrap();
            match logic {
                Some(l) => Formula::equiv_in(l, lhs, rhs),
                None => Formula::equiv(lhs, rhs),
            }
        }
        Not => {
            let arg = operands.into_iter().next().unwrap();
            match logic {
                Some(l) => Formula::not_in(l, arg),
                None => Formula::not(arg),
            }
        }
        Inv => Formula::inv(operands.into_iter().next().unwrap()),
        Delta => Formula::delta(operands.into_iter().next().unwrap()),
        Nabla => Formula::nabla(operands.into_iter().next().unwrap()),
        Coef(c) => Formula::coef(*c, operands.into_iter().next().unwrap()).expect("coefficient already validated"),
        Exp(e) => Formula::exp(*e, operands.into_iter().next().unwrap()).expect("exponent already validated"),
    }
}

/// True if `f` is a structural specialization of `axiom`: some uniform
/// substitution of `axiom`'s propositions by subformulae of `f` makes the two
/// structurally equal.
pub fn specializes(f: &Formula, axiom: &Formula) -> bool {
    let mut mapping = HashMap::new();
    specializes_rec(f, axiom, &mut mapping)
}

fn specializes_rec(f: &Formula, a: &Formula, mapping: &mut HashMap<String, Formula>) -> bool {
    if let Some(name) = a.prop_name() {
        return match mapping.get(name) {
            Some(bound) => bound == f,
            None => {
                mapping.insert(name.to_string(), f.clone());
                true
            }
        };
    }
    if let Some(ac) = a.const_value() {
        return f.const_value() == Some(ac);
    }
    let a_kind = a.kind().unwrap();
    match f.kind() {
        Some(f_kind) if f_kind == a_kind && f.logic_override() == a.logic_override() && f.operand_count() == a.operand_count() => {
            (0..f.operand_count()).all(|i| specializes_rec(&f.operand(i), &a.operand(i), mapping))
        }
        _ => false,
    }
}

fn specializes_any(f: &Formula, axioms: &[Formula]) -> bool {
    axioms.iter().any(|a| specializes(f, a))
}

/// Enumerates every distinct formula up to size `max_size`, returning those
/// that are entailed by the empty theory in Łukasiewicz logic and are not a
/// structural specialization of an axiom already found.
pub fn enumerate_axioms(max_size: usize) -> Vec<Formula> {
    let config = DecisionConfig::default();
    let empty = Theory::empty();
    let mut table: Vec<Vec<Formula>> = vec![vec![Formula::prop("p0")]];
    let mut axioms: Vec<Formula> = Vec::new();

    for s in 1..=max_size {
        let mut layer = Vec::new();
        for a_size in 0..s {
            let b_size = s - 1 - a_size;
            if a_size >= table.len() || b_size >= table.len() {
                continue;
            }
            for lhs in table[a_size].clone() {
                let lhs_degree = degree(&lhs);
                for rhs in table[b_size].clone() {
                    let rhs_degree = degree(&rhs);
                    for perm in all_perms(rhs_degree, lhs_degree) {
                        let rhs2 = apply_perm(&rhs, &perm);
                        let mut candidates = Vec::with_capacity(3);
                        // Mirrors all_axioms.py's own dedup guards: a bare
                        // `Implies(lhs, rhs)` is only useful when the two
                        // sides differ, and the `Not`-variants are only
                        // generated from the half of the split where they
                        // are not already covered by the symmetric split
                        // (and never for a bare fresh proposition, which
                        // would just restate "is this variable false").
                        if lhs != rhs2 {
                            candidates.push(Formula::implies(lhs.clone(), rhs2.clone()));
                        }
                        if 2 * a_size <= s - 1 {
                            let rhs_is_fresh_prop =
                                rhs2.prop_name().is_some() && degree(&rhs2) > lhs_degree;
                            if !rhs_is_fresh_prop {
                                candidates.push(Formula::implies(lhs.clone(), Formula::not(rhs2.clone())));
                            }
                        }
                        if 2 * a_size >= s - 1 && lhs.prop_name().is_none() {
                            candidates.push(Formula::implies(Formula::not(lhs.clone()), rhs2.clone()));
                        }
                        for candidate in candidates {
                            if specializes_any(&candidate, &axioms) {
                                trace!("discarding specialization {candidate}");
                                continue;
                            }
                            if empty.entails(candidate.clone(), Logic::Lukasiewicz, &config) {
                                debug!("found axiom at size {s}: {candidate}");
                                axioms.push(candidate);
                            } else {
                                layer.push(candidate);
                            }
                        }
                    }
                }
            }
        }
        table.push(layer);
    }
    axioms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degree_counts_distinct_propositions() {
        let f = Formula::and([Formula::prop("p0"), Formula::prop("p2")]);
        assert_eq!(degree(&f), 3);
    }

    #[test]
    fn all_perms_avoids_duplicate_fresh_orderings() {
        let perms = all_perms(2, 0);
        assert!(perms.contains(&vec![0, 1]));
        assert!(!perms.contains(&vec![1, 0]));
    }

    #[test]
    fn identity_specializes_itself() {
        let phi = Formula::prop("phi");
        let axiom = Formula::implies(phi.clone(), phi);
        let instance = Formula::implies(Formula::prop("p0"), Formula::prop("p0"));
        assert!(specializes(&instance, &axiom));
    }

    #[test]
    fn mismatched_structure_does_not_specialize() {
        let phi = Formula::prop("phi");
        let psi = Formula::prop("psi");
        let axiom = Formula::implies(phi, psi);
        let instance = Formula::and([Formula::prop("p0"), Formula::prop("p1")]);
        assert!(!specializes(&instance, &axiom));
    }
}

//! Sentences: a formula paired with the union of truth-value intervals it is
//! asserted (or, for a query, required) to satisfy.

use crate::encoder::{self, Context};
use crate::error::SentenceError;
use crate::formula::{Formula, IntoFormula};
use crate::interval::Interval;
use crate::logic::Logic;
use crate::milp::{Model, Variable};

/// A formula asserted to take a truth value inside a non-empty union of intervals.
#[derive(Clone)]
pub struct SimpleSentence {
    formula: Formula,
    intervals: Vec<Interval>,
}

impl SimpleSentence {
    /// Asserts that `formula`'s truth value lies in the union of `intervals`.
    ///
    /// Fails if `intervals` is empty.
    pub fn new<F: IntoFormula>(formula: F, intervals: Vec<Interval>) -> Result<Self, SentenceError> {
        if intervals.is_empty() {
            return Err(SentenceError::EmptyIntervalUnion);
        }
        Ok(SimpleSentence {
            formula: formula.into_formula(),
            intervals,
        })
    }

    /// Asserts that `formula` is exactly true (`Interval::point(1.0)`).
    pub fn asserting<F: IntoFormula>(formula: F) -> Self {
        SimpleSentence {
            formula: formula.into_formula(),
            intervals: vec![Interval::point(1.0).expect("1.0 is a valid point interval")],
        }
    }

    /// Returns a variable equal to the formula's truth value, pinning a fresh
    /// variable to the literal when the formula is a bare constant (interval
    /// encodings need a `Variable` to gate, not a literal).
    fn value_variable(&self, model: &mut Model) -> Variable {
        let key = self.formula.canonical_name();
        if let Some(c) = self.formula.const_value() {
            let pinned = format!("{key}_pinned");
            let v = model.continuous_var(c, c, &pinned);
            v
        } else {
            model.continuous_var(0.0, 1.0, &key)
        }
    }

    /// Emits the positive encoding: a fresh selector per interval, exactly one
    /// selected, and `assert_inside` for the selected interval.
    pub(crate) fn configure(&self, ctx: &mut Context, model: &mut Model, gap: Variable, logic: Logic) {
        encoder::configure(&self.formula, ctx, model, gap, logic);
        let key = self.formula.canonical_name();
        let value_var = self.value_variable(model);
        let selectors: Vec<Variable> = (0..self.intervals.len())
            .map(|i| model.fresh_binary_var(&format!("{key}_sentence_sel{i}")))
            .collect();
        let sum = selectors.iter().fold(crate::milp::Expr::from(0.0), |acc, s| {
            acc + crate::milp::Expr::from(*s)
        });
        model.add_eq(sum, crate::milp::Expr::from(1.0), &format!("{key}_sentence_onehot"));
        for (i, interval) in self.intervals.iter().enumerate() {
            interval.assert_inside(model, gap, value_var, selectors[i], &format!("{key}_sentence{i}"));
        }
    }

    /// Emits the negative encoding: the formula's value must lie outside
    /// *every* interval in the union.
    pub(crate) fn complement(&self, ctx: &mut Context, model: &mut Model, gap: Variable, logic: Logic) {
        encoder::configure(&self.formula, ctx, model, gap, logic);
        let key = self.formula.canonical_name();
        let value_var = self.value_variable(model);
        for (i, interval) in self.intervals.iter().enumerate() {
            let active = model.fresh_binary_var(&format!("{key}_complement_sel{i}"));
            interval.assert_outside(model, gap, value_var, active, &format!("{key}_complement{i}"));
        }
    }
}

impl From<Formula> for SimpleSentence {
    fn from(formula: Formula) -> Self {
        SimpleSentence::asserting(formula)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_interval_union_is_rejected() {
        assert!(SimpleSentence::new(Formula::prop("p0"), vec![]).is_err());
    }

    #[test]
    fn formula_lifts_to_point_one() {
        let s: SimpleSentence = Formula::prop("p0").into();
        assert_eq!(s.intervals, vec![Interval::point(1.0).unwrap()]);
    }
}

//! Translates a [`Formula`] into MILP variables and constraints, memoized by
//! canonical name for one decision call.

use std::collections::HashMap;

use log::trace;

use crate::formula::{Formula, OpKind};
use crate::logic::Logic;
use crate::milp::{Expr, Model, Variable};

/// Per-call encoding state: which formulae (by canonical name) already have a
/// variable/expression assigned. Constructing a fresh `Context` is equivalent
/// to the original design's `reset()` — there is nothing to reset, since no
/// state lives on the [`Formula`] nodes themselves.
#[derive(Default)]
pub struct Context {
    values: HashMap<String, Expr>,
}

impl Context {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Configures `formula` in `model`, returning the expression representing its
/// truth value. Idempotent: re-encoding a formula already visited in this
/// context (including via a cycle) returns the memoized expression without
/// emitting further constraints.
pub fn configure(formula: &Formula, ctx: &mut Context, model: &mut Model, gap: Variable, logic: Logic) -> Expr {
    let key = formula.canonical_name();
    if let Some(e) = ctx.values.get(&key) {
        return e.clone();
    }
    if let Some(c) = formula.const_value() {
        let e = Expr::from(c);
        ctx.values.insert(key, e.clone());
        return e;
    }
    let var = model.continuous_var(0.0, 1.0, &key);
    let expr = Expr::from(var);
    // Registered before recursing into operands: this is what breaks cycles
    // and what makes re-encoding a shared subformula a cheap lookup.
    ctx.values.insert(key.clone(), expr.clone());

    if formula.prop_name().is_some() {
        return expr;
    }

    let kind = formula.kind().expect("non-prop, non-const formula must be an operator").clone();
    let effective_logic = if kind.is_logic_fixed() {
        logic
    } else {
        formula.logic_override().unwrap_or(logic)
    };
    trace!("configuring {key} under {effective_logic}");
    encode_operator(&kind, &key, var, formula, ctx, model, gap, effective_logic);
    expr
}

fn operand_exprs(formula: &Formula, ctx: &mut Context, model: &mut Model, gap: Variable, logic: Logic) -> Vec<Expr> {
    (0..formula.operand_count())
        .map(|i| configure(&formula.operand(i), ctx, model, gap, logic))
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn encode_operator(
    kind: &OpKind,
    key: &str,
    v: Variable,
    formula: &Formula,
    ctx: &mut Context,
    model: &mut Model,
    gap: Variable,
    logic: Logic,
) {
    let gap_expr = Expr::from(gap);
    match kind {
        OpKind::And => {
            let operands = operand_exprs(formula, ctx, model, gap, logic);
            match logic {
                Logic::Godel => model.encode_min(v, &operands, key),
                Logic::Lukasiewicz => {
                    let n = operands.len() as f64;
                    let sum = operands
                        .into_iter()
                        .fold(Expr::from(1.0 - n), |acc, x| acc + x);
                    model.encode_max(v, &[Expr::from(0.0), sum], key);
                }
            }
        }
        OpKind::WeakAnd => {
            let operands = operand_exprs(formula, ctx, model, gap, logic);
            model.encode_min(v, &operands, key);
        }
        OpKind::Or => {
            let operands = operand_exprs(formula, ctx, model, gap, logic);
            match logic {
                Logic::Godel => model.encode_max(v, &operands, key),
                Logic::Lukasiewicz => {
                    let sum = operands
                        .into_iter()
                        .fold(Expr::from(0.0), |acc, x| acc + x);
                    model.encode_min(v, &[Expr::from(1.0), sum], key);
                }
            }
        }
        OpKind::WeakOr => {
            let operands = operand_exprs(formula, ctx, model, gap, logic);
            model.encode_max(v, &operands, key);
        }
        OpKind::Implies => {
            let x = configure(&formula.operand(0), ctx, model, gap, logic);
            let y = configure(&formula.operand(1), ctx, model, gap, logic);
            match logic {
                Logic::Godel => encode_godel_implies(v, x, y, gap_expr, key, model),
                Logic::Lukasiewicz => {
                    if formula.operand(1).const_value() == Some(0.0) {
                        model.add_eq(Expr::from(v), Expr::from(1.0) - x, &format!("{key}_inv"));
                    } else {
                        let inner = Expr::from(1.0) - x + y;
                        model.encode_min(v, &[Expr::from(1.0), inner], key);
                    }
                }
            }
        }
        OpKind::Equiv => {
            let x = configure(&formula.operand(0), ctx, model, gap, logic);
            let y = configure(&formula.operand(1), ctx, model, gap, logic);
            match logic {
                Logic::Godel => encode_godel_equiv(v, x, y, gap_expr, key, model),
                Logic::Lukasiewicz => {
                    // v = 1 - |x - y|, linearized via the max encoding of |x-y|.
                    let abs_key = format!("{key}_abs");
                    let abs_var = model.continuous_var(0.0, 1.0, &abs_key);
                    model.encode_max(abs_var, &[x.clone() - y.clone(), y - x], &abs_key);
                    model.add_eq(Expr::from(v), Expr::from(1.0) - Expr::from(abs_var), &format!("{key}_eq"));
                }
            }
        }
        OpKind::Not => {
            let x = configure(&formula.operand(0), ctx, model, gap, logic);
            match logic {
                Logic::Godel => encode_godel_implies(v, x, Expr::from(0.0), gap_expr, key, model),
                Logic::Lukasiewicz => model.add_eq(Expr::from(v), Expr::from(1.0) - x, &format!("{key}_not")),
            }
        }
        OpKind::Inv => {
            let x = configure(&formula.operand(0), ctx, model, gap, logic);
            model.add_eq(Expr::from(v), Expr::from(1.0) - x, &format!("{key}_inv"));
        }
        OpKind::Delta => {
            let x = configure(&formula.operand(0), ctx, model, gap, logic);
            let b = model.fresh_binary_var(&format!("{key}_b"));
            model.add_indicator_eq(b, 1, x.clone(), Expr::from(1.0), &format!("{key}_true"));
            model.add_indicator_eq(b, 1, Expr::from(v), Expr::from(1.0), &format!("{key}_true_v"));
            model.add_indicator_ge(b, 0, Expr::from(1.0) - gap_expr.clone(), x, &format!("{key}_false"));
            model.add_indicator_eq(b, 0, Expr::from(v), Expr::from(0.0), &format!("{key}_false_v"));
        }
        OpKind::Nabla => {
            let x = configure(&formula.operand(0), ctx, model, gap, logic);
            let b = model.fresh_binary_var(&format!("{key}_b"));
            model.add_indicator_eq(b, 1, x.clone(), Expr::from(0.0), &format!("{key}_true"));
            model.add_indicator_eq(b, 1, Expr::from(v), Expr::from(0.0), &format!("{key}_true_v"));
            model.add_indicator_ge(b, 0, x, gap_expr, &format!("{key}_false"));
            model.add_indicator_eq(b, 0, Expr::from(v), Expr::from(1.0), &format!("{key}_false_v"));
        }
        OpKind::Coef(c) => {
            let x = configure(&formula.operand(0), ctx, model, gap, logic);
            let scaled = Expr(x.0 * *c);
            model.encode_min(v, &[Expr::from(1.0), scaled], key);
        }
        OpKind::Exp(e) => {
            let x = configure(&formula.operand(0), ctx, model, gap, logic);
            let inner = Expr::from(1.0) - Expr(((Expr::from(1.0) - x).0) * *e);
            model.encode_max(v, &[Expr::from(0.0), inner], key);
        }
    }
}

fn encode_godel_implies(v: Variable, x: Expr, y: Expr, gap: Expr, key: &str, model: &mut Model) {
    let b = model.fresh_binary_var(&format!("{key}_b"));
    model.add_indicator_ge(b, 1, y.clone(), x.clone(), &format!("{key}_le"));
    model.add_indicator_eq(b, 1, Expr::from(v), Expr::from(1.0), &format!("{key}_true"));
    model.add_indicator_ge(b, 0, x, y.clone() + gap, &format!("{key}_strict"));
    model.add_indicator_eq(b, 0, Expr::from(v), y, &format!("{key}_false"));
}

fn encode_godel_equiv(v: Variable, x: Expr, y: Expr, gap: Expr, key: &str, model: &mut Model) {
    let b = model.fresh_binary_var(&format!("{key}_b"));
    model.add_indicator_eq(b, 1, x.clone(), y.clone(), &format!("{key}_true"));
    model.add_indicator_eq(b, 1, Expr::from(v), Expr::from(1.0), &format!("{key}_true_v"));

    let c = model.fresh_binary_var(&format!("{key}_c"));
    model.add_indicator_ge_all(&[(b, 0), (c, 1)], x.clone() - y.clone(), gap.clone(), &format!("{key}_gt"));
    model.add_indicator_ge_all(&[(b, 0), (c, 0)], y.clone() - x.clone(), gap, &format!("{key}_lt"));
    let min_key = format!("{key}_min");
    let min_var = model.continuous_var(0.0, 1.0, &min_key);
    model.encode_min(min_var, &[x, y], &min_key);
    model.add_indicator_eq(b, 0, Expr::from(v), Expr::from(min_var), &format!("{key}_false_v"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::Formula;

    #[test]
    fn prop_reuses_single_variable() {
        let mut ctx = Context::new();
        let mut model = Model::new(2.0);
        let gap = model.continuous_var(0.0, 1.0, "gap");
        let p = Formula::prop("p0");
        let e1 = configure(&p, &mut ctx, &mut model, gap, Logic::Lukasiewicz);
        let e2 = configure(&p, &mut ctx, &mut model, gap, Logic::Lukasiewicz);
        assert_eq!(format!("{:?}", e1.0), format!("{:?}", e2.0));
    }
}

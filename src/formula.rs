//! The formula algebra: propositions, constants and connectives over both t-norm
//! semantics, with structural equality, canonical naming and cycle-safe printing.

use std::cell::RefCell;
use std::fmt::{self, Display};
use std::rc::Rc;

use tinyvec::TinyVec;

use crate::error::CoefficientError;
use crate::logic::Logic;

/// An operator variant, paired with its fixed arity (`None` means n-ary).
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum OpKind {
    And,
    WeakAnd,
    Or,
    WeakOr,
    Implies,
    Equiv,
    Not,
    Inv,
    Delta,
    Nabla,
    Coef(f64),
    Exp(f64),
}

impl OpKind {
    pub(crate) fn symbol(&self) -> &'static str {
        match self {
            Self::And => "⊗",
            Self::WeakAnd => "∧",
            Self::Or => "⊕",
            Self::WeakOr => "∨",
            Self::Implies => "→",
            Self::Equiv => "↔",
            Self::Not => "¬",
            Self::Inv => "∼",
            Self::Delta => "△",
            Self::Nabla => "▽",
            Self::Coef(_) => "⋅",
            Self::Exp(_) => "^",
        }
    }

    /// Whether this operator ignores the ambient logic entirely.
    pub(crate) fn is_logic_fixed(&self) -> bool {
        matches!(
            self,
            Self::WeakAnd | Self::WeakOr | Self::Inv | Self::Delta | Self::Nabla | Self::Coef(_) | Self::Exp(_)
        )
    }
}

struct OpNode {
    kind: OpKind,
    logic: Option<Logic>,
    operands: RefCell<TinyVec<[Formula; 2]>>,
}

enum Node {
    Prop(String),
    Const(f64),
    Op(OpNode),
}

/// A formula: a proposition, a constant, or an operator applied to operands.
///
/// Cheaply cloneable (reference-counted); distinct handles may alias the same
/// subtree, and a handle may be tied back into its own ancestry after
/// construction via [`Formula::set_operand`], producing a cyclic graph.
#[derive(Clone)]
pub struct Formula(Rc<Node>);

/// Converts a literal into a [`Formula`]: strings become propositions, numbers
/// become constants.
pub trait IntoFormula {
    /// Performs the conversion.
    fn into_formula(self) -> Formula;
}

impl IntoFormula for Formula {
    fn into_formula(self) -> Formula {
        self
    }
}

impl IntoFormula for &Formula {
    fn into_formula(self) -> Formula {
        self.clone()
    }
}

impl IntoFormula for &str {
    fn into_formula(self) -> Formula {
        Formula::prop(self)
    }
}

impl IntoFormula for String {
    fn into_formula(self) -> Formula {
        Formula::prop(self)
    }
}

impl IntoFormula for f64 {
    fn into_formula(self) -> Formula {
        Formula::constant(self)
    }
}

impl IntoFormula for i32 {
    fn into_formula(self) -> Formula {
        Formula::constant(self as f64)
    }
}

fn operands_of<I: IntoIterator<Item = F>, F: IntoFormula>(args: I) -> TinyVec<[Formula; 2]> {
    args.into_iter().map(IntoFormula::into_formula).collect()
}

impl Formula {
    /// Constructs a propositional variable.
    pub fn prop<S: Into<String>>(name: S) -> Self {
        Formula(Rc::new(Node::Prop(name.into())))
    }

    /// Constructs a fixed truth value.
    pub fn constant(value: f64) -> Self {
        Formula(Rc::new(Node::Const(value)))
    }

    fn op<I, F>(kind: OpKind, logic: Option<Logic>, args: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: IntoFormula,
    {
        Formula(Rc::new(Node::Op(OpNode {
            kind,
            logic,
            operands: RefCell::new(operands_of(args)),
        })))
    }

    /// Strong (t-norm) conjunction of the given operands, under the theory's ambient logic.
    pub fn and<I, F>(args: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: IntoFormula,
    {
        Self::op(OpKind::And, None, args)
    }

    /// Strong conjunction, pinned to a specific logic regardless of context.
    pub fn and_in<I, F>(logic: Logic, args: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: IntoFormula,
    {
        Self::op(OpKind::And, Some(logic), args)
    }

    /// Weak (lattice) conjunction: `min`, in both logics.
    pub fn weak_and<I, F>(args: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: IntoFormula,
    {
        Self::op(OpKind::WeakAnd, None, args)
    }

    /// Strong (t-conorm) disjunction of the given operands.
    pub fn or<I, F>(args: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: IntoFormula,
    {
        Self::op(OpKind::Or, None, args)
    }

    /// Strong disjunction, pinned to a specific logic regardless of context.
    pub fn or_in<I, F>(logic: Logic, args: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: IntoFormula,
    {
        Self::op(OpKind::Or, Some(logic), args)
    }

    /// Weak (lattice) disjunction: `max`, in both logics.
    pub fn weak_or<I, F>(args: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: IntoFormula,
    {
        Self::op(OpKind::WeakOr, None, args)
    }

    /// Implication, under the theory's ambient logic.
    pub fn implies<A: IntoFormula, B: IntoFormula>(lhs: A, rhs: B) -> Self {
        Self::op(OpKind::Implies, None, [lhs.into_formula(), rhs.into_formula()])
    }

    /// Implication, pinned to a specific logic.
    pub fn implies_in<A: IntoFormula, B: IntoFormula>(logic: Logic, lhs: A, rhs: B) -> Self {
        Self::op(OpKind::Implies, Some(logic), [lhs.into_formula(), rhs.into_formula()])
    }

    /// Biconditional, under the theory's ambient logic.
    pub fn equiv<A: IntoFormula, B: IntoFormula>(lhs: A, rhs: B) -> Self {
        Self::op(OpKind::Equiv, None, [lhs.into_formula(), rhs.into_formula()])
    }

    /// Biconditional, pinned to a specific logic.
    pub fn equiv_in<A: IntoFormula, B: IntoFormula>(logic: Logic, lhs: A, rhs: B) -> Self {
        Self::op(OpKind::Equiv, Some(logic), [lhs.into_formula(), rhs.into_formula()])
    }

    /// Negation. Defined as `Implies(arg, 0)` under the ambient logic.
    pub fn not<A: IntoFormula>(arg: A) -> Self {
        Self::op(OpKind::Not, None, [arg.into_formula()])
    }

    /// Negation, pinned to a specific logic.
    pub fn not_in<A: IntoFormula>(logic: Logic, arg: A) -> Self {
        Self::op(OpKind::Not, Some(logic), [arg.into_formula()])
    }

    /// The fixed involutive negation `1 - x`, regardless of ambient logic.
    pub fn inv<A: IntoFormula>(arg: A) -> Self {
        Self::op(OpKind::Inv, None, [arg.into_formula()])
    }

    /// The Baaz Delta operator: 1 if the argument is exactly 1, else 0.
    pub fn delta<A: IntoFormula>(arg: A) -> Self {
        Self::op(OpKind::Delta, None, [arg.into_formula()])
    }

    /// The dual Nabla operator: 1 if the argument is greater than 0, else 0.
    pub fn nabla<A: IntoFormula>(arg: A) -> Self {
        Self::op(OpKind::Nabla, None, [arg.into_formula()])
    }

    /// Scalar multiplication, truncated at 1: `min(1, c * x)`.
    pub fn coef<A: IntoFormula>(c: f64, arg: A) -> Result<Self, CoefficientError> {
        if !c.is_finite() || c < 0.0 {
            return Err(CoefficientError::Invalid(c));
        }
        Ok(Self::op(OpKind::Coef(c), None, [arg.into_formula()]))
    }

    /// Exponent-style attenuation: `max(0, 1 - e * (1 - x))`.
    pub fn exp<A: IntoFormula>(e: f64, arg: A) -> Result<Self, CoefficientError> {
        if !e.is_finite() || e < 0.0 {
            return Err(CoefficientError::Invalid(e));
        }
        Ok(Self::op(OpKind::Exp(e), None, [arg.into_formula()]))
    }

    /// Ties this handle back into its own ancestry, producing a cyclic formula graph.
    ///
    /// Panics if `self` is not an operator node, or `index` is out of range.
    pub fn set_operand(&self, index: usize, operand: Formula) {
        match &*self.0 {
            Node::Op(op) => {
                let mut operands = op.operands.borrow_mut();
                operands[index] = operand;
            }
            _ => panic!("set_operand called on a non-operator formula"),
        }
    }

    pub(crate) fn as_ptr(&self) -> *const () {
        Rc::as_ptr(&self.0) as *const ()
    }

    pub(crate) fn kind(&self) -> Option<&OpKind> {
        match &*self.0 {
            Node::Op(op) => Some(&op.kind),
            _ => None,
        }
    }

    pub(crate) fn logic_override(&self) -> Option<Logic> {
        match &*self.0 {
            Node::Op(op) => op.logic,
            _ => None,
        }
    }

    pub(crate) fn operand(&self, index: usize) -> Formula {
        match &*self.0 {
            Node::Op(op) => op.operands.borrow()[index].clone(),
            _ => panic!("operand() called on a non-operator formula"),
        }
    }

    pub(crate) fn operand_count(&self) -> usize {
        match &*self.0 {
            Node::Op(op) => op.operands.borrow().len(),
            _ => 0,
        }
    }

    pub(crate) fn prop_name(&self) -> Option<&str> {
        match &*self.0 {
            Node::Prop(name) => Some(name.as_str()),
            _ => None,
        }
    }

    pub(crate) fn const_value(&self) -> Option<f64> {
        match &*self.0 {
            Node::Const(v) => Some(*v),
            _ => None,
        }
    }

    /// A deterministic string identifying this formula's structure, used as the
    /// encoder's variable/constraint key. Structurally equal formulae (including
    /// mutually mirrored cycles) always produce the same canonical name.
    pub fn canonical_name(&self) -> String {
        let mut out = String::new();
        let mut stack = Vec::new();
        self.write_canonical(&mut out, &mut stack);
        out
    }

    fn write_canonical(&self, out: &mut String, stack: &mut Vec<*const ()>) {
        let ptr = self.as_ptr();
        if let Some(depth_from_top) = stack.iter().rev().position(|p| *p == ptr) {
            for _ in 0..=depth_from_top {
                out.push('.');
            }
            return;
        }
        match &*self.0 {
            Node::Prop(name) => {
                out.push_str(name);
            }
            Node::Const(v) => {
                out.push_str(&format!("{:.6}", v));
            }
            Node::Op(op) => {
                stack.push(ptr);
                out.push('(');
                out.push_str(op.kind.symbol());
                if let Some(logic) = op.logic {
                    out.push('@');
                    out.push_str(&logic.to_string());
                }
                for operand in op.operands.borrow().iter() {
                    out.push(' ');
                    operand.write_canonical(out, stack);
                }
                out.push(')');
                stack.pop();
            }
        }
    }

    /// Structural equality, cycle-safe: cyclic formulae that mirror each other's
    /// recursive structure compare equal.
    pub fn structurally_equals(&self, other: &Formula) -> bool {
        let mut stack = Vec::new();
        Self::eq_impl(self, other, &mut stack)
    }

    fn eq_impl(a: &Formula, b: &Formula, stack: &mut Vec<(*const (), *const ())>) -> bool {
        let pair = (a.as_ptr(), b.as_ptr());
        if stack.contains(&pair) {
            return true;
        }
        match (&*a.0, &*b.0) {
            (Node::Prop(x), Node::Prop(y)) => x == y,
            (Node::Const(x), Node::Const(y)) => x == y,
            (Node::Op(x), Node::Op(y)) => {
                if x.kind != y.kind || x.logic != y.logic {
                    return false;
                }
                let xo = x.operands.borrow();
                let yo = y.operands.borrow();
                if xo.len() != yo.len() {
                    return false;
                }
                stack.push(pair);
                let result = xo.iter().zip(yo.iter()).all(|(p, q)| Self::eq_impl(p, q, stack));
                stack.pop();
                result
            }
            _ => false,
        }
    }
}

impl PartialEq for Formula {
    fn eq(&self, other: &Self) -> bool {
        self.structurally_equals(other)
    }
}

impl Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_name())
    }
}

impl fmt::Debug for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Formula({})", self.canonical_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_name_is_deterministic() {
        let a = Formula::implies(Formula::prop("x"), Formula::prop("y"));
        let b = Formula::implies(Formula::prop("x"), Formula::prop("y"));
        assert_eq!(a.canonical_name(), b.canonical_name());
        assert_eq!(a, b);
    }

    #[test]
    fn different_structure_differs() {
        let a = Formula::implies(Formula::prop("x"), Formula::prop("y"));
        let b = Formula::implies(Formula::prop("y"), Formula::prop("x"));
        assert_ne!(a.canonical_name(), b.canonical_name());
        assert_ne!(a, b);
    }

    #[test]
    fn cyclic_formula_prints_with_placeholder() {
        let not_x = Formula::not(Formula::prop("p0"));
        not_x.set_operand(0, not_x.clone());
        let name = not_x.canonical_name();
        assert!(name.contains('.'));
    }

    #[test]
    fn shared_subformula_is_structurally_equal_to_itself() {
        let shared = Formula::prop("p0");
        let lhs = Formula::and([shared.clone(), shared.clone()]);
        let rhs = Formula::and([Formula::prop("p0"), Formula::prop("p0")]);
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn coef_rejects_negative() {
        assert!(Formula::coef(-1.0, Formula::prop("p0")).is_err());
    }

    #[test]
    fn pinned_logic_distinguishes_equiv_and_not_from_ambient() {
        let p = Formula::prop("p0");
        let q = Formula::prop("p1");
        let ambient_equiv = Formula::equiv(p.clone(), q.clone());
        let pinned_equiv = Formula::equiv_in(Logic::Godel, p.clone(), q.clone());
        assert_ne!(ambient_equiv, pinned_equiv);

        let ambient_not = Formula::not(p.clone());
        let pinned_not = Formula::not_in(Logic::Lukasiewicz, p);
        assert_ne!(ambient_not, pinned_not);
        assert_eq!(pinned_not.logic_override(), Some(Logic::Lukasiewicz));
    }
}

//! The in-scope side of the MILP boundary: a small model builder on top of
//! [`good_lp`], used by the encoder to translate formula/interval semantics
//! into linear and big-M indicator constraints.
//!
//! The solver's own branch-and-bound/simplex internals are out of scope; this
//! module only assembles the problem and reads back variable values.

use std::collections::{HashMap, HashSet};
use std::ops::{Add, Sub};

use good_lp::{constraint, variable, Expression, ProblemVariables, Solution, SolverModel};
use log::{debug, trace};

use crate::error::SolverError;

/// A handle to a variable inside a [`Model`]. Cheap to copy.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Variable(pub(crate) good_lp::Variable);

/// A linear expression over [`Variable`]s and constants.
#[derive(Debug, Clone)]
pub struct Expr(pub(crate) Expression);

impl From<f64> for Expr {
    fn from(c: f64) -> Self {
        Expr(Expression::from(c))
    }
}

impl From<Variable> for Expr {
    fn from(v: Variable) -> Self {
        Expr(Expression::from(v.0))
    }
}

impl Add for Expr {
    type Output = Expr;
    fn add(self, rhs: Expr) -> Expr {
        Expr(self.0 + rhs.0)
    }
}

impl Sub for Expr {
    type Output = Expr;
    fn sub(self, rhs: Expr) -> Expr {
        Expr(self.0 - rhs.0)
    }
}

/// A fresh MILP model, owned by exactly one [`entails`](crate::theory::Theory::entails)
/// or [`satisfiable`](crate::theory::Theory::satisfiable) call.
///
/// Variables and constraints are memoized by name so that repeated encoding of
/// a shared or cyclic subformula is a no-op after the first visit.
pub struct Model {
    vars: ProblemVariables,
    named_vars: HashMap<String, Variable>,
    constraints: Vec<good_lp::Constraint>,
    seen_constraints: HashSet<String>,
    big_m: f64,
    fresh_counter: u64,
}

impl Model {
    /// Creates an empty model with the given big-M constant for indicator linearization.
    pub fn new(big_m: f64) -> Self {
        Model {
            vars: ProblemVariables::new(),
            named_vars: HashMap::new(),
            constraints: Vec::new(),
            seen_constraints: HashSet::new(),
            big_m,
            fresh_counter: 0,
        }
    }

    /// Returns the existing variable for `name`, if one was already created.
    pub fn existing_var(&self, name: &str) -> Option<Variable> {
        self.named_vars.get(name).copied()
    }

    /// Creates (or returns the memoized) continuous variable `name` with bounds `[lb, ub]`.
    pub fn continuous_var(&mut self, lb: f64, ub: f64, name: &str) -> Variable {
        if let Some(v) = self.named_vars.get(name) {
            return *v;
        }
        let v = Variable(self.vars.add(variable().min(lb).max(ub)));
        trace!("declared continuous variable {name} in [{lb}, {ub}]");
        self.named_vars.insert(name.to_string(), v);
        v
    }

    /// Creates (or returns the memoized) binary variable `name`.
    pub fn binary_var(&mut self, name: &str) -> Variable {
        if let Some(v) = self.named_vars.get(name) {
            return *v;
        }
        let v = Variable(self.vars.add(variable().min(0).max(1).integer()));
        trace!("declared binary variable {name}");
        self.named_vars.insert(name.to_string(), v);
        v
    }

    /// A binary variable with an auto-generated, collision-free name.
    pub fn fresh_binary_var(&mut self, hint: &str) -> Variable {
        self.fresh_counter += 1;
        let name = format!("{hint}#{}", self.fresh_counter);
        self.binary_var(&name)
    }

    /// Whether a constraint tagged `name` has already been added.
    pub fn has_constraint(&self, name: &str) -> bool {
        self.seen_constraints.contains(name)
    }

    /// Adds `lhs <= rhs` under `name`, unless a constraint with that name was
    /// already recorded (idempotent re-encoding of shared subformulae).
    pub fn add_le(&mut self, lhs: Expr, rhs: Expr, name: &str) {
        if !self.seen_constraints.insert(name.to_string()) {
            return;
        }
        self.constraints.push(constraint!(lhs.0 <= rhs.0));
    }

    /// Adds `lhs >= rhs` under `name`, unless already recorded.
    pub fn add_ge(&mut self, lhs: Expr, rhs: Expr, name: &str) {
        if !self.seen_constraints.insert(name.to_string()) {
            return;
        }
        self.constraints.push(constraint!(lhs.0 >= rhs.0));
    }

    /// Adds `lhs == rhs` under `name`, unless already recorded.
    pub fn add_eq(&mut self, lhs: Expr, rhs: Expr, name: &str) {
        if !self.seen_constraints.insert(name.to_string()) {
            return;
        }
        self.constraints.push(constraint!(lhs.0 == rhs.0));
    }

    /// Adds the big-M linearization of "if `active` == `active_value` then `lhs` >= `rhs`".
    pub fn add_indicator_ge(&mut self, active: Variable, active_value: u8, lhs: Expr, rhs: Expr, name: &str) {
        self.add_indicator_ge_all(&[(active, active_value)], lhs, rhs, name)
    }

    /// Adds the big-M linearization of "if every `(var, value)` condition in
    /// `conditions` holds, then `lhs` >= `rhs`" — the conjunctive generalization
    /// of [`add_indicator_ge`], used where more than one selector binary must
    /// jointly gate a single constraint (e.g. Gödel equivalence's disjoint-side test).
    pub fn add_indicator_ge_all(&mut self, conditions: &[(Variable, u8)], lhs: Expr, rhs: Expr, name: &str) {
        if self.seen_constraints.contains(name) {
            return;
        }
        let big_m = self.big_m;
        let mut relaxed = rhs;
        for (active, value) in conditions {
            let slack: Expr = if *value == 1 {
                Expr::from(1.0) - Expr::from(*active)
            } else {
                Expr::from(*active)
            };
            relaxed = relaxed - Expr(slack.0 * big_m);
        }
        self.add_ge(lhs, relaxed, name);
    }

    /// Adds the big-M linearization of "if `active` == `active_value` then `lhs` == `rhs`".
    pub fn add_indicator_eq(&mut self, active: Variable, active_value: u8, lhs: Expr, rhs: Expr, name: &str) {
        self.add_indicator_ge(active, active_value, lhs.clone(), rhs.clone(), &format!("{name}_ge"));
        self.add_indicator_ge(active, active_value, rhs, lhs, &format!("{name}_le"));
    }

    /// Builds the objective (maximizing `objective`) and solves. Returns the
    /// solved model, from which variable values can be read with [`Solved::value`].
    pub fn solve_maximize(self, objective: Expr) -> Result<Solved, SolverError> {
        debug!(
            "solving MILP with {} variables, {} constraints",
            self.named_vars.len(),
            self.constraints.len()
        );
        let mut problem = self.vars.maximise(objective.0).using(good_lp::microlp);
        for c in self.constraints {
            problem = problem.with(c);
        }
        let solution = problem
            .solve()
            .map_err(|e| SolverError::Infeasible(e.to_string()))?;
        Ok(Solved { solution })
    }

    /// Emits the selector-binary big-M encoding of `v = min(exprs)` against the
    /// given (already-declared) output variable `v`.
    pub fn encode_min(&mut self, v: Variable, exprs: &[Expr], tag: &str) {
        self.encode_min_max(v, exprs, tag, true)
    }

    /// Emits the selector-binary big-M encoding of `v = max(exprs)` against the
    /// given (already-declared) output variable `v`.
    pub fn encode_max(&mut self, v: Variable, exprs: &[Expr], tag: &str) {
        self.encode_min_max(v, exprs, tag, false)
    }

    fn encode_min_max(&mut self, v: Variable, exprs: &[Expr], name: &str, is_min: bool) {
        if self.seen_constraints.contains(&format!("{name}_onehot")) {
            return;
        }
        let selectors: Vec<Variable> = (0..exprs.len())
            .map(|i| self.fresh_binary_var(&format!("{name}_sel{i}")))
            .collect();
        let sum = selectors
            .iter()
            .fold(Expr::from(0.0), |acc, s| acc + Expr::from(*s));
        self.add_eq(sum, Expr::from(1.0), &format!("{name}_onehot"));
        for (i, e) in exprs.iter().enumerate() {
            let tag_bound = format!("{name}_bound{i}");
            let tag_tight = format!("{name}_tight{i}");
            if is_min {
                self.add_le(Expr::from(v), e.clone(), &tag_bound);
                self.add_indicator_ge(selectors[i], 1, Expr::from(v), e.clone(), &tag_tight);
            } else {
                self.add_ge(Expr::from(v), e.clone(), &tag_bound);
                self.add_indicator_ge(selectors[i], 1, e.clone(), Expr::from(v), &tag_tight);
            }
        }
    }
}

/// A solved model; exposes the value assigned to each variable.
pub struct Solved {
    solution: good_lp::solvers::microlp::MicroLpSolution,
}

impl Solved {
    /// The value assigned to `var` in the optimal solution.
    pub fn value(&self, var: Variable) -> f64 {
        self.solution.value(var.0)
    }
}

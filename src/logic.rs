//! The two supported t-norm semantics, and the decision procedure's tunable knobs.

use std::fmt::{self, Display};

/// Which t-norm family a formula (or subformula) is evaluated under.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Logic {
    /// Gödel logic: `min`/`max` conjunction and disjunction, idempotent strong conjunction.
    Godel,
    /// Łukasiewicz logic: bounded-sum conjunction and disjunction.
    Lukasiewicz,
}

impl Default for Logic {
    fn default() -> Self {
        Self::Lukasiewicz
    }
}

impl Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Godel => "Godel",
            Self::Lukasiewicz => "Lukasiewicz",
        })
    }
}

/// Tunable parameters for [`satisfiable`](crate::theory::Theory::satisfiable) and
/// [`entails`](crate::theory::Theory::entails).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DecisionConfig {
    /// The strict-inequality gap below which a solution is treated as a boundary
    /// artifact rather than a genuine witness.
    pub epsilon: f64,
    /// The logic used when a sentence or query does not specify its own override.
    pub default_logic: Logic,
    /// The big-M constant used to linearize indicator constraints.
    pub big_m: f64,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            epsilon: 1e-8,
            default_logic: Logic::default(),
            big_m: 2.0,
        }
    }
}

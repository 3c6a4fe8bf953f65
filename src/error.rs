//! Error types for formula, interval and sentence construction, and for the MILP adapter.

use thiserror::Error;

/// Errors raised while constructing an [`Interval`](crate::interval::Interval).
#[derive(Debug, Copy, Clone, PartialEq, Error)]
pub enum IntervalError {
    /// The lower bound exceeded the upper bound.
    #[error("interval lower bound {lower} exceeds upper bound {upper}")]
    Inverted {
        /// The offending lower bound.
        lower: f64,
        /// The offending upper bound.
        upper: f64,
    },
    /// A bound fell outside `[0, 1]`.
    #[error("interval bound {bound} is outside [0, 1]")]
    OutOfRange {
        /// The offending bound.
        bound: f64,
    },
}

/// Errors raised while constructing an operator node.
#[derive(Debug, Copy, Clone, PartialEq, Error)]
pub enum CoefficientError {
    /// A `Coef` or `Exp` argument was negative or not finite.
    #[error("coefficient {0} must be finite and non-negative")]
    Invalid(f64),
}

/// Errors raised while constructing a [`SimpleSentence`](crate::sentence::SimpleSentence).
#[derive(Debug, Copy, Clone, PartialEq, Error)]
pub enum SentenceError {
    /// A sentence was given no intervals at all.
    #[error("a sentence must assert at least one interval")]
    EmptyIntervalUnion,
}

/// Errors bubbled up from the underlying MILP solver.
#[derive(Debug, Error)]
pub enum SolverError {
    /// The solver could not find a feasible solution.
    #[error("solver reported no feasible solution: {0}")]
    Infeasible(String),
    /// The underlying solver backend failed to run at all.
    #[error("solver backend failure: {0}")]
    Backend(String),
}

//! Satisfiability and entailment for propositional fuzzy logic over the unit
//! interval, decided by reduction to a mixed-integer linear program.
//!
//! Both Gödel and Łukasiewicz t-norm semantics are supported. A [`Theory`] is
//! an ordered set of [`SimpleSentence`]s binding a [`Formula`] to a union of
//! [`Interval`]s; [`Theory::satisfiable`] and [`Theory::entails`] drive the
//! decision procedure.

pub mod encoder;
pub mod enumerator;
pub mod error;
pub mod formula;
pub mod interval;
pub mod logic;
pub mod milp;
pub mod sentence;
pub mod theory;

pub use error::{CoefficientError, IntervalError, SentenceError, SolverError};
pub use formula::{Formula, IntoFormula};
pub use interval::Interval;
pub use logic::{DecisionConfig, Logic};
pub use sentence::SimpleSentence;
pub use theory::Theory;

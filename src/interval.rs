//! Intervals over the truth domain `[0, 1]`, and their "assert inside" /
//! "assert outside" constraint encodings.

use crate::error::IntervalError;
use crate::milp::{Model, Variable};

/// An interval (or named specialization) over `[0, 1]`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Interval {
    /// `[lower, upper]`.
    Closed { lower: f64, upper: f64 },
    /// `(lower, upper)`.
    Open { lower: f64, upper: f64 },
    /// `(lower, upper]`.
    OpenLower { lower: f64, upper: f64 },
    /// `[lower, upper)`.
    OpenUpper { lower: f64, upper: f64 },
}

fn check_bounds(lower: f64, upper: f64) -> Result<(), IntervalError> {
    for bound in [lower, upper] {
        if !(0.0..=1.0).contains(&bound) {
            return Err(IntervalError::OutOfRange { bound });
        }
    }
    if lower > upper {
        return Err(IntervalError::Inverted { lower, upper });
    }
    Ok(())
}

impl Interval {
    /// `[lower, upper]`.
    pub fn closed(lower: f64, upper: f64) -> Result<Self, IntervalError> {
        check_bounds(lower, upper)?;
        Ok(Self::Closed { lower, upper })
    }

    /// `(lower, upper)`.
    pub fn open(lower: f64, upper: f64) -> Result<Self, IntervalError> {
        check_bounds(lower, upper)?;
        Ok(Self::Open { lower, upper })
    }

    /// `(lower, upper]`.
    pub fn open_lower(lower: f64, upper: f64) -> Result<Self, IntervalError> {
        check_bounds(lower, upper)?;
        Ok(Self::OpenLower { lower, upper })
    }

    /// `[lower, upper)`.
    pub fn open_upper(lower: f64, upper: f64) -> Result<Self, IntervalError> {
        check_bounds(lower, upper)?;
        Ok(Self::OpenUpper { lower, upper })
    }

    /// The single point `{p}`.
    pub fn point(p: f64) -> Result<Self, IntervalError> {
        Self::closed(p, p)
    }

    /// `[lower, 1]`.
    pub fn at_least(lower: f64) -> Result<Self, IntervalError> {
        Self::closed(lower, 1.0)
    }

    /// `[0, upper]`.
    pub fn at_most(upper: f64) -> Result<Self, IntervalError> {
        Self::closed(0.0, upper)
    }

    /// `(lower, 1]`.
    pub fn greater_than(lower: f64) -> Result<Self, IntervalError> {
        Self::open_lower(lower, 1.0)
    }

    /// `[0, upper)`.
    pub fn less_than(upper: f64) -> Result<Self, IntervalError> {
        Self::open_upper(0.0, upper)
    }

    fn bounds(&self) -> (f64, f64) {
        match *self {
            Self::Closed { lower, upper }
            | Self::Open { lower, upper }
            | Self::OpenLower { lower, upper }
            | Self::OpenUpper { lower, upper } => (lower, upper),
        }
    }

    fn lower_open(&self) -> bool {
        matches!(self, Self::Open { .. } | Self::OpenLower { .. })
    }

    fn upper_open(&self) -> bool {
        matches!(self, Self::Open { .. } | Self::OpenUpper { .. })
    }

    /// Adds the indicator constraints "if `active` = 1 then `value` lies in this interval".
    pub(crate) fn assert_inside(&self, model: &mut Model, gap: Variable, value: Variable, active: Variable, tag: &str) {
        let (lower, upper) = self.bounds();
        let lower_bound = if self.lower_open() {
            crate::milp::Expr::from(lower) + crate::milp::Expr::from(gap)
        } else {
            crate::milp::Expr::from(lower)
        };
        let upper_bound = if self.upper_open() {
            crate::milp::Expr::from(upper) - crate::milp::Expr::from(gap)
        } else {
            crate::milp::Expr::from(upper)
        };
        model.add_indicator_ge(active, 1, crate::milp::Expr::from(value), lower_bound, &format!("{tag}_lo"));
        model.add_indicator_ge(active, 1, upper_bound, crate::milp::Expr::from(value), &format!("{tag}_hi"));
    }

    /// Adds the indicator constraints "if `active` = 1 then `value` lies strictly
    /// below this interval's lower side; if `active` = 0, strictly above its upper side".
    pub(crate) fn assert_outside(&self, model: &mut Model, gap: Variable, value: Variable, active: Variable, tag: &str) {
        let (lower, upper) = self.bounds();
        let below = if self.lower_open() {
            crate::milp::Expr::from(lower)
        } else {
            crate::milp::Expr::from(lower) - crate::milp::Expr::from(gap)
        };
        let above = if self.upper_open() {
            crate::milp::Expr::from(upper)
        } else {
            crate::milp::Expr::from(upper) + crate::milp::Expr::from(gap)
        };
        model.add_indicator_ge(active, 1, below, crate::milp::Expr::from(value), &format!("{tag}_below"));
        model.add_indicator_ge(active, 0, crate::milp::Expr::from(value), above, &format!("{tag}_above"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_inverted_bounds() {
        assert!(Interval::closed(0.6, 0.4).is_err());
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(Interval::closed(-0.1, 0.5).is_err());
        assert!(Interval::closed(0.0, 1.1).is_err());
    }

    #[test]
    fn point_is_degenerate_closed() {
        assert_eq!(Interval::point(0.5).unwrap(), Interval::closed(0.5, 0.5).unwrap());
    }
}

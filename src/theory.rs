//! The entailment/satisfiability driver: builds a fresh MILP per call, encodes
//! premises positively and an optional query negatively, and maximizes the
//! strict-inequality gap to decide the answer.

use log::{debug, info};

use crate::encoder::Context;
use crate::formula::Formula;
use crate::logic::{DecisionConfig, Logic};
use crate::milp::Model;
use crate::sentence::SimpleSentence;

/// An ordered collection of sentences.
#[derive(Clone, Default)]
pub struct Theory {
    sentences: Vec<SimpleSentence>,
}

impl Theory {
    /// Builds a theory from an ordered sequence of sentences.
    pub fn new<I, S>(sentences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SimpleSentence>,
    {
        Theory {
            sentences: sentences.into_iter().map(Into::into).collect(),
        }
    }

    /// The empty theory.
    pub fn empty() -> Self {
        Theory { sentences: Vec::new() }
    }

    fn build_model(&self, config: &DecisionConfig) -> (Model, Context, crate::milp::Variable) {
        let mut model = Model::new(config.big_m);
        let gap = model.continuous_var(0.0, 1.0, "__gap__");
        let mut ctx = Context::new();
        for sentence in &self.sentences {
            sentence.configure(&mut ctx, &mut model, gap, config.default_logic);
        }
        (model, ctx, gap)
    }

    /// Whether the theory has a model (a truth assignment to all propositions
    /// satisfying every sentence) under `logic`, with a genuine (non-boundary)
    /// gap between strict inequalities.
    pub fn satisfiable(&self, logic: Logic, config: &DecisionConfig) -> bool {
        self.entails_inner(None, logic, config)
    }

    /// Whether every model of the theory also satisfies `query`, under `logic`.
    /// A bare [`Formula`] is accepted and treated as asserting the formula true
    /// (`Interval::point(1.0)`); a [`SimpleSentence`] may instead require the
    /// query's value to lie in an arbitrary interval union.
    pub fn entails<Q: Into<SimpleSentence>>(&self, query: Q, logic: Logic, config: &DecisionConfig) -> bool {
        self.entails_inner(Some(query.into()), logic, config)
    }

    fn entails_inner(&self, query: Option<SimpleSentence>, logic: Logic, config: &DecisionConfig) -> bool {
        let mut config = *config;
        config.default_logic = logic;
        let (mut model, mut ctx, gap) = self.build_model(&config);
        if let Some(sentence) = &query {
            sentence.complement(&mut ctx, &mut model, gap, logic);
        }
        debug!(
            "deciding {} under {logic} with {} premises",
            if query.is_some() { "entailment" } else { "satisfiability" },
            self.sentences.len()
        );
        let solved = match model.solve_maximize(crate::milp::Expr::from(gap)) {
            Ok(s) => s,
            Err(e) => {
                info!("solver reported infeasible: {e}");
                // Infeasible means no countermodel exists: entailment holds,
                // satisfiability (query = None) fails.
                return if query.is_some() { true } else { false };
            }
        };
        let gap_value = solved.value(gap);
        let found_countermodel = gap_value > config.epsilon;
        if query.is_some() {
            !found_countermodel
        } else {
            found_countermodel
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_theory_entails_identity() {
        let config = DecisionConfig::default();
        let theory = Theory::empty();
        let phi = Formula::prop("phi");
        let identity = Formula::implies(phi.clone(), phi);
        assert!(theory.entails(identity.clone(), Logic::Lukasiewicz, &config));
        assert!(theory.entails(identity, Logic::Godel, &config));
    }

    #[test]
    fn godel_contraction_fails_in_lukasiewicz() {
        let config = DecisionConfig::default();
        let theory = Theory::empty();
        let phi = Formula::prop("phi");
        let contraction = Formula::implies(phi.clone(), Formula::and([phi.clone(), phi]));
        assert!(theory.entails(contraction.clone(), Logic::Godel, &config));
        assert!(!theory.entails(contraction, Logic::Lukasiewicz, &config));
    }
}

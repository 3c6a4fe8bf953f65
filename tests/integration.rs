//! End-to-end decision scenarios, exercised through the public API only.

use fuzzylogic::{DecisionConfig, Formula, Interval, Logic, SimpleSentence, Theory};

fn config() -> DecisionConfig {
    let _ = env_logger::builder().is_test(true).try_init();
    DecisionConfig::default()
}

fn assert_entails<Q: Into<SimpleSentence>>(theory: &Theory, query: Q, logic: Logic) {
    assert!(theory.entails(query, logic, &config()), "expected entailment to hold");
}

fn assert_not_entails<Q: Into<SimpleSentence>>(theory: &Theory, query: Q, logic: Logic) {
    assert!(!theory.entails(query, logic, &config()), "expected entailment to fail");
}

fn assert_satisfiable(theory: &Theory, logic: Logic) {
    assert!(theory.satisfiable(logic, &config()), "expected theory to be satisfiable");
}

fn assert_unsatisfiable(theory: &Theory, logic: Logic) {
    assert!(!theory.satisfiable(logic, &config()), "expected theory to be unsatisfiable");
}

#[test]
fn cat_scenario_entails_contrapositive() {
    let whiskers = Formula::prop("whiskers");
    let tail = Formula::prop("tail");
    let cat = Formula::prop("cat");
    let dog = Formula::prop("dog");
    let pet = Formula::prop("pet");

    let theory = Theory::new(vec![
        SimpleSentence::new(
            Formula::implies(Formula::and([whiskers.clone(), tail.clone()]), cat.clone()),
            vec![Interval::closed(0.75, 1.0).unwrap()],
        )
        .unwrap(),
        SimpleSentence::new(
            Formula::implies(Formula::or_in(Logic::Godel, [cat, dog]), pet.clone()),
            vec![Interval::closed(0.75, 1.0).unwrap()],
        )
        .unwrap(),
    ]);

    let query = Formula::implies(Formula::and([whiskers, Formula::not(pet)]), Formula::not(tail));
    let sentence = SimpleSentence::new(query, vec![Interval::at_least(0.5).unwrap()]).unwrap();

    assert_entails(&theory, sentence, Logic::Lukasiewicz);
}

fn three_sat_clauses(x: &Formula, y: &Formula, z: &Formula) -> Vec<SimpleSentence> {
    let lits = |a: &Formula| [Formula::not(a.clone()), a.clone()];
    let [nx, px] = lits(x);
    let [ny, py] = lits(y);
    let [nz, pz] = lits(z);
    vec![
        SimpleSentence::asserting(Formula::or([px.clone(), py.clone(), pz.clone()])),
        SimpleSentence::asserting(Formula::or([px.clone(), py.clone(), nz.clone()])),
        SimpleSentence::asserting(Formula::or([px.clone(), ny.clone(), pz.clone()])),
        SimpleSentence::asserting(Formula::or([nx.clone(), py.clone(), pz.clone()])),
        SimpleSentence::asserting(Formula::or([px, ny.clone(), nz.clone()])),
        SimpleSentence::asserting(Formula::or([nx.clone(), py, nz])),
        SimpleSentence::asserting(Formula::or([nx.clone(), ny, pz])),
        SimpleSentence::asserting(Formula::or([nx, Formula::not(y.clone()), Formula::not(z.clone())])),
    ]
}

#[test]
fn three_sat_is_unsatisfiable_in_godel_but_not_lukasiewicz() {
    let x = Formula::prop("x");
    let y = Formula::prop("y");
    let z = Formula::prop("z");
    let clauses = three_sat_clauses(&x, &y, &z);

    let theory = Theory::new(clauses.clone());
    assert_unsatisfiable(&theory, Logic::Godel);
    assert_satisfiable(&theory, Logic::Lukasiewicz);

    for i in 0..clauses.len() {
        let mut subset = clauses.clone();
        subset.remove(i);
        let relaxed = Theory::new(subset);
        assert_satisfiable(&relaxed, Logic::Godel);
    }
}

#[test]
fn boolean_sentence_is_entailed_only_with_boolean_premises() {
    let a = Formula::prop("a");
    let b = Formula::prop("b");
    let target = Formula::implies(
        Formula::implies(a.clone(), b.clone()),
        Formula::implies(Formula::implies(Formula::not(a.clone()), b.clone()), b.clone()),
    );

    let boolean_theory = Theory::new(vec![
        SimpleSentence::new(a, vec![Interval::point(0.0).unwrap(), Interval::point(1.0).unwrap()]).unwrap(),
        SimpleSentence::new(b, vec![Interval::point(0.0).unwrap(), Interval::point(1.0).unwrap()]).unwrap(),
    ]);
    assert_entails(&boolean_theory, target.clone(), Logic::Lukasiewicz);
    assert_entails(&boolean_theory, target.clone(), Logic::Godel);

    let empty = Theory::empty();
    assert_not_entails(&empty, target, Logic::Lukasiewicz);
}

#[test]
fn godel_contraction_distinguishes_the_two_logics() {
    let empty = Theory::empty();
    let phi = Formula::prop("phi");
    let contraction = Formula::implies(phi.clone(), Formula::and([phi.clone(), phi]));
    assert_entails(&empty, contraction.clone(), Logic::Godel);
    assert_not_entails(&empty, contraction, Logic::Lukasiewicz);
}

#[test]
fn excluded_middle_holds_only_in_lukasiewicz() {
    let empty = Theory::empty();
    let phi = Formula::prop("phi");
    let excluded_middle = Formula::or([phi.clone(), Formula::not(phi)]);
    assert_entails(&empty, excluded_middle.clone(), Logic::Lukasiewicz);
    assert_not_entails(&empty, excluded_middle, Logic::Godel);
}

#[test]
fn enumerator_finds_axioms_with_no_redundant_specialization() {
    let axioms = fuzzylogic::enumerator::enumerate_axioms(4);
    assert!(!axioms.is_empty());
    for i in 0..axioms.len() {
        for j in 0..axioms.len() {
            if i != j {
                assert!(
                    !fuzzylogic::enumerator::specializes(&axioms[i], &axioms[j]),
                    "axiom {} should not specialize axiom {}",
                    axioms[i],
                    axioms[j]
                );
            }
        }
    }
}

use backbone_sat::lbool::LBool;
use backbone_sat::lit::Lit;
use backbone_sat::options::Options;
use backbone_sat::solver::{SolveResult, Solver};

use test_log::test;

fn lit_true(solver: &Solver, lit: Lit) -> bool {
    solver.model_value(lit.var()) == Some(!lit.negated())
}

#[test]
fn basic_incremental_use() {
    let mut s = Solver::default();
    let x = Lit::positive(s.new_var(true, true));
    let y = Lit::positive(s.new_var(true, true));
    let z = Lit::positive(s.new_var(true, true));

    s.add_clause(&[x, y, z]);

    for negs in [
        vec![x],
        vec![y],
        vec![z],
        vec![x, y],
        vec![x, z],
        vec![y, z],
    ] {
        let assumptions: Vec<Lit> = negs.iter().map(|&l| !l).collect();
        assert_eq!(s.solve_under_assumptions(&assumptions), SolveResult::Sat);
        assert!(lit_true(&s, x) || lit_true(&s, y) || lit_true(&s, z));
        for &n in &negs {
            assert!(!lit_true(&s, n));
        }
    }

    // All three negated at once is unsatisfiable.
    assert_eq!(s.solve_under_assumptions(&[!x, !y, !z]), SolveResult::Unsat);

    // The clause base itself is untouched.
    assert!(s.is_ok());
    assert_eq!(s.solve(), SolveResult::Sat);
}

#[test]
fn root_level_conflict_is_permanent() {
    let mut s = Solver::default();
    let a = Lit::positive(s.new_var(true, true));

    assert!(s.add_clause(&[a]));
    assert!(!s.add_clause(&[!a]));
    assert!(!s.is_ok());
    assert_eq!(s.solve(), SolveResult::Unsat);
}

#[test]
fn unit_propagation_at_root() {
    let mut s = Solver::default();
    let a = Lit::positive(s.new_var(true, true));
    let b = Lit::positive(s.new_var(true, true));
    let c = Lit::positive(s.new_var(true, true));

    s.add_clause(&[!a, b]);
    s.add_clause(&[a]);

    assert_eq!(s.value(a), LBool::True);
    assert_eq!(s.value(b), LBool::True);
    assert_eq!(s.level(a.var()), Some(0));
    assert_eq!(s.level(b.var()), Some(0));
    // `a` was a root unit, `b` was propagated by the binary clause.
    assert!(s.reason(a.var()).is_none());
    assert!(s.reason(b.var()).is_some());
    assert_eq!(s.value_var(c.var()), LBool::Undef);
    assert_eq!(s.level(c.var()), None);
}

#[test]
fn root_satisfied_clauses_are_discarded() {
    let mut s = Solver::default();
    let a = Lit::positive(s.new_var(true, true));
    let b = Lit::positive(s.new_var(true, true));

    s.add_clause(&[a]);
    let num_clauses = s.num_clauses();
    // Satisfied at root: must not be installed.
    s.add_clause(&[a, b]);
    assert_eq!(s.num_clauses(), num_clauses);
    // Tautology: must not be installed either.
    s.add_clause(&[b, !b]);
    assert_eq!(s.num_clauses(), num_clauses);

    assert_eq!(s.solve(), SolveResult::Sat);
}

#[test]
fn decision_budget_interrupts() {
    let mut s = Solver::default();
    let x = Lit::positive(s.new_var(true, true));
    let y = Lit::positive(s.new_var(true, true));
    s.add_clause(&[x, y]);

    s.set_decision_budget(Some(0));
    assert_eq!(s.solve(), SolveResult::Unknown);

    // The engine stays usable; without the budget the call succeeds.
    s.set_decision_budget(None);
    assert_eq!(s.solve(), SolveResult::Sat);
}

#[test]
fn propagation_only_solves_fit_any_budget() {
    let mut s = Solver::default();
    let a = Lit::positive(s.new_var(true, true));
    let b = Lit::positive(s.new_var(true, true));
    s.add_clause(&[a]);
    s.add_clause(&[!a, b]);

    s.set_decision_budget(Some(0));
    assert_eq!(s.solve(), SolveResult::Sat);
    assert_eq!(s.model_value(b.var()), Some(true));
}

#[test]
fn exponential_restarts_solve_too() {
    let mut s = Solver::new(Options {
        is_luby: false,
        ..Options::default()
    });
    let a = Lit::positive(s.new_var(true, true));
    let b = Lit::positive(s.new_var(true, true));
    let c = Lit::positive(s.new_var(true, true));

    // An odd parity constraint over three variables.
    s.add_clause(&[a, b, c]);
    s.add_clause(&[a, !b, !c]);
    s.add_clause(&[!a, b, !c]);
    s.add_clause(&[!a, !b, c]);

    assert_eq!(s.solve(), SolveResult::Sat);
    let parity = [a, b, c]
        .iter()
        .filter(|lit| s.model_value(lit.var()) == Some(true))
        .count();
    assert_eq!(parity % 2, 1);

    // Forcing even parity on top is unsatisfiable.
    s.add_clause(&[!a, !b, !c]);
    s.add_clause(&[!a, b, c]);
    s.add_clause(&[a, !b, c]);
    s.add_clause(&[a, b, !c]);
    assert_eq!(s.solve(), SolveResult::Unsat);
}

#[test]
fn named_variables_roundtrip() {
    let mut s = Solver::default();
    let a = s.var_for_name("a");
    let b = s.var_for_name("b");

    assert_ne!(a, b);
    assert_eq!(s.var_for_name("a"), a);
    assert_eq!(s.lookup_name("b"), Some(b));
    assert_eq!(s.lookup_name("zzz"), None);
    assert_eq!(s.name(a), Some("a"));
    assert_eq!(s.num_vars(), 2);
}

#[test]
fn restore_after_unsat_keeps_engine_usable() {
    let mut s = Solver::default();
    let a = Lit::positive(s.var_for_name("a"));
    let b = Lit::positive(s.var_for_name("b"));
    s.add_clause(&[a, b]);

    let state = s.save_state();

    let c = Lit::positive(s.var_for_name("c"));
    s.add_clause(&[c]);
    s.add_clause(&[!a]);
    s.add_clause(&[!b]);
    assert_eq!(s.solve(), SolveResult::Unsat);
    assert!(!s.is_ok());

    s.load_state(&state);
    assert!(s.is_ok());
    assert_eq!(s.num_vars(), 2);
    assert_eq!(s.lookup_name("c"), None);
    assert_eq!(s.solve(), SolveResult::Sat);
    assert_eq!(s.solve_under_assumptions(&[!a]), SolveResult::Sat);
    assert_eq!(s.model_value(b.var()), Some(true));
}

#[test]
fn restore_replays_pre_checkpoint_units() {
    let mut s = Solver::default();
    let a = Lit::positive(s.var_for_name("a"));
    let b = Lit::positive(s.var_for_name("b"));
    s.add_clause(&[!a, b]);
    s.add_clause(&[a]);
    assert_eq!(s.value(b), LBool::True);

    let state = s.save_state();
    s.add_clause(&[!b]);
    assert!(!s.is_ok());

    s.load_state(&state);
    // The pre-checkpoint units survive the rollback.
    assert_eq!(s.value(a), LBool::True);
    assert_eq!(s.value(b), LBool::True);
    assert_eq!(s.solve(), SolveResult::Sat);
}

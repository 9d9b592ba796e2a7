//! Backbone extraction on top of the CDCL engine.
//!
//! The driver implements the iterative algorithm of Janota, Lynce and
//! Marques-Silva ("Algorithms for Computing Backbones of Propositional
//! Formulae", AI Communications 28(2), 2015, Algorithm 3): after one initial
//! SAT call, every literal of the model over the relevant variables is a
//! backbone candidate, and each surviving candidate is confirmed or refuted
//! by a single SAT call under its negation as an assumption. Between the
//! calls, solver-state heuristics (level-0 fixings, complement models,
//! rotatable literals) shrink the candidate set without extra SAT calls.

use std::collections::BTreeSet;
use std::mem;

use snafu::Snafu;
use tracing::debug;

use crate::clause::Clause;
use crate::formula::{Formula, Literal};
use crate::lit::Lit;
use crate::solver::{SolveResult, Solver};
use crate::utils::DisplaySlice;
use crate::var::Var;

/// Toggles for the candidate-pruning heuristics. Every combination yields
/// the same backbone; the flags only trade SAT calls for solver-state scans.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BackboneConfig {
    /// Before the main loop, drop candidates that are rotatable in the
    /// initial model.
    pub initial_ub_check_for_rotatable_literals: bool,
    /// Before the main loop, commit relevant variables fixed at level 0.
    pub initial_lb_check_for_up_zero_literals: bool,
    /// During refinement, commit candidates that became fixed at level 0.
    pub check_for_up_zero_literals: bool,
    /// During refinement, drop candidates contradicted by the latest model.
    pub check_for_complement_model_literals: bool,
    /// During refinement, drop candidates that are rotatable in the latest
    /// model.
    pub check_for_rotatable_literals: bool,
}

pub const DEFAULT_BACKBONE_CONFIG: BackboneConfig = BackboneConfig {
    initial_ub_check_for_rotatable_literals: true,
    initial_lb_check_for_up_zero_literals: true,
    check_for_up_zero_literals: true,
    check_for_complement_model_literals: true,
    check_for_rotatable_literals: true,
};

impl Default for BackboneConfig {
    fn default() -> Self {
        DEFAULT_BACKBONE_CONFIG
    }
}

/// The backbone of a formula, projected onto the relevant variables and
/// sorted by name: variables true in every model, variables false in every
/// model, and the remaining (optional) relevant variables.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Backbone {
    pub positive: BTreeSet<String>,
    pub negative: BTreeSet<String>,
    pub optional: BTreeSet<String>,
}

pub type Result<T, E = BackboneError> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum BackboneError {
    /// The CNF factory handed over a formula shape the ingester does not
    /// accept. This is a programmer error; the engine state is not rolled
    /// back.
    #[snafu(display("Unexpected formula in CNF: {:?}", formula))]
    UnexpectedFormula { formula: Formula },

    /// A solve call exhausted its decision budget before reaching a verdict.
    #[snafu(display("Solve call exhausted its decision budget"))]
    Interrupted,
}

/// Install a CNF-shaped formula into the solver, allocating variables on
/// demand. `True` is a no-op and `False` inserts the empty clause; any
/// conjunct that is not a literal or a clause fails with
/// [`BackboneError::UnexpectedFormula`].
pub fn add_formula(solver: &mut Solver, formula: &Formula) -> Result<()> {
    match formula {
        Formula::True => {}
        Formula::False => {
            solver.add_clause(&[]);
        }
        Formula::Literal(_) | Formula::Or(_) => add_conjunct(solver, formula)?,
        Formula::And(conjuncts) => {
            for conjunct in conjuncts {
                add_conjunct(solver, conjunct)?;
            }
        }
    }
    Ok(())
}

fn add_conjunct(solver: &mut Solver, conjunct: &Formula) -> Result<()> {
    match conjunct {
        Formula::Literal(lit) => {
            let lit = solver_lit(solver, lit);
            solver.add_clause(&[lit]);
        }
        Formula::Or(lits) => {
            let clause: Vec<Lit> = lits.iter().map(|lit| solver_lit(solver, lit)).collect();
            solver.add_clause(&clause);
        }
        _ => {
            return UnexpectedFormulaSnafu { formula: conjunct.clone() }.fail();
        }
    }
    Ok(())
}

fn solver_lit(solver: &mut Solver, lit: &Literal) -> Lit {
    let var = solver.var_for_name(lit.name());
    Lit::new(var, !lit.phase())
}

/// Compute the backbone of the solver's clause base extended with the given
/// restrictions, projected onto `relevant`. Returns `Ok(None)` if base and
/// restrictions together are unsatisfiable. The engine is checkpointed on
/// entry and restored on every exit except an [`UnexpectedFormula`]
/// ingestion error, so restrictions, discovered backbone units and
/// on-demand variables do not outlive the call.
///
/// [`UnexpectedFormula`]: BackboneError::UnexpectedFormula
pub fn compute<I, S>(
    solver: &mut Solver,
    restrictions: &[Formula],
    relevant: I,
    config: &BackboneConfig,
) -> Result<Option<Backbone>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let relevant: BTreeSet<String> = relevant.into_iter().map(Into::into).collect();

    let state = solver.save_state();

    for formula in restrictions {
        add_formula(solver, formula)?;
    }

    match solver.solve() {
        SolveResult::Sat => {}
        SolveResult::Unsat => {
            solver.load_state(&state);
            return Ok(None);
        }
        SolveResult::Unknown => {
            solver.load_state(&state);
            return InterruptedSnafu.fail();
        }
    }

    // Project the relevant variables onto the engine. Names the engine has
    // never seen are unconstrained by the clause base; they are skipped here
    // and end up in the optional set.
    let mut vars = Vec::with_capacity(relevant.len());
    for name in &relevant {
        match solver.lookup_name(name) {
            Some(var) => vars.push(var),
            None => debug!("Relevant variable '{}' is unknown to the solver", name),
        }
    }

    let mut bb = BackboneState::default();
    create_initial_candidates(solver, &mut bb, &vars, config);
    debug!("Initial candidates: {}", DisplaySlice(&bb.candidates));

    while let Some(lit) = bb.candidates.pop() {
        match solver.solve_under_assumptions(&[!lit]) {
            SolveResult::Unsat => {
                // `!lit` is inconsistent with the base: `lit` is entailed.
                add_backbone_literal(solver, &mut bb, lit);
            }
            SolveResult::Sat => {
                refine_upper_bound(solver, &mut bb, config);
            }
            SolveResult::Unknown => {
                solver.load_state(&state);
                return InterruptedSnafu.fail();
            }
        }
    }

    let backbone = bb.project(solver, &relevant);
    solver.load_state(&state);
    Ok(Some(backbone))
}

#[derive(Debug, Default)]
struct BackboneState {
    candidates: Vec<Lit>,
    positive: Vec<Lit>,
    negative: Vec<Lit>,
}

impl BackboneState {
    fn record(&mut self, lit: Lit) {
        if lit.negated() {
            self.negative.push(lit);
        } else {
            self.positive.push(lit);
        }
    }

    fn project(&self, solver: &Solver, relevant: &BTreeSet<String>) -> Backbone {
        let mut positive = BTreeSet::new();
        for &lit in &self.positive {
            if let Some(name) = solver.name(lit.var()) {
                positive.insert(name.to_string());
            }
        }
        let mut negative = BTreeSet::new();
        for &lit in &self.negative {
            if let Some(name) = solver.name(lit.var()) {
                negative.insert(name.to_string());
            }
        }
        let optional = relevant
            .iter()
            .filter(|name| !positive.contains(*name) && !negative.contains(*name))
            .cloned()
            .collect();
        Backbone { positive, negative, optional }
    }
}

/// The literal of `var` satisfied by the saved model. A backbone candidate
/// asks whether this polarity is forced in every model.
fn model_literal(solver: &Solver, var: Var) -> Lit {
    Lit::new(var, !solver.model()[var])
}

fn create_initial_candidates(solver: &Solver, bb: &mut BackboneState, vars: &[Var], config: &BackboneConfig) {
    for &var in vars {
        let lit = model_literal(solver, var);
        if config.initial_lb_check_for_up_zero_literals && is_up_zero(solver, var) {
            // Fixed at level 0: committed with its level-0 truth value.
            // The unit clause is already entailed, so none is added.
            bb.record(lit);
        } else if !config.initial_ub_check_for_rotatable_literals || !is_rotatable(solver, lit) {
            bb.candidates.push(lit);
        }
    }
}

/// Commit `lit` as a backbone literal and make the engine permanently aware
/// of it (within the active checkpoint window) through a unit clause.
fn add_backbone_literal(solver: &mut Solver, bb: &mut BackboneState, lit: Lit) {
    debug!("Backbone literal {}", lit);
    bb.record(lit);
    solver.add_clause(&[lit]);
}

/// Sweep the remaining candidates against the latest model: candidates now
/// fixed at level 0 are committed, candidates whose variable the model
/// assigns to the complement (both polarities witnessed) or that are
/// rotatable are dropped. Survivors keep their order.
fn refine_upper_bound(solver: &mut Solver, bb: &mut BackboneState, config: &BackboneConfig) {
    let candidates = mem::take(&mut bb.candidates);
    let mut confirmed = Vec::new();
    for lit in candidates {
        if config.check_for_up_zero_literals && is_up_zero(solver, lit.var()) {
            confirmed.push(lit);
        } else if config.check_for_complement_model_literals && solver.model()[lit.var()] == lit.negated() {
            debug!("Candidate {} contradicted by the latest model", lit);
        } else if config.check_for_rotatable_literals && is_rotatable(solver, lit) {
            debug!("Candidate {} is rotatable", lit);
        } else {
            bb.candidates.push(lit);
        }
    }
    for lit in confirmed {
        add_backbone_literal(solver, bb, lit);
    }
}

fn is_up_zero(solver: &Solver, var: Var) -> bool {
    solver.level(var) == Some(0)
}

/// A literal is rotatable if flipping it in the saved model falsifies no
/// clause, which refutes its backbone candidacy on the spot. Checked
/// against the watch lists: a clause that depends on `lit` alone has `lit`
/// among its watched literals.
fn is_rotatable(solver: &Solver, lit: Lit) -> bool {
    // A literal fixed at the root can never be flipped. Unit clauses are
    // not materialized in the watch lists, so this case is checked first.
    if is_up_zero(solver, lit.var()) {
        return false;
    }
    // Unit propagated literals cannot be rotatable.
    if solver.reason(lit.var()).is_some() {
        return false;
    }
    for watcher in solver.watchers(lit) {
        let clause = solver.clause(watcher.cref);
        if clause.is_deleted() {
            continue;
        }
        if is_unit(solver, lit, clause) {
            return false;
        }
    }
    true
}

/// A clause is unit under `lit` iff every other literal in it is false in
/// the saved model.
fn is_unit(solver: &Solver, lit: Lit, clause: &Clause) -> bool {
    clause.iter().all(|&other| other == lit || solver.model()[other.var()] == other.negated())
}

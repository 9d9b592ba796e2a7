use std::collections::HashMap;
use std::mem;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::assignment::Assignment;
use crate::clause::Clause;
use crate::clause_allocator::ClauseAllocator;
use crate::clause_database::ClauseDatabase;
use crate::cref::ClauseRef;
use crate::idx::{VarMap, VarVec};
use crate::lbool::LBool;
use crate::lit::Lit;
use crate::options::Options;
use crate::restart::RestartStrategy;
use crate::var::Var;
use crate::var_order::VarOrder;
use crate::watch::{WatchList, Watcher};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SolveResult {
    Sat,
    Unsat,
    /// The decision budget ran out before a verdict was reached.
    Unknown,
}

/// An engine checkpoint: the cardinalities `load_state` truncates back to.
#[derive(Debug, Clone)]
pub struct SolverState {
    ok: bool,
    num_vars: usize,
    num_allocated: usize,
    num_units: usize,
}

/// Incremental CDCL SAT solver.
///
/// The solver is a single mutable state machine: clauses are installed with
/// [`add_clause`][Solver::add_clause] (or through the name-based formula
/// ingestion), queried with [`solve`][Solver::solve] /
/// [`solve_under_assumptions`][Solver::solve_under_assumptions], and rolled
/// back to an earlier clause base with [`save_state`][Solver::save_state] /
/// [`load_state`][Solver::load_state]. After a satisfiable call the model is
/// kept and the trail is rewound to the root level, so level-0 consequences
/// stay visible through [`value`][Solver::value] while the full assignment
/// is read through [`model_value`][Solver::model_value].
#[derive(Debug)]
pub struct Solver {
    ca: ClauseAllocator,
    db: ClauseDatabase,
    watchlist: WatchList,
    assignment: Assignment,
    pub var_order: VarOrder,
    polarity: VarVec<bool>, // `pol=true` => negated lit; `false` => positive
    restart_strategy: RestartStrategy,
    options: Options,
    ok: bool,
    next_var: u32,
    // Name <-> index mapping for formula-level variables:
    name2idx: HashMap<String, Var>,
    idx2name: VarMap<String>,
    // Incremental interface:
    assumptions: Vec<Lit>,
    unit_clauses: Vec<Lit>,
    model: VarVec<bool>,
    decision_budget: Option<usize>,
    budget_left: Option<usize>,
    // Statistics:
    decisions: usize,
    propagations: usize,
    conflicts: usize,
    restarts: usize,
    reduces: usize,
    // Timings:
    pub time_search: Duration,
    pub time_propagate: Duration,
    pub time_analyze: Duration,
    pub time_backtrack: Duration,
    pub time_decide: Duration,
    pub time_restart: Duration,
    pub time_reduce: Duration,
    // For `reduce_db`:
    max_learnts: f64,
    learntsize_adjust_cnt: u64,
    learntsize_adjust_confl: f64,
}

impl Solver {
    pub fn new(options: Options) -> Self {
        Self {
            ca: ClauseAllocator::new(),
            db: ClauseDatabase::new(),
            watchlist: WatchList::new(),
            assignment: Assignment::new(),
            var_order: VarOrder::new(),
            polarity: VarVec::new(),
            restart_strategy: RestartStrategy::new(&options),
            options,
            ok: true,
            next_var: 0,
            name2idx: HashMap::new(),
            idx2name: VarMap::new(),
            assumptions: Vec::new(),
            unit_clauses: Vec::new(),
            model: VarVec::new(),
            decision_budget: None,
            budget_left: None,
            decisions: 0,
            propagations: 0,
            conflicts: 0,
            restarts: 0,
            reduces: 0,
            time_search: Duration::new(0, 0),
            time_propagate: Duration::new(0, 0),
            time_analyze: Duration::new(0, 0),
            time_backtrack: Duration::new(0, 0),
            time_decide: Duration::new(0, 0),
            time_restart: Duration::new(0, 0),
            time_reduce: Duration::new(0, 0),
            max_learnts: f64::MAX,
            learntsize_adjust_cnt: 0,
            learntsize_adjust_confl: 0.0,
        }
    }
}

impl Default for Solver {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl Solver {
    /// Number of variables.
    pub fn num_vars(&self) -> usize {
        self.next_var as _
    }
    /// Number of original clauses.
    pub fn num_clauses(&self) -> usize {
        self.db.num_clauses()
    }
    /// Number of learnt clauses.
    pub fn num_learnts(&self) -> usize {
        self.db.num_learnts()
    }
    /// Number of decisions.
    pub fn num_decisions(&self) -> usize {
        self.decisions
    }
    /// Number of propagations.
    pub fn num_propagations(&self) -> usize {
        self.propagations
    }
    /// Number of conflicts.
    pub fn num_conflicts(&self) -> usize {
        self.conflicts
    }
    /// Number of restarts.
    pub fn num_restarts(&self) -> usize {
        self.restarts
    }
    /// Number of clause database reductions.
    pub fn num_reduces(&self) -> usize {
        self.reduces
    }

    /// `false` iff the clause base has been found unsatisfiable at the root.
    pub fn is_ok(&self) -> bool {
        self.ok
    }

    /// Allocate a new variable. `polarity` is the initial saved phase
    /// (`true` picks the negative literal first, as in MiniSat); variables
    /// with `decision = false` are never picked by the branching heuristic.
    pub fn new_var(&mut self, polarity: bool, decision: bool) -> Var {
        let var = Var::new(self.next_var);
        self.next_var += 1;

        // Watch
        self.watchlist.init(var);

        // Assignment, reason/level
        self.assignment.push_var();

        // Polarity
        self.polarity.push(polarity);

        // VSIDS
        self.var_order.push_var(decision);
        self.var_order.insert_var_order(var);

        var
    }

    /// The variable registered under `name`, allocating it on first mention.
    pub fn var_for_name(&mut self, name: &str) -> Var {
        if let Some(&var) = self.name2idx.get(name) {
            return var;
        }
        let var = self.new_var(true, true);
        self.name2idx.insert(name.to_string(), var);
        self.idx2name.insert(var, name.to_string());
        var
    }

    /// The variable registered under `name`, if any.
    pub fn lookup_name(&self, name: &str) -> Option<Var> {
        self.name2idx.get(name).copied()
    }

    /// The name `var` was registered under, if any.
    pub fn name(&self, var: Var) -> Option<&str> {
        self.idx2name.get(var).map(String::as_str)
    }

    /// Value of the variable.
    pub fn value_var(&self, var: Var) -> LBool {
        self.assignment.value_var(var)
    }
    /// Value of the literal.
    pub fn value(&self, lit: Lit) -> LBool {
        self.assignment.value(lit)
    }

    /// Value of `var` in the model of the last satisfiable `solve` call.
    pub fn model_value(&self, var: Var) -> Option<bool> {
        self.model.get(&var).copied()
    }
    pub(crate) fn model(&self) -> &VarVec<bool> {
        &self.model
    }

    /// The clause that propagated `var`'s most recent assignment, if any.
    pub fn reason(&self, var: Var) -> Option<ClauseRef> {
        self.assignment.reason(var)
    }
    /// The decision level of `var`'s most recent assignment
    /// (`None` if it has never been assigned).
    pub fn level(&self, var: Var) -> Option<usize> {
        self.assignment.level(var)
    }

    /// The current decision level.
    pub fn decision_level(&self) -> usize {
        self.assignment.decision_level()
    }

    pub fn clause(&self, cref: ClauseRef) -> &Clause {
        self.ca.clause(cref)
    }

    /// Clauses in which `lit` is one of the two watched literals.
    pub fn watchers(&self, lit: Lit) -> &[Watcher] {
        self.watchlist.watchers(lit)
    }

    /// Limit the number of branching decisions per `solve` call; exceeding
    /// the budget makes `solve` return [`SolveResult::Unknown`].
    pub fn set_decision_budget(&mut self, budget: Option<usize>) {
        self.decision_budget = budget;
    }

    /// Install a clause into the permanent base. The clause is sorted and
    /// deduplicated; tautologies and clauses already satisfied at the root
    /// are discarded, root-falsified literals are stripped. A unit clause is
    /// assigned at level 0 and propagated immediately. Returns `false` iff
    /// the clause base is now unsatisfiable at the root.
    pub fn add_clause(&mut self, lits: &[Lit]) -> bool {
        // If the solver is already in UNSAT state, we do not need to add new clause.
        if !self.ok {
            return false;
        }

        if self.decision_level() > 0 {
            self.backtrack(0);
        }

        // Auto-create missing variables.
        if let Some(max_var) = lits.iter().map(|&lit| lit.var().index()).max() {
            while self.num_vars() <= max_var {
                self.new_var(true, true);
            }
        }

        let mut lits = lits.to_vec();
        lits.sort_by_key(|lit| lit.inner());
        lits.dedup();
        // After sorting, both literals of a variable are adjacent; with
        // duplicates gone, an adjacent pair on the same variable is `p, ~p`.
        if lits.windows(2).any(|w| w[0].var() == w[1].var()) {
            debug!("Skipping tautological clause {:?}", lits);
            return true;
        }
        if lits.iter().any(|&lit| self.assignment.fixed(lit) == LBool::True) {
            debug!("Skipping clause satisfied at root: {:?}", lits);
            return true;
        }
        lits.retain(|&lit| self.assignment.fixed(lit) != LBool::False);

        match lits.len() {
            0 => {
                // Empty clause (or every literal already false at the root).
                self.ok = false;
            }
            1 => {
                debug_assert_eq!(self.decision_level(), 0);
                self.unit_clauses.push(lits[0]);
                if self.assignment.enqueue(lits[0], None) {
                    self.ok = self.propagate().is_none();
                } else {
                    // Conflict on 0th level => UNSAT
                    self.ok = false;
                }
            }
            _ => {
                let cref = self.db.add_clause(&*lits, false, &mut self.ca);
                self.attach_clause(cref);
            }
        }
        self.ok
    }

    fn attach_clause(&mut self, cref: ClauseRef) {
        let clause = self.ca.clause(cref);
        debug_assert!(clause.len() >= 2, "Clause must have at least 2 literals");
        let a = clause[0];
        let b = clause[1];
        self.watchlist.insert(a, Watcher { cref, blocker: b });
        self.watchlist.insert(b, Watcher { cref, blocker: a });
    }

    fn report(&self, stage: &str) {
        info!(
            "{} lvl={} rst={} red={} dec={} prp={} cfl={} lrn={} cls={} vrs={}",
            stage,
            self.decision_level(),
            self.num_restarts(),
            self.num_reduces(),
            self.num_decisions(),
            self.num_propagations(),
            self.num_conflicts(),
            self.num_learnts(),
            self.num_clauses(),
            self.num_vars()
        );
    }

    pub fn solve(&mut self) -> SolveResult {
        self.solve_under_assumptions(&[])
    }

    /// Solve under the given assumptions. Each assumption is installed as a
    /// pseudo-decision at its own level; `Unsat` under assumptions does not
    /// mark the clause base itself unsatisfiable, and the engine stays
    /// reusable afterwards.
    pub fn solve_under_assumptions(&mut self, assumptions: &[Lit]) -> SolveResult {
        self.assumptions = assumptions.to_vec();
        let result = self.solve_internal();
        self.assumptions.clear();
        result
    }

    fn solve_internal(&mut self) -> SolveResult {
        self.model.clear();
        self.budget_left = self.decision_budget;

        if !self.ok {
            return SolveResult::Unsat;
        }

        debug_assert_eq!(self.decision_level(), 0);

        self.max_learnts = self.num_clauses() as f64 * self.options.learntsize_factor;
        self.learntsize_adjust_confl = self.options.learntsize_adjust_start;
        self.learntsize_adjust_cnt = self.learntsize_adjust_confl as _;

        let mut current_restarts = 0;
        let status = loop {
            let num_confl = self.restart_strategy.num_confl(current_restarts);
            let time_search_start = Instant::now();
            let status = self.search(num_confl);
            current_restarts += 1;
            let time_search = time_search_start.elapsed();
            self.time_search += time_search;
            debug!("Search #{} done in {:?}", current_restarts, time_search);
            if let Some(status) = status {
                break status;
            }
        };

        if status == SolveResult::Sat {
            // Save the model before the trail is rewound.
            let model: Vec<bool> = (0..self.num_vars())
                .map(|i| self.value_var(Var::new(i as u32)) == LBool::True)
                .collect();
            self.model = VarVec::from(model);
        }
        self.backtrack(0);
        status
    }

    /// One restart-bounded round of the CDCL loop: propagate, analyze
    /// conflicts and backjump; between conflicts install pending assumptions
    /// and make decisions.
    ///
    /// **Returns:**
    ///
    /// - [`Some(Sat)`][Some] if no unassigned decision variables remain,
    /// - [`Some(Unsat)`][Some] on a root-level conflict or a falsified
    ///   assumption,
    /// - [`Some(Unknown)`][Some] if the decision budget ran out,
    /// - [`None`] if the conflict limit triggered a restart.
    fn search(&mut self, num_confl: usize) -> Option<SolveResult> {
        debug_assert!(self.ok);
        debug_assert_eq!(self.decision_level(), 0);

        let confl_limit = if num_confl > 0 { self.conflicts + num_confl } else { usize::MAX };

        // CDCL loop
        loop {
            // Propagate, analyze, backtrack:
            //  - Returns `true` if everything OK so far
            //  - Returns `false` if conflict on root level was found (UNSAT)
            if !self.propagate_analyze_backtrack() {
                info!("UNSAT");
                return Some(SolveResult::Unsat);
            }

            // Restart:
            if self.conflicts >= confl_limit {
                self.restart();
                return None;
            }

            // Reduce DB:
            let learnts_limit = self.max_learnts + self.assignment.trail.len() as f64;
            if self.num_learnts() >= self.options.min_learnts_limit && self.num_learnts() as f64 >= learnts_limit {
                self.reduce_db();
            }

            let time_decide_start = Instant::now();

            // Install pending assumptions as pseudo-decisions:
            let mut next = None;
            while self.decision_level() < self.assumptions.len() {
                let p = self.assumptions[self.decision_level()];
                match self.value(p) {
                    LBool::True => {
                        // Already satisfied: open an empty level for it.
                        self.assignment.new_decision_level();
                    }
                    LBool::False => {
                        debug!("Assumption {:?} is falsified", p);
                        self.time_decide += time_decide_start.elapsed();
                        return Some(SolveResult::Unsat);
                    }
                    LBool::Undef => {
                        next = Some(p);
                        break;
                    }
                }
            }

            // Make a decision:
            let decision = match next {
                Some(p) => p,
                None => {
                    match self.pick_branching_variable() {
                        Some(var) => {
                            if matches!(self.budget_left, Some(0)) {
                                // The picked variable stays unassigned, so it
                                // must go back into the order heap.
                                self.var_order.insert_var_order(var);
                                info!("Decision budget exhausted");
                                self.time_decide += time_decide_start.elapsed();
                                self.backtrack(0);
                                return Some(SolveResult::Unknown);
                            }
                            self.decisions += 1;
                            if let Some(left) = self.budget_left.as_mut() {
                                *left -= 1;
                            }
                            self.pick_phase(var)
                        }
                        None => {
                            // No unassigned decision variables left.
                            self.time_decide += time_decide_start.elapsed();
                            info!("SAT");
                            return Some(SolveResult::Sat);
                        }
                    }
                }
            };

            debug!(
                "Made a decision = {:?} = {}{:?}",
                decision,
                if decision.negated() { "-" } else { "+" },
                decision.var()
            );
            self.assignment.new_decision_level();
            self.assignment.unchecked_enqueue(decision, None);
            self.time_decide += time_decide_start.elapsed();
        }
    }

    /// Propagate and then if there is a conflict, analyze it, backtrack, and add the learnt clause.
    ///
    /// **Returns:**
    ///
    /// - `false`, if a conflict on root level was found (UNSAT),
    /// - `true`, otherwise.
    fn propagate_analyze_backtrack(&mut self) -> bool {
        while let Some(conflict) = self.propagate() {
            self.conflicts += 1;

            if self.decision_level() == 0 {
                // Conflict on the root level: the clause base is unsatisfiable.
                self.ok = false;
                return false;
            }

            // Analyze the conflict:
            let (lemma, backtrack_level) = self.analyze(conflict);
            debug!("Learnt {:?}", lemma);

            // Backjump:
            self.backtrack(backtrack_level);

            // Add the learnt clause:
            debug_assert!(!lemma.is_empty());
            if lemma.len() == 1 {
                // Learn a unit clause
                debug_assert_eq!(self.decision_level(), 0);
                self.unit_clauses.push(lemma[0]);
                self.assignment.unchecked_enqueue(lemma[0], None);
                self.report("unit");
            } else {
                // Learn a clause
                let asserting_literal = lemma[0];
                let cref = self.db.add_clause(&*lemma, true, &mut self.ca);
                self.attach_clause(cref);
                self.db.cla_bump_activity(cref, &mut self.ca);
                self.assignment.enqueue(asserting_literal, Some(cref));
            }

            self.var_order.var_decay_activity();
            self.db.cla_decay_activity();
            self.update_reduce_db();
        }
        true
    }

    fn propagate(&mut self) -> Option<ClauseRef> {
        let time_propagate_start = Instant::now();

        let mut conflict = None;

        #[inline]
        fn ptr_diff<T>(a: *const T, b: *const T) -> usize {
            ((b as usize) - (a as usize)) / mem::size_of::<T>()
        }

        while let Some(p) = self.assignment.dequeue() {
            debug_assert_eq!(self.level(p.var()), Some(self.decision_level()));
            self.propagations += 1;
            let false_literal = !p;

            unsafe {
                let watchers = self.watchlist.lookup(false_literal);
                let ws = watchers.as_mut_ptr();

                let begin = ws;
                let end = begin.add(watchers.len());

                let mut i = begin;
                let mut j = begin;

                'watches: while i < end {
                    let Watcher { cref, blocker } = *i;
                    i = i.add(1);

                    let clause = self.ca.clause_mut(cref);

                    // Skip the deleted clause:
                    if clause.is_deleted() {
                        continue;
                    }

                    // Try to avoid inspecting the clause:
                    if self.assignment.value(blocker) == LBool::True {
                        *j = Watcher { cref, blocker };
                        j = j.add(1);
                        continue;
                    }

                    // Make sure the false literal is at index 1:
                    if clause[0] == false_literal {
                        clause[0] = clause[1];
                        clause[1] = false_literal;
                    }
                    debug_assert_eq!(clause[1], false_literal, "clause[1] must be false_literal");

                    // If the first literal is `true`, then the clause is already satisfied
                    let first = clause[0];
                    if first != blocker && self.assignment.value(first) == LBool::True {
                        *j = Watcher { cref, blocker: first };
                        j = j.add(1);
                        continue;
                    }

                    // Find the non-falsified literal:
                    for k in 2..clause.len() {
                        let other = clause[k];
                        if self.assignment.value(other) != LBool::False {
                            clause[1] = other;
                            clause[k] = false_literal;
                            self.watchlist.insert(other, Watcher { cref, blocker: first });
                            continue 'watches;
                        }
                    }

                    *j = Watcher { cref, blocker: first };
                    j = j.add(1);
                    match self.assignment.value(first) {
                        LBool::Undef => {
                            // unit
                            debug!("Propagated unit {:?} with reason {:?} = {:?}", first, cref, self.clause(cref));
                            self.assignment.unchecked_enqueue(first, Some(cref));
                        }
                        LBool::False => {
                            // conflict
                            debug!("Found conflict: {:?} = {:?}", cref, self.clause(cref));
                            conflict = Some(cref);
                            self.assignment.qhead = self.assignment.trail.len();
                            // Copy the remaining watches:
                            while i < end {
                                *j = *i;
                                j = j.add(1);
                                i = i.add(1);
                            }
                        }
                        LBool::True => unreachable!(),
                    }
                }

                self.watchlist.lookup(false_literal).truncate(ptr_diff(begin, j));
            }
        }

        self.time_propagate += time_propagate_start.elapsed();
        conflict
    }

    /// Returns learnt clause and backtrack level.
    fn analyze(&mut self, conflict: ClauseRef) -> (Vec<Lit>, usize) {
        debug!(
            "Analyze conflict @{}: {:?} = {:?}",
            self.decision_level(),
            conflict,
            self.clause(conflict)
        );
        debug_assert!(self.decision_level() > 0);

        let time_analyze_start = Instant::now();

        let mut lemma = Vec::new();
        let mut seen = VarVec::from(vec![false; self.num_vars()]);
        let mut active: u32 = 0; // number of literals in the conflicting clause on the current decision level
        let mut reason = conflict;
        let mut index = self.assignment.trail.len();

        loop {
            // Bump `reason` clause activity:
            self.db.cla_bump_activity(reason, &mut self.ca);

            let clause = self.ca.clause(reason);
            let start_index = if reason == conflict { 0 } else { 1 };
            for &q in &clause.lits()[start_index..] {
                debug_assert_eq!(self.value(q), LBool::False);

                if !seen[q.var()] && self.assignment.level_greater_zero(q.var()) {
                    seen[q.var()] = true;

                    // Bump `q` variable activity:
                    self.var_order.var_bump_activity(q.var());

                    match self.level(q.var()) {
                        Some(level) if level < self.decision_level() => lemma.push(q),
                        _ => {
                            debug_assert_eq!(self.level(q.var()), Some(self.decision_level()));
                            active += 1;
                        }
                    }
                }
            }

            // Select next clause (`reason`) to look at:
            loop {
                index -= 1;
                if seen[self.assignment.trail[index].var()] {
                    break;
                }
            }
            let p = self.assignment.trail[index];
            debug_assert_eq!(self.level(p.var()), Some(self.decision_level()));
            seen[p.var()] = false;
            active -= 1;
            if active == 0 {
                // Prepend the asserting literal:
                lemma.insert(0, !p);
                break;
            }
            reason = match self.reason(p.var()) {
                Some(cref) => cref,
                None => unreachable!("non-UIP literal on the conflict level must have a reason"),
            };
            debug_assert_eq!(self.clause(reason)[0], p);
        }

        // Save learnt literals for later usage:
        let analyze_to_clear = lemma.clone();

        // Minimize the learnt clause:
        // Note: only "local" minimization (i.e. not "recursive") is implemented.
        lemma.retain(|&lit| !self.lit_redundant_basic(lit, &seen));

        // Clear the `seen` vector:
        for lit in analyze_to_clear {
            seen[lit.var()] = false;
        }
        debug_assert!(seen.iter().all(|&x| !x));

        // Find the correct backtrack level:
        let bt_level = if lemma.len() == 1 {
            0
        } else {
            let mut max_i = 1;
            // Find the first literal assigned at the next-highest level:
            for i in 2..lemma.len() {
                if self.level(lemma[i].var()) > self.level(lemma[max_i].var()) {
                    max_i = i;
                }
            }
            // Swap-in this literal at index 1:
            lemma.swap(1, max_i);
            self.level(lemma[1].var()).unwrap_or(0)
        };

        self.time_analyze += time_analyze_start.elapsed();
        (lemma, bt_level)
    }

    fn lit_redundant_basic(&self, lit: Lit, seen: &VarVec<bool>) -> bool {
        match self.reason(lit.var()) {
            None => false,
            Some(cref) => {
                let clause = self.ca.clause(cref);
                debug_assert_eq!(clause[0], !lit);
                for &x in &clause.lits()[1..] {
                    let v = x.var();
                    if !seen[v] && self.assignment.level_greater_zero(v) {
                        return false;
                    }
                }
                true
            }
        }
    }

    fn backtrack(&mut self, level: usize) {
        debug!("backtrack from {} to {}", self.decision_level(), level);

        let time_backtrack_start = Instant::now();

        if self.decision_level() > level {
            for i in (self.assignment.trail_lim[level]..self.assignment.trail.len()).rev() {
                let var = self.assignment.trail[i].var();
                // Phase saving:
                if let Some(value) = self.assignment.value_var(var).bool() {
                    self.polarity[var] = !value;
                }
                // Unassign the variable:
                self.assignment.unassign(var);
                // Put the variable back into the order heap:
                self.var_order.insert_var_order(var);
            }
            self.assignment.qhead = self.assignment.trail_lim[level];
            self.assignment.trail.truncate(self.assignment.trail_lim[level]);
            self.assignment.trail_lim.truncate(level);
        }

        self.time_backtrack += time_backtrack_start.elapsed();
    }

    /// Undo every assignment, including the root-level ones. Stale reasons
    /// are cleared; levels keep describing the last assignment each variable
    /// had.
    fn complete_backtrack(&mut self) {
        for i in 0..self.num_vars() {
            let var = Var::new(i as u32);
            self.assignment.unassign(var);
            self.assignment.clear_reason(var);
            self.var_order.insert_var_order(var);
        }
        self.assignment.trail.clear();
        self.assignment.trail_lim.clear();
        self.assignment.qhead = 0;
    }

    fn pick_branching_variable(&mut self) -> Option<Var> {
        self.var_order.pick_branching_variable(&self.assignment)
    }

    fn pick_phase(&mut self, var: Var) -> Lit {
        Lit::new(var, self.polarity[var])
    }

    fn restart(&mut self) {
        let time_restart_start = Instant::now();
        self.restarts += 1;
        self.report("restart");
        self.backtrack(0);
        self.time_restart += time_restart_start.elapsed();
    }

    fn update_reduce_db(&mut self) {
        self.learntsize_adjust_cnt -= 1;
        if self.learntsize_adjust_cnt == 0 {
            self.learntsize_adjust_confl *= self.options.learntsize_adjust_inc;
            self.learntsize_adjust_cnt = self.learntsize_adjust_confl as _;
            self.max_learnts *= self.options.learntsize_inc;
            debug!(
                "New max_learnts = {}, learntsize_adjust_cnt = {}",
                self.max_learnts as u64, self.learntsize_adjust_cnt
            );
        }
    }

    fn reduce_db(&mut self) {
        let time_reduce_start = Instant::now();
        self.reduces += 1;
        self.report("reduce");
        self.db.reduce(&self.assignment, &mut self.ca);
        self.time_reduce += time_reduce_start.elapsed();
    }

    /// Checkpoint the engine: clause base, variable table and root-unit
    /// journal cardinalities.
    pub fn save_state(&self) -> SolverState {
        SolverState {
            ok: self.ok,
            num_vars: self.num_vars(),
            num_allocated: self.ca.len(),
            num_units: self.unit_clauses.len(),
        }
    }

    /// Roll the engine back to a checkpoint taken with
    /// [`save_state`][Solver::save_state]: clauses and variables allocated
    /// since then are discarded (with their names and watch lists), and the
    /// surviving root units are replayed. The engine is reusable afterwards
    /// even if it had become unsatisfiable in between.
    pub fn load_state(&mut self, state: &SolverState) {
        debug!("load_state {:?}", state);

        self.complete_backtrack();
        self.ok = state.ok;

        // Detach and drop every clause allocated after the checkpoint.
        // Clauses deleted by `reduce` are detached too: their watchers are
        // cleaned up lazily and may still linger in the watch lists.
        for i in state.num_allocated..self.ca.len() {
            let cref = ClauseRef(i);
            let clause = self.ca.clause(cref);
            if clause.len() < 2 {
                continue;
            }
            let (a, b) = (clause[0], clause[1]);
            self.watchlist.remove(a, cref);
            self.watchlist.remove(b, cref);
        }
        self.db.remove_from_mark(state.num_allocated);
        self.ca.truncate(state.num_allocated);

        // Drop variables allocated after the checkpoint, with their names.
        for i in state.num_vars..self.num_vars() {
            let var = Var::new(i as u32);
            if let Some(name) = self.idx2name.remove(var) {
                self.name2idx.remove(&name);
            }
        }
        self.watchlist.truncate_vars(state.num_vars);
        self.assignment.truncate_vars(state.num_vars);
        self.polarity.truncate(state.num_vars);
        self.var_order.truncate_vars(state.num_vars);
        self.next_var = state.num_vars as u32;

        // Replay the surviving root units.
        self.unit_clauses.truncate(state.num_units);
        for i in 0..self.unit_clauses.len() {
            if !self.ok {
                break;
            }
            let lit = self.unit_clauses[i];
            if self.assignment.enqueue(lit, None) {
                self.ok = self.propagate().is_none();
            } else {
                self.ok = false;
            }
        }
    }
}

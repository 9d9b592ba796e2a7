use tracing::debug;

use crate::cref::ClauseRef;
use crate::idx::VarVec;
use crate::lbool::LBool;
use crate::lit::Lit;
use crate::var::Var;

/// Reason and level of a variable's most recent assignment. Both survive
/// backtracking: until the variable is assigned again they describe the
/// assignment it last had, which is what the backbone heuristics inspect
/// after a solve call has returned to the root level.
#[derive(Debug)]
pub struct VarData {
    pub(crate) reason: Option<ClauseRef>,
    pub(crate) level: Option<usize>,
}

#[derive(Debug)]
pub struct Assignment {
    pub(crate) assignment: VarVec<LBool>, // {var: value}
    pub(crate) var_data: VarVec<VarData>, // {var: {reason,level}}
    pub(crate) trail: Vec<Lit>,
    pub(crate) trail_lim: Vec<usize>,
    pub(crate) qhead: usize,
}

impl Assignment {
    pub const fn new() -> Self {
        Self {
            assignment: VarVec::new(),
            var_data: VarVec::new(),
            trail: Vec::new(),
            trail_lim: Vec::new(),
            qhead: 0,
        }
    }

    pub(crate) fn push_var(&mut self) {
        self.assignment.push(LBool::Undef);
        self.var_data.push(VarData { reason: None, level: None });
    }

    pub(crate) fn truncate_vars(&mut self, num_vars: usize) {
        self.assignment.truncate(num_vars);
        self.var_data.truncate(num_vars);
    }

    pub fn value(&self, lit: Lit) -> LBool {
        self.assignment[lit.var()] ^ lit.negated()
    }
    pub fn value_var(&self, var: Var) -> LBool {
        self.assignment[var]
    }
    pub fn unassign(&mut self, var: Var) {
        self.assignment[var] = LBool::Undef;
    }

    pub fn reason(&self, var: Var) -> Option<ClauseRef> {
        self.var_data[var].reason
    }
    pub(crate) fn clear_reason(&mut self, var: Var) {
        self.var_data[var].reason = None;
    }
    pub fn level(&self, var: Var) -> Option<usize> {
        self.var_data[var].level
    }
    pub fn level_greater_zero(&self, var: Var) -> bool {
        matches!(self.var_data[var].level, Some(level) if level > 0)
    }

    /// The root-entailed value of `lit`: its value if it is fixed at level 0,
    /// `Undef` otherwise.
    pub fn fixed(&self, lit: Lit) -> LBool {
        if self.level_greater_zero(lit.var()) {
            LBool::Undef
        } else {
            self.value(lit)
        }
    }
    pub fn fixed_var(&self, var: Var) -> LBool {
        if self.level_greater_zero(var) {
            LBool::Undef
        } else {
            self.value_var(var)
        }
    }

    pub fn decision_level(&self) -> usize {
        self.trail_lim.len()
    }
    pub fn new_decision_level(&mut self) {
        self.trail_lim.push(self.trail.len());
    }

    pub fn unchecked_enqueue(&mut self, lit: Lit, reason: Option<ClauseRef>) {
        debug_assert_eq!(self.value(lit), LBool::Undef);

        self.assignment[lit.var()] = LBool::from(!lit.negated());
        self.var_data[lit.var()] = VarData {
            reason,
            level: Some(self.decision_level()),
        };
        self.trail.push(lit);
    }

    /// If the literal is unassigned, assign it; if it is already true, do
    /// nothing; if it is false (conflict), return `false`.
    pub fn enqueue(&mut self, lit: Lit, reason: Option<ClauseRef>) -> bool {
        match self.value(lit) {
            LBool::Undef => {
                self.unchecked_enqueue(lit, reason);
                true
            }
            LBool::True => {
                debug!("existing consistent assignment of {:?}", lit);
                true
            }
            LBool::False => {
                // conflict
                false
            }
        }
    }

    pub fn dequeue(&mut self) -> Option<Lit> {
        if self.qhead < self.trail.len() {
            let p = self.trail[self.qhead];
            self.qhead += 1;
            Some(p)
        } else {
            None
        }
    }
}

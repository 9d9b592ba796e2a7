use crate::assignment::Assignment;
use crate::idx::{VarHeap, VarVec};
use crate::var::Var;

use tracing::debug;

#[derive(Debug)]
pub struct VarOrder {
    activity: VarVec<f64>,
    order_heap: VarHeap,
    decision: VarVec<bool>,
    var_decay: f64,
    var_inc: f64,
}

const DEFAULT_VAR_DECAY: f64 = 0.95;
const DEFAULT_VAR_INC: f64 = 1.0;

impl VarOrder {
    pub fn new() -> Self {
        Self {
            activity: VarVec::new(),
            order_heap: VarHeap::new(),
            decision: VarVec::new(),
            var_decay: DEFAULT_VAR_DECAY,
            var_inc: DEFAULT_VAR_INC,
        }
    }

    pub(crate) fn push_var(&mut self, decision: bool) {
        self.activity.push(0.0);
        self.decision.push(decision);
    }

    pub(crate) fn truncate_vars(&mut self, num_vars: usize) {
        self.activity.truncate(num_vars);
        self.decision.truncate(num_vars);
        self.order_heap.clear();
        for i in 0..num_vars {
            self.insert_var_order(Var::new(i as u32));
        }
    }

    pub fn is_decision(&self, var: Var) -> bool {
        self.decision[var]
    }

    pub fn var_decay_activity(&mut self) {
        self.var_inc /= self.var_decay;
    }

    pub fn var_bump_activity(&mut self, var: Var) {
        let new = self.activity[var] + self.var_inc;
        self.activity[var] = new;

        // Rescale large activities, if necessary:
        if new > 1e100 {
            self.var_rescale_activity();
        }

        // Update `var` in heap:
        if self.order_heap.contains(&var) {
            self.update_var_order(var);
        }
    }

    pub fn var_rescale_activity(&mut self) {
        debug!("Rescaling activity");

        // Decrease the increment value:
        self.var_inc *= 1e-100;

        // Decrease all activities:
        for a in self.activity.iter_mut() {
            *a *= 1e-100;
        }
    }

    pub fn insert_var_order(&mut self, var: Var) {
        if !self.decision[var] {
            return;
        }
        self.order_heap.insert_by(var, |&a, &b| self.activity[a] > self.activity[b]);
    }

    pub fn update_var_order(&mut self, var: Var) {
        self.order_heap.update_by(var, |&a, &b| self.activity[a] > self.activity[b]);
    }

    pub fn pick_branching_variable(&mut self, assignment: &Assignment) -> Option<Var> {
        self.order_heap
            .sorted_iter_by(|&a, &b| self.activity[a] > self.activity[b])
            .find(|&var| assignment.value_var(var).is_undef())
    }
}

impl Default for VarOrder {
    fn default() -> Self {
        Self::new()
    }
}

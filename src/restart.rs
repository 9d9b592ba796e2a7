use crate::options::Options;
use crate::utils::luby;

#[derive(Debug)]
pub struct RestartStrategy {
    is_luby: bool,
    restart_init: usize,
    restart_inc: f64,
}

impl RestartStrategy {
    pub fn new(options: &Options) -> Self {
        Self {
            is_luby: options.is_luby,
            restart_init: options.restart_init, // MiniSat: 100
            restart_inc: options.restart_inc,   // MiniSat: 2.0
        }
    }

    pub fn is_luby(&self) -> bool {
        self.is_luby
    }

    /// Number of conflicts before the next restart.
    pub fn num_confl(&self, restarts: usize) -> usize {
        let restart_base = if self.is_luby {
            luby(self.restart_inc, restarts as u32)
        } else {
            self.restart_inc.powi(restarts as i32)
        };

        (restart_base * self.restart_init as f64) as usize
    }
}

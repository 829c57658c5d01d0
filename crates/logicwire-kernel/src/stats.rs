//! Propagation statistics

/// Result of one `start_propagation` call
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PropagationReport {
    /// Tasks executed during the wave
    pub executed: usize,
    /// Wave stopped by `halt()` or the step limit
    pub halted: bool,
    /// Requested while a wave was already draining; nothing was done
    pub reentrant: bool,
    /// Tasks left queued after the wave
    pub pending: usize,
}

impl PropagationReport {
    /// The network reached a fixed point
    pub fn settled(&self) -> bool {
        !self.halted && !self.reentrant && self.pending == 0
    }
}

/// Cumulative circuit counters
#[derive(Clone, Debug, Default)]
pub struct CircuitStats {
    pub waves: u64,
    pub halted_waves: u64,
    pub tasks_executed: u64,
    pub evaluations: u64,
    pub deliveries: u64,
    pub deferred_writes: u64,
    pub transitions: u64,
    pub indeterminate: u64,
}

//! Circuit configuration

/// Circuit configuration
#[derive(Clone, Debug)]
pub struct CircuitConfig {
    /// Maximum tasks executed by one propagation wave before it is halted.
    /// Bounds non-convergent topologies such as an odd inverter ring.
    pub step_limit: usize,
    /// Emit a trace event for every committed line transition
    pub trace_transitions: bool,
    /// Pre-allocated line slots
    pub line_capacity: usize,
    /// Pre-allocated element slots
    pub element_capacity: usize,
}

impl Default for CircuitConfig {
    fn default() -> Self {
        CircuitConfig {
            step_limit: 1_000_000,
            trace_transitions: false,
            line_capacity: 64,
            element_capacity: 32,
        }
    }
}

impl CircuitConfig {
    /// Small step limit, for tests that expect oscillation to be caught fast
    pub fn strict() -> Self {
        CircuitConfig {
            step_limit: 10_000,
            trace_transitions: true,
            ..Self::default()
        }
    }

    /// No practical step limit
    pub fn unbounded() -> Self {
        CircuitConfig {
            step_limit: usize::MAX,
            ..Self::default()
        }
    }

    pub fn with_step_limit(mut self, step_limit: usize) -> Self {
        self.step_limit = step_limit;
        self
    }
}

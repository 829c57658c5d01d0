//! End-to-end determinism suite
//!
//! Drives scenarios with seeded random stimulus and checks that:
//! - Every wave settles
//! - Independent runs reach identical probe values after every step
//! - Independent runs commit identical per-line transition counts

use logicwire_core::KernelResult;

use crate::scenarios::{self, ScenarioFn};
use crate::stimulus::{StimulusConfig, StimulusGenerator};

// ============================================================================
// CONFIG
// ============================================================================

/// Integration run configuration
#[derive(Clone, Debug)]
pub struct IntegrationConfig {
    /// Stimulus for every run
    pub stimulus: StimulusConfig,
    /// Independent runs compared against the first
    pub runs: usize,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        IntegrationConfig {
            stimulus: StimulusConfig::default(),
            runs: 2,
        }
    }
}

impl IntegrationConfig {
    /// Quick check for unit tests
    pub fn minimal() -> Self {
        IntegrationConfig {
            stimulus: StimulusConfig::light(),
            runs: 2,
        }
    }

    pub fn standard() -> Self {
        Self::default()
    }

    /// Long stimulus, several runs
    pub fn stress() -> Self {
        IntegrationConfig {
            stimulus: StimulusConfig::heavy(),
            runs: 4,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.stimulus.seed = seed;
        self
    }
}

// ============================================================================
// RESULT
// ============================================================================

/// Outcome of one scenario
#[derive(Clone, Debug, Default)]
pub struct IntegrationResult {
    pub scenario: String,
    /// Stimulus steps per run
    pub steps: usize,
    pub runs: usize,
    /// Steps where a run's probes differed from the first run
    pub mismatches: usize,
    /// Runs whose final transition counts differed from the first run
    pub transition_mismatches: usize,
    /// Waves that hit the step limit or were halted
    pub unsettled_waves: usize,
    /// Tasks executed by the first run
    pub tasks_executed: u64,
}

impl IntegrationResult {
    pub fn passed(&self) -> bool {
        self.mismatches == 0 && self.transition_mismatches == 0 && self.unsettled_waves == 0
    }
}

/// Probe bits after each step plus final transition counts
struct RunTrace {
    steps: Vec<Vec<u8>>,
    transitions: Vec<u64>,
    unsettled: usize,
    tasks_executed: u64,
}

// ============================================================================
// HARNESS
// ============================================================================

pub struct IntegrationHarness {
    config: IntegrationConfig,
}

impl IntegrationHarness {
    pub fn new(config: IntegrationConfig) -> Self {
        IntegrationHarness { config }
    }

    pub fn config(&self) -> &IntegrationConfig {
        &self.config
    }

    fn trace(&self, build: ScenarioFn) -> KernelResult<RunTrace> {
        let mut tb = build()?;
        let mut generator = StimulusGenerator::new(self.config.stimulus.clone(), &tb.input_names());

        let mut trace = RunTrace {
            steps: Vec::with_capacity(self.config.stimulus.steps),
            transitions: Vec::new(),
            unsettled: 0,
            tasks_executed: 0,
        };
        for stimulus in generator.generate() {
            let report = tb.apply(&stimulus.as_bits())?;
            if !report.settled() {
                trace.unsettled += 1;
            }
            trace.steps.push(tb.read_bits()?);
        }
        trace.transitions = tb.transition_counts();
        trace.tasks_executed = tb.circuit().stats().tasks_executed;
        Ok(trace)
    }

    /// Run one scenario `runs` times and compare
    pub fn run(&self, name: &str, build: ScenarioFn) -> KernelResult<IntegrationResult> {
        let reference = self.trace(build)?;
        let mut result = IntegrationResult {
            scenario: name.to_string(),
            steps: reference.steps.len(),
            runs: self.config.runs.max(1),
            unsettled_waves: reference.unsettled,
            tasks_executed: reference.tasks_executed,
            ..Default::default()
        };

        for _ in 1..result.runs {
            let trace = self.trace(build)?;
            result.unsettled_waves += trace.unsettled;
            result.mismatches += reference
                .steps
                .iter()
                .zip(&trace.steps)
                .filter(|(a, b)| a != b)
                .count();
            if trace.transitions != reference.transitions {
                result.transition_mismatches += 1;
            }
        }

        if result.passed() {
            tracing::debug!(scenario = name, steps = result.steps, "scenario deterministic");
        } else {
            tracing::warn!(
                scenario = name,
                mismatches = result.mismatches,
                unsettled = result.unsettled_waves,
                "scenario diverged"
            );
        }
        Ok(result)
    }

    /// Run every settling scenario
    pub fn run_all(&self) -> KernelResult<Vec<IntegrationResult>> {
        scenarios::settling()
            .into_iter()
            .map(|(name, build)| self.run(name, build))
            .collect()
    }
}

// ============================================================================
// CANNED RUNS
// ============================================================================

/// Every settling scenario with light stimulus
pub fn check_determinism() -> KernelResult<bool> {
    let harness = IntegrationHarness::new(IntegrationConfig::minimal());
    Ok(harness.run_all()?.iter().all(IntegrationResult::passed))
}

/// Every settling scenario under heavy stimulus
pub fn check_determinism_under_stress() -> KernelResult<bool> {
    let harness = IntegrationHarness::new(IntegrationConfig::stress());
    Ok(harness.run_all()?.iter().all(IntegrationResult::passed))
}

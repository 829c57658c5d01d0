//! Edge-triggered storage elements

use logicwire_core::{KernelResult, Level, Pin};
use logicwire_kernel::{ElementContext, LogicElement};

const DFF_PINS: [Pin; 6] = [
    Pin::input("CK"),
    Pin::input("D"),
    Pin::input("CLR_B"),
    Pin::input("PR_B"),
    Pin::output("Q"),
    Pin::output("Q_B"),
];

/// Positive-edge D flip-flop with active-low asynchronous clear and preset.
///
/// Clear wins over preset, preset wins over the clock. Unconnected inputs
/// read low, so an unwired `CLR_B` holds the flip-flop cleared.
///
/// Outputs are written through the agenda. Every flip-flop clocked by the
/// same edge samples `D` before any of them updates `Q`.
#[derive(Debug, Clone, Default)]
pub struct DFlipFlop {
    previous_clock: Option<Level>,
}

impl DFlipFlop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock level seen by the last evaluation
    pub fn previous_clock(&self) -> Option<Level> {
        self.previous_clock
    }

    fn store(ctx: &mut ElementContext<'_>, q: Level) -> KernelResult<()> {
        ctx.drive_deferred("Q", q)?;
        ctx.drive_deferred("Q_B", !q)
    }
}

impl LogicElement for DFlipFlop {
    fn kind(&self) -> &'static str {
        "d-flip-flop"
    }

    fn pins(&self) -> &[Pin] {
        &DFF_PINS
    }

    fn action(&mut self, ctx: &mut ElementContext<'_>) -> KernelResult<()> {
        let clock = ctx.input("CK")?;

        if ctx.input("CLR_B")?.is_low() {
            Self::store(ctx, Level::Low)?;
        } else if ctx.input("PR_B")?.is_low() {
            Self::store(ctx, Level::High)?;
        } else if self.previous_clock == Some(Level::Low) && clock.is_high() {
            match ctx.sample("D")?.level() {
                Some(d) => Self::store(ctx, d)?,
                None => {
                    tracing::warn!(element = %ctx.element(), "rising edge with unresolved D");
                    ctx.mark_indeterminate("Q")?;
                    ctx.mark_indeterminate("Q_B")?;
                }
            }
        }

        self.previous_clock = Some(clock);
        Ok(())
    }
}

//! Boundary elements: switches drive a node, probes tap one

use logicwire_core::{KernelResult, Level, Pin};
use logicwire_kernel::{ElementContext, LogicElement};

const SWITCH_PINS: [Pin; 1] = [Pin::output("Y")];
const PROBE_PINS: [Pin; 1] = [Pin::input("A")];

/// Externally controlled source.
///
/// Drives its initial level on insertion; afterwards it is flipped with
/// [`Circuit::set_signal`](logicwire_kernel::Circuit::set_signal) on its `Y`
/// pin.
#[derive(Debug, Clone, Copy, Default)]
pub struct Switch {
    initial: Level,
}

impl Switch {
    pub fn new(initial: Level) -> Self {
        Switch { initial }
    }

    pub fn low() -> Self {
        Self::new(Level::Low)
    }

    pub fn high() -> Self {
        Self::new(Level::High)
    }
}

impl LogicElement for Switch {
    fn kind(&self) -> &'static str {
        "switch"
    }

    fn pins(&self) -> &[Pin] {
        &SWITCH_PINS
    }

    fn init(&mut self, ctx: &mut ElementContext<'_>) -> KernelResult<()> {
        ctx.drive("Y", self.initial)
    }

    fn action(&mut self, _ctx: &mut ElementContext<'_>) -> KernelResult<()> {
        Ok(())
    }
}

/// Passive sink whose `A` pin mirrors the node it is connected to
#[derive(Debug, Clone, Copy, Default)]
pub struct Probe;

impl LogicElement for Probe {
    fn kind(&self) -> &'static str {
        "probe"
    }

    fn pins(&self) -> &[Pin] {
        &PROBE_PINS
    }

    fn action(&mut self, _ctx: &mut ElementContext<'_>) -> KernelResult<()> {
        Ok(())
    }
}

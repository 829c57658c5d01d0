//! Canned circuits wired into testbenches
//!
//! Switches start low. Probe names follow the pins they tap.

use logicwire_core::{KernelError, KernelResult};
use logicwire_gates::{
    DFlipFlop, FullAdder, Gate, GatedDLatch, HalfAdder, Inverter, Quad2InputNand,
    RippleCarryAdder,
};
use logicwire_kernel::CircuitConfig;

use crate::Testbench;

/// Scenario constructor
pub type ScenarioFn = fn() -> KernelResult<Testbench>;

/// NOR SR latch from two discrete gates.
///
/// `nor1(A = R, B = nor2.Y) = Q`, `nor2(A = nor1.Y, B = S) = Q_B`.
pub fn sr_latch_nor() -> KernelResult<Testbench> {
    let mut tb = Testbench::new();
    let nor1 = tb.add(Gate::nor())?;
    let nor2 = tb.add(Gate::nor())?;

    tb.switch_pin("S", nor2, "B")?;
    tb.switch_pin("R", nor1, "A")?;

    let y1 = tb.pin(nor1, "Y")?;
    let a2 = tb.pin(nor2, "A")?;
    tb.connect(y1, a2)?;
    let y2 = tb.pin(nor2, "Y")?;
    let b1 = tb.pin(nor1, "B")?;
    tb.connect(y2, b1)?;

    tb.probe("Q", y1)?;
    tb.probe("Q_B", y2)?;
    Ok(tb)
}

pub fn half_adder() -> KernelResult<Testbench> {
    let mut tb = Testbench::new();
    let ha = tb.assemble(&HalfAdder)?;
    tb.switch_pin("A", ha, "A")?;
    tb.switch_pin("B", ha, "B")?;
    tb.probe_pin("S", ha, "S")?;
    tb.probe_pin("C", ha, "C")?;
    Ok(tb)
}

pub fn full_adder() -> KernelResult<Testbench> {
    let mut tb = Testbench::new();
    let fa = tb.assemble(&FullAdder)?;
    for pin in ["A", "B", "C_IN"] {
        tb.switch_pin(pin, fa, pin)?;
    }
    for pin in ["S", "C_OUT"] {
        tb.probe_pin(pin, fa, pin)?;
    }
    Ok(tb)
}

pub fn ripple_adder(width: usize) -> KernelResult<Testbench> {
    let mut tb = Testbench::new();
    let adder = tb.assemble(&RippleCarryAdder::new(width)?)?;
    for pin in (0..width).filter_map(RippleCarryAdder::a) {
        tb.switch_pin(pin, adder, pin)?;
    }
    for pin in (0..width).filter_map(RippleCarryAdder::b) {
        tb.switch_pin(pin, adder, pin)?;
    }
    tb.switch_pin("C_IN", adder, "C_IN")?;
    for pin in (0..width).filter_map(RippleCarryAdder::s) {
        tb.probe_pin(pin, adder, pin)?;
    }
    tb.probe_pin("C_OUT", adder, "C_OUT")?;
    Ok(tb)
}

/// Four-bit ripple carry adder
pub fn ripple_adder_4() -> KernelResult<Testbench> {
    ripple_adder(4)
}

pub fn d_flip_flop() -> KernelResult<Testbench> {
    let mut tb = Testbench::new();
    let ff = tb.add(DFlipFlop::new())?;
    for pin in ["CK", "D", "CLR_B", "PR_B"] {
        tb.switch_pin(pin, ff, pin)?;
    }
    tb.probe_pin("Q", ff, "Q")?;
    tb.probe_pin("Q_B", ff, "Q_B")?;
    Ok(tb)
}

/// D flip-flop with `Q_B` fed back into `D`: divides the clock by two
pub fn toggle_flip_flop() -> KernelResult<Testbench> {
    let mut tb = Testbench::new();
    let ff = tb.add(DFlipFlop::new())?;
    for pin in ["CK", "CLR_B", "PR_B"] {
        tb.switch_pin(pin, ff, pin)?;
    }
    let q_b = tb.pin(ff, "Q_B")?;
    let d = tb.pin(ff, "D")?;
    tb.connect(d, q_b)?;
    tb.probe_pin("Q", ff, "Q")?;
    Ok(tb)
}

pub fn gated_d_latch() -> KernelResult<Testbench> {
    let mut tb = Testbench::new();
    let latch = tb.assemble(&GatedDLatch)?;
    tb.switch_pin("D", latch, "D")?;
    tb.switch_pin("E", latch, "E")?;
    tb.probe_pin("Q", latch, "Q")?;
    tb.probe_pin("Q_B", latch, "Q_B")?;
    Ok(tb)
}

/// First unit of a 7400, plus its output fed into both inputs of unit 2
pub fn quad_nand() -> KernelResult<Testbench> {
    let mut tb = Testbench::new();
    let ic = tb.assemble(&Quad2InputNand)?;
    tb.switch_pin("1A", ic, "1A")?;
    tb.switch_pin("1B", ic, "1B")?;
    let y1 = tb.pin(ic, "1Y")?;
    let a2 = tb.pin(ic, "2A")?;
    let b2 = tb.pin(ic, "2B")?;
    tb.connect(a2, y1)?;
    tb.connect(b2, y1)?;
    tb.probe("1Y", y1)?;
    tb.probe_pin("2Y", ic, "2Y")?;
    Ok(tb)
}

/// Ring of an odd number of inverters. Never settles.
pub fn ring_oscillator(stages: usize, config: CircuitConfig) -> KernelResult<Testbench> {
    if stages % 2 == 0 {
        return Err(KernelError::InvalidWidth(stages));
    }

    let mut tb = Testbench::with_config(config);
    let mut inverters = Vec::with_capacity(stages);
    for _ in 0..stages {
        inverters.push(tb.add(Inverter)?);
    }
    for i in 0..stages {
        let y = tb.pin(inverters[i], "Y")?;
        let a = tb.pin(inverters[(i + 1) % stages], "A")?;
        tb.connect(y, a)?;
    }
    let last = tb.pin(inverters[stages - 1], "Y")?;
    tb.probe("Y", last)?;
    Ok(tb)
}

/// Scenarios that settle under any stimulus
pub fn settling() -> Vec<(&'static str, ScenarioFn)> {
    vec![
        ("sr-latch-nor", sr_latch_nor as ScenarioFn),
        ("half-adder", half_adder),
        ("full-adder", full_adder),
        ("ripple-adder-4", ripple_adder_4),
        ("d-flip-flop", d_flip_flop),
        ("toggle-flip-flop", toggle_flip_flop),
        ("gated-d-latch", gated_d_latch),
        ("quad-nand", quad_nand),
    ]
}

//! Combinational gates
//!
//! Every gate evaluates once in `init` so its output is consistent with its
//! (initially low) inputs before the first wave.

use std::fmt;

use logicwire_core::{KernelError, KernelResult, Level, Pin};
use logicwire_kernel::{ElementContext, LogicElement};

/// Boolean function of a multi-input gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateFn {
    And,
    Or,
    Nand,
    Nor,
    Xor,
    Xnor,
}

impl GateFn {
    pub const ALL: [GateFn; 6] = [
        GateFn::And,
        GateFn::Or,
        GateFn::Nand,
        GateFn::Nor,
        GateFn::Xor,
        GateFn::Xnor,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GateFn::And => "and",
            GateFn::Or => "or",
            GateFn::Nand => "nand",
            GateFn::Nor => "nor",
            GateFn::Xor => "xor",
            GateFn::Xnor => "xnor",
        }
    }

    pub fn apply(self, a: Level, b: Level) -> Level {
        self.reduce([a, b])
    }

    /// Fold over any number of inputs. XOR is odd parity.
    pub fn reduce(self, inputs: impl IntoIterator<Item = Level>) -> Level {
        let mut ones = 0usize;
        let mut count = 0usize;
        for level in inputs {
            count += 1;
            if level.is_high() {
                ones += 1;
            }
        }

        let high = match self {
            GateFn::And => ones == count,
            GateFn::Or => ones > 0,
            GateFn::Nand => ones != count,
            GateFn::Nor => ones == 0,
            GateFn::Xor => ones % 2 == 1,
            GateFn::Xnor => ones % 2 == 0,
        };
        Level::from(high)
    }
}

impl fmt::Display for GateFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const UNARY_PINS: [Pin; 2] = [Pin::input("A"), Pin::output("Y")];
const BINARY_PINS: [Pin; 3] = [Pin::input("A"), Pin::input("B"), Pin::output("Y")];

/// Widest N-input gate
pub const MAX_GATE_INPUTS: usize = 8;

const WIDE_INPUT_NAMES: [&str; MAX_GATE_INPUTS] = ["I0", "I1", "I2", "I3", "I4", "I5", "I6", "I7"];

/// NOT gate: `A` → `Y`
#[derive(Debug, Clone, Copy, Default)]
pub struct Inverter;

impl LogicElement for Inverter {
    fn kind(&self) -> &'static str {
        "inverter"
    }

    fn pins(&self) -> &[Pin] {
        &UNARY_PINS
    }

    fn init(&mut self, ctx: &mut ElementContext<'_>) -> KernelResult<()> {
        self.action(ctx)
    }

    fn action(&mut self, ctx: &mut ElementContext<'_>) -> KernelResult<()> {
        let a = ctx.input("A")?;
        ctx.drive("Y", !a)
    }
}

/// Non-inverting buffer: `A` → `Y`
#[derive(Debug, Clone, Copy, Default)]
pub struct Buffer;

impl LogicElement for Buffer {
    fn kind(&self) -> &'static str {
        "buffer"
    }

    fn pins(&self) -> &[Pin] {
        &UNARY_PINS
    }

    fn init(&mut self, ctx: &mut ElementContext<'_>) -> KernelResult<()> {
        self.action(ctx)
    }

    fn action(&mut self, ctx: &mut ElementContext<'_>) -> KernelResult<()> {
        let a = ctx.input("A")?;
        ctx.drive("Y", a)
    }
}

/// Two-input gate: `A`, `B` → `Y`
#[derive(Debug, Clone, Copy)]
pub struct Gate {
    function: GateFn,
}

impl Gate {
    pub fn new(function: GateFn) -> Self {
        Gate { function }
    }

    pub fn and() -> Self {
        Self::new(GateFn::And)
    }

    pub fn or() -> Self {
        Self::new(GateFn::Or)
    }

    pub fn nand() -> Self {
        Self::new(GateFn::Nand)
    }

    pub fn nor() -> Self {
        Self::new(GateFn::Nor)
    }

    pub fn xor() -> Self {
        Self::new(GateFn::Xor)
    }

    pub fn xnor() -> Self {
        Self::new(GateFn::Xnor)
    }

    pub fn function(&self) -> GateFn {
        self.function
    }
}

impl LogicElement for Gate {
    fn kind(&self) -> &'static str {
        self.function.name()
    }

    fn pins(&self) -> &[Pin] {
        &BINARY_PINS
    }

    fn init(&mut self, ctx: &mut ElementContext<'_>) -> KernelResult<()> {
        self.action(ctx)
    }

    fn action(&mut self, ctx: &mut ElementContext<'_>) -> KernelResult<()> {
        let a = ctx.input("A")?;
        let b = ctx.input("B")?;
        ctx.drive("Y", self.function.apply(a, b))
    }
}

/// N-input gate: `I0..In-1` → `Y`, 2 ≤ n ≤ 8
#[derive(Debug, Clone)]
pub struct WideGate {
    function: GateFn,
    pins: Vec<Pin>,
}

impl WideGate {
    pub fn new(function: GateFn, inputs: usize) -> KernelResult<Self> {
        if !(2..=MAX_GATE_INPUTS).contains(&inputs) {
            return Err(KernelError::InvalidWidth(inputs));
        }

        let mut pins: Vec<Pin> = WIDE_INPUT_NAMES[..inputs]
            .iter()
            .map(|&name| Pin::input(name))
            .collect();
        pins.push(Pin::output("Y"));
        Ok(WideGate { function, pins })
    }

    pub fn inputs(&self) -> usize {
        self.pins.len() - 1
    }

    pub fn function(&self) -> GateFn {
        self.function
    }

    /// Name of input pin `index`
    pub fn input_name(index: usize) -> Option<&'static str> {
        WIDE_INPUT_NAMES.get(index).copied()
    }
}

impl LogicElement for WideGate {
    fn kind(&self) -> &'static str {
        self.function.name()
    }

    fn pins(&self) -> &[Pin] {
        &self.pins
    }

    fn init(&mut self, ctx: &mut ElementContext<'_>) -> KernelResult<()> {
        self.action(ctx)
    }

    fn action(&mut self, ctx: &mut ElementContext<'_>) -> KernelResult<()> {
        let mut inputs = [Level::Low; MAX_GATE_INPUTS];
        let n = self.inputs();
        for (slot, name) in inputs.iter_mut().zip(&WIDE_INPUT_NAMES[..n]) {
            *slot = ctx.input(name)?;
        }
        ctx.drive("Y", self.function.reduce(inputs[..n].iter().copied()))
    }
}

#[cfg(test)]
mod tests {
    use logicwire_core::KernelError;
    use proptest::prelude::*;
    use logicwire_kernel::Circuit;

    use super::*;
    use crate::rig::{apply, read, switches};

    fn truth_table(function: GateFn) -> [u8; 4] {
        match function {
            GateFn::And => [0, 0, 0, 1],
            GateFn::Or => [0, 1, 1, 1],
            GateFn::Nand => [1, 1, 1, 0],
            GateFn::Nor => [1, 0, 0, 0],
            GateFn::Xor => [0, 1, 1, 0],
            GateFn::Xnor => [1, 0, 0, 1],
        }
    }

    #[test]
    fn test_two_input_truth_tables() {
        for function in GateFn::ALL {
            let mut circuit = Circuit::new();
            let gate = circuit.add(Gate::new(function)).unwrap();
            let inputs = switches(&mut circuit, gate, &["A", "B"]);

            let expected = truth_table(function);
            for (row, (a, b)) in [(0, 0), (0, 1), (1, 0), (1, 1)].into_iter().enumerate() {
                apply(&mut circuit, &inputs, &[a, b]);
                assert_eq!(
                    read(&circuit, gate, "Y").to_bit(),
                    expected[row],
                    "{} {}{}",
                    function,
                    a,
                    b
                );
            }
        }
    }

    #[test]
    fn test_inverter_and_buffer() {
        let mut circuit = Circuit::new();
        let inverter = circuit.add(Inverter).unwrap();
        let buffer = circuit.add(Buffer).unwrap();
        let a = switches(&mut circuit, inverter, &["A"]);
        circuit.connect_pin(buffer, "A", a[0]).unwrap();

        assert_eq!(read(&circuit, inverter, "Y"), Level::High);
        assert_eq!(read(&circuit, buffer, "Y"), Level::Low);

        apply(&mut circuit, &a, &[1]);
        assert_eq!(read(&circuit, inverter, "Y"), Level::Low);
        assert_eq!(read(&circuit, buffer, "Y"), Level::High);
    }

    #[test]
    fn test_gate_outputs_consistent_after_insertion() {
        let mut circuit = Circuit::new();
        let nand = circuit.add(Gate::nand()).unwrap();
        let and = circuit.add(Gate::and()).unwrap();

        assert_eq!(read(&circuit, nand, "Y"), Level::High);
        assert_eq!(read(&circuit, and, "Y"), Level::Low);
    }

    #[test]
    fn test_wide_gate_reduces_all_inputs() {
        let names = ["I0", "I1", "I2", "I3"];
        let mut circuit = Circuit::new();
        let and = circuit.add(WideGate::new(GateFn::And, 4).unwrap()).unwrap();
        let xor = circuit.add(WideGate::new(GateFn::Xor, 4).unwrap()).unwrap();
        let inputs = switches(&mut circuit, and, &names);
        for (input, name) in inputs.iter().zip(names) {
            circuit.connect_pin(xor, name, *input).unwrap();
        }

        apply(&mut circuit, &inputs, &[1, 1, 1, 0]);
        assert_eq!(read(&circuit, and, "Y"), Level::Low);
        assert_eq!(read(&circuit, xor, "Y"), Level::High);

        apply(&mut circuit, &inputs, &[1, 1, 1, 1]);
        assert_eq!(read(&circuit, and, "Y"), Level::High);
        assert_eq!(read(&circuit, xor, "Y"), Level::Low);
    }

    #[test]
    fn test_wide_gate_width_bounds() {
        assert_eq!(
            WideGate::new(GateFn::Or, 1).unwrap_err(),
            KernelError::InvalidWidth(1)
        );
        assert_eq!(
            WideGate::new(GateFn::Or, 9).unwrap_err(),
            KernelError::InvalidWidth(9)
        );
        assert_eq!(WideGate::new(GateFn::Or, 8).unwrap().inputs(), 8);
    }

    #[test]
    fn test_reduce_matches_binary_apply() {
        for function in GateFn::ALL {
            for a in Level::ALL {
                for b in Level::ALL {
                    assert_eq!(function.reduce([a, b]), function.apply(a, b));
                }
            }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn test_wide_gates_follow_input_count(bits in prop::collection::vec(0u8..=1, 2..=MAX_GATE_INPUTS)) {
            let names: Vec<_> = (0..bits.len())
                .filter_map(WideGate::input_name)
                .collect();
            let ones = bits.iter().filter(|&&b| b == 1).count();
            let all = ones == bits.len();

            for function in GateFn::ALL {
                let mut circuit = Circuit::new();
                let gate = circuit.add(WideGate::new(function, bits.len()).unwrap()).unwrap();
                let inputs = switches(&mut circuit, gate, &names);
                apply(&mut circuit, &inputs, &bits);

                let expected = match function {
                    GateFn::And => all,
                    GateFn::Or => ones > 0,
                    GateFn::Nand => !all,
                    GateFn::Nor => ones == 0,
                    GateFn::Xor => ones % 2 == 1,
                    GateFn::Xnor => ones % 2 == 0,
                };
                prop_assert_eq!(read(&circuit, gate, "Y"), Level::from(expected));
            }
        }
    }
}

//! Binary adders built from primitive gates

use logicwire_core::{Direction, KernelError, KernelResult};
use logicwire_kernel::{Assembly, CompositeBuilder};

use crate::{Gate, Inverter};

/// Half adder in OR/AND/NOT/AND form: `A`, `B` → `S`, `C`
///
/// `S = (A | B) & !(A & B)`, `C = A & B`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HalfAdder;

impl Assembly for HalfAdder {
    fn kind(&self) -> &'static str {
        "half-adder"
    }

    fn build(&self, b: &mut CompositeBuilder<'_>) -> KernelResult<()> {
        let a = b.boundary("A", Direction::Input)?;
        let bb = b.boundary("B", Direction::Input)?;
        let s = b.boundary("S", Direction::Output)?;
        let c = b.boundary("C", Direction::Output)?;

        let either = b.line();
        let not_both = b.line();
        b.element_wired(Gate::or(), &[a.into(), bb.into(), either.into()])?;
        b.element_wired(Gate::and(), &[a.into(), bb.into(), c.into()])?;
        b.element_wired(Inverter, &[c.into(), not_both.into()])?;
        b.element_wired(Gate::and(), &[either.into(), not_both.into(), s.into()])?;
        Ok(())
    }
}

/// Full adder from two half adders and an OR:
/// `A`, `B`, `C_IN` → `S`, `C_OUT`
#[derive(Debug, Clone, Copy, Default)]
pub struct FullAdder;

impl Assembly for FullAdder {
    fn kind(&self) -> &'static str {
        "full-adder"
    }

    fn build(&self, b: &mut CompositeBuilder<'_>) -> KernelResult<()> {
        let a = b.boundary("A", Direction::Input)?;
        let bb = b.boundary("B", Direction::Input)?;
        let carry_in = b.boundary("C_IN", Direction::Input)?;
        let s = b.boundary("S", Direction::Output)?;
        let carry_out = b.boundary("C_OUT", Direction::Output)?;

        let partial = b.line();
        let c1 = b.line();
        let c2 = b.line();
        b.assemble_wired(&HalfAdder, &[bb.into(), carry_in.into(), partial.into(), c1.into()])?;
        b.assemble_wired(&HalfAdder, &[a.into(), partial.into(), s.into(), c2.into()])?;
        b.element_wired(Gate::or(), &[c1.into(), c2.into(), carry_out.into()])?;
        Ok(())
    }
}

/// Widest ripple carry adder
pub const MAX_ADDER_WIDTH: usize = 16;

const A_NAMES: [&str; MAX_ADDER_WIDTH] = [
    "A0", "A1", "A2", "A3", "A4", "A5", "A6", "A7", "A8", "A9", "A10", "A11", "A12", "A13", "A14",
    "A15",
];
const B_NAMES: [&str; MAX_ADDER_WIDTH] = [
    "B0", "B1", "B2", "B3", "B4", "B5", "B6", "B7", "B8", "B9", "B10", "B11", "B12", "B13", "B14",
    "B15",
];
const S_NAMES: [&str; MAX_ADDER_WIDTH] = [
    "S0", "S1", "S2", "S3", "S4", "S5", "S6", "S7", "S8", "S9", "S10", "S11", "S12", "S13", "S14",
    "S15",
];

/// N-bit ripple carry adder.
///
/// Pins: `A0..An-1`, `B0..Bn-1`, `C_IN`, `S0..Sn-1`, `C_OUT`; bit 0 is the
/// least significant.
#[derive(Debug, Clone, Copy)]
pub struct RippleCarryAdder {
    width: usize,
}

impl RippleCarryAdder {
    pub fn new(width: usize) -> KernelResult<Self> {
        if !(1..=MAX_ADDER_WIDTH).contains(&width) {
            return Err(KernelError::InvalidWidth(width));
        }
        Ok(RippleCarryAdder { width })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Name of operand pin `A<bit>`, if `bit` is within the widest adder
    pub fn a(bit: usize) -> Option<&'static str> {
        A_NAMES.get(bit).copied()
    }

    pub fn b(bit: usize) -> Option<&'static str> {
        B_NAMES.get(bit).copied()
    }

    /// Name of sum pin `S<bit>`
    pub fn s(bit: usize) -> Option<&'static str> {
        S_NAMES.get(bit).copied()
    }
}

impl Assembly for RippleCarryAdder {
    fn kind(&self) -> &'static str {
        "ripple-carry-adder"
    }

    fn build(&self, b: &mut CompositeBuilder<'_>) -> KernelResult<()> {
        let mut stages = Vec::with_capacity(self.width);
        for _ in 0..self.width {
            stages.push(b.assemble(&FullAdder)?);
        }
        for pair in stages.windows(2) {
            let carry = b.line();
            b.connect_pin(pair[0], "C_OUT", carry)?;
            b.connect_pin(pair[1], "C_IN", carry)?;
        }

        for (&stage, name) in stages.iter().zip(A_NAMES) {
            let pin = b.pin(stage, "A")?;
            b.forward(name, pin)?;
        }
        for (&stage, name) in stages.iter().zip(B_NAMES) {
            let pin = b.pin(stage, "B")?;
            b.forward(name, pin)?;
        }
        let carry_in = b.pin(stages[0], "C_IN")?;
        b.forward("C_IN", carry_in)?;
        for (&stage, name) in stages.iter().zip(S_NAMES) {
            let pin = b.pin(stage, "S")?;
            b.forward(name, pin)?;
        }
        let carry_out = b.pin(stages[self.width - 1], "C_OUT")?;
        b.forward("C_OUT", carry_out)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use logicwire_core::{ElementId, Level};
    use logicwire_kernel::Circuit;
    use proptest::prelude::*;

    use super::*;
    use crate::rig::{apply, read, switches};

    #[test]
    fn test_half_adder_truth_table() {
        let mut circuit = Circuit::new();
        let ha = circuit.assemble(&HalfAdder).unwrap();
        let inputs = switches(&mut circuit, ha, &["A", "B"]);

        for (a, bit, s, c) in [(0, 0, 0, 0), (0, 1, 1, 0), (1, 0, 1, 0), (1, 1, 0, 1)] {
            apply(&mut circuit, &inputs, &[a, bit]);
            assert_eq!(read(&circuit, ha, "S").to_bit(), s, "S for {}{}", a, bit);
            assert_eq!(read(&circuit, ha, "C").to_bit(), c, "C for {}{}", a, bit);
        }
    }

    #[test]
    fn test_half_adder_structure() {
        let mut circuit = Circuit::new();
        let ha = circuit.assemble(&HalfAdder).unwrap();

        let kinds: Vec<_> = circuit
            .members(ha)
            .unwrap()
            .iter()
            .map(|&m| circuit.kind(m).unwrap())
            .collect();
        assert_eq!(kinds, vec!["or", "and", "inverter", "and"]);
        assert_eq!(circuit.internal_lines(ha).unwrap().len(), 2);
    }

    #[test]
    fn test_full_adder_truth_table() {
        let mut circuit = Circuit::new();
        let fa = circuit.assemble(&FullAdder).unwrap();
        let inputs = switches(&mut circuit, fa, &["A", "B", "C_IN"]);

        for bits in 0u8..8 {
            let (a, bit, cin) = (bits & 1, (bits >> 1) & 1, (bits >> 2) & 1);
            apply(&mut circuit, &inputs, &[a, bit, cin]);

            let sum = a + bit + cin;
            assert_eq!(read(&circuit, fa, "S").to_bit(), sum & 1);
            assert_eq!(read(&circuit, fa, "C_OUT").to_bit(), sum >> 1);
        }
    }

    #[test]
    fn test_ripple_width_bounds() {
        assert_eq!(RippleCarryAdder::new(0).unwrap_err(), KernelError::InvalidWidth(0));
        assert_eq!(RippleCarryAdder::new(17).unwrap_err(), KernelError::InvalidWidth(17));
    }

    #[test]
    fn test_ripple_pin_names_stop_at_max_width() {
        assert_eq!(RippleCarryAdder::a(0), Some("A0"));
        assert_eq!(RippleCarryAdder::b(15), Some("B15"));
        assert_eq!(RippleCarryAdder::s(MAX_ADDER_WIDTH - 1), Some("S15"));
        assert_eq!(RippleCarryAdder::a(MAX_ADDER_WIDTH), None);
        assert_eq!(RippleCarryAdder::s(100), None);
    }

    #[test]
    fn test_ripple_pin_order() {
        let mut circuit = Circuit::new();
        let adder = circuit.assemble(&RippleCarryAdder::new(2).unwrap()).unwrap();
        let names: Vec<_> = circuit.pins(adder).unwrap().iter().map(|s| s.pin.name).collect();
        assert_eq!(names, vec!["A0", "A1", "B0", "B1", "C_IN", "S0", "S1", "C_OUT"]);
    }

    fn adder_rig(width: usize) -> (Circuit, ElementId, Vec<logicwire_core::ConnectorId>) {
        let mut circuit = Circuit::new();
        let adder = circuit
            .assemble(&RippleCarryAdder::new(width).unwrap())
            .unwrap();
        let mut names = Vec::new();
        names.extend((0..width).filter_map(RippleCarryAdder::a));
        names.extend((0..width).filter_map(RippleCarryAdder::b));
        names.push("C_IN");
        let inputs = switches(&mut circuit, adder, &names);
        (circuit, adder, inputs)
    }

    fn sum(circuit: &Circuit, adder: ElementId, width: usize) -> u32 {
        let mut total = 0u32;
        for bit in 0..width {
            if read(circuit, adder, RippleCarryAdder::s(bit).unwrap()) == Level::High {
                total |= 1 << bit;
            }
        }
        if read(circuit, adder, "C_OUT") == Level::High {
            total |= 1 << width;
        }
        total
    }

    fn bits(value: u32, width: usize) -> impl Iterator<Item = u8> {
        (0..width).map(move |bit| ((value >> bit) & 1) as u8)
    }

    proptest! {
        #[test]
        fn test_ripple_adder_adds(a in 0u32..256, b in 0u32..256, carry in 0u8..2) {
            let width = 8;
            let (mut circuit, adder, inputs) = adder_rig(width);

            let mut values: Vec<u8> = bits(a, width).collect();
            values.extend(bits(b, width));
            values.push(carry);
            apply(&mut circuit, &inputs, &values);

            prop_assert_eq!(sum(&circuit, adder, width), a + b + carry as u32);
        }
    }

    #[test]
    fn test_ripple_adder_reuses_network() {
        let width = 4;
        let (mut circuit, adder, inputs) = adder_rig(width);

        for (a, b) in [(15u32, 1u32), (7, 7), (0, 0), (9, 6)] {
            let mut values: Vec<u8> = bits(a, width).collect();
            values.extend(bits(b, width));
            values.push(0);
            apply(&mut circuit, &inputs, &values);
            assert_eq!(sum(&circuit, adder, width), a + b);
        }
    }
}

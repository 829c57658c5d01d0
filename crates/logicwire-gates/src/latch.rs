//! Level-sensitive latches built from cross-coupled gates
//!
//! The feedback nets are boundary outputs, so `Q` and `Q_B` can be pre-wired
//! to lines like any other pin.

use logicwire_core::{Direction, ElementId, KernelResult, LineId};
use logicwire_kernel::{Assembly, CompositeBuilder};

use crate::Gate;

/// Cross-couple two gates: `first.Y` drives `q` and `second.A`,
/// `second.Y` drives `q_b` and `first.B`.
fn cross_couple(
    b: &mut CompositeBuilder<'_>,
    first: ElementId,
    second: ElementId,
    q: LineId,
    q_b: LineId,
) -> KernelResult<()> {
    b.connect_pin(first, "Y", q)?;
    b.connect_pin(second, "A", q)?;
    b.connect_pin(second, "Y", q_b)?;
    b.connect_pin(first, "B", q_b)?;
    Ok(())
}

/// SR latch from two NOR gates: `S`, `R` → `Q`, `Q_B`
///
/// | S | R | Q | Q_B |
/// |---|---|---|-----|
/// | 0 | 0 | hold | hold |
/// | 0 | 1 | 0 | 1 |
/// | 1 | 0 | 1 | 0 |
/// | 1 | 1 | 0 | 0 |
#[derive(Debug, Clone, Copy, Default)]
pub struct SrLatchNor;

impl Assembly for SrLatchNor {
    fn kind(&self) -> &'static str {
        "sr-latch-nor"
    }

    fn build(&self, b: &mut CompositeBuilder<'_>) -> KernelResult<()> {
        let reset = b.element(Gate::nor())?;
        let set = b.element(Gate::nor())?;

        let s = b.pin(set, "B")?;
        b.forward("S", s)?;
        let r = b.pin(reset, "A")?;
        b.forward("R", r)?;
        let q = b.boundary("Q", Direction::Output)?;
        let q_b = b.boundary("Q_B", Direction::Output)?;

        cross_couple(b, reset, set, q, q_b)
    }
}

/// SR latch from two NAND gates with active-low inputs:
/// `S_B`, `R_B` → `Q`, `Q_B`
///
/// Both inputs low forces `Q = Q_B = 1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SrLatchNand;

impl Assembly for SrLatchNand {
    fn kind(&self) -> &'static str {
        "sr-latch-nand"
    }

    fn build(&self, b: &mut CompositeBuilder<'_>) -> KernelResult<()> {
        let set = b.element(Gate::nand())?;
        let reset = b.element(Gate::nand())?;

        let s = b.pin(set, "A")?;
        b.forward("S_B", s)?;
        let r = b.pin(reset, "B")?;
        b.forward("R_B", r)?;
        let q = b.boundary("Q", Direction::Output)?;
        let q_b = b.boundary("Q_B", Direction::Output)?;

        cross_couple(b, set, reset, q, q_b)
    }
}

/// Clocked SR latch: a NOR latch behind two AND gates enabled by `E`.
///
/// Pins `S`, `R`, `E`, `Q`, `Q_B`. While `E` is low the latch holds.
#[derive(Debug, Clone, Copy, Default)]
pub struct GatedSrLatch;

impl Assembly for GatedSrLatch {
    fn kind(&self) -> &'static str {
        "gated-sr-latch"
    }

    fn build(&self, b: &mut CompositeBuilder<'_>) -> KernelResult<()> {
        let gate_r = b.element(Gate::and())?;
        let gate_s = b.element(Gate::and())?;
        let reset = b.element(Gate::nor())?;
        let set = b.element(Gate::nor())?;

        let s = b.pin(gate_s, "B")?;
        b.forward("S", s)?;
        let r = b.pin(gate_r, "A")?;
        b.forward("R", r)?;
        let enable = b.boundary("E", Direction::Input)?;
        let q = b.boundary("Q", Direction::Output)?;
        let q_b = b.boundary("Q_B", Direction::Output)?;

        b.connect_pin(gate_r, "B", enable)?;
        b.connect_pin(gate_s, "A", enable)?;

        let r_gated = b.line();
        b.connect_pin(gate_r, "Y", r_gated)?;
        b.connect_pin(reset, "A", r_gated)?;
        let s_gated = b.line();
        b.connect_pin(gate_s, "Y", s_gated)?;
        b.connect_pin(set, "B", s_gated)?;

        cross_couple(b, reset, set, q, q_b)
    }
}

/// Gated D latch from four NAND gates: `D`, `E` → `Q`, `Q_B`
///
/// Transparent while `E` is high, holds while it is low.
#[derive(Debug, Clone, Copy, Default)]
pub struct GatedDLatch;

impl Assembly for GatedDLatch {
    fn kind(&self) -> &'static str {
        "gated-d-latch"
    }

    fn build(&self, b: &mut CompositeBuilder<'_>) -> KernelResult<()> {
        let steer_d = b.element(Gate::nand())?;
        let steer_e = b.element(Gate::nand())?;
        let set = b.element(Gate::nand())?;
        let reset = b.element(Gate::nand())?;

        let d = b.pin(steer_d, "A")?;
        b.forward("D", d)?;
        let enable = b.boundary("E", Direction::Input)?;
        let q = b.boundary("Q", Direction::Output)?;
        let q_b = b.boundary("Q_B", Direction::Output)?;

        b.connect_pin(steer_d, "B", enable)?;
        b.connect_pin(steer_e, "B", enable)?;

        let d_bar = b.line();
        b.connect_pin(steer_d, "Y", d_bar)?;
        b.connect_pin(steer_e, "A", d_bar)?;
        b.connect_pin(set, "A", d_bar)?;

        let d_steered = b.line();
        b.connect_pin(steer_e, "Y", d_steered)?;
        b.connect_pin(reset, "A", d_steered)?;

        // set.B <- Q_B, reset.B <- Q
        b.connect_pin(set, "Y", q)?;
        b.connect_pin(reset, "B", q)?;
        b.connect_pin(reset, "Y", q_b)?;
        b.connect_pin(set, "B", q_b)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use logicwire_kernel::{Circuit, Terminal};

    use super::*;
    use crate::rig::{apply, read, switches};

    fn outputs(circuit: &Circuit, latch: ElementId) -> (u8, u8) {
        (
            read(circuit, latch, "Q").to_bit(),
            read(circuit, latch, "Q_B").to_bit(),
        )
    }

    #[test]
    fn test_nor_latch_sequence() {
        let mut circuit = Circuit::new();
        let latch = circuit.assemble(&SrLatchNor).unwrap();
        let inputs = switches(&mut circuit, latch, &["S", "R"]);

        apply(&mut circuit, &inputs, &[0, 1]);
        assert_eq!(outputs(&circuit, latch), (0, 1));

        apply(&mut circuit, &inputs, &[0, 0]);
        assert_eq!(outputs(&circuit, latch), (0, 1));

        apply(&mut circuit, &inputs, &[1, 0]);
        assert_eq!(outputs(&circuit, latch), (1, 0));

        apply(&mut circuit, &inputs, &[0, 0]);
        assert_eq!(outputs(&circuit, latch), (1, 0));

        apply(&mut circuit, &inputs, &[1, 1]);
        assert_eq!(outputs(&circuit, latch), (0, 0));
    }

    #[test]
    fn test_nor_latch_release_from_forbidden_state() {
        let mut circuit = Circuit::new();
        let latch = circuit.assemble(&SrLatchNor).unwrap();
        let inputs = switches(&mut circuit, latch, &["S", "R"]);

        apply(&mut circuit, &inputs, &[1, 1]);
        assert_eq!(outputs(&circuit, latch), (0, 0));

        // Released in S, R order within one wave
        apply(&mut circuit, &inputs, &[0, 0]);
        assert_eq!(outputs(&circuit, latch), (0, 1));
    }

    #[test]
    fn test_nand_latch() {
        let mut circuit = Circuit::new();
        let latch = circuit.assemble(&SrLatchNand).unwrap();
        let inputs = switches(&mut circuit, latch, &["S_B", "R_B"]);

        apply(&mut circuit, &inputs, &[0, 1]);
        assert_eq!(outputs(&circuit, latch), (1, 0));

        apply(&mut circuit, &inputs, &[1, 1]);
        assert_eq!(outputs(&circuit, latch), (1, 0));

        apply(&mut circuit, &inputs, &[1, 0]);
        assert_eq!(outputs(&circuit, latch), (0, 1));

        apply(&mut circuit, &inputs, &[1, 1]);
        assert_eq!(outputs(&circuit, latch), (0, 1));

        apply(&mut circuit, &inputs, &[0, 0]);
        assert_eq!(outputs(&circuit, latch), (1, 1));
    }

    #[test]
    fn test_gated_sr_latch_ignores_inputs_while_disabled() {
        let mut circuit = Circuit::new();
        let latch = circuit.assemble(&GatedSrLatch).unwrap();
        let inputs = switches(&mut circuit, latch, &["S", "R", "E"]);

        apply(&mut circuit, &inputs, &[0, 1, 1]);
        assert_eq!(outputs(&circuit, latch), (0, 1));

        apply(&mut circuit, &inputs, &[0, 0, 0]);
        apply(&mut circuit, &inputs, &[1, 0, 0]);
        assert_eq!(outputs(&circuit, latch), (0, 1));

        apply(&mut circuit, &inputs, &[1, 0, 1]);
        assert_eq!(outputs(&circuit, latch), (1, 0));
    }

    #[test]
    fn test_gated_d_latch_transparent_then_holds() {
        let mut circuit = Circuit::new();
        let latch = circuit.assemble(&GatedDLatch).unwrap();
        let inputs = switches(&mut circuit, latch, &["D", "E"]);

        apply(&mut circuit, &inputs, &[1, 1]);
        assert_eq!(outputs(&circuit, latch), (1, 0));

        apply(&mut circuit, &inputs, &[0, 1]);
        assert_eq!(outputs(&circuit, latch), (0, 1));

        apply(&mut circuit, &inputs, &[0, 0]);
        apply(&mut circuit, &inputs, &[1, 0]);
        assert_eq!(outputs(&circuit, latch), (0, 1));

        apply(&mut circuit, &inputs, &[1, 1]);
        assert_eq!(outputs(&circuit, latch), (1, 0));
    }

    #[test]
    fn test_latch_prewired_to_lines() {
        let mut circuit = Circuit::new();
        let lines: Vec<_> = (0..4).map(|_| circuit.new_line()).collect();
        let terminals: Vec<Terminal> = lines.iter().map(|&l| l.into()).collect();
        circuit.assemble_wired(&SrLatchNor, &terminals).unwrap();

        circuit.write_immediate(lines[0], 1).unwrap();
        circuit.start_propagation().unwrap();
        assert_eq!(circuit.line_value(lines[2]).unwrap().to_bit(), 1);
        assert_eq!(circuit.line_value(lines[3]).unwrap().to_bit(), 0);
    }
}

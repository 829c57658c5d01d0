//! 7400-series packages

use logicwire_core::{KernelResult, Pin};
use logicwire_kernel::{Assembly, CompositeBuilder};

use crate::Gate;

/// Package pin names of a quad 2-input gate IC, pin 1 first
const QUAD_PINOUT: [&str; 14] = [
    "1A", "1B", "1Y", "2A", "2B", "2Y", "GND", "3Y", "3A", "3B", "4Y", "4A", "4B", "VCC",
];

/// Quad 2-input NAND (7400).
///
/// Fourteen pins in package order; pin 7 is GND and pin 14 is VCC. Supply
/// pins take a position when pre-wiring but carry no signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct Quad2InputNand;

impl Quad2InputNand {
    pub fn pinout() -> &'static [&'static str] {
        &QUAD_PINOUT
    }
}

impl Assembly for Quad2InputNand {
    fn kind(&self) -> &'static str {
        "7400"
    }

    fn build(&self, b: &mut CompositeBuilder<'_>) -> KernelResult<()> {
        let mut gates = Vec::with_capacity(4);
        for _ in 0..4 {
            gates.push(b.element(Gate::nand())?);
        }

        for name in QUAD_PINOUT {
            match name {
                "GND" => b.supply(Pin::gnd(name)),
                "VCC" => b.supply(Pin::vcc(name)),
                _ => {
                    // "3A" is pin A of unit 3
                    let unit = usize::from(name.as_bytes()[0] - b'1');
                    let connector = b.pin(gates[unit], &name[1..])?;
                    b.forward(name, connector)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use logicwire_core::{KernelError, Level, PinKind};
    use logicwire_kernel::{Circuit, Terminal};

    use super::*;
    use crate::rig::{apply, read, switches};

    #[test]
    fn test_pin_map() {
        let mut circuit = Circuit::new();
        let ic = circuit.assemble(&Quad2InputNand).unwrap();

        let pins = circuit.pins(ic).unwrap();
        let names: Vec<_> = pins.iter().map(|s| s.pin.name).collect();
        assert_eq!(names, QUAD_PINOUT.to_vec());
        assert_eq!(pins[6].pin.kind, PinKind::Gnd);
        assert_eq!(pins[13].pin.kind, PinKind::Vcc);
        assert!(pins[6].connector.is_none());
        assert_eq!(pins[7].pin.kind, PinKind::Output);
        assert_eq!(pins[8].pin.kind, PinKind::Input);

        assert!(matches!(
            circuit.pin(ic, "VCC"),
            Err(KernelError::SupplyPin { .. })
        ));
        assert_eq!(circuit.members(ic).unwrap().len(), 4);
    }

    #[test]
    fn test_each_unit_is_a_nand() {
        let mut circuit = Circuit::new();
        let ic = circuit.assemble(&Quad2InputNand).unwrap();

        for unit in 1..=4 {
            let a = format!("{}A", unit);
            let b = format!("{}B", unit);
            let y = format!("{}Y", unit);
            let inputs = switches(&mut circuit, ic, &[a.as_str(), b.as_str()]);

            apply(&mut circuit, &inputs, &[1, 1]);
            assert_eq!(read(&circuit, ic, &y), Level::Low);
            apply(&mut circuit, &inputs, &[0, 1]);
            assert_eq!(read(&circuit, ic, &y), Level::High);
        }
    }

    #[test]
    fn test_prewire_skips_supply_positions() {
        let mut circuit = Circuit::new();
        let lines: Vec<_> = (0..14).map(|_| circuit.new_line()).collect();
        let terminals: Vec<Terminal> = lines.iter().map(|&l| l.into()).collect();
        let ic = circuit.assemble_wired(&Quad2InputNand, &terminals).unwrap();

        // Pins 7 and 14 were skipped
        let gnd = circuit.line(lines[6]).unwrap();
        assert!(gnd.listeners().is_empty());

        circuit.write_immediate(lines[7 + 1], 1).unwrap(); // 3A
        circuit.write_immediate(lines[7 + 2], 1).unwrap(); // 3B
        circuit.start_propagation().unwrap();
        assert_eq!(circuit.line_value(lines[7]).unwrap(), Level::Low); // 3Y

        let extra: Vec<Terminal> = (0..15).map(|_| circuit.new_line().into()).collect();
        assert!(matches!(
            circuit.assemble_wired(&Quad2InputNand, &extra),
            Err(KernelError::UnknownPinName { .. })
        ));
        assert_eq!(circuit.kind(ic).unwrap(), "7400");
    }
}

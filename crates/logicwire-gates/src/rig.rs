//! Shared fixtures for the gate unit tests

use logicwire_core::{ConnectorId, ElementId, Level};
use logicwire_kernel::Circuit;

use crate::Switch;

/// Attach a low switch to each named pin and return the switch outputs
pub(crate) fn switches(circuit: &mut Circuit, element: ElementId, names: &[&str]) -> Vec<ConnectorId> {
    names
        .iter()
        .map(|name| {
            let switch = circuit.add(Switch::low()).unwrap();
            let y = circuit.pin(switch, "Y").unwrap();
            circuit.connect_pin(element, name, y).unwrap();
            y
        })
        .collect()
}

/// Set each switch and settle
pub(crate) fn apply(circuit: &mut Circuit, switches: &[ConnectorId], values: &[u8]) {
    for (switch, value) in switches.iter().zip(values) {
        circuit.set_signal(*switch, *value).unwrap();
    }
    let report = circuit.start_propagation().unwrap();
    assert!(report.settled(), "network did not settle: {:?}", report);
}

pub(crate) fn read(circuit: &Circuit, element: ElementId, pin: &str) -> Level {
    let connector = circuit.pin(element, pin).unwrap();
    circuit.get_signal(connector).unwrap()
}

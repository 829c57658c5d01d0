//! Testbench - a circuit with named switches and probes
//!
//! Stimuli are applied through switches and results read through probes, so
//! a test talks about `"S"` and `"Q"` rather than connector handles.

use std::cell::RefCell;
use std::rc::Rc;

use logicwire_core::{
    ConnectorId, ElementId, IntoLevel, KernelError, KernelResult, Level, Logic,
};
use logicwire_gates::{Probe, Switch};
use logicwire_kernel::{Assembly, Circuit, CircuitConfig, LogicElement, PropagationReport, Terminal};

/// A value change seen by a recorded probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeEvent {
    pub probe: String,
    pub value: Level,
}

/// Circuit plus named stimulus and observation points
pub struct Testbench {
    circuit: Circuit,
    inputs: Vec<(String, ConnectorId)>,
    outputs: Vec<(String, ConnectorId)>,
    events: Rc<RefCell<Vec<ProbeEvent>>>,
}

impl Testbench {
    pub fn new() -> Self {
        Self::with_config(CircuitConfig::default())
    }

    pub fn with_config(config: CircuitConfig) -> Self {
        Testbench {
            circuit: Circuit::with_config(config),
            inputs: Vec::new(),
            outputs: Vec::new(),
            events: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    pub fn circuit_mut(&mut self) -> &mut Circuit {
        &mut self.circuit
    }

    /// Insert a primitive element
    pub fn add<E: LogicElement + 'static>(&mut self, element: E) -> KernelResult<ElementId> {
        self.circuit.add(element)
    }

    /// Insert a composite element
    pub fn assemble<A: Assembly>(&mut self, assembly: &A) -> KernelResult<ElementId> {
        self.circuit.assemble(assembly)
    }

    pub fn pin(&self, element: ElementId, name: &str) -> KernelResult<ConnectorId> {
        self.circuit.pin(element, name)
    }

    pub fn connect(&mut self, from: ConnectorId, to: impl Into<Terminal>) -> KernelResult<()> {
        self.circuit.connect(from, to)
    }

    /// Add a low switch named `name` driving `target`
    pub fn switch(&mut self, name: &str, target: impl Into<Terminal>) -> KernelResult<ConnectorId> {
        let switch = self.circuit.add(Switch::low())?;
        let y = self.circuit.pin(switch, "Y")?;
        self.circuit.connect(y, target)?;
        self.inputs.push((name.to_string(), y));
        Ok(y)
    }

    /// Add a switch driving an element pin
    pub fn switch_pin(&mut self, name: &str, element: ElementId, pin: &str) -> KernelResult<ConnectorId> {
        let target = self.circuit.pin(element, pin)?;
        self.switch(name, target)
    }

    /// Add a probe named `name` tapping `target`
    pub fn probe(&mut self, name: &str, target: impl Into<Terminal>) -> KernelResult<ConnectorId> {
        let probe = self.circuit.add(Probe)?;
        let a = self.circuit.pin(probe, "A")?;
        self.circuit.connect(a, target)?;
        self.outputs.push((name.to_string(), a));
        Ok(a)
    }

    /// Add a probe tapping an element pin
    pub fn probe_pin(&mut self, name: &str, element: ElementId, pin: &str) -> KernelResult<ConnectorId> {
        let target = self.circuit.pin(element, pin)?;
        self.probe(name, target)
    }

    /// Record every change of a probe into [`events`](Self::events)
    pub fn record(&mut self, name: &str) -> KernelResult<()> {
        let connector = self.output(name)?;
        let events = self.events.clone();
        let probe = name.to_string();
        self.circuit.add_change_listener(connector, move |value| {
            events.borrow_mut().push(ProbeEvent {
                probe: probe.clone(),
                value,
            })
        })?;
        Ok(())
    }

    pub fn events(&self) -> Vec<ProbeEvent> {
        self.events.borrow().clone()
    }

    pub fn clear_events(&mut self) {
        self.events.borrow_mut().clear();
    }

    fn input(&self, name: &str) -> KernelResult<ConnectorId> {
        find(&self.inputs, name)
    }

    fn output(&self, name: &str) -> KernelResult<ConnectorId> {
        find(&self.outputs, name)
    }

    /// Set a switch without propagating
    pub fn set(&mut self, name: &str, value: impl IntoLevel) -> KernelResult<()> {
        let switch = self.input(name)?;
        self.circuit.set_signal(switch, value)
    }

    /// Set several switches in order, then settle
    pub fn apply(&mut self, assignments: &[(&str, u8)]) -> KernelResult<PropagationReport> {
        for &(name, value) in assignments {
            self.set(name, value)?;
        }
        self.settle()
    }

    /// Drain the agenda
    pub fn settle(&mut self) -> KernelResult<PropagationReport> {
        self.circuit.start_propagation()
    }

    /// Current level of a probe or switch
    pub fn get(&self, name: &str) -> KernelResult<Level> {
        let connector = self.output(name).or_else(|_| self.input(name))?;
        self.circuit.get_signal(connector)
    }

    /// Probe value including indeterminate marks of the driving element
    pub fn logic(&self, name: &str) -> KernelResult<Logic> {
        let probe = self.output(name)?;
        let Some(line) = self.circuit.connector(probe)?.outer() else {
            return Ok(Logic::Indeterminate);
        };

        // An indeterminate driver on the same net wins
        for connector in 0..self.circuit.connector_count() {
            let connector = ConnectorId::new(connector);
            let c = self.circuit.connector(connector)?;
            if c.is_output() && c.outer() == Some(line) && c.is_indeterminate() {
                return Ok(Logic::Indeterminate);
            }
        }
        Ok(Logic::from(self.circuit.get_signal(probe)?))
    }

    /// Probe values as bits, in probe order
    pub fn read_bits(&self) -> KernelResult<Vec<u8>> {
        self.outputs
            .iter()
            .map(|(_, c)| self.circuit.get_signal(*c).map(Level::to_bit))
            .collect()
    }

    /// Named probe values, in probe order
    pub fn snapshot(&self) -> KernelResult<Vec<(String, Level)>> {
        self.outputs
            .iter()
            .map(|(name, c)| Ok((name.clone(), self.circuit.get_signal(*c)?)))
            .collect()
    }

    /// Committed transitions of every line, in line order
    pub fn transition_counts(&self) -> Vec<u64> {
        self.circuit.lines().map(|line| line.transitions()).collect()
    }

    pub fn input_names(&self) -> Vec<&str> {
        self.inputs.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn output_names(&self) -> Vec<&str> {
        self.outputs.iter().map(|(name, _)| name.as_str()).collect()
    }
}

impl Default for Testbench {
    fn default() -> Self {
        Self::new()
    }
}

fn find(points: &[(String, ConnectorId)], name: &str) -> KernelResult<ConnectorId> {
    points
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, c)| *c)
        .ok_or_else(|| KernelError::UnknownPinName {
            element: "testbench".to_string(),
            pin: name.to_string(),
        })
}

//! Elements - logic primitives and the context their actions run in

use logicwire_core::{
    ConnectorId, ElementId, IntoLevel, KernelResult, Level, LineId, Logic, Pin,
};

use crate::{Circuit, PropagationReport};

/// A logic primitive.
///
/// `action` is invoked through the agenda whenever one of the element's
/// input connectors changes value. It reads inputs and drives outputs via
/// the [`ElementContext`].
pub trait LogicElement {
    /// Short type name used in diagnostics, e.g. `"nand"`
    fn kind(&self) -> &'static str;

    /// Declared pins in pin order
    fn pins(&self) -> &[Pin];

    /// Called once after insertion and pre-wiring.
    ///
    /// Combinational gates evaluate here so their outputs start consistent
    /// with their inputs.
    fn init(&mut self, ctx: &mut ElementContext<'_>) -> KernelResult<()> {
        let _ = ctx;
        Ok(())
    }

    /// Recompute outputs from inputs
    fn action(&mut self, ctx: &mut ElementContext<'_>) -> KernelResult<()>;
}

/// One declared pin and the connector implementing it.
///
/// Supply pins (VCC/GND) have no connector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PinSlot {
    pub pin: Pin,
    pub connector: Option<ConnectorId>,
}

pub(crate) enum ElementBody {
    /// Behaviour is `None` only while its action is executing
    Primitive(Option<Box<dyn LogicElement>>),
    Composite {
        members: Vec<ElementId>,
        lines: Vec<LineId>,
    },
}

pub(crate) struct ElementEntry {
    pub(crate) kind: &'static str,
    pub(crate) pins: Vec<PinSlot>,
    pub(crate) body: ElementBody,
}

impl ElementEntry {
    pub(crate) fn connector(&self, name: &str) -> Option<&PinSlot> {
        self.pins.iter().find(|slot| slot.pin.name == name)
    }
}

/// Access an executing element has to the circuit
pub struct ElementContext<'a> {
    circuit: &'a mut Circuit,
    element: ElementId,
}

impl<'a> ElementContext<'a> {
    pub(crate) fn new(circuit: &'a mut Circuit, element: ElementId) -> Self {
        ElementContext { circuit, element }
    }

    /// The element being evaluated
    #[inline]
    pub fn element(&self) -> ElementId {
        self.element
    }

    /// Read-only view of the circuit
    pub fn circuit(&self) -> &Circuit {
        self.circuit
    }

    /// Connector implementing a pin of this element
    pub fn pin(&self, name: &str) -> KernelResult<ConnectorId> {
        self.circuit.pin(self.element, name)
    }

    /// Current level of a pin's inner line
    pub fn input(&self, name: &str) -> KernelResult<Level> {
        let connector = self.pin(name)?;
        self.circuit.get_signal(connector)
    }

    /// Level of a pin as a storage element samples it: a floating
    /// (unconnected) pin cannot be resolved.
    pub fn sample(&self, name: &str) -> KernelResult<Logic> {
        let connector = self.pin(name)?;
        if !self.circuit.is_connected(connector)? {
            return Ok(Logic::Indeterminate);
        }
        Ok(Logic::from(self.circuit.get_signal(connector)?))
    }

    /// Drive an output pin immediately
    pub fn drive(&mut self, name: &str, value: impl IntoLevel) -> KernelResult<()> {
        let connector = self.pin(name)?;
        self.circuit.set_signal(connector, value)
    }

    /// Drive an output pin once the work already queued has run
    pub fn drive_deferred(&mut self, name: &str, value: impl IntoLevel) -> KernelResult<()> {
        let connector = self.pin(name)?;
        self.circuit.schedule_signal(connector, value)
    }

    /// Declare an output pin unresolved. The pin's line keeps its last
    /// value; [`Circuit::logic`] reports `Indeterminate` until the pin is
    /// driven again.
    pub fn mark_indeterminate(&mut self, name: &str) -> KernelResult<()> {
        let connector = self.pin(name)?;
        self.circuit.mark_indeterminate(connector)
    }

    /// Request a propagation wave. While the agenda is draining this is a
    /// no-op reported as `reentrant`.
    pub fn propagate(&mut self) -> KernelResult<PropagationReport> {
        self.circuit.start_propagation()
    }

    /// Stop the current wave after this action
    pub fn halt(&mut self) {
        self.circuit.halt();
    }
}

//! Composite elements
//!
//! A composite owns sub-elements and private lines. Its pins are either
//! boundary connectors, whose inner line is an internal net, or forwarded
//! connectors of a member.

use logicwire_core::{
    ConnectorId, Direction, ElementId, KernelResult, LineId, Pin, PinKind,
};

use crate::{Circuit, ElementBody, ElementEntry, LogicElement, PinSlot, Terminal};

/// Recipe for a composite element
pub trait Assembly {
    /// Short type name used in diagnostics, e.g. `"full-adder"`
    fn kind(&self) -> &'static str;

    /// Add members, nets and pins. Pins are declared in pin order.
    fn build(&self, builder: &mut CompositeBuilder<'_>) -> KernelResult<()>;
}

/// Collects the members, private lines and pins of a composite under
/// construction
pub struct CompositeBuilder<'a> {
    circuit: &'a mut Circuit,
    id: ElementId,
    pins: Vec<PinSlot>,
    members: Vec<ElementId>,
    lines: Vec<LineId>,
}

impl<'a> CompositeBuilder<'a> {
    /// The composite being built
    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn circuit(&self) -> &Circuit {
        self.circuit
    }

    /// Declare a pin backed by a new connector owned by the composite.
    ///
    /// Returns the connector's inner line, which is the internal net members
    /// attach to: an input boundary fans in to it, an output boundary is
    /// driven from it.
    pub fn boundary(&mut self, name: &'static str, direction: Direction) -> KernelResult<LineId> {
        let connector = self.circuit.new_connector(direction, Some(self.id), name);
        self.pins.push(PinSlot {
            pin: Pin {
                name,
                kind: PinKind::from(direction),
            },
            connector: Some(connector),
        });
        Ok(self.circuit.connector(connector)?.inner())
    }

    /// Declare a pin that is a member's connector
    pub fn forward(&mut self, name: &'static str, connector: ConnectorId) -> KernelResult<()> {
        let direction = self.circuit.direction(connector)?;
        self.pins.push(PinSlot {
            pin: Pin {
                name,
                kind: PinKind::from(direction),
            },
            connector: Some(connector),
        });
        Ok(())
    }

    /// Declare a VCC or GND pin. It occupies a position but has no connector.
    pub fn supply(&mut self, pin: Pin) {
        debug_assert!(pin.kind.is_supply());
        self.pins.push(PinSlot {
            pin,
            connector: None,
        });
    }

    /// Add a primitive member
    pub fn element<E>(&mut self, element: E) -> KernelResult<ElementId>
    where
        E: LogicElement + 'static,
    {
        self.element_wired(element, &[])
    }

    /// Add a primitive member and pre-wire its pins
    pub fn element_wired<E>(&mut self, element: E, wires: &[Terminal]) -> KernelResult<ElementId>
    where
        E: LogicElement + 'static,
    {
        let id = self.circuit.add_wired(element, wires)?;
        self.members.push(id);
        Ok(id)
    }

    /// Add a nested composite member
    pub fn assemble<A: Assembly>(&mut self, assembly: &A) -> KernelResult<ElementId> {
        self.assemble_wired(assembly, &[])
    }

    pub fn assemble_wired<A: Assembly>(&mut self, assembly: &A, wires: &[Terminal]) -> KernelResult<ElementId> {
        let id = self.circuit.assemble_wired(assembly, wires)?;
        self.members.push(id);
        Ok(id)
    }

    /// Allocate a private line
    pub fn line(&mut self) -> LineId {
        let line = self.circuit.new_line();
        self.lines.push(line);
        line
    }

    pub fn pin(&self, element: ElementId, name: &str) -> KernelResult<ConnectorId> {
        self.circuit.pin(element, name)
    }

    pub fn connect(&mut self, connector: ConnectorId, target: impl Into<Terminal>) -> KernelResult<()> {
        self.circuit.connect(connector, target)
    }

    pub fn connect_pin(&mut self, element: ElementId, name: &str, target: impl Into<Terminal>) -> KernelResult<()> {
        self.circuit.connect_pin(element, name, target)
    }
}

impl Circuit {
    /// Build a composite with unconnected pins
    pub fn assemble<A: Assembly>(&mut self, assembly: &A) -> KernelResult<ElementId> {
        self.assemble_wired(assembly, &[])
    }

    /// Build a composite and pre-wire its pins in declared order.
    ///
    /// If building or pre-wiring fails, the composite, its members and its
    /// private lines are removed again.
    pub fn assemble_wired<A: Assembly>(&mut self, assembly: &A, wires: &[Terminal]) -> KernelResult<ElementId> {
        let mark = self.mark();
        let result = self.build_composite(assembly, wires);
        if result.is_err() {
            self.rollback(mark);
        }
        result
    }

    fn build_composite<A: Assembly>(&mut self, assembly: &A, wires: &[Terminal]) -> KernelResult<ElementId> {
        let id = ElementId::new(self.elements.len());
        let kind = assembly.kind();
        self.elements.push(ElementEntry {
            kind,
            pins: Vec::new(),
            body: ElementBody::Composite {
                members: Vec::new(),
                lines: Vec::new(),
            },
        });

        let mut builder = CompositeBuilder {
            circuit: self,
            id,
            pins: Vec::new(),
            members: Vec::new(),
            lines: Vec::new(),
        };
        assembly.build(&mut builder)?;
        let CompositeBuilder {
            pins,
            members,
            lines,
            ..
        } = builder;

        let plan: Vec<(Option<Direction>, Option<ConnectorId>)> = pins
            .iter()
            .map(|slot| (slot.pin.kind.direction(), slot.connector))
            .collect();
        self.check_wires(kind, id, &plan, wires)?;

        let member_count = members.len();
        let entry = &mut self.elements[id.index()];
        entry.pins = pins;
        entry.body = ElementBody::Composite { members, lines };

        self.prewire(id, wires)?;
        tracing::debug!(element = %id, kind, members = member_count, "composite assembled");
        Ok(id)
    }
}

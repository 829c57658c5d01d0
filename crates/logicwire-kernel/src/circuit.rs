//! Circuit - arena of lines, connectors and elements plus the agenda that
//! propagates signals between them

use logicwire_core::{
    ConnectorId, Direction, ElementId, IntoLevel, KernelError, KernelResult, Level, LineId, Logic,
    ObserverId, Pin,
};

use crate::{
    CircuitConfig, CircuitStats, Connector, ElementBody, ElementContext, ElementEntry, Line,
    Listener, LogicElement, PinSlot, PropagationReport, Scheduler, Terminal,
};

/// Deferred unit of work on the agenda
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Run an element's action
    Evaluate(ElementId),
    /// Store-and-notify a line value
    Write { line: LineId, value: Level },
    /// Hand a new value to an external observer
    Deliver { observer: ObserverId, value: Level },
}

type ObserverFn = Box<dyn FnMut(Level)>;

/// Arena sizes recorded before an insertion
#[derive(Debug, Clone, Copy)]
pub(crate) struct ArenaMark {
    lines: usize,
    connectors: usize,
    elements: usize,
}

/// A simulated logic network.
///
/// Owns every line, connector and element, and the agenda. Handles returned
/// by one circuit are meaningless in another.
pub struct Circuit {
    config: CircuitConfig,
    lines: Vec<Line>,
    connectors: Vec<Connector>,
    pub(crate) elements: Vec<ElementEntry>,
    observers: Vec<Option<ObserverFn>>,
    agenda: Scheduler<Task>,
    stats: CircuitStats,
}

impl Circuit {
    /// Create an empty circuit with default configuration
    pub fn new() -> Self {
        Self::with_config(CircuitConfig::default())
    }

    /// Create an empty circuit with custom configuration
    pub fn with_config(config: CircuitConfig) -> Self {
        Circuit {
            lines: Vec::with_capacity(config.line_capacity),
            connectors: Vec::with_capacity(config.line_capacity),
            elements: Vec::with_capacity(config.element_capacity),
            observers: Vec::new(),
            agenda: Scheduler::with_capacity(config.element_capacity),
            stats: CircuitStats::default(),
            config,
        }
    }

    pub fn config(&self) -> &CircuitConfig {
        &self.config
    }

    pub fn stats(&self) -> &CircuitStats {
        &self.stats
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn connector_count(&self) -> usize {
        self.connectors.len()
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    // =========================================================================
    // LINES
    // =========================================================================

    /// Allocate a fresh line, initially low
    pub fn new_line(&mut self) -> LineId {
        let id = LineId::new(self.lines.len());
        self.lines.push(Line::new(id));
        id
    }

    pub fn line(&self, id: LineId) -> KernelResult<&Line> {
        self.lines
            .get(id.index())
            .ok_or(KernelError::LineNotFound(id))
    }

    pub fn line_value(&self, id: LineId) -> KernelResult<Level> {
        Ok(self.line(id)?.read())
    }

    /// Committed value changes of a line
    pub fn transitions(&self, id: LineId) -> KernelResult<u64> {
        Ok(self.line(id)?.transitions())
    }

    /// Iterate over all lines
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.lines.iter()
    }

    pub fn subscribe(&mut self, line: LineId, listener: Listener) -> KernelResult<()> {
        self.line(line)?;
        self.lines[line.index()].subscribe(listener)
    }

    pub fn unsubscribe(&mut self, line: LineId, listener: Listener) -> KernelResult<()> {
        self.line(line)?;
        self.lines[line.index()].unsubscribe(listener)
    }

    /// Store a value and notify listeners synchronously
    pub fn write_immediate(&mut self, line: LineId, value: impl IntoLevel) -> KernelResult<()> {
        let value = value.into_level()?;
        self.line(line)?;
        self.commit(line, value);
        Ok(())
    }

    /// Store a value and notify listeners once the work already queued has
    /// run. Nothing is scheduled if the line already holds the value.
    pub fn write_deferred(&mut self, line: LineId, value: impl IntoLevel) -> KernelResult<()> {
        let value = value.into_level()?;
        if self.line(line)?.read() != value {
            self.agenda.schedule(Task::Write { line, value });
        }
        Ok(())
    }

    /// Store-and-notify. Listeners are taken from a snapshot, so listeners
    /// added or removed during the pass do not affect it.
    fn commit(&mut self, line: LineId, value: Level) {
        if !self.lines[line.index()].store(value) {
            return;
        }
        self.stats.transitions += 1;
        if self.config.trace_transitions {
            tracing::trace!(line = %line, value = %value, "line transition");
        }

        for listener in self.lines[line.index()].snapshot() {
            match listener {
                Listener::Connector(connector) => self.resync(connector),
                Listener::Element(element) => self.agenda.schedule(Task::Evaluate(element)),
                Listener::Observer(observer) => {
                    self.agenda.schedule(Task::Deliver { observer, value })
                }
            }
        }
    }

    // =========================================================================
    // CONNECTORS
    // =========================================================================

    /// Allocate a connector with its own inner line. Output connectors
    /// listen to their inner line so element writes reach the outer line.
    pub(crate) fn new_connector(
        &mut self,
        direction: Direction,
        owner: Option<ElementId>,
        name: &'static str,
    ) -> ConnectorId {
        let id = ConnectorId::new(self.connectors.len());
        let inner = self.new_line();
        self.connectors
            .push(Connector::new(id, direction, inner, owner, name));

        if direction.is_output() {
            // A fresh line has no listeners
            let _ = self.lines[inner.index()].subscribe(Listener::Connector(id));
        }
        id
    }

    pub fn connector(&self, id: ConnectorId) -> KernelResult<&Connector> {
        self.connectors
            .get(id.index())
            .ok_or(KernelError::ConnectorNotFound(id))
    }

    pub(crate) fn connector_mut(&mut self, id: ConnectorId) -> KernelResult<&mut Connector> {
        self.connectors
            .get_mut(id.index())
            .ok_or(KernelError::ConnectorNotFound(id))
    }

    pub fn direction(&self, id: ConnectorId) -> KernelResult<Direction> {
        Ok(self.connector(id)?.direction())
    }

    pub fn is_connected(&self, id: ConnectorId) -> KernelResult<bool> {
        Ok(self.connector(id)?.is_connected())
    }

    /// Value of the connector's inner line
    pub fn get_signal(&self, id: ConnectorId) -> KernelResult<Level> {
        let inner = self.connector(id)?.inner();
        Ok(self.lines[inner.index()].read())
    }

    /// Value as reported to observers, including indeterminate marks
    pub fn logic(&self, id: ConnectorId) -> KernelResult<Logic> {
        let connector = self.connector(id)?;
        if connector.is_indeterminate() {
            return Ok(Logic::Indeterminate);
        }
        Ok(Logic::from(self.lines[connector.inner().index()].read()))
    }

    /// Drive a connector's inner line immediately.
    ///
    /// Only output connectors are externally drivable.
    pub fn set_signal(&mut self, id: ConnectorId, value: impl IntoLevel) -> KernelResult<()> {
        let inner = self.drivable(id)?;
        let value = value.into_level()?;
        self.connectors[id.index()].set_indeterminate(false);
        self.commit(inner, value);
        Ok(())
    }

    /// Drive a connector's inner line once the work already queued has run
    pub fn schedule_signal(&mut self, id: ConnectorId, value: impl IntoLevel) -> KernelResult<()> {
        let inner = self.drivable(id)?;
        let value = value.into_level()?;
        self.connectors[id.index()].set_indeterminate(false);
        self.write_deferred(inner, value)
    }

    fn drivable(&self, id: ConnectorId) -> KernelResult<LineId> {
        let connector = self.connector(id)?;
        if connector.is_input() {
            return Err(KernelError::ReadOnlyConnector(id));
        }
        Ok(connector.inner())
    }

    pub(crate) fn mark_indeterminate(&mut self, id: ConnectorId) -> KernelResult<()> {
        let connector = self.connector_mut(id)?;
        if connector.is_input() {
            return Err(KernelError::ReadOnlyConnector(id));
        }
        if !connector.is_indeterminate() {
            connector.set_indeterminate(true);
            self.stats.indeterminate += 1;
        }
        Ok(())
    }

    /// Bring the connector's two sides into agreement
    pub fn resync_connector(&mut self, id: ConnectorId) -> KernelResult<()> {
        self.connector(id)?;
        self.resync(id);
        Ok(())
    }

    /// Connector action: copy outer to inner (input) or inner to outer
    /// (output) when they differ. Unconnected connectors are left alone.
    pub(crate) fn resync(&mut self, id: ConnectorId) {
        let Some((from, to)) = self.connectors[id.index()].sync_route() else {
            return;
        };
        let value = self.lines[from.index()].read();
        if self.lines[to.index()].read() != value {
            self.commit(to, value);
        }
    }

    // =========================================================================
    // OBSERVERS
    // =========================================================================

    /// Register a callback invoked with the new value whenever the
    /// connector's inner line changes. Deliveries go through the agenda,
    /// so callbacks only run while a wave drains.
    pub fn add_change_listener<F>(&mut self, id: ConnectorId, callback: F) -> KernelResult<ObserverId>
    where
        F: FnMut(Level) + 'static,
    {
        let inner = self.connector(id)?.inner();
        let observer = ObserverId::new(self.observers.len());
        self.lines[inner.index()].subscribe(Listener::Observer(observer))?;
        self.observers.push(Some(Box::new(callback)));
        Ok(observer)
    }

    pub fn remove_change_listener(&mut self, id: ConnectorId, observer: ObserverId) -> KernelResult<()> {
        let inner = self.connector(id)?.inner();
        match self.observers.get(observer.index()) {
            Some(Some(_)) => {}
            _ => return Err(KernelError::ObserverNotFound(observer)),
        }
        self.lines[inner.index()].unsubscribe(Listener::Observer(observer))?;
        self.observers[observer.index()] = None;
        Ok(())
    }

    // =========================================================================
    // ELEMENTS
    // =========================================================================

    /// Insert an element with unconnected pins
    pub fn add<E>(&mut self, element: E) -> KernelResult<ElementId>
    where
        E: LogicElement + 'static,
    {
        self.add_wired(element, &[])
    }

    /// Insert an element and connect its pins, in declared order, to the
    /// given terminals. Supply pins consume a position but are skipped.
    ///
    /// Terminals are checked before anything is allocated. On error the
    /// circuit is left as it was.
    pub fn add_wired<E>(&mut self, element: E, wires: &[Terminal]) -> KernelResult<ElementId>
    where
        E: LogicElement + 'static,
    {
        let id = ElementId::new(self.elements.len());
        let kind = element.kind();
        let pins: Vec<Pin> = element.pins().to_vec();

        let plan: Vec<(Option<Direction>, Option<ConnectorId>)> =
            pins.iter().map(|pin| (pin.kind.direction(), None)).collect();
        self.check_wires(kind, id, &plan, wires)?;

        let mark = self.mark();
        let result = self.insert(id, kind, pins, Box::new(element), wires);
        if result.is_err() {
            self.rollback(mark);
        }
        result?;

        tracing::trace!(element = %id, kind, "element added");
        Ok(id)
    }

    fn insert(
        &mut self,
        id: ElementId,
        kind: &'static str,
        pins: Vec<Pin>,
        behaviour: Box<dyn LogicElement>,
        wires: &[Terminal],
    ) -> KernelResult<()> {
        let mut slots = Vec::with_capacity(pins.len());
        for pin in pins {
            let connector = pin
                .kind
                .direction()
                .map(|direction| self.new_connector(direction, Some(id), pin.name));
            if let (Some(connector), Some(Direction::Input)) = (connector, pin.kind.direction()) {
                let inner = self.connectors[connector.index()].inner();
                self.lines[inner.index()].subscribe(Listener::Element(id))?;
            }
            slots.push(PinSlot { pin, connector });
        }

        self.elements.push(ElementEntry {
            kind,
            pins: slots,
            body: ElementBody::Primitive(Some(behaviour)),
        });

        self.prewire(id, wires)?;
        self.run_behaviour(id, true)
    }

    /// Check that `wires` can be attached to pins laid out as `plan` without
    /// touching the circuit. Each plan entry is the pin's direction (`None`
    /// for supply pins) and its existing connector, if it has one yet.
    pub(crate) fn check_wires(
        &self,
        kind: &'static str,
        id: ElementId,
        plan: &[(Option<Direction>, Option<ConnectorId>)],
        wires: &[Terminal],
    ) -> KernelResult<()> {
        if wires.len() > plan.len() {
            return Err(KernelError::UnknownPinName {
                element: format!("{}#{}", kind, id.0),
                pin: format!("PIN{}", plan.len() + 1),
            });
        }

        // Connectors that earlier wires in this call give an outer line
        let mut attached: Vec<ConnectorId> = Vec::new();
        let has_outer = |circuit: &Circuit, attached: &[ConnectorId], c: ConnectorId| {
            circuit
                .connector(c)
                .map(|connector| connector.is_connected() || attached.contains(&c))
        };

        for (&(direction, connector), wire) in plan.iter().zip(wires) {
            let Some(direction) = direction else {
                continue;
            };
            let outer = match connector {
                Some(c) => has_outer(self, &attached, c)?,
                None => false,
            };

            match *wire {
                Terminal::Line(line) => {
                    self.line(line)?;
                    if let (true, Some(c)) = (outer, connector) {
                        return Err(KernelError::AlreadyConnected(c));
                    }
                }
                Terminal::Connector(other) => {
                    if self.connector(other)?.direction() == direction {
                        return Err(KernelError::IncompatibleDirection { direction });
                    }
                    if let (true, true, Some(c)) = (outer, has_outer(self, &attached, other)?, connector) {
                        return Err(KernelError::AlreadyConnected(c));
                    }
                    attached.push(other);
                }
            }
            if let Some(c) = connector {
                attached.push(c);
            }
        }
        Ok(())
    }

    /// Arena sizes, for undoing a failed insertion
    pub(crate) fn mark(&self) -> ArenaMark {
        ArenaMark {
            lines: self.lines.len(),
            connectors: self.connectors.len(),
            elements: self.elements.len(),
        }
    }

    /// Drop everything allocated since `mark`, along with the listeners,
    /// queued tasks and outer links that point at it.
    pub(crate) fn rollback(&mut self, mark: ArenaMark) {
        self.lines.truncate(mark.lines);
        self.connectors.truncate(mark.connectors);
        self.elements.truncate(mark.elements);

        for line in &mut self.lines {
            line.retain_listeners(|listener| match *listener {
                Listener::Connector(c) => c.index() < mark.connectors,
                Listener::Element(e) => e.index() < mark.elements,
                Listener::Observer(_) => true,
            });
        }
        for connector in &mut self.connectors {
            if connector.outer().is_some_and(|line| line.index() >= mark.lines) {
                connector.clear_outer();
            }
        }
        self.agenda.retain(|task| match *task {
            Task::Evaluate(element) => element.index() < mark.elements,
            Task::Write { line, .. } => line.index() < mark.lines,
            Task::Deliver { .. } => true,
        });
        tracing::debug!(
            lines = mark.lines,
            connectors = mark.connectors,
            elements = mark.elements,
            "insertion rolled back"
        );
    }

    pub(crate) fn prewire(&mut self, id: ElementId, wires: &[Terminal]) -> KernelResult<()> {
        let slots = self.entry(id)?.pins.clone();
        for (slot, wire) in slots.iter().zip(wires) {
            if let Some(connector) = slot.connector {
                self.connect(connector, *wire)?;
            }
        }
        Ok(())
    }

    fn entry(&self, id: ElementId) -> KernelResult<&ElementEntry> {
        self.elements
            .get(id.index())
            .ok_or(KernelError::ElementNotFound(id))
    }

    /// Diagnostic name, e.g. `nand#4`
    pub fn element_name(&self, id: ElementId) -> String {
        match self.elements.get(id.index()) {
            Some(entry) => format!("{}#{}", entry.kind, id.0),
            None => format!("{}", id),
        }
    }

    pub fn kind(&self, id: ElementId) -> KernelResult<&'static str> {
        Ok(self.entry(id)?.kind)
    }

    /// Declared pins and their connectors, in pin order
    pub fn pins(&self, id: ElementId) -> KernelResult<&[PinSlot]> {
        Ok(&self.entry(id)?.pins)
    }

    /// Sub-elements of a composite (empty for primitives)
    pub fn members(&self, id: ElementId) -> KernelResult<&[ElementId]> {
        match &self.entry(id)?.body {
            ElementBody::Composite { members, .. } => Ok(members),
            ElementBody::Primitive(_) => Ok(&[]),
        }
    }

    /// Private lines of a composite (empty for primitives)
    pub fn internal_lines(&self, id: ElementId) -> KernelResult<&[LineId]> {
        match &self.entry(id)?.body {
            ElementBody::Composite { lines, .. } => Ok(lines),
            ElementBody::Primitive(_) => Ok(&[]),
        }
    }

    /// Connector implementing a named pin
    pub fn pin(&self, id: ElementId, name: &str) -> KernelResult<ConnectorId> {
        let entry = self.entry(id)?;
        let Some(slot) = entry.connector(name) else {
            return Err(KernelError::UnknownPinName {
                element: self.element_name(id),
                pin: name.to_string(),
            });
        };
        slot.connector.ok_or_else(|| KernelError::SupplyPin {
            element: self.element_name(id),
            pin: name.to_string(),
        })
    }

    /// Connect a named pin to a line or connector
    pub fn connect_pin(&mut self, id: ElementId, name: &str, target: impl Into<Terminal>) -> KernelResult<()> {
        let connector = self.pin(id, name)?;
        self.connect(connector, target)
    }

    /// Run an element's `init` or `action` with the behaviour temporarily
    /// taken out of the arena.
    fn run_behaviour(&mut self, id: ElementId, init: bool) -> KernelResult<()> {
        let behaviour = match &mut self.entry_mut(id)?.body {
            ElementBody::Primitive(slot) => slot.take(),
            ElementBody::Composite { .. } => None,
        };
        let Some(mut behaviour) = behaviour else {
            return Ok(());
        };

        let result = {
            let mut ctx = ElementContext::new(self, id);
            if init {
                behaviour.init(&mut ctx)
            } else {
                behaviour.action(&mut ctx)
            }
        };

        if let ElementBody::Primitive(slot) = &mut self.elements[id.index()].body {
            *slot = Some(behaviour);
        }
        result
    }

    fn entry_mut(&mut self, id: ElementId) -> KernelResult<&mut ElementEntry> {
        self.elements
            .get_mut(id.index())
            .ok_or(KernelError::ElementNotFound(id))
    }

    // =========================================================================
    // PROPAGATION
    // =========================================================================

    /// Drain the agenda until the network settles, `halt()` is called or
    /// the configured step limit is reached.
    ///
    /// Calling this while a wave is already draining does nothing.
    pub fn start_propagation(&mut self) -> KernelResult<PropagationReport> {
        let limit = self.config.step_limit;
        let outcome = Scheduler::drain_host(self, Circuit::agenda_mut, limit, Circuit::run_task)?;
        if outcome.reentrant {
            return Ok(PropagationReport {
                reentrant: true,
                pending: self.agenda.len(),
                ..PropagationReport::default()
            });
        }

        if outcome.halted && outcome.executed >= limit {
            tracing::warn!(
                executed = outcome.executed,
                pending = self.agenda.len(),
                "step limit reached, halting propagation"
            );
        }

        self.stats.waves += 1;
        self.stats.tasks_executed += outcome.executed as u64;
        if outcome.halted {
            self.stats.halted_waves += 1;
        }

        let report = PropagationReport {
            executed: outcome.executed,
            halted: outcome.halted,
            reentrant: false,
            pending: self.agenda.len(),
        };
        tracing::debug!(
            executed = report.executed,
            halted = report.halted,
            pending = report.pending,
            "propagation wave finished"
        );
        Ok(report)
    }

    fn agenda_mut(&mut self) -> &mut Scheduler<Task> {
        &mut self.agenda
    }

    /// Stop the current wave after the in-flight task
    pub fn halt(&mut self) {
        self.agenda.halt();
    }

    /// Tasks waiting on the agenda
    pub fn pending(&self) -> usize {
        self.agenda.len()
    }

    pub fn is_propagating(&self) -> bool {
        self.agenda.is_running()
    }

    fn run_task(&mut self, task: Task) -> KernelResult<()> {
        tracing::trace!(?task, "run task");
        match task {
            Task::Evaluate(element) => {
                self.stats.evaluations += 1;
                self.run_behaviour(element, false)
            }
            Task::Write { line, value } => {
                self.stats.deferred_writes += 1;
                self.commit(line, value);
                Ok(())
            }
            Task::Deliver { observer, value } => {
                // Removed observers may still have deliveries queued
                let Some(mut callback) = self
                    .observers
                    .get_mut(observer.index())
                    .and_then(Option::take)
                else {
                    return Ok(());
                };
                self.stats.deliveries += 1;
                callback(value);
                self.observers[observer.index()] = Some(callback);
                Ok(())
            }
        }
    }
}

impl Default for Circuit {
    fn default() -> Self {
        Self::new()
    }
}

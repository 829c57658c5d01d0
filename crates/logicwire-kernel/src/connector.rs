//! Connector - a directional terminal bridging an element's inner line to a
//! shared outer line

use std::fmt;

use logicwire_core::{ConnectorId, Direction, ElementId, LineId};

/// Connection target: a bare line or another connector
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Terminal {
    Line(LineId),
    Connector(ConnectorId),
}

impl From<LineId> for Terminal {
    fn from(line: LineId) -> Self {
        Terminal::Line(line)
    }
}

impl From<ConnectorId> for Terminal {
    fn from(connector: ConnectorId) -> Self {
        Terminal::Connector(connector)
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Terminal::Line(id) => write!(f, "{}", id),
            Terminal::Connector(id) => write!(f, "{}", id),
        }
    }
}

/// Connector state.
///
/// The inner line is exclusively owned and allocated at construction. The
/// outer line is shared with every other connector on the same node and is
/// assigned once, by the connection resolver.
#[derive(Debug, Clone)]
pub struct Connector {
    id: ConnectorId,
    direction: Direction,
    inner: LineId,
    outer: Option<LineId>,
    owner: Option<ElementId>,
    name: &'static str,
    indeterminate: bool,
}

impl Connector {
    pub(crate) fn new(
        id: ConnectorId,
        direction: Direction,
        inner: LineId,
        owner: Option<ElementId>,
        name: &'static str,
    ) -> Self {
        Connector {
            id,
            direction,
            inner,
            outer: None,
            owner,
            name,
            indeterminate: false,
        }
    }

    #[inline]
    pub fn id(&self) -> ConnectorId {
        self.id
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[inline]
    pub fn is_input(&self) -> bool {
        self.direction.is_input()
    }

    #[inline]
    pub fn is_output(&self) -> bool {
        self.direction.is_output()
    }

    #[inline]
    pub fn inner(&self) -> LineId {
        self.inner
    }

    #[inline]
    pub fn outer(&self) -> Option<LineId> {
        self.outer
    }

    #[inline]
    pub fn is_connected(&self) -> bool {
        self.outer.is_some()
    }

    /// Element whose pin this connector implements
    #[inline]
    pub fn owner(&self) -> Option<ElementId> {
        self.owner
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn is_indeterminate(&self) -> bool {
        self.indeterminate
    }

    pub(crate) fn set_outer(&mut self, line: LineId) {
        self.outer = Some(line);
    }

    pub(crate) fn clear_outer(&mut self) {
        self.outer = None;
    }

    pub(crate) fn set_indeterminate(&mut self, indeterminate: bool) {
        self.indeterminate = indeterminate;
    }

    /// Line to copy from and line to copy into when the two sides differ.
    ///
    /// Inputs pull the shared value inward, outputs push the element's value
    /// outward. `None` while unconnected.
    pub fn sync_route(&self) -> Option<(LineId, LineId)> {
        let outer = self.outer?;
        Some(match self.direction {
            Direction::Input => (outer, self.inner),
            Direction::Output => (self.inner, outer),
        })
    }
}

impl fmt::Display for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.owner {
            Some(owner) => write!(f, "{}.{}", owner, self.name),
            None => write!(f, "{}", self.id),
        }
    }
}

//! Signal line - one binary value and its ordered subscribers

use std::fmt;

use logicwire_core::{ConnectorId, ElementId, KernelError, KernelResult, Level, LineId, ObserverId};

/// A subscriber to a line's changes, dispatched explicitly by the circuit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Listener {
    /// Resync the connector synchronously
    Connector(ConnectorId),
    /// Defer the element's action onto the agenda
    Element(ElementId),
    /// Defer delivery of the new value to an external callback
    Observer(ObserverId),
}

impl fmt::Display for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Listener::Connector(id) => write!(f, "connector {}", id),
            Listener::Element(id) => write!(f, "element {}", id),
            Listener::Observer(id) => write!(f, "observer {}", id),
        }
    }
}

/// Signal line.
///
/// Stores a [`Level`] and notifies its listeners in subscription order when
/// the value changes. Writing the current value again is a no-op.
#[derive(Debug, Clone)]
pub struct Line {
    id: LineId,
    value: Level,
    listeners: Vec<Listener>,
    transitions: u64,
}

impl Line {
    pub fn new(id: LineId) -> Self {
        Line {
            id,
            value: Level::Low,
            listeners: Vec::new(),
            transitions: 0,
        }
    }

    #[inline]
    pub fn id(&self) -> LineId {
        self.id
    }

    /// Current value
    #[inline]
    pub fn read(&self) -> Level {
        self.value
    }

    /// Store a value. Returns false (and leaves the line untouched) when
    /// the value is unchanged.
    pub fn store(&mut self, value: Level) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        self.transitions += 1;
        true
    }

    /// Number of committed value changes
    #[inline]
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    pub fn subscribe(&mut self, listener: Listener) -> KernelResult<()> {
        if self.listeners.contains(&listener) {
            return Err(KernelError::DuplicateListener {
                line: self.id,
                listener: listener.to_string(),
            });
        }
        self.listeners.push(listener);
        Ok(())
    }

    pub fn unsubscribe(&mut self, listener: Listener) -> KernelResult<()> {
        let Some(pos) = self.listeners.iter().position(|l| *l == listener) else {
            return Err(KernelError::UnknownListener {
                line: self.id,
                listener: listener.to_string(),
            });
        };
        self.listeners.remove(pos);
        Ok(())
    }

    pub fn is_subscribed(&self, listener: Listener) -> bool {
        self.listeners.contains(&listener)
    }

    /// Listeners in notification order
    #[inline]
    pub fn listeners(&self) -> &[Listener] {
        &self.listeners
    }

    pub(crate) fn retain_listeners<F>(&mut self, keep: F)
    where
        F: FnMut(&Listener) -> bool,
    {
        self.listeners.retain(keep);
    }

    /// Copy of the listener list taken at notification start
    pub fn snapshot(&self) -> Vec<Listener> {
        self.listeners.clone()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_line_starts_low() {
        let line = Line::new(LineId(0));
        assert_eq!(line.read(), Level::Low);
        assert_eq!(line.transitions(), 0);
    }

    #[test]
    fn test_store_is_noop_when_unchanged() {
        let mut line = Line::new(LineId(0));
        assert!(!line.store(Level::Low));
        assert!(line.store(Level::High));
        assert!(!line.store(Level::High));
        assert_eq!(line.transitions(), 1);
    }

    #[test]
    fn test_subscribe_rejects_duplicates() {
        let mut line = Line::new(LineId(3));
        let listener = Listener::Element(ElementId(1));
        line.subscribe(listener).unwrap();

        let err = line.subscribe(listener).unwrap_err();
        assert!(matches!(err, KernelError::DuplicateListener { line, .. } if line == LineId(3)));
    }

    #[test]
    fn test_unsubscribe_requires_existing() {
        let mut line = Line::new(LineId(0));
        let listener = Listener::Observer(ObserverId(0));

        assert!(matches!(
            line.unsubscribe(listener),
            Err(KernelError::UnknownListener { .. })
        ));

        line.subscribe(listener).unwrap();
        line.unsubscribe(listener).unwrap();
        assert!(!line.is_subscribed(listener));
    }

    #[test]
    fn test_listener_order_preserved() {
        let mut line = Line::new(LineId(0));
        line.subscribe(Listener::Connector(ConnectorId(2))).unwrap();
        line.subscribe(Listener::Element(ElementId(0))).unwrap();
        line.subscribe(Listener::Connector(ConnectorId(1))).unwrap();

        assert_eq!(
            line.listeners(),
            &[
                Listener::Connector(ConnectorId(2)),
                Listener::Element(ElementId(0)),
                Listener::Connector(ConnectorId(1)),
            ]
        );
    }

    proptest! {
        #[test]
        fn test_transitions_count_changes_only(writes in prop::collection::vec(any::<bool>(), 0..64)) {
            let mut line = Line::new(LineId(0));
            let mut previous = Level::Low;
            let mut expected = 0u64;

            for high in writes {
                let value = Level::from(high);
                prop_assert_eq!(line.store(value), value != previous);
                if value != previous {
                    expected += 1;
                }
                previous = value;
            }
            prop_assert_eq!(line.transitions(), expected);
            prop_assert_eq!(line.read(), previous);
        }
    }
}

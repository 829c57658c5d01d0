//! Pin declarations

use std::fmt;

/// Connector direction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Driven from the outside, read by the owning element
    Input,
    /// Driven by the owning element, forwarded to the outside
    Output,
}

impl Direction {
    #[inline]
    pub fn is_input(self) -> bool {
        self == Direction::Input
    }

    #[inline]
    pub fn is_output(self) -> bool {
        self == Direction::Output
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Input => write!(f, "input"),
            Direction::Output => write!(f, "output"),
        }
    }
}

/// Declared pin kind.
///
/// Supply pins are named in the pin map but never carry a connector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PinKind {
    Input,
    Output,
    Vcc,
    Gnd,
}

impl PinKind {
    /// Connector direction for signal pins, `None` for supply pins
    #[inline]
    pub fn direction(self) -> Option<Direction> {
        match self {
            PinKind::Input => Some(Direction::Input),
            PinKind::Output => Some(Direction::Output),
            PinKind::Vcc | PinKind::Gnd => None,
        }
    }

    #[inline]
    pub fn is_supply(self) -> bool {
        matches!(self, PinKind::Vcc | PinKind::Gnd)
    }
}

impl From<Direction> for PinKind {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Input => PinKind::Input,
            Direction::Output => PinKind::Output,
        }
    }
}

/// A named pin in an element's declared pin order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pin {
    pub name: &'static str,
    pub kind: PinKind,
}

impl Pin {
    pub const fn input(name: &'static str) -> Self {
        Pin {
            name,
            kind: PinKind::Input,
        }
    }

    pub const fn output(name: &'static str) -> Self {
        Pin {
            name,
            kind: PinKind::Output,
        }
    }

    pub const fn vcc(name: &'static str) -> Self {
        Pin {
            name,
            kind: PinKind::Vcc,
        }
    }

    pub const fn gnd(name: &'static str) -> Self {
        Pin {
            name,
            kind: PinKind::Gnd,
        }
    }
}

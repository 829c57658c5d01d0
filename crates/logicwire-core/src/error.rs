//! Error types for the logicwire kernel

use thiserror::Error;

use crate::{ConnectorId, Direction, ElementId, LineId, ObserverId};

/// Listener identity as reported in errors
pub type ListenerName = String;

/// Kernel errors.
///
/// All of these are raised at wiring or construction time and indicate a
/// malformed circuit description. Propagation through a validly wired
/// network never fails.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KernelError {
    // Signal errors
    #[error("Invalid signal {0}: expected 0 or 1")]
    InvalidSignal(u32),

    // Connection errors
    #[error("Incompatible direction: cannot connect {direction} to {direction}")]
    IncompatibleDirection { direction: Direction },

    #[error("Already connected: {0}")]
    AlreadyConnected(ConnectorId),

    #[error("Read-only connector: {0} is an input")]
    ReadOnlyConnector(ConnectorId),

    // Listener errors
    #[error("Duplicate listener {listener} on {line}")]
    DuplicateListener { line: LineId, listener: ListenerName },

    #[error("Unknown listener {listener} on {line}")]
    UnknownListener { line: LineId, listener: ListenerName },

    // Pin errors
    #[error("Unknown pin name {pin:?} on {element}")]
    UnknownPinName { element: String, pin: String },

    #[error("Supply pin {pin:?} on {element} carries no connector")]
    SupplyPin { element: String, pin: String },

    #[error("Invalid width: {0}")]
    InvalidWidth(usize),

    // Handle errors
    #[error("Line not found: {0:?}")]
    LineNotFound(LineId),

    #[error("Connector not found: {0:?}")]
    ConnectorNotFound(ConnectorId),

    #[error("Element not found: {0:?}")]
    ElementNotFound(ElementId),

    #[error("Observer not found: {0:?}")]
    ObserverNotFound(ObserverId),
}

/// Result type for kernel operations
pub type KernelResult<T> = Result<T, KernelError>;

//! logicwire Core - Fundamental types and primitives
//!
//! This crate defines the core types shared by every logicwire crate:
//! - Signal values (Level, Logic)
//! - Arena handles (LineId, ConnectorId, ElementId, ObserverId)
//! - Pin declarations (Direction, PinKind, Pin)
//! - The kernel error taxonomy

pub mod id;
pub mod signal;
pub mod pin;
pub mod error;

pub use id::*;
pub use signal::*;
pub use pin::*;
pub use error::*;

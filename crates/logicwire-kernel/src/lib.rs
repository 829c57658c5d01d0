//! logicwire Kernel - Event-driven signal propagation
//!
//! This crate implements the propagation kernel:
//! - Signal lines with ordered change listeners
//! - The FIFO agenda that defers element actions
//! - Directional connectors bridging inner and shared lines
//! - Connection resolution between connectors and lines
//! - The circuit arena, element trait and composite assembly
//!
//! A stimulus is applied with [`Circuit::set_signal`] and pushed through the
//! network with [`Circuit::start_propagation`], which drains the agenda until
//! the network settles or is halted.

pub mod circuit;
pub mod composite;
pub mod config;
pub mod connector;
pub mod element;
pub mod line;
pub mod resolver;
pub mod scheduler;
pub mod stats;

pub use circuit::*;
pub use composite::*;
pub use config::*;
pub use connector::*;
pub use element::*;
pub use line::*;
pub use scheduler::*;
pub use stats::*;

pub use logicwire_core::*;

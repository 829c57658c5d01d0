//! logicwire Gates - Element library
//!
//! Primitive elements implement [`LogicElement`](logicwire_kernel::LogicElement):
//! - Switches and probes at the edge of a network
//! - Inverter, buffer and the two-input and N-input gate families
//! - The edge-triggered D flip-flop
//!
//! Composites implement [`Assembly`](logicwire_kernel::Assembly) and are
//! built with [`Circuit::assemble`](logicwire_kernel::Circuit::assemble):
//! adders, SR and D latches, and the 7400 quad NAND package.

pub mod adder;
pub mod combinational;
pub mod flipflop;
pub mod ic;
pub mod io;
pub mod latch;

#[cfg(test)]
pub(crate) mod rig;

pub use adder::*;
pub use combinational::*;
pub use flipflop::*;
pub use ic::*;
pub use io::*;
pub use latch::*;

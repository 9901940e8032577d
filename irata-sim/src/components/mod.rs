//! Runtime components of the Irata machine.

mod alu;
mod controller;
mod memory;
mod register;
mod root;
mod status_register;

#[cfg(test)]
pub(crate) mod testing;

pub use alu::Alu;
pub use controller::{Controller, ScriptedController};
pub use memory::{Memory, Region};
pub use register::{Register, WordRegister};
pub use root::Root;
pub use status_register::StatusRegister;

//! # Structural Errors
//!
//! Errors raised while building or cross-checking declarations: the hardware
//! registry, the descriptor catalog, and the runtime component topology.

use crate::descriptor::AddressingMode;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    // Registry errors
    #[error("Duplicate declaration path: {path}")]
    DuplicatePath { path: String },

    #[error("Unknown component id: {0}")]
    UnknownComponent(u16),

    #[error("Unknown control id: {0}")]
    UnknownControl(u16),

    #[error("Unknown status id: {0}")]
    UnknownStatus(u16),

    #[error("Unknown bus id: {0}")]
    UnknownBus(u16),

    #[error("No declaration at path: {path}")]
    UnknownPath { path: String },

    #[error("Too many {kind} declarations: ids are limited to {}", u16::MAX)]
    TooManyDeclarations { kind: &'static str },

    // Catalog errors
    #[error("Duplicate descriptor: {name} ({mode})")]
    DuplicateDescriptor { name: String, mode: AddressingMode },

    #[error("Duplicate opcode {opcode:#04x}: {first} and {second}")]
    DuplicateOpcode {
        opcode: u8,
        first: String,
        second: String,
    },

    #[error("Descriptor not found: {name} ({mode})")]
    DescriptorNotFound { name: String, mode: AddressingMode },

    // Instruction construction errors
    #[error("Conflicting status {status} in {descriptor}: already {existing}, requested {requested}")]
    ConflictingStatus {
        descriptor: String,
        status: String,
        existing: bool,
        requested: bool,
    },

    #[error("Instruction {descriptor} declares the same variant twice under {statuses}")]
    DuplicateVariant { descriptor: String, statuses: String },

    // Topology errors
    #[error("Control {path} is not owned by any component")]
    UnownedControl { path: String },

    #[error("Control {path} is owned by both {first} and {second}")]
    ControlOwnedTwice {
        path: String,
        first: String,
        second: String,
    },

    #[error("Status {path} is not owned by any component")]
    UnownedStatus { path: String },

    #[error("Status {path} is owned by both {first} and {second}")]
    StatusOwnedTwice {
        path: String,
        first: String,
        second: String,
    },

    #[error("Component {component} claims undeclared id {id}")]
    UndeclaredClaim { component: String, id: u16 },
}

pub type Result<T> = std::result::Result<T, StructuralError>;

//! Simulator error types

use crate::config::ConfigError;
use irata_microcode::CompileError;
use irata_spec::StructuralError;
use thiserror::Error;

/// Memory access failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
    #[error("Offset {offset:#06x} is out of range for a region of {size:#x} bytes")]
    OutOfRange { offset: usize, size: usize },

    #[error("Write to read-only memory at {address:#06x}")]
    ReadOnly { address: u16 },

    #[error("No memory region mapped at {address:#06x}")]
    Unmapped { address: u16 },

    #[error("Invalid region size {size:#x}: must be a non-zero power of two")]
    InvalidSize { size: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("Structural error: {0}")]
    Structural(#[from] StructuralError),

    #[error("Bus conflict on {bus}: written by {first} and {second}")]
    BusConflict {
        bus: String,
        first: String,
        second: String,
    },

    #[error("Memory error: {0}")]
    Memory(#[from] MemoryError),

    #[error("{reader} read {bus} with no value set")]
    OpenBus { bus: String, reader: String },

    #[error("No table entry for opcode {opcode:#04x} at step {step_index}")]
    MissingEntry { opcode: u8, step_index: u8 },

    #[error("ALU operations asserted together: {}", ops.join(", "))]
    AluConflict { ops: Vec<String> },

    #[error("Crashed at cycle {cycle}")]
    Crashed { cycle: u64 },

    #[error("Cycle limit exceeded: {limit}")]
    CycleLimitExceeded { limit: u64 },

    #[error("Invalid config: {0}")]
    InvalidConfig(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, SimError>;

/// Failure from [`crate::run`]: either compiling the microcode or executing
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),

    #[error("Simulation error: {0}")]
    Sim(#[from] SimError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bus_conflict_display() {
        let err = SimError::BusConflict {
            bus: "/data_bus".to_string(),
            first: "/reg_a".to_string(),
            second: "/reg_b".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Bus conflict on /data_bus: written by /reg_a and /reg_b"
        );
    }

    #[test]
    fn test_memory_error_display() {
        let err = SimError::from(MemoryError::OutOfRange {
            offset: 0x8000,
            size: 0x8000,
        });
        assert_eq!(
            err.to_string(),
            "Memory error: Offset 0x8000 is out of range for a region of 0x8000 bytes"
        );
        assert_eq!(
            MemoryError::ReadOnly { address: 0x8001 }.to_string(),
            "Write to read-only memory at 0x8001"
        );
    }

    #[test]
    fn test_missing_entry_display() {
        let err = SimError::MissingEntry {
            opcode: 0xff,
            step_index: 2,
        };
        assert_eq!(err.to_string(), "No table entry for opcode 0xff at step 2");
    }

    #[test]
    fn test_alu_conflict_display() {
        let err = SimError::AluConflict {
            ops: vec!["add".to_string(), "xor".to_string()],
        };
        assert_eq!(err.to_string(), "ALU operations asserted together: add, xor");
    }
}

//! # Instruction Descriptors
//!
//! A [`Descriptor`] is the assembly-level identity of an instruction. The
//! [`Catalog`] is the immutable set of descriptors the microcode must cover.

use crate::error::{Result, StructuralError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// How an instruction locates its operand
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AddressingMode {
    /// No operand
    None,
    /// Operand byte follows the opcode
    Immediate,
    /// 16-bit address follows the opcode, high byte first
    Absolute,
}

impl AddressingMode {
    pub fn name(&self) -> &'static str {
        match self {
            AddressingMode::None => "none",
            AddressingMode::Immediate => "immediate",
            AddressingMode::Absolute => "absolute",
        }
    }

    /// Operand bytes following the opcode
    pub fn operand_len(&self) -> usize {
        match self {
            AddressingMode::None => 0,
            AddressingMode::Immediate => 1,
            AddressingMode::Absolute => 2,
        }
    }
}

impl fmt::Display for AddressingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Assembly instruction identity
///
/// Ordered by opcode first, so catalog iteration is in opcode order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Descriptor {
    pub opcode: u8,
    pub name: String,
    pub mode: AddressingMode,
    pub description: String,
}

impl Descriptor {
    pub fn new(opcode: u8, name: &str, mode: AddressingMode, description: &str) -> Self {
        Self {
            opcode,
            name: name.to_string(),
            mode,
            description: description.to_string(),
        }
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.mode)
    }
}

/// Validated descriptor set, unique by `(name, mode)` and by opcode
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Catalog {
    descriptors: BTreeSet<Descriptor>,
    by_opcode: BTreeMap<u8, Descriptor>,
}

impl Catalog {
    pub fn new(descriptors: impl IntoIterator<Item = Descriptor>) -> Result<Self> {
        let mut catalog = Catalog::default();
        for descriptor in descriptors {
            if catalog.get(&descriptor.name, descriptor.mode).is_some() {
                return Err(StructuralError::DuplicateDescriptor {
                    name: descriptor.name,
                    mode: descriptor.mode,
                });
            }
            if let Some(first) = catalog.by_opcode.get(&descriptor.opcode) {
                return Err(StructuralError::DuplicateOpcode {
                    opcode: descriptor.opcode,
                    first: first.to_string(),
                    second: descriptor.to_string(),
                });
            }
            catalog
                .by_opcode
                .insert(descriptor.opcode, descriptor.clone());
            catalog.descriptors.insert(descriptor);
        }
        Ok(catalog)
    }

    pub fn get(&self, name: &str, mode: AddressingMode) -> Option<&Descriptor> {
        self.descriptors
            .iter()
            .find(|d| d.name == name && d.mode == mode)
    }

    /// Like [`Catalog::get`], failing with `DescriptorNotFound`
    pub fn require(&self, name: &str, mode: AddressingMode) -> Result<&Descriptor> {
        self.get(name, mode)
            .ok_or_else(|| StructuralError::DescriptorNotFound {
                name: name.to_string(),
                mode,
            })
    }

    pub fn by_opcode(&self, opcode: u8) -> Option<&Descriptor> {
        self.by_opcode.get(&opcode)
    }

    pub fn contains(&self, descriptor: &Descriptor) -> bool {
        self.descriptors.contains(descriptor)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Descriptor> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// The Irata instruction catalog
    pub fn irata() -> Result<Self> {
        use AddressingMode::{Absolute, Immediate, None};

        let table: &[(u8, &str, AddressingMode, &str)] = &[
            // System
            (0x00, "hlt", None, "Halt the processor"),
            (0x01, "nop", None, "No operation"),
            (0x02, "crs", None, "Crash the processor"),
            // Loads
            (0x10, "lda", Immediate, "Load A with immediate value"),
            (0x11, "lda", Absolute, "Load A from memory"),
            (0x12, "ldx", Immediate, "Load X with immediate value"),
            (0x13, "ldx", Absolute, "Load X from memory"),
            (0x14, "ldy", Immediate, "Load Y with immediate value"),
            (0x15, "ldy", Absolute, "Load Y from memory"),
            // Stores
            (0x18, "sta", Absolute, "Store A to memory"),
            (0x19, "stx", Absolute, "Store X to memory"),
            (0x1A, "sty", Absolute, "Store Y to memory"),
            // Transfers and counters
            (0x20, "tax", None, "Transfer A to X"),
            (0x21, "txa", None, "Transfer X to A"),
            (0x22, "tay", None, "Transfer A to Y"),
            (0x23, "tya", None, "Transfer Y to A"),
            (0x24, "inx", None, "Increment X"),
            (0x25, "dex", None, "Decrement X"),
            (0x26, "iny", None, "Increment Y"),
            (0x27, "dey", None, "Decrement Y"),
            // ALU
            (0x30, "adc", Immediate, "Add immediate to A with carry"),
            (0x31, "adc", Absolute, "Add memory to A with carry"),
            (0x32, "sbc", Immediate, "Subtract immediate from A with carry"),
            (0x33, "sbc", Absolute, "Subtract memory from A with carry"),
            (0x34, "and", Immediate, "AND immediate with A"),
            (0x35, "and", Absolute, "AND memory with A"),
            (0x36, "ora", Immediate, "OR immediate with A"),
            (0x37, "ora", Absolute, "OR memory with A"),
            (0x38, "eor", Immediate, "XOR immediate with A"),
            (0x39, "eor", Absolute, "XOR memory with A"),
            (0x3A, "cmp", Immediate, "Compare A with immediate"),
            // Shifts and rotates
            (0x40, "asl", None, "Shift A left"),
            (0x41, "lsr", None, "Shift A right"),
            (0x42, "rol", None, "Rotate A left through carry"),
            (0x43, "ror", None, "Rotate A right through carry"),
            // Jumps
            (0x50, "jmp", Absolute, "Jump to address"),
            (0x51, "jeq", Absolute, "Jump if zero flag set"),
            (0x52, "jne", Absolute, "Jump if zero flag clear"),
            // Flags
            (0x60, "sec", None, "Set carry flag"),
            (0x61, "clc", None, "Clear carry flag"),
        ];

        Catalog::new(
            table
                .iter()
                .map(|&(opcode, name, mode, description)| Descriptor::new(opcode, name, mode, description)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_display() {
        let d = Descriptor::new(0x10, "lda", AddressingMode::Immediate, "");
        assert_eq!(d.to_string(), "lda (immediate)");
    }

    #[test]
    fn test_irata_catalog() {
        let catalog = Catalog::irata().unwrap();
        assert_eq!(catalog.len(), 40);
        assert_eq!(catalog.by_opcode(0x00).unwrap().name, "hlt");
        assert_eq!(
            catalog.require("lda", AddressingMode::Absolute).unwrap().opcode,
            0x11
        );
        assert!(catalog.get("sta", AddressingMode::Immediate).is_none());
    }

    #[test]
    fn test_catalog_iterates_in_opcode_order() {
        let catalog = Catalog::irata().unwrap();
        let opcodes: Vec<u8> = catalog.iter().map(|d| d.opcode).collect();
        let mut sorted = opcodes.clone();
        sorted.sort();
        assert_eq!(opcodes, sorted);
    }

    #[test]
    fn test_duplicate_name_and_mode() {
        let err = Catalog::new(vec![
            Descriptor::new(0x01, "nop", AddressingMode::None, ""),
            Descriptor::new(0x02, "nop", AddressingMode::None, ""),
        ])
        .unwrap_err();
        assert!(matches!(err, StructuralError::DuplicateDescriptor { .. }));
    }

    #[test]
    fn test_duplicate_opcode() {
        let err = Catalog::new(vec![
            Descriptor::new(0x01, "nop", AddressingMode::None, ""),
            Descriptor::new(0x01, "hlt", AddressingMode::None, ""),
        ])
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Duplicate opcode 0x01: nop (none) and hlt (none)"
        );
    }

    #[test]
    fn test_require_missing() {
        let catalog = Catalog::default();
        assert!(matches!(
            catalog.require("lda", AddressingMode::Immediate),
            Err(StructuralError::DescriptorNotFound { .. })
        ));
    }
}

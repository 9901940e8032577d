//! # Irata Microcode
//!
//! Step sequences for the Irata CPU, written against [`IrataDecl`] handles.
//! [`IrataSteps`] adds memory, word and ALU helpers to [`Instruction`];
//! [`build`] produces the full instruction set for [`Catalog::irata`].
//!
//! Every instruction starts with the same fetch stage: read the opcode at PC
//! into the controller, then advance PC.

use super::instruction::Instruction;
use super::instruction_set::InstructionSet;
use irata_spec::{
    AddressingMode, AluOpcode, BusConnected, Catalog, IrataDecl, RegisterDecl, Result, StatusId,
};

/// Irata step helpers for [`Instruction`]
pub trait IrataSteps {
    /// Load the opcode at PC and advance PC, then start the execute stage
    fn fetch(&mut self, hw: &IrataDecl) -> &mut Self;

    /// Read memory at the address held by `address` into `dst`
    fn read_memory(&mut self, hw: &IrataDecl, address: &impl BusConnected, dst: &impl BusConnected) -> &mut Self;

    /// Write `src` to memory at the address held by `address`
    fn write_memory(&mut self, hw: &IrataDecl, address: &impl BusConnected, src: &impl BusConnected) -> &mut Self;

    /// Read the byte at PC into `dst` and advance PC
    fn read_memory_at_pc(&mut self, hw: &IrataDecl, dst: &impl BusConnected) -> &mut Self;

    /// Read the big-endian word at PC into `dst` through the buffer, advancing PC twice
    fn read_word_at_pc(&mut self, hw: &IrataDecl, dst: &impl BusConnected) -> &mut Self;

    /// Read memory at the absolute address following the opcode
    fn indirect_read_memory_at_pc(&mut self, hw: &IrataDecl, dst: &impl BusConnected) -> &mut Self;

    /// Write memory at the absolute address following the opcode
    fn indirect_write_memory_at_pc(&mut self, hw: &IrataDecl, src: &impl BusConnected) -> &mut Self;

    /// Run one ALU operation and latch its flags into the status register
    fn alu_operation(&mut self, hw: &IrataDecl, opcode: AluOpcode) -> &mut Self;
}

impl IrataSteps for Instruction {
    fn fetch(&mut self, hw: &IrataDecl) -> &mut Self {
        self.read_memory_at_pc(hw, &hw.cpu.controller.opcode)
            .next_stage()
    }

    fn read_memory(&mut self, hw: &IrataDecl, address: &impl BusConnected, dst: &impl BusConnected) -> &mut Self {
        self.copy(address, &hw.memory.address).copy(&hw.memory, dst)
    }

    fn write_memory(&mut self, hw: &IrataDecl, address: &impl BusConnected, src: &impl BusConnected) -> &mut Self {
        self.copy(address, &hw.memory.address).copy(src, &hw.memory)
    }

    fn read_memory_at_pc(&mut self, hw: &IrataDecl, dst: &impl BusConnected) -> &mut Self {
        let pc = &hw.cpu.pc;
        self.read_memory(hw, pc, dst);
        increment(self, pc)
    }

    fn read_word_at_pc(&mut self, hw: &IrataDecl, dst: &impl BusConnected) -> &mut Self {
        let buffer = &hw.cpu.buffer;
        self.read_memory_at_pc(hw, &buffer.high);
        increment(self, &hw.memory.address)
            .copy(&hw.memory, &buffer.low);
        increment(self, &hw.cpu.pc).copy(buffer, dst)
    }

    fn indirect_read_memory_at_pc(&mut self, hw: &IrataDecl, dst: &impl BusConnected) -> &mut Self {
        self.read_word_at_pc(hw, &hw.memory.address)
            .copy(&hw.memory, dst)
    }

    fn indirect_write_memory_at_pc(&mut self, hw: &IrataDecl, src: &impl BusConnected) -> &mut Self {
        self.read_word_at_pc(hw, &hw.memory.address)
            .copy(src, &hw.memory)
    }

    fn alu_operation(&mut self, hw: &IrataDecl, opcode: AluOpcode) -> &mut Self {
        self.with_controls([hw.cpu.alu.op(opcode), hw.cpu.status_register.latch])
    }
}

fn increment<'i>(instruction: &'i mut Instruction, register: &RegisterDecl) -> &'i mut Instruction {
    match register.increment {
        Some(control) => instruction.with_control(control),
        None => instruction,
    }
}

/// Start a catalog instruction with the fetch stage already in place
pub fn create_instruction<'s>(
    set: &'s mut InstructionSet,
    hw: &IrataDecl,
    catalog: &Catalog,
    name: &str,
    mode: AddressingMode,
) -> Result<&'s mut Instruction> {
    let descriptor = catalog.require(name, mode)?.clone();
    Ok(set.create_instruction(descriptor).fetch(hw))
}

/// Build the complete Irata instruction set
pub fn build(hw: &IrataDecl, catalog: &Catalog) -> Result<InstructionSet> {
    use AddressingMode::{Absolute, Immediate};

    let mut set = InstructionSet::new();
    let cpu = &hw.cpu;
    let none = AddressingMode::None;

    create_instruction(&mut set, hw, catalog, "hlt", none)?.with_control(hw.halt);
    create_instruction(&mut set, hw, catalog, "nop", none)?.create_step();
    create_instruction(&mut set, hw, catalog, "crs", none)?.with_control(hw.crash);

    for (name, register) in [("a", &cpu.a), ("x", &cpu.x), ("y", &cpu.y)] {
        let load = format!("ld{}", name);
        create_instruction(&mut set, hw, catalog, &load, Immediate)?
            .read_memory_at_pc(hw, register);
        create_instruction(&mut set, hw, catalog, &load, Absolute)?
            .indirect_read_memory_at_pc(hw, register);
        create_instruction(&mut set, hw, catalog, &format!("st{}", name), Absolute)?
            .indirect_write_memory_at_pc(hw, register);
    }

    for (name, src, dst) in [
        ("tax", &cpu.a, &cpu.x),
        ("txa", &cpu.x, &cpu.a),
        ("tay", &cpu.a, &cpu.y),
        ("tya", &cpu.y, &cpu.a),
    ] {
        create_instruction(&mut set, hw, catalog, name, none)?.copy(src, dst);
    }

    for (name, register, up) in [
        ("inx", &cpu.x, true),
        ("dex", &cpu.x, false),
        ("iny", &cpu.y, true),
        ("dey", &cpu.y, false),
    ] {
        let control = if up { register.increment } else { register.decrement };
        let instruction = create_instruction(&mut set, hw, catalog, name, none)?;
        if let Some(control) = control {
            instruction.with_control(control);
        }
    }

    for (name, opcode) in [
        ("adc", AluOpcode::Add),
        ("sbc", AluOpcode::Subtract),
        ("and", AluOpcode::And),
        ("ora", AluOpcode::Or),
        ("eor", AluOpcode::Xor),
    ] {
        create_instruction(&mut set, hw, catalog, name, Immediate)?
            .read_memory_at_pc(hw, &cpu.alu.rhs)
            .copy(&cpu.a, &cpu.alu.lhs)
            .alu_operation(hw, opcode)
            .copy(&cpu.alu.result, &cpu.a);
        create_instruction(&mut set, hw, catalog, name, Absolute)?
            .indirect_read_memory_at_pc(hw, &cpu.alu.rhs)
            .copy(&cpu.a, &cpu.alu.lhs)
            .alu_operation(hw, opcode)
            .copy(&cpu.alu.result, &cpu.a);
    }

    // Compare is a subtract with carry set whose result is discarded.
    create_instruction(&mut set, hw, catalog, "cmp", Immediate)?
        .copy(&cpu.a, &cpu.alu.lhs)
        .read_memory_at_pc(hw, &cpu.alu.rhs)
        .with_control(cpu.status_register.set_carry)
        .alu_operation(hw, AluOpcode::Subtract);

    for (name, opcode) in [
        ("asl", AluOpcode::ShiftLeft),
        ("lsr", AluOpcode::ShiftRight),
        ("rol", AluOpcode::RotateLeft),
        ("ror", AluOpcode::RotateRight),
    ] {
        create_instruction(&mut set, hw, catalog, name, none)?
            .copy(&cpu.a, &cpu.alu.lhs)
            .alu_operation(hw, opcode)
            .copy(&cpu.alu.result, &cpu.a);
    }

    create_instruction(&mut set, hw, catalog, "jmp", Absolute)?.read_word_at_pc(hw, &cpu.pc);

    let zero = cpu.status_register.flags.zero;
    branch(&mut set, hw, catalog, "jeq", zero, true)?;
    branch(&mut set, hw, catalog, "jne", zero, false)?;

    create_instruction(&mut set, hw, catalog, "sec", none)?
        .with_control(cpu.status_register.set_carry);
    create_instruction(&mut set, hw, catalog, "clc", none)?
        .with_control(cpu.status_register.clear_carry);

    Ok(set)
}

/// Two variants: jump to the operand when `status == taken`, otherwise skip it
fn branch(
    set: &mut InstructionSet,
    hw: &IrataDecl,
    catalog: &Catalog,
    name: &str,
    status: StatusId,
    taken: bool,
) -> Result<()> {
    let pc = &hw.cpu.pc;
    let skip = create_instruction(set, hw, catalog, name, AddressingMode::Absolute)?
        .with_status(status, !taken);
    // Separate stages keep the two increments from merging.
    increment(skip, pc).next_stage();
    increment(skip, pc);

    create_instruction(set, hw, catalog, name, AddressingMode::Absolute)?
        .with_status(status, taken)
        .read_word_at_pc(hw, pc);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (IrataDecl, Catalog) {
        (IrataDecl::build().unwrap(), Catalog::irata().unwrap())
    }

    #[test]
    fn test_fetch_prefix() {
        let (hw, catalog) = setup();
        let mut set = InstructionSet::new();
        let nop = create_instruction(&mut set, &hw, &catalog, "nop", AddressingMode::None).unwrap();
        assert_eq!(nop.stage(), 1);
        assert_eq!(nop.steps().len(), 3);
        assert!(nop.steps()[0].controls().contains(&hw.cpu.pc.port.write));
        assert!(nop.steps()[1]
            .controls()
            .contains(&hw.cpu.controller.opcode.port.read));
        assert!(nop.steps()[2]
            .controls()
            .contains(&hw.cpu.pc.increment.unwrap()));
    }

    #[test]
    fn test_build_covers_catalog() {
        let (hw, catalog) = setup();
        let set = build(&hw, &catalog).unwrap();
        for descriptor in catalog.iter() {
            assert!(
                set.instructions().iter().any(|i| i.descriptor() == descriptor),
                "missing {}",
                descriptor
            );
        }
        // jeq and jne have two variants each
        assert_eq!(set.len(), catalog.len() + 2);
    }

    #[test]
    fn test_branch_variants() {
        let (hw, catalog) = setup();
        let set = build(&hw, &catalog).unwrap();
        let jeq: Vec<&Instruction> = set
            .instructions()
            .iter()
            .filter(|i| i.descriptor().name == "jeq")
            .collect();
        assert_eq!(jeq.len(), 2);
        let zero = hw.cpu.status_register.flags.zero;
        assert_eq!(jeq[0].statuses().get(&zero), Some(&false));
        assert_eq!(jeq[1].statuses().get(&zero), Some(&true));
        assert_eq!(jeq[0].stage(), 2);
    }

    #[test]
    fn test_unknown_descriptor() {
        let (hw, catalog) = setup();
        let mut set = InstructionSet::new();
        assert!(create_instruction(&mut set, &hw, &catalog, "lda", AddressingMode::None).is_err());
    }
}

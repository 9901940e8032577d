//! # Irata Hardware Declaration
//!
//! The concrete 8-bit CPU: registers A, X and Y, an ALU, a status register, a
//! 16-bit program counter, a word buffer, a table-driven controller, and a
//! memory module behind a memory address register. Two buses connect them: a
//! byte-wide data bus and a word-wide address bus.
//!
//! [`IrataDecl::build`] constructs a fresh declaration every time it is called.

use crate::error::Result;
use crate::hdl::{
    BusId, BusWidth, ComponentId, ControlId, ControlKind, Hdl, HdlBuilder, StatusId,
    StepIndexControls,
};
use std::fmt;

/// Something that can put a value on a bus and take one off it
pub trait BusConnected {
    fn bus(&self) -> BusId;
    fn write(&self) -> ControlId;
    fn read(&self) -> ControlId;
}

/// Write/read control pair on one bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusPort {
    pub component: ComponentId,
    pub bus: BusId,
    pub write: ControlId,
    pub read: ControlId,
}

impl BusPort {
    fn declare(b: &mut HdlBuilder, component: ComponentId, bus: BusId) -> Result<Self> {
        Ok(Self {
            component,
            bus,
            write: b.control(component, "write", ControlKind::BusWrite(bus))?,
            read: b.control(component, "read", ControlKind::BusRead(bus))?,
        })
    }
}

impl BusConnected for BusPort {
    fn bus(&self) -> BusId {
        self.bus
    }

    fn write(&self) -> ControlId {
        self.write
    }

    fn read(&self) -> ControlId {
        self.read
    }
}

/// A register with a bus port and optional local controls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterDecl {
    pub path: String,
    pub port: BusPort,
    pub reset: Option<ControlId>,
    pub increment: Option<ControlId>,
    pub decrement: Option<ControlId>,
}

impl RegisterDecl {
    fn declare(
        b: &mut HdlBuilder,
        parent: ComponentId,
        name: &str,
        bus: BusId,
        locals: &[&str],
    ) -> Result<Self> {
        let component = b.component(parent, name)?;
        let path = b.path(component)?;
        let port = BusPort::declare(b, component, bus)?;
        let mut local = |control: &str| -> Result<Option<ControlId>> {
            if locals.contains(&control) {
                Ok(Some(b.control(component, control, ControlKind::Process)?))
            } else {
                Ok(None)
            }
        };
        Ok(Self {
            path,
            port,
            reset: local("reset")?,
            increment: local("increment")?,
            decrement: local("decrement")?,
        })
    }
}

impl BusConnected for RegisterDecl {
    fn bus(&self) -> BusId {
        self.port.bus
    }

    fn write(&self) -> ControlId {
        self.port.write
    }

    fn read(&self) -> ControlId {
        self.port.read
    }
}

/// ALU operations, one control line each
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AluOpcode {
    Add,
    Subtract,
    And,
    Or,
    Xor,
    ShiftLeft,
    ShiftRight,
    RotateLeft,
    RotateRight,
}

impl AluOpcode {
    pub const ALL: [AluOpcode; 9] = [
        AluOpcode::Add,
        AluOpcode::Subtract,
        AluOpcode::And,
        AluOpcode::Or,
        AluOpcode::Xor,
        AluOpcode::ShiftLeft,
        AluOpcode::ShiftRight,
        AluOpcode::RotateLeft,
        AluOpcode::RotateRight,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AluOpcode::Add => "add",
            AluOpcode::Subtract => "subtract",
            AluOpcode::And => "and",
            AluOpcode::Or => "or",
            AluOpcode::Xor => "xor",
            AluOpcode::ShiftLeft => "shift_left",
            AluOpcode::ShiftRight => "shift_right",
            AluOpcode::RotateLeft => "rotate_left",
            AluOpcode::RotateRight => "rotate_right",
        }
    }
}

impl fmt::Display for AluOpcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Condition flags shared by the ALU outputs and the status register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagStatuses {
    pub carry: StatusId,
    pub zero: StatusId,
    pub negative: StatusId,
    pub overflow: StatusId,
}

impl FlagStatuses {
    fn declare(b: &mut HdlBuilder, component: ComponentId) -> Result<Self> {
        Ok(Self {
            carry: b.status(component, "carry")?,
            zero: b.status(component, "zero")?,
            negative: b.status(component, "negative")?,
            overflow: b.status(component, "overflow")?,
        })
    }

    pub fn all(&self) -> [StatusId; 4] {
        [self.carry, self.zero, self.negative, self.overflow]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AluDecl {
    pub path: String,
    pub lhs: RegisterDecl,
    pub rhs: RegisterDecl,
    pub result: RegisterDecl,
    /// Indexed by `AluOpcode as usize`
    pub ops: Vec<ControlId>,
    pub flags: FlagStatuses,
}

impl AluDecl {
    pub fn op(&self, opcode: AluOpcode) -> ControlId {
        self.ops[opcode as usize]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRegisterDecl {
    pub path: String,
    pub port: BusPort,
    /// Clear-phase latch of the ALU flags; not auto-cleared
    pub latch: ControlId,
    pub set_carry: ControlId,
    pub clear_carry: ControlId,
    pub flags: FlagStatuses,
}

impl BusConnected for StatusRegisterDecl {
    fn bus(&self) -> BusId {
        self.port.bus
    }

    fn write(&self) -> ControlId {
        self.port.write
    }

    fn read(&self) -> ControlId {
        self.port.read
    }
}

/// Word register on the address bus with byte halves on the data bus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferDecl {
    pub register: RegisterDecl,
    pub high: RegisterDecl,
    pub low: RegisterDecl,
}

impl BusConnected for BufferDecl {
    fn bus(&self) -> BusId {
        self.register.bus()
    }

    fn write(&self) -> ControlId {
        self.register.write()
    }

    fn read(&self) -> ControlId {
        self.register.read()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerDecl {
    pub path: String,
    pub opcode: RegisterDecl,
    pub step_counter_path: String,
    pub step_index: StepIndexControls,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryDecl {
    pub path: String,
    pub port: BusPort,
    /// Memory address register
    pub address: RegisterDecl,
}

impl BusConnected for MemoryDecl {
    fn bus(&self) -> BusId {
        self.port.bus
    }

    fn write(&self) -> ControlId {
        self.port.write
    }

    fn read(&self) -> ControlId {
        self.port.read
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuDecl {
    pub a: RegisterDecl,
    pub x: RegisterDecl,
    pub y: RegisterDecl,
    pub alu: AluDecl,
    pub status_register: StatusRegisterDecl,
    pub pc: RegisterDecl,
    pub buffer: BufferDecl,
    pub controller: ControllerDecl,
}

/// Typed handles into the Irata [`Hdl`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrataDecl {
    hdl: Hdl,
    pub data_bus: BusId,
    pub address_bus: BusId,
    pub halt: ControlId,
    pub crash: ControlId,
    pub halted: StatusId,
    pub cpu: CpuDecl,
    pub memory: MemoryDecl,
}

impl IrataDecl {
    pub fn build() -> Result<Self> {
        let mut b = HdlBuilder::new();
        let root = b.root();
        let data_bus = b.bus("data_bus", BusWidth::Byte)?;
        let address_bus = b.bus("address_bus", BusWidth::Word)?;

        let halt = b.control(root, "halt", ControlKind::Process)?;
        let crash = b.control(root, "crash", ControlKind::Process)?;
        let halted = b.status(root, "halted")?;

        let cpu = b.component(root, "cpu")?;
        let a = RegisterDecl::declare(&mut b, cpu, "a", data_bus, &["reset"])?;
        let index = &["reset", "increment", "decrement"];
        let x = RegisterDecl::declare(&mut b, cpu, "x", data_bus, index)?;
        let y = RegisterDecl::declare(&mut b, cpu, "y", data_bus, index)?;

        let alu_id = b.component(cpu, "alu")?;
        let alu = AluDecl {
            path: b.path(alu_id)?,
            lhs: RegisterDecl::declare(&mut b, alu_id, "lhs", data_bus, &[])?,
            rhs: RegisterDecl::declare(&mut b, alu_id, "rhs", data_bus, &[])?,
            result: RegisterDecl::declare(&mut b, alu_id, "result", data_bus, &[])?,
            ops: AluOpcode::ALL
                .iter()
                .map(|op| b.control(alu_id, op.name(), ControlKind::Process))
                .collect::<Result<Vec<_>>>()?,
            flags: FlagStatuses::declare(&mut b, alu_id)?,
        };

        let sr = b.component(cpu, "status_register")?;
        let status_register = StatusRegisterDecl {
            path: b.path(sr)?,
            port: BusPort::declare(&mut b, sr, data_bus)?,
            latch: b.control_with(sr, "latch", ControlKind::Clear, false)?,
            set_carry: b.control(sr, "set_carry", ControlKind::Process)?,
            clear_carry: b.control(sr, "clear_carry", ControlKind::Process)?,
            flags: FlagStatuses::declare(&mut b, sr)?,
        };

        let pc = RegisterDecl::declare(&mut b, cpu, "pc", address_bus, &["reset", "increment"])?;

        let buffer = RegisterDecl::declare(&mut b, cpu, "buffer", address_bus, &[])?;
        let buffer_id = buffer.port.component;
        let buffer = BufferDecl {
            high: RegisterDecl::declare(&mut b, buffer_id, "high", data_bus, &[])?,
            low: RegisterDecl::declare(&mut b, buffer_id, "low", data_bus, &[])?,
            register: buffer,
        };

        let controller_id = b.component(cpu, "controller")?;
        let opcode = RegisterDecl::declare(&mut b, controller_id, "opcode", data_bus, &[])?;
        let step_counter = b.component(controller_id, "step_counter")?;
        let controller = ControllerDecl {
            path: b.path(controller_id)?,
            opcode,
            step_counter_path: b.path(step_counter)?,
            step_index: StepIndexControls {
                increment: b.control(step_counter, "increment", ControlKind::Process)?,
                reset: b.control(step_counter, "reset", ControlKind::Process)?,
            },
        };

        let memory_id = b.component(root, "memory")?;
        let memory = MemoryDecl {
            path: b.path(memory_id)?,
            port: BusPort::declare(&mut b, memory_id, data_bus)?,
            address: RegisterDecl::declare(&mut b, memory_id, "address", address_bus, &["increment"])?,
        };

        Ok(Self {
            hdl: b.build(),
            data_bus,
            address_bus,
            halt,
            crash,
            halted,
            cpu: CpuDecl {
                a,
                x,
                y,
                alu,
                status_register,
                pc,
                buffer,
                controller,
            },
            memory,
        })
    }

    pub fn hdl(&self) -> &Hdl {
        &self.hdl
    }

    pub fn step_index(&self) -> StepIndexControls {
        self.cpu.controller.step_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::TickPhase;

    #[test]
    fn test_build_paths() {
        let irata = IrataDecl::build().unwrap();
        let hdl = irata.hdl();
        assert_eq!(hdl.control_path(irata.halt), "/halt");
        assert_eq!(hdl.control_path(irata.cpu.a.port.write), "/cpu/a/write");
        assert_eq!(
            hdl.control_path(irata.cpu.buffer.high.port.read),
            "/cpu/buffer/high/read"
        );
        assert_eq!(
            hdl.control_path(irata.step_index().reset),
            "/cpu/controller/step_counter/reset"
        );
        assert_eq!(
            hdl.status_path(irata.cpu.status_register.flags.zero),
            "/cpu/status_register/zero"
        );
        assert_eq!(hdl.bus_path(irata.address_bus), "/address_bus");
    }

    #[test]
    fn test_build_is_fresh_and_deterministic() {
        assert_eq!(IrataDecl::build().unwrap(), IrataDecl::build().unwrap());
    }

    #[test]
    fn test_latch_is_not_auto_clear() {
        let irata = IrataDecl::build().unwrap();
        let latch = irata.hdl().control(irata.cpu.status_register.latch).unwrap();
        assert_eq!(latch.phase(), TickPhase::Clear);
        assert!(!latch.auto_clear);
    }

    #[test]
    fn test_register_locals() {
        let irata = IrataDecl::build().unwrap();
        assert!(irata.cpu.a.reset.is_some());
        assert!(irata.cpu.a.increment.is_none());
        assert!(irata.cpu.x.decrement.is_some());
        assert!(irata.cpu.pc.increment.is_some());
        assert!(irata.memory.address.increment.is_some());
        assert!(irata.cpu.buffer.high.reset.is_none());
    }

    #[test]
    fn test_alu_ops_in_opcode_order() {
        let irata = IrataDecl::build().unwrap();
        let hdl = irata.hdl();
        for op in AluOpcode::ALL {
            let control = hdl.control(irata.cpu.alu.op(op)).unwrap();
            assert_eq!(control.name, op.name());
            assert_eq!(control.phase(), TickPhase::Process);
        }
    }

    #[test]
    fn test_bus_widths() {
        let irata = IrataDecl::build().unwrap();
        assert_eq!(irata.cpu.pc.bus(), irata.address_bus);
        assert_eq!(irata.cpu.buffer.low.bus(), irata.data_bus);
        assert_eq!(irata.memory.bus(), irata.data_bus);
        assert_eq!(irata.memory.address.bus(), irata.address_bus);
    }
}

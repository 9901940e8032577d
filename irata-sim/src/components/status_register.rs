//! Status register.
//!
//! Bit layout: carry 0, zero 1, overflow 6, negative 7. Every change to the
//! stored byte is mirrored onto the register's own status lines.

use crate::component::{Component, TickContext};
use crate::error::Result;
use irata_spec::{BusPort, ControlId, FlagStatuses, StatusId, StatusRegisterDecl, TickPhase};
use std::any::Any;

const CARRY: u8 = 1 << 0;
const ZERO: u8 = 1 << 1;
const OVERFLOW: u8 = 1 << 6;
const NEGATIVE: u8 = 1 << 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRegister {
    path: String,
    port: BusPort,
    latch: ControlId,
    set_carry: ControlId,
    clear_carry: ControlId,
    flags: FlagStatuses,
    alu_flags: FlagStatuses,
    value: u8,
}

impl StatusRegister {
    /// `alu_flags` are the ALU outputs copied on latch
    pub fn new(decl: &StatusRegisterDecl, alu_flags: FlagStatuses) -> Self {
        Self {
            path: decl.path.clone(),
            port: decl.port,
            latch: decl.latch,
            set_carry: decl.set_carry,
            clear_carry: decl.clear_carry,
            flags: decl.flags,
            alu_flags,
            value: 0,
        }
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn carry(&self) -> bool {
        self.value & CARRY != 0
    }

    pub fn zero(&self) -> bool {
        self.value & ZERO != 0
    }

    pub fn negative(&self) -> bool {
        self.value & NEGATIVE != 0
    }

    pub fn overflow(&self) -> bool {
        self.value & OVERFLOW != 0
    }

    fn store(&mut self, ctx: &mut TickContext<'_>, value: u8) -> Result<()> {
        self.value = value;
        ctx.set_status(self.flags.carry, self.carry())?;
        ctx.set_status(self.flags.zero, self.zero())?;
        ctx.set_status(self.flags.negative, self.negative())?;
        ctx.set_status(self.flags.overflow, self.overflow())
    }

    fn latched(&self, ctx: &TickContext<'_>) -> u8 {
        [
            (self.alu_flags.carry, CARRY),
            (self.alu_flags.zero, ZERO),
            (self.alu_flags.negative, NEGATIVE),
            (self.alu_flags.overflow, OVERFLOW),
        ]
        .into_iter()
        .filter(|(status, _)| ctx.status(*status))
        .fold(0, |value, (_, bit)| value | bit)
    }
}

impl Component for StatusRegister {
    fn path(&self) -> &str {
        &self.path
    }

    fn controls(&self) -> Vec<ControlId> {
        vec![
            self.port.write,
            self.port.read,
            self.latch,
            self.set_carry,
            self.clear_carry,
        ]
    }

    fn statuses(&self) -> Vec<StatusId> {
        self.flags.all().to_vec()
    }

    fn participates(&self, phase: TickPhase) -> bool {
        phase != TickPhase::Control
    }

    fn tick(&mut self, ctx: &mut TickContext<'_>) -> Result<()> {
        match ctx.phase {
            TickPhase::Write if ctx.is_asserted(self.port.write) => {
                ctx.write_bus(self.port.bus, u16::from(self.value), &self.path)
            }
            TickPhase::Read if ctx.is_asserted(self.port.read) => {
                let value = ctx.read_bus(self.port.bus, &self.path)? as u8;
                self.store(ctx, value)
            }
            TickPhase::Process => {
                if ctx.is_asserted(self.set_carry) {
                    self.store(ctx, self.value | CARRY)?;
                }
                if ctx.is_asserted(self.clear_carry) {
                    self.store(ctx, self.value & !CARRY)?;
                }
                Ok(())
            }
            TickPhase::Clear if ctx.is_asserted(self.latch) => {
                let value = self.latched(ctx);
                self.store(ctx, value)?;
                ctx.clear_control(self.latch)
            }
            _ => Ok(()),
        }
    }

    fn box_clone(&self) -> Box<dyn Component> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

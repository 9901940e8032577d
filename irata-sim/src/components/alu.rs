//! ALU component.
//!
//! Owns the `lhs`, `rhs` and `result` registers. At most one operation
//! control may be asserted per tick; the operation runs in Process with the
//! status register's carry as carry-in and stages the four ALU flags.

use super::register::Register;
use crate::alu::compute;
use crate::component::{Component, TickContext};
use crate::error::{Result, SimError};
use irata_spec::{AluDecl, AluOpcode, ControlId, FlagStatuses, StatusId, TickPhase};
use std::any::Any;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alu {
    path: String,
    lhs: Register,
    rhs: Register,
    result: Register,
    ops: Vec<(AluOpcode, ControlId)>,
    flags: FlagStatuses,
    carry_in: StatusId,
}

impl Alu {
    pub fn new(decl: &AluDecl, carry_in: StatusId) -> Self {
        Self {
            path: decl.path.clone(),
            lhs: Register::new(&decl.lhs),
            rhs: Register::new(&decl.rhs),
            result: Register::new(&decl.result),
            ops: AluOpcode::ALL.iter().map(|&op| (op, decl.op(op))).collect(),
            flags: decl.flags,
            carry_in,
        }
    }

    pub fn lhs(&self) -> u8 {
        self.lhs.value()
    }

    pub fn rhs(&self) -> u8 {
        self.rhs.value()
    }

    pub fn result(&self) -> u8 {
        self.result.value()
    }

    fn process(&mut self, ctx: &mut TickContext<'_>) -> Result<()> {
        let asserted: Vec<AluOpcode> = self
            .ops
            .iter()
            .filter(|(_, control)| ctx.is_asserted(*control))
            .map(|(op, _)| *op)
            .collect();
        let op = match asserted.as_slice() {
            [] => return Ok(()),
            [op] => *op,
            _ => {
                return Err(SimError::AluConflict {
                    ops: asserted.iter().map(|op| op.name().to_string()).collect(),
                })
            }
        };

        let out = compute(op, self.lhs.value(), self.rhs.value(), ctx.status(self.carry_in));
        tracing::trace!(
            "{} {:#04x} {:#04x} -> {:#04x}",
            op.name(),
            self.lhs.value(),
            self.rhs.value(),
            out.value
        );
        self.result.set_value(out.value);
        ctx.set_status(self.flags.carry, out.carry)?;
        ctx.set_status(self.flags.zero, out.zero)?;
        ctx.set_status(self.flags.negative, out.negative)?;
        ctx.set_status(self.flags.overflow, out.overflow)
    }
}

impl Component for Alu {
    fn path(&self) -> &str {
        &self.path
    }

    fn controls(&self) -> Vec<ControlId> {
        let mut controls: Vec<ControlId> = self.ops.iter().map(|(_, control)| *control).collect();
        controls.extend(self.lhs.claimed());
        controls.extend(self.rhs.claimed());
        controls.extend(self.result.claimed());
        controls
    }

    fn statuses(&self) -> Vec<StatusId> {
        self.flags.all().to_vec()
    }

    fn participates(&self, phase: TickPhase) -> bool {
        matches!(phase, TickPhase::Write | TickPhase::Read | TickPhase::Process)
    }

    fn tick(&mut self, ctx: &mut TickContext<'_>) -> Result<()> {
        self.lhs.step(ctx)?;
        self.rhs.step(ctx)?;
        self.result.step(ctx)?;
        if ctx.phase == TickPhase::Process {
            self.process(ctx)?;
        }
        Ok(())
    }

    fn box_clone(&self) -> Box<dyn Component> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

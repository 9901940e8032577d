//! Machine root: halt and crash lines.

use crate::component::{Component, TickContext};
use crate::error::{Result, SimError};
use irata_spec::{ControlId, IrataDecl, StatusId, TickPhase};
use std::any::Any;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Root {
    halt: ControlId,
    crash: ControlId,
    halted: StatusId,
}

impl Root {
    pub fn new(halt: ControlId, crash: ControlId, halted: StatusId) -> Self {
        Self { halt, crash, halted }
    }

    pub fn for_irata(hw: &IrataDecl) -> Self {
        Self::new(hw.halt, hw.crash, hw.halted)
    }
}

impl Component for Root {
    fn path(&self) -> &str {
        "/"
    }

    fn controls(&self) -> Vec<ControlId> {
        vec![self.halt, self.crash]
    }

    fn statuses(&self) -> Vec<StatusId> {
        vec![self.halted]
    }

    fn participates(&self, phase: TickPhase) -> bool {
        phase == TickPhase::Process
    }

    fn tick(&mut self, ctx: &mut TickContext<'_>) -> Result<()> {
        if ctx.is_asserted(self.crash) {
            return Err(SimError::Crashed { cycle: ctx.cycle });
        }
        if ctx.is_asserted(self.halt) {
            ctx.set_status(self.halted, true)?;
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

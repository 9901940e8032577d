//! Controllers.
//!
//! [`Controller`] drives the control lines from a compiled [`Table`];
//! [`ScriptedController`] replays a fixed sequence of control sets and is
//! used to compare step sequences directly.

use super::register::Register;
use crate::component::{Component, TickContext};
use crate::error::{Result, SimError};
use irata_microcode::Table;
use irata_spec::{ControlId, ControllerDecl, StepIndexControls, TickPhase};
use std::any::Any;
use std::collections::{BTreeSet, VecDeque};
use std::sync::Arc;

/// Table-driven controller: an opcode register and a step counter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Controller {
    path: String,
    table: Arc<Table>,
    opcode: Register,
    step_index: StepIndexControls,
    step: u8,
}

impl Controller {
    pub fn new(decl: &ControllerDecl, table: Arc<Table>) -> Self {
        Self {
            path: decl.path.clone(),
            table,
            opcode: Register::new(&decl.opcode),
            step_index: decl.step_index,
            step: 0,
        }
    }

    pub fn opcode(&self) -> u8 {
        self.opcode.value()
    }

    pub fn step_index(&self) -> u8 {
        self.step
    }

    fn assert_entry(&self, ctx: &mut TickContext<'_>) -> Result<()> {
        let opcode = self.opcode.value();
        let entry = self
            .table
            .lookup(opcode, self.step, |status| ctx.status(status))
            .ok_or(SimError::MissingEntry {
                opcode,
                step_index: self.step,
            })?;
        for &control in &entry.controls {
            ctx.assert_control(control)?;
        }
        Ok(())
    }
}

impl Component for Controller {
    fn path(&self) -> &str {
        &self.path
    }

    fn controls(&self) -> Vec<ControlId> {
        let mut controls = self.opcode.claimed();
        controls.push(self.step_index.increment);
        controls.push(self.step_index.reset);
        controls
    }

    fn participates(&self, phase: TickPhase) -> bool {
        phase != TickPhase::Clear
    }

    fn tick(&mut self, ctx: &mut TickContext<'_>) -> Result<()> {
        match ctx.phase {
            TickPhase::Control => self.assert_entry(ctx),
            TickPhase::Process => {
                if ctx.is_asserted(self.step_index.reset) {
                    self.step = 0;
                } else if ctx.is_asserted(self.step_index.increment) {
                    self.step = self.step.wrapping_add(1);
                }
                Ok(())
            }
            _ => self.opcode.step(ctx),
        }
    }

    fn box_clone(&self) -> Box<dyn Component> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Asserts one queued control set per tick, then nothing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedController {
    path: String,
    opcode: Register,
    step_index: StepIndexControls,
    script: VecDeque<BTreeSet<ControlId>>,
}

impl ScriptedController {
    pub fn new(decl: &ControllerDecl, script: impl IntoIterator<Item = BTreeSet<ControlId>>) -> Self {
        Self {
            path: decl.path.clone(),
            opcode: Register::new(&decl.opcode),
            step_index: decl.step_index,
            script: script.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    pub fn opcode(&self) -> u8 {
        self.opcode.value()
    }
}

impl Component for ScriptedController {
    fn path(&self) -> &str {
        &self.path
    }

    fn controls(&self) -> Vec<ControlId> {
        let mut controls = self.opcode.claimed();
        controls.push(self.step_index.increment);
        controls.push(self.step_index.reset);
        controls
    }

    fn participates(&self, phase: TickPhase) -> bool {
        matches!(phase, TickPhase::Control | TickPhase::Write | TickPhase::Read)
    }

    fn tick(&mut self, ctx: &mut TickContext<'_>) -> Result<()> {
        if ctx.phase != TickPhase::Control {
            return self.opcode.step(ctx);
        }
        if let Some(controls) = self.script.pop_front() {
            for control in controls {
                ctx.assert_control(control)?;
            }
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

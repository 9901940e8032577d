//! Byte and word registers.

use crate::component::{Component, TickContext};
use crate::error::Result;
use irata_spec::{BusPort, ControlId, RegisterDecl, TickPhase};
use std::any::Any;

/// Bus port plus the optional local counters of a [`RegisterDecl`]
#[derive(Debug, Clone, PartialEq, Eq)]
struct Lines {
    path: String,
    port: BusPort,
    reset: Option<ControlId>,
    increment: Option<ControlId>,
    decrement: Option<ControlId>,
}

impl Lines {
    fn new(decl: &RegisterDecl) -> Self {
        Self {
            path: decl.path.clone(),
            port: decl.port,
            reset: decl.reset,
            increment: decl.increment,
            decrement: decl.decrement,
        }
    }

    fn controls(&self) -> Vec<ControlId> {
        [self.port.write, self.port.read]
            .into_iter()
            .chain(self.reset)
            .chain(self.increment)
            .chain(self.decrement)
            .collect()
    }

    fn writes(&self, ctx: &TickContext<'_>) -> bool {
        ctx.is_asserted(self.port.write)
    }

    fn reads(&self, ctx: &TickContext<'_>) -> bool {
        ctx.is_asserted(self.port.read)
    }

    fn asserted(&self, ctx: &TickContext<'_>, control: Option<ControlId>) -> bool {
        control.is_some_and(|control| ctx.is_asserted(control))
    }

    /// Apply reset, increment or decrement in that priority order
    fn count(&self, ctx: &TickContext<'_>, value: u16, mask: u16) -> u16 {
        if self.asserted(ctx, self.reset) {
            0
        } else if self.asserted(ctx, self.increment) {
            value.wrapping_add(1) & mask
        } else if self.asserted(ctx, self.decrement) {
            value.wrapping_sub(1) & mask
        } else {
            value
        }
    }
}

/// 8-bit register on a byte bus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Register {
    lines: Lines,
    value: u8,
}

impl Register {
    pub fn new(decl: &RegisterDecl) -> Self {
        Self {
            lines: Lines::new(decl),
            value: 0,
        }
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn set_value(&mut self, value: u8) {
        self.value = value;
    }

    pub(crate) fn claimed(&self) -> Vec<ControlId> {
        self.lines.controls()
    }

    /// Run one phase; also used by components that embed registers
    pub(crate) fn step(&mut self, ctx: &mut TickContext<'_>) -> Result<()> {
        match ctx.phase {
            TickPhase::Write if self.lines.writes(ctx) => {
                ctx.write_bus(self.lines.port.bus, u16::from(self.value), &self.lines.path)
            }
            TickPhase::Read if self.lines.reads(ctx) => {
                self.value = ctx.read_bus(self.lines.port.bus, &self.lines.path)? as u8;
                Ok(())
            }
            TickPhase::Process => {
                self.value = self.lines.count(ctx, u16::from(self.value), 0xff) as u8;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

impl Component for Register {
    fn path(&self) -> &str {
        &self.lines.path
    }

    fn controls(&self) -> Vec<ControlId> {
        self.claimed()
    }

    fn participates(&self, phase: TickPhase) -> bool {
        matches!(phase, TickPhase::Write | TickPhase::Read | TickPhase::Process)
    }

    fn tick(&mut self, ctx: &mut TickContext<'_>) -> Result<()> {
        self.step(ctx)
    }

    fn box_clone(&self) -> Box<dyn Component> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// 16-bit register on a word bus, optionally exposing its bytes on the
/// data bus through `high` and `low` ports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordRegister {
    lines: Lines,
    halves: Option<(Lines, Lines)>,
    value: u16,
}

impl WordRegister {
    pub fn new(decl: &RegisterDecl) -> Self {
        Self {
            lines: Lines::new(decl),
            halves: None,
            value: 0,
        }
    }

    pub fn with_halves(self, high: &RegisterDecl, low: &RegisterDecl) -> Self {
        Self {
            halves: Some((Lines::new(high), Lines::new(low))),
            ..self
        }
    }

    pub fn with_value(self, value: u16) -> Self {
        Self { value, ..self }
    }

    pub fn value(&self) -> u16 {
        self.value
    }

    pub fn set_value(&mut self, value: u16) {
        self.value = value;
    }

    pub fn high(&self) -> u8 {
        (self.value >> 8) as u8
    }

    pub fn low(&self) -> u8 {
        self.value as u8
    }

    pub(crate) fn claimed(&self) -> Vec<ControlId> {
        let mut controls = self.lines.controls();
        if let Some((high, low)) = &self.halves {
            controls.extend(high.controls());
            controls.extend(low.controls());
        }
        controls
    }

    pub(crate) fn step(&mut self, ctx: &mut TickContext<'_>) -> Result<()> {
        match ctx.phase {
            TickPhase::Write => {
                if self.lines.writes(ctx) {
                    ctx.write_bus(self.lines.port.bus, self.value, &self.lines.path)?;
                }
                if let Some((high, low)) = &self.halves {
                    if high.writes(ctx) {
                        ctx.write_bus(high.port.bus, u16::from(self.high()), &high.path)?;
                    }
                    if low.writes(ctx) {
                        ctx.write_bus(low.port.bus, u16::from(self.low()), &low.path)?;
                    }
                }
                Ok(())
            }
            TickPhase::Read => {
                if self.lines.reads(ctx) {
                    self.value = ctx.read_bus(self.lines.port.bus, &self.lines.path)?;
                }
                if let Some((high, low)) = &self.halves {
                    if high.reads(ctx) {
                        let byte = ctx.read_bus(high.port.bus, &high.path)?;
                        self.value = (byte << 8) | (self.value & 0x00ff);
                    }
                    if low.reads(ctx) {
                        let byte = ctx.read_bus(low.port.bus, &low.path)?;
                        self.value = (self.value & 0xff00) | (byte & 0x00ff);
                    }
                }
                Ok(())
            }
            TickPhase::Process => {
                self.value = self.lines.count(ctx, self.value, 0xffff);
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

impl Component for WordRegister {
    fn path(&self) -> &str {
        &self.lines.path
    }

    fn controls(&self) -> Vec<ControlId> {
        self.claimed()
    }

    fn participates(&self, phase: TickPhase) -> bool {
        matches!(phase, TickPhase::Write | TickPhase::Read | TickPhase::Process)
    }

    fn tick(&mut self, ctx: &mut TickContext<'_>) -> Result<()> {
        self.step(ctx)
    }

    fn box_clone(&self) -> Box<dyn Component> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

//! # Components
//!
//! A component owns a set of control and status lines and reacts to them in
//! the phases it participates in. All interaction with the rest of the machine
//! goes through a [`TickContext`]: control lines, committed status values,
//! staged status writes, and the buses.

use crate::bus::Buses;
use crate::error::{Result, SimError};
use crate::lines::{ControlLines, StatusLines};
use irata_spec::{BusId, ControlId, StatusId, TickPhase};
use std::any::Any;
use std::fmt;

pub trait Component: fmt::Debug {
    /// Hardware path, also used as the bus setter identity
    fn path(&self) -> &str;

    /// Control lines this component consumes
    fn controls(&self) -> Vec<ControlId>;

    /// Status lines this component drives
    fn statuses(&self) -> Vec<StatusId> {
        Vec::new()
    }

    fn participates(&self, phase: TickPhase) -> bool;

    fn tick(&mut self, ctx: &mut TickContext<'_>) -> Result<()>;

    fn box_clone(&self) -> Box<dyn Component>;

    fn as_any(&self) -> &dyn Any;

    /// Save what a failed tick has to undo; by default a full copy
    fn checkpoint(&mut self) -> Checkpoint {
        Checkpoint::Snapshot(self.box_clone())
    }

    /// Undo every change since a [`Checkpoint::Journal`] checkpoint
    fn rollback(&mut self) {}

    /// Discard rollback state after a successful tick
    fn commit(&mut self) {}
}

/// Rollback state taken at the start of a tick
#[derive(Debug)]
pub enum Checkpoint {
    /// Replace the component with this copy
    Snapshot(Box<dyn Component>),
    /// The component journals its own changes; call `rollback`
    Journal,
}

impl Clone for Box<dyn Component> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// View of shared machine state during one phase
pub struct TickContext<'t> {
    pub phase: TickPhase,
    pub cycle: u64,
    controls: &'t mut ControlLines,
    statuses: &'t mut StatusLines,
    buses: &'t mut Buses,
}

impl<'t> TickContext<'t> {
    pub fn new(
        phase: TickPhase,
        cycle: u64,
        controls: &'t mut ControlLines,
        statuses: &'t mut StatusLines,
        buses: &'t mut Buses,
    ) -> Self {
        Self {
            phase,
            cycle,
            controls,
            statuses,
            buses,
        }
    }

    pub fn is_asserted(&self, control: ControlId) -> bool {
        self.controls.is_asserted(control)
    }

    pub fn assert_control(&mut self, control: ControlId) -> Result<()> {
        self.controls.set(control, true)
    }

    pub fn clear_control(&mut self, control: ControlId) -> Result<()> {
        self.controls.set(control, false)
    }

    /// Committed value; writes staged this phase are not visible
    pub fn status(&self, status: StatusId) -> bool {
        self.statuses.get(status)
    }

    pub fn set_status(&mut self, status: StatusId, value: bool) -> Result<()> {
        self.statuses.stage(status, value)
    }

    pub fn write_bus(&mut self, bus: BusId, value: u16, setter: &str) -> Result<()> {
        self.buses.get_mut(bus)?.set_value(value, setter)
    }

    pub fn read_bus(&self, bus: BusId, reader: &str) -> Result<u16> {
        let bus = self.buses.get(bus)?;
        bus.value().ok_or_else(|| SimError::OpenBus {
            bus: bus.path().to_string(),
            reader: reader.to_string(),
        })
    }
}

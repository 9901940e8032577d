//! Test bench for driving components without a full simulator.

use crate::bus::Buses;
use crate::component::{Component, TickContext};
use crate::error::Result;
use crate::lines::{ControlLines, StatusLines};
use irata_spec::{ControlId, IrataDecl, StatusId, TickPhase};

pub(crate) struct Bench {
    controls: ControlLines,
    statuses: StatusLines,
    buses: Buses,
    cycle: u64,
}

impl Bench {
    pub fn new(hw: &IrataDecl) -> Self {
        Self {
            controls: ControlLines::from_hdl(hw.hdl()),
            statuses: StatusLines::from_hdl(hw.hdl()),
            buses: Buses::from_hdl(hw.hdl()),
            cycle: 0,
        }
    }

    /// Replace the asserted controls for the next run
    pub fn assert(&mut self, controls: &[ControlId]) {
        for control in self.controls.asserted().collect::<Vec<_>>() {
            self.controls.set(control, false).unwrap();
        }
        for &control in controls {
            self.controls.set(control, true).unwrap();
        }
    }

    pub fn is_asserted(&self, control: ControlId) -> bool {
        self.controls.is_asserted(control)
    }

    pub fn status(&self, status: StatusId) -> bool {
        self.statuses.get(status)
    }

    pub fn set_status(&mut self, status: StatusId, value: bool) {
        self.statuses.stage(status, value).unwrap();
        self.statuses.commit();
    }

    /// One full tick over `components` in order
    pub fn run(&mut self, components: &mut [&mut dyn Component]) -> Result<()> {
        for phase in TickPhase::ALL {
            let mut ctx = TickContext::new(
                phase,
                self.cycle,
                &mut self.controls,
                &mut self.statuses,
                &mut self.buses,
            );
            for component in components.iter_mut() {
                if component.participates(phase) {
                    component.tick(&mut ctx)?;
                }
            }
            self.statuses.commit();
        }
        self.buses.clear();
        self.cycle += 1;
        Ok(())
    }
}

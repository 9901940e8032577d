//! DSL step: one tick's worth of control assertions.

use irata_spec::{BusId, ControlId};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Step {
    controls: BTreeSet<ControlId>,
    buses: BTreeSet<BusId>,
    stage: u8,
}

impl Step {
    pub(crate) fn new(stage: u8) -> Self {
        Self {
            stage,
            ..Self::default()
        }
    }

    pub fn with_control(&mut self, control: ControlId) -> &mut Self {
        self.controls.insert(control);
        self
    }

    /// Annotate a bus this step moves a value over
    pub fn with_bus(&mut self, bus: BusId) -> &mut Self {
        self.buses.insert(bus);
        self
    }

    pub fn controls(&self) -> &BTreeSet<ControlId> {
        &self.controls
    }

    pub fn buses(&self) -> &BTreeSet<BusId> {
        &self.buses
    }

    pub fn stage(&self) -> u8 {
        self.stage
    }
}

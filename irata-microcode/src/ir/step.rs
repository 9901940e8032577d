//! IR step.

use irata_spec::{BusId, ControlId};
use std::collections::BTreeSet;

/// Controls asserted together in one tick
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Step {
    stage: u8,
    controls: BTreeSet<ControlId>,
    buses: BTreeSet<BusId>,
}

impl Step {
    pub fn new(
        stage: u8,
        controls: impl IntoIterator<Item = ControlId>,
        buses: impl IntoIterator<Item = BusId>,
    ) -> Self {
        Self {
            stage,
            controls: controls.into_iter().collect(),
            buses: buses.into_iter().collect(),
        }
    }

    pub fn stage(&self) -> u8 {
        self.stage
    }

    pub fn controls(&self) -> &BTreeSet<ControlId> {
        &self.controls
    }

    /// Annotated buses
    pub fn buses(&self) -> &BTreeSet<BusId> {
        &self.buses
    }

    pub fn contains(&self, control: ControlId) -> bool {
        self.controls.contains(&control)
    }

    pub fn with_control(mut self, control: ControlId) -> Self {
        self.controls.insert(control);
        self
    }

    pub fn without_control(mut self, control: ControlId) -> Self {
        self.controls.remove(&control);
        self
    }

    /// Union of both steps' controls and annotations, in `self`'s stage
    pub fn union(&self, other: &Step) -> Self {
        Self {
            stage: self.stage,
            controls: self.controls.union(&other.controls).copied().collect(),
            buses: self.buses.union(&other.buses).copied().collect(),
        }
    }
}

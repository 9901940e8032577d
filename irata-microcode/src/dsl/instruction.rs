//! DSL instruction: one status-gated variant of a descriptor.

use super::step::Step;
use irata_spec::{BusConnected, ControlId, Descriptor, StatusId};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    descriptor: Descriptor,
    steps: Vec<Step>,
    statuses: BTreeMap<StatusId, bool>,
    /// `with_status` calls that contradicted an earlier value
    conflicts: Vec<(StatusId, bool)>,
    stage: u8,
}

impl Instruction {
    pub fn new(descriptor: Descriptor) -> Self {
        Self {
            descriptor,
            steps: Vec::new(),
            statuses: BTreeMap::new(),
            conflicts: Vec::new(),
            stage: 0,
        }
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    /// Append an empty step in the current stage
    pub fn create_step(&mut self) -> &mut Step {
        self.steps.push(Step::new(self.stage));
        let last = self.steps.len() - 1;
        &mut self.steps[last]
    }

    /// Append a step asserting a single control
    pub fn with_control(&mut self, control: ControlId) -> &mut Self {
        self.create_step().with_control(control);
        self
    }

    /// Append a step asserting all of `controls` at once
    pub fn with_controls(&mut self, controls: impl IntoIterator<Item = ControlId>) -> &mut Self {
        let step = self.create_step();
        for control in controls {
            step.with_control(control);
        }
        self
    }

    /// Gate this variant on a status value
    pub fn with_status(&mut self, status: StatusId, value: bool) -> &mut Self {
        match self.statuses.get(&status) {
            Some(&existing) if existing != value => self.conflicts.push((status, value)),
            _ => {
                self.statuses.insert(status, value);
            }
        }
        self
    }

    /// Start a new stage; steps are never merged across stages
    pub fn next_stage(&mut self) -> &mut Self {
        self.stage = self.stage.saturating_add(1);
        self
    }

    /// Append a step moving `src`'s value into `dst` over their shared bus
    pub fn copy(&mut self, src: &impl BusConnected, dst: &impl BusConnected) -> &mut Self {
        self.create_step()
            .with_control(src.write())
            .with_control(dst.read())
            .with_bus(src.bus())
            .with_bus(dst.bus());
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn statuses(&self) -> &BTreeMap<StatusId, bool> {
        &self.statuses
    }

    pub(crate) fn conflicts(&self) -> &[(StatusId, bool)] {
        &self.conflicts
    }

    pub fn stage(&self) -> u8 {
        self.stage
    }
}

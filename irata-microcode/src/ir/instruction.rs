//! IR instruction variant.

use super::step::Step;
use irata_spec::{Descriptor, StatusId};
use std::collections::BTreeMap;

/// One status-gated variant of a descriptor
///
/// Ordered by descriptor, then preconditions, then steps.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instruction {
    descriptor: Descriptor,
    statuses: BTreeMap<StatusId, bool>,
    steps: Vec<Step>,
}

impl Instruction {
    pub fn new(descriptor: Descriptor, statuses: BTreeMap<StatusId, bool>, steps: Vec<Step>) -> Self {
        Self {
            descriptor,
            statuses,
            steps,
        }
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    pub fn statuses(&self) -> &BTreeMap<StatusId, bool> {
        &self.statuses
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Same descriptor and preconditions, new steps
    pub fn with_steps(self, steps: Vec<Step>) -> Self {
        Self { steps, ..self }
    }

    /// Whether some status state satisfies both variants' preconditions
    pub fn overlaps(&self, other: &Instruction) -> bool {
        self.statuses.iter().all(|(status, value)| {
            other
                .statuses
                .get(status)
                .map_or(true, |other_value| other_value == value)
        })
    }
}

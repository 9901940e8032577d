//! IR instruction set.

use super::instruction::Instruction;
use super::step::Step;
use crate::dsl;
use irata_spec::{Descriptor, Hdl, StructuralError};
use std::collections::BTreeSet;

/// Ordered set of instruction variants
///
/// Iteration order is stable, so every pass sees variants in the same order
/// on every run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstructionSet {
    instructions: BTreeSet<Instruction>,
}

impl InstructionSet {
    pub fn new(instructions: impl IntoIterator<Item = Instruction>) -> Self {
        Self {
            instructions: instructions.into_iter().collect(),
        }
    }

    /// Lower the DSL, rejecting dangling ids, conflicting statuses and
    /// variants declared twice
    pub fn from_dsl(set: &dsl::InstructionSet, hdl: &Hdl) -> Result<Self, StructuralError> {
        let mut instructions = BTreeSet::new();
        for instruction in set.instructions() {
            if let Some(&(status, requested)) = instruction.conflicts().first() {
                return Err(StructuralError::ConflictingStatus {
                    descriptor: instruction.descriptor().to_string(),
                    status: hdl.status_path(status),
                    existing: !requested,
                    requested,
                });
            }
            for &status in instruction.statuses().keys() {
                hdl.status(status)?;
            }

            let mut steps = Vec::with_capacity(instruction.steps().len());
            for step in instruction.steps() {
                for &control in step.controls() {
                    hdl.control(control)?;
                }
                for &bus in step.buses() {
                    hdl.bus(bus)?;
                }
                steps.push(Step::new(
                    step.stage(),
                    step.controls().iter().copied(),
                    step.buses().iter().copied(),
                ));
            }

            let lowered = Instruction::new(
                instruction.descriptor().clone(),
                instruction.statuses().clone(),
                steps,
            );
            if !instructions.insert(lowered) {
                return Err(StructuralError::DuplicateVariant {
                    descriptor: instruction.descriptor().to_string(),
                    statuses: super::format_statuses(hdl, instruction.statuses()),
                });
            }
        }
        Ok(Self { instructions })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instruction> {
        self.instructions.iter()
    }

    /// All variants of one descriptor
    pub fn variants<'a>(&'a self, descriptor: &'a Descriptor) -> impl Iterator<Item = &'a Instruction> {
        self.instructions
            .iter()
            .filter(move |instruction| instruction.descriptor() == descriptor)
    }

    pub fn descriptors(&self) -> BTreeSet<&Descriptor> {
        self.instructions.iter().map(Instruction::descriptor).collect()
    }

    /// Total steps over all variants
    pub fn step_count(&self) -> usize {
        self.instructions.iter().map(|i| i.steps().len()).sum()
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

impl FromIterator<Instruction> for InstructionSet {
    fn from_iter<I: IntoIterator<Item = Instruction>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl IntoIterator for InstructionSet {
    type Item = Instruction;
    type IntoIter = std::collections::btree_set::IntoIter<Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.into_iter()
    }
}

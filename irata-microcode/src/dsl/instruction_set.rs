//! DSL instruction set.

use super::instruction::Instruction;
use irata_spec::Descriptor;

/// Every instruction variant under construction, in creation order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstructionSet {
    instructions: Vec<Instruction>,
}

impl InstructionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new variant for `descriptor`
    pub fn create_instruction(&mut self, descriptor: Descriptor) -> &mut Instruction {
        self.instructions.push(Instruction::new(descriptor));
        let last = self.instructions.len() - 1;
        &mut self.instructions[last]
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Keep only the variants for which `keep` returns true
    pub fn retain(&mut self, keep: impl FnMut(&Instruction) -> bool) {
        self.instructions.retain(keep);
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

//! Fetch stage validation.

use super::PassContext;
use crate::error::ValidationError;
use crate::ir::{format_statuses, Instruction, InstructionSet, Step};

/// Steps in stage 0 of a variant
fn fetch_stage(instruction: &Instruction) -> &[Step] {
    let len = instruction
        .steps()
        .iter()
        .take_while(|step| step.stage() == 0)
        .count();
    &instruction.steps()[..len]
}

/// Index of the first step where `a` and `b` differ, if any
fn first_difference(a: &[Step], b: &[Step]) -> Option<usize> {
    a.iter()
        .zip(b)
        .position(|(x, y)| x != y)
        .or_else(|| (a.len() != b.len()).then(|| a.len().min(b.len())))
}

/// Stage 0 must be identical in every variant
pub(super) fn validate(ctx: &PassContext<'_>, ir: &InstructionSet) -> Result<(), ValidationError> {
    let mut instructions = ir.iter();
    let Some(reference) = instructions.next() else {
        return Ok(());
    };
    let expected = fetch_stage(reference);
    for instruction in instructions {
        if let Some(step) = first_difference(fetch_stage(instruction), expected) {
            return Err(ValidationError::FetchStageMismatch {
                descriptor: instruction.descriptor().to_string(),
                preconditions: format_statuses(ctx.hdl, instruction.statuses()),
                reference: reference.descriptor().to_string(),
                reference_preconditions: format_statuses(ctx.hdl, reference.statuses()),
                step,
            });
        }
    }
    Ok(())
}

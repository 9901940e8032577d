//! Step index decoration and validation.

use super::PassContext;
use crate::error::ValidationError;
use crate::ir::{Instruction, InstructionSet, Step};

/// Increment the step index after every step but the last, which resets it
pub(super) fn decorate(ctx: &PassContext<'_>, ir: InstructionSet) -> InstructionSet {
    let controls = ctx.step_index;
    ir.into_iter()
        .map(|instruction| {
            let last = instruction.steps().len().saturating_sub(1);
            let steps: Vec<Step> = instruction
                .steps()
                .iter()
                .enumerate()
                .map(|(index, step)| {
                    let control = if index == last {
                        controls.reset
                    } else {
                        controls.increment
                    };
                    step.clone().with_control(control)
                })
                .collect();
            instruction.with_steps(steps)
        })
        .collect()
}

pub(super) fn validate(ctx: &PassContext<'_>, ir: &InstructionSet) -> Result<(), ValidationError> {
    for instruction in ir.iter() {
        validate_instruction(ctx, instruction)?;
    }
    Ok(())
}

fn validate_instruction(ctx: &PassContext<'_>, instruction: &Instruction) -> Result<(), ValidationError> {
    let controls = ctx.step_index;
    let descriptor = || instruction.descriptor().to_string();
    let steps = instruction.steps();
    let Some(last) = steps.len().checked_sub(1) else {
        return Err(ValidationError::EmptyInstruction {
            descriptor: descriptor(),
        });
    };

    for (step, s) in steps[..last].iter().enumerate() {
        if !s.contains(controls.increment) {
            return Err(ValidationError::MissingStepIncrement {
                descriptor: descriptor(),
                step,
            });
        }
        if s.contains(controls.reset) {
            return Err(ValidationError::UnexpectedStepReset {
                descriptor: descriptor(),
                step,
            });
        }
    }

    let final_step = &steps[last];
    if !final_step.contains(controls.reset) {
        return Err(ValidationError::MissingStepReset {
            descriptor: descriptor(),
            step: last,
        });
    }
    if final_step.contains(controls.increment) {
        return Err(ValidationError::UnexpectedStepIncrement {
            descriptor: descriptor(),
            step: last,
        });
    }
    Ok(())
}

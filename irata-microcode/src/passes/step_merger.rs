//! Greedy step merging.
//!
//! Two adjacent steps of one stage collapse into one tick when every phase
//! the left step touches strictly precedes every phase the right step
//! touches, and the union writes no bus twice. Step-index controls take no
//! part in the phase check; the merged step keeps the right step's.

use super::PassContext;
use crate::error::ValidationError;
use crate::ir::{Instruction, InstructionSet, Step};
use irata_spec::{BusId, ControlKind, TickPhase};
use std::collections::BTreeSet;

pub(super) fn merge(ctx: &PassContext<'_>, ir: InstructionSet) -> Result<InstructionSet, ValidationError> {
    ir.into_iter()
        .map(|instruction| merge_instruction(ctx, instruction))
        .collect()
}

fn merge_instruction(ctx: &PassContext<'_>, instruction: Instruction) -> Result<Instruction, ValidationError> {
    let mut merged: Vec<Step> = Vec::with_capacity(instruction.steps().len());
    for step in instruction.steps() {
        if let Some(last) = merged.last_mut() {
            if can_merge(ctx, last, step)? {
                *last = last
                    .clone()
                    .without_control(ctx.step_index.increment)
                    .union(step);
                continue;
            }
        }
        merged.push(step.clone());
    }
    if merged.len() < instruction.steps().len() {
        tracing::trace!(
            "Merged {} into {} steps: {}",
            instruction.steps().len(),
            merged.len(),
            instruction.descriptor()
        );
    }
    Ok(instruction.with_steps(merged))
}

fn can_merge(ctx: &PassContext<'_>, lhs: &Step, rhs: &Step) -> Result<bool, ValidationError> {
    if lhs.stage() != rhs.stage() {
        return Ok(false);
    }
    let (Some(lhs_phases), Some(rhs_phases)) = (phases(ctx, lhs)?, phases(ctx, rhs)?) else {
        return Ok(true);
    };
    if lhs_phases.1 >= rhs_phases.0 {
        return Ok(false);
    }
    Ok(!writes_bus_twice(ctx, lhs, rhs)?)
}

/// Earliest and latest phase of the step's non-step-index controls
fn phases(ctx: &PassContext<'_>, step: &Step) -> Result<Option<(TickPhase, TickPhase)>, ValidationError> {
    let mut range: Option<(TickPhase, TickPhase)> = None;
    for &control in step.controls() {
        if ctx.step_index.contains(control) {
            continue;
        }
        let phase = ctx.hdl.control(control)?.phase();
        range = Some(match range {
            Some((min, max)) => (min.min(phase), max.max(phase)),
            None => (phase, phase),
        });
    }
    Ok(range)
}

fn writes_bus_twice(ctx: &PassContext<'_>, lhs: &Step, rhs: &Step) -> Result<bool, ValidationError> {
    let mut written: BTreeSet<BusId> = BTreeSet::new();
    for &control in lhs.controls().union(rhs.controls()) {
        if let ControlKind::BusWrite(bus) = ctx.hdl.control(control)?.kind {
            if !written.insert(bus) {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

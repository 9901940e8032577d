//! Bus usage validation.

use super::PassContext;
use crate::error::ValidationError;
use crate::ir::{Instruction, InstructionSet, Step};
use irata_spec::{BusId, ControlId, ControlKind};
use std::collections::{BTreeMap, BTreeSet};

/// Every bus a step touches needs exactly one writer and at least one reader
pub(super) fn validate(ctx: &PassContext<'_>, ir: &InstructionSet) -> Result<(), ValidationError> {
    for instruction in ir.iter() {
        for (index, step) in instruction.steps().iter().enumerate() {
            validate_step(ctx, instruction, index, step)?;
        }
    }
    Ok(())
}

fn validate_step(
    ctx: &PassContext<'_>,
    instruction: &Instruction,
    index: usize,
    step: &Step,
) -> Result<(), ValidationError> {
    let mut writers: BTreeMap<BusId, Vec<ControlId>> = BTreeMap::new();
    let mut readers: BTreeMap<BusId, usize> = BTreeMap::new();
    for &control in step.controls() {
        match ctx.hdl.control(control)?.kind {
            ControlKind::BusWrite(bus) => writers.entry(bus).or_default().push(control),
            ControlKind::BusRead(bus) => *readers.entry(bus).or_default() += 1,
            ControlKind::Process | ControlKind::Clear => {}
        }
    }

    let buses: BTreeSet<BusId> = step
        .buses()
        .iter()
        .chain(writers.keys())
        .chain(readers.keys())
        .copied()
        .collect();

    for bus in buses {
        let descriptor = instruction.descriptor().to_string();
        let bus_path = ctx.hdl.bus_path(bus);
        let bus_writers = writers.get(&bus).map(Vec::as_slice).unwrap_or(&[]);
        match bus_writers.len() {
            0 => {
                return Err(ValidationError::BusNotWritten {
                    descriptor,
                    step: index,
                    bus: bus_path,
                })
            }
            1 => {}
            _ => {
                return Err(ValidationError::BusMultipleWriters {
                    descriptor,
                    step: index,
                    bus: bus_path,
                    writers: bus_writers.iter().map(|&c| ctx.hdl.control_path(c)).collect(),
                })
            }
        }
        if readers.get(&bus).copied().unwrap_or(0) == 0 {
            return Err(ValidationError::BusNotRead {
                descriptor,
                step: index,
                bus: bus_path,
            });
        }
    }
    Ok(())
}

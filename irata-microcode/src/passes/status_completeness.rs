//! Status completeness: every status branch has both arms, and no status
//! state selects two variants.

use super::PassContext;
use crate::error::ValidationError;
use crate::ir::{format_statuses, Instruction, InstructionSet};

pub(super) fn validate(ctx: &PassContext<'_>, ir: &InstructionSet) -> Result<(), ValidationError> {
    for descriptor in ir.descriptors() {
        let variants: Vec<&Instruction> = ir.variants(descriptor).collect();

        for variant in &variants {
            for (&status, &value) in variant.statuses() {
                let mut sibling = variant.statuses().clone();
                sibling.insert(status, !value);
                if !variants.iter().any(|other| *other.statuses() == sibling) {
                    let mut preconditions = variant.statuses().clone();
                    preconditions.remove(&status);
                    return Err(ValidationError::IncompleteStatus {
                        descriptor: descriptor.to_string(),
                        status: ctx.hdl.status_path(status),
                        missing: !value,
                        preconditions: format_statuses(ctx.hdl, &preconditions),
                    });
                }
            }
        }

        for (i, first) in variants.iter().enumerate() {
            if let Some(second) = variants[i + 1..].iter().find(|other| first.overlaps(other)) {
                return Err(ValidationError::AmbiguousVariants {
                    descriptor: descriptor.to_string(),
                    first: format_statuses(ctx.hdl, first.statuses()),
                    second: format_statuses(ctx.hdl, second.statuses()),
                });
            }
        }
    }
    Ok(())
}

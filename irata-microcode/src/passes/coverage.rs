//! Catalog coverage validation.

use super::PassContext;
use crate::error::ValidationError;
use crate::ir::InstructionSet;

/// Every catalog descriptor needs an instruction, and nothing else may have one
pub(super) fn validate(ctx: &PassContext<'_>, ir: &InstructionSet) -> Result<(), ValidationError> {
    let present = ir.descriptors();

    if let Some(unknown) = present.iter().find(|d| !ctx.catalog.contains(d)) {
        return Err(ValidationError::UnknownDescriptor {
            descriptor: unknown.to_string(),
        });
    }

    let missing: Vec<String> = ctx
        .catalog
        .iter()
        .filter(|descriptor| !present.contains(descriptor))
        .map(ToString::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingInstructions { missing });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::testing::Fixture;
    use super::super::Pass;
    use super::*;
    use irata_spec::{AddressingMode, Descriptor};

    #[test]
    fn test_full_coverage_passes() {
        let f = Fixture::new();
        let ir = InstructionSet::new([
            f.variant("nop", &[], &[&[]]),
            f.variant("tab", &[], &[&[f.a_write, f.b_read]]),
            f.variant("bcs", &[(f.carry, true)], &[&[f.tick]]),
        ]);
        assert!(Pass::InstructionCoverageValidator.run(&f.ctx(), ir).is_ok());
    }

    #[test]
    fn test_reports_all_missing() {
        let f = Fixture::new();
        let ir = InstructionSet::new([f.variant("tab", &[], &[&[]])]);
        let err = Pass::InstructionCoverageValidator.run(&f.ctx(), ir).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingInstructions {
                missing: vec!["nop (none)".to_string(), "bcs (absolute)".to_string()],
            }
        );
    }

    #[test]
    fn test_unknown_descriptor_rejected() {
        let f = Fixture::new();
        let stray = crate::ir::Instruction::new(
            Descriptor::new(0x7F, "xyz", AddressingMode::None, ""),
            Default::default(),
            vec![],
        );
        let ir = InstructionSet::new([
            f.variant("nop", &[], &[&[]]),
            f.variant("tab", &[], &[&[]]),
            f.variant("bcs", &[], &[&[]]),
            stray,
        ]);
        let err = Pass::InstructionCoverageValidator.run(&f.ctx(), ir).unwrap_err();
        assert!(matches!(err, ValidationError::UnknownDescriptor { ref descriptor } if descriptor == "xyz (none)"));
    }
}

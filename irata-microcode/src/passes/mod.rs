//! # Compiler Passes
//!
//! Every pass is a pure `InstructionSet -> Result<InstructionSet, ValidationError>`
//! function. The set of passes is closed; [`PIPELINE`] fixes the order the
//! compiler runs them in.
//!
//! | Pass | Kind |
//! |------|------|
//! | `BusValidator` | validator |
//! | `FetchStageValidator` | validator |
//! | `InstructionCoverageValidator` | validator |
//! | `StepIndexTransformer` | rewrite |
//! | `StepIndexValidator` | validator |
//! | `StatusCompletenessValidator` | validator |
//! | `StepMerger` | rewrite |

mod bus;
mod coverage;
mod fetch_stage;
mod status_completeness;
mod step_index;
mod step_merger;
#[cfg(test)]
pub(crate) mod testing;

use crate::error::ValidationError;
use crate::ir::InstructionSet;
use irata_spec::{Catalog, Hdl, StepIndexControls};
use std::fmt;

/// Everything a pass may consult besides the IR itself
#[derive(Debug, Clone, Copy)]
pub struct PassContext<'a> {
    pub hdl: &'a Hdl,
    pub catalog: &'a Catalog,
    pub step_index: StepIndexControls,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pass {
    BusValidator,
    FetchStageValidator,
    InstructionCoverageValidator,
    StepIndexTransformer,
    StepIndexValidator,
    StatusCompletenessValidator,
    StepMerger,
}

/// Full compile order
///
/// Decoration runs before completeness checking, so a variant that is both
/// undecorated and incomplete reports the decoration failure first.
pub const PIPELINE: [Pass; 7] = [
    Pass::BusValidator,
    Pass::FetchStageValidator,
    Pass::InstructionCoverageValidator,
    Pass::StepIndexTransformer,
    Pass::StepIndexValidator,
    Pass::StatusCompletenessValidator,
    Pass::StepMerger,
];

/// Structural and coverage checks only
pub const VALIDATION_PASSES: [Pass; 3] = [
    Pass::BusValidator,
    Pass::FetchStageValidator,
    Pass::InstructionCoverageValidator,
];

impl Pass {
    pub fn name(&self) -> &'static str {
        match self {
            Pass::BusValidator => "BusValidator",
            Pass::FetchStageValidator => "FetchStageValidator",
            Pass::InstructionCoverageValidator => "InstructionCoverageValidator",
            Pass::StepIndexTransformer => "StepIndexTransformer",
            Pass::StepIndexValidator => "StepIndexValidator",
            Pass::StatusCompletenessValidator => "StatusCompletenessValidator",
            Pass::StepMerger => "StepMerger",
        }
    }

    /// Whether the pass only inspects the IR
    pub fn is_validator(&self) -> bool {
        !matches!(self, Pass::StepIndexTransformer | Pass::StepMerger)
    }

    pub fn run(&self, ctx: &PassContext<'_>, ir: InstructionSet) -> Result<InstructionSet, ValidationError> {
        match self {
            Pass::BusValidator => bus::validate(ctx, &ir)?,
            Pass::FetchStageValidator => fetch_stage::validate(ctx, &ir)?,
            Pass::InstructionCoverageValidator => coverage::validate(ctx, &ir)?,
            Pass::StepIndexTransformer => return Ok(step_index::decorate(ctx, ir)),
            Pass::StepIndexValidator => step_index::validate(ctx, &ir)?,
            Pass::StatusCompletenessValidator => status_completeness::validate(ctx, &ir)?,
            Pass::StepMerger => return step_merger::merge(ctx, ir),
        }
        Ok(ir)
    }
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_order() {
        assert_eq!(PIPELINE[..3], VALIDATION_PASSES);
        let transformer = PIPELINE
            .iter()
            .position(|p| *p == Pass::StepIndexTransformer)
            .unwrap();
        let validator = PIPELINE
            .iter()
            .position(|p| *p == Pass::StepIndexValidator)
            .unwrap();
        assert!(transformer < validator);
        assert_eq!(PIPELINE.last(), Some(&Pass::StepMerger));
    }

    #[test]
    fn test_validator_classification() {
        let rewrites: Vec<Pass> = PIPELINE.iter().copied().filter(|p| !p.is_validator()).collect();
        assert_eq!(rewrites, vec![Pass::StepIndexTransformer, Pass::StepMerger]);
        assert!(VALIDATION_PASSES.iter().all(Pass::is_validator));
    }
}

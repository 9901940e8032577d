//! Microcode compiler errors

use crate::passes::Pass;
use irata_spec::StructuralError;
use thiserror::Error;

/// A pass rejected the IR
///
/// Descriptors are rendered as `name (mode)`; controls, statuses and buses by
/// their declaration path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    // Bus usage
    #[error("Bus {bus} is read but not written in {descriptor} step {step}")]
    BusNotWritten {
        descriptor: String,
        step: usize,
        bus: String,
    },

    #[error("Bus {bus} is written by multiple controls in {descriptor} step {step}: {}", writers.join(", "))]
    BusMultipleWriters {
        descriptor: String,
        step: usize,
        bus: String,
        writers: Vec<String>,
    },

    #[error("Bus {bus} is written but not read in {descriptor} step {step}")]
    BusNotRead {
        descriptor: String,
        step: usize,
        bus: String,
    },

    // Fetch stage
    #[error("Fetch stage of {descriptor} under {preconditions} differs from {reference} under {reference_preconditions} at step {step}")]
    FetchStageMismatch {
        descriptor: String,
        preconditions: String,
        reference: String,
        reference_preconditions: String,
        /// First step index where the two fetch stages disagree
        step: usize,
    },

    // Coverage
    #[error("Missing instructions for descriptors: {}", missing.join(", "))]
    MissingInstructions { missing: Vec<String> },

    #[error("Instruction {descriptor} is not in the catalog")]
    UnknownDescriptor { descriptor: String },

    // Step index decoration
    #[error("Instruction {descriptor} has no steps")]
    EmptyInstruction { descriptor: String },

    #[error("Step {step} of {descriptor} does not increment the step index")]
    MissingStepIncrement { descriptor: String, step: usize },

    #[error("Step {step} of {descriptor} resets the step index before the final step")]
    UnexpectedStepReset { descriptor: String, step: usize },

    #[error("Final step {step} of {descriptor} does not reset the step index")]
    MissingStepReset { descriptor: String, step: usize },

    #[error("Final step {step} of {descriptor} increments the step index")]
    UnexpectedStepIncrement { descriptor: String, step: usize },

    // Status completeness
    #[error("Instruction {descriptor} has incomplete status {status}: no variant with {status}={missing} under {preconditions}")]
    IncompleteStatus {
        descriptor: String,
        status: String,
        missing: bool,
        preconditions: String,
    },

    #[error("Instruction {descriptor} has ambiguous variants: {first} and {second}")]
    AmbiguousVariants {
        descriptor: String,
        first: String,
        second: String,
    },

    #[error(transparent)]
    Structural(#[from] StructuralError),
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("{pass} failed: {source}")]
    Validation {
        pass: Pass,
        #[source]
        source: ValidationError,
    },

    #[error("Structural error: {0}")]
    Structural(#[from] StructuralError),

    #[error("Duplicate table entry for {descriptor} step {step_index} under {statuses}")]
    DuplicateEntry {
        descriptor: String,
        step_index: u8,
        statuses: String,
    },

    #[error("Instruction {descriptor} has {steps} steps, more than a step index can address")]
    StepIndexOverflow { descriptor: String, steps: usize },

    #[error("Table encoding error: {0}")]
    Encoding(#[from] bincode::Error),
}

impl CompileError {
    /// The validation failure, if a pass rejected the IR
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            CompileError::Validation { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CompileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bus_error_display() {
        let err = ValidationError::BusMultipleWriters {
            descriptor: "tax (none)".to_string(),
            step: 2,
            bus: "/data_bus".to_string(),
            writers: vec!["/cpu/a/write".to_string(), "/cpu/x/write".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Bus /data_bus is written by multiple controls in tax (none) step 2: /cpu/a/write, /cpu/x/write"
        );
    }

    #[test]
    fn test_missing_instructions_display() {
        let err = ValidationError::MissingInstructions {
            missing: vec!["lda (immediate)".to_string(), "sec (none)".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Missing instructions for descriptors: lda (immediate), sec (none)"
        );
    }

    #[test]
    fn test_compile_error_names_pass() {
        let err = CompileError::Validation {
            pass: Pass::StepIndexValidator,
            source: ValidationError::EmptyInstruction {
                descriptor: "nop (none)".to_string(),
            },
        };
        assert_eq!(
            err.to_string(),
            "StepIndexValidator failed: Instruction nop (none) has no steps"
        );
        assert!(err.validation().is_some());
    }
}

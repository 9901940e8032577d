//! # Intermediate Representation
//!
//! Immutable values the compiler passes fold over. Each pass takes an
//! [`InstructionSet`] by value and returns a new one.

pub mod instruction;
pub mod instruction_set;
pub mod step;

pub use instruction::Instruction;
pub use instruction_set::InstructionSet;
pub use step::Step;

use irata_spec::{Hdl, StatusId};
use std::collections::BTreeMap;

/// Render a precondition map as `{/path=value, ...}`
pub fn format_statuses(hdl: &Hdl, statuses: &BTreeMap<StatusId, bool>) -> String {
    let parts: Vec<String> = statuses
        .iter()
        .map(|(&status, value)| format!("{}={}", hdl.status_path(status), value))
        .collect();
    format!("{{{}}}", parts.join(", "))
}

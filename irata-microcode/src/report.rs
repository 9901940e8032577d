//! Instruction set statistics.

use crate::ir::InstructionSet;
use crate::table::Table;
use irata_spec::{Hdl, StructuralError, TickPhase};
use std::collections::BTreeMap;
use std::fmt;

/// Counts over an IR instruction set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileReport {
    /// Distinct descriptors
    pub instructions: usize,
    pub variants: usize,
    pub steps: usize,
    /// Control assertions summed over every step
    pub assertions: usize,
    pub assertions_per_phase: BTreeMap<TickPhase, usize>,
}

impl CompileReport {
    pub fn from_ir(hdl: &Hdl, ir: &InstructionSet) -> Result<Self, StructuralError> {
        let mut report = Self {
            instructions: ir.descriptors().len(),
            variants: ir.len(),
            steps: ir.step_count(),
            ..Self::default()
        };
        for phase in TickPhase::ALL {
            report.assertions_per_phase.insert(phase, 0);
        }
        for instruction in ir.iter() {
            for step in instruction.steps() {
                for &control in step.controls() {
                    let phase = hdl.control(control)?.phase();
                    *report.assertions_per_phase.entry(phase).or_default() += 1;
                    report.assertions += 1;
                }
            }
        }
        Ok(report)
    }

    /// Steps saved going from `self` to `after`, as a fraction of `self`
    pub fn step_reduction(&self, after: &CompileReport) -> f64 {
        if self.steps == 0 {
            return 0.0;
        }
        (self.steps.saturating_sub(after.steps)) as f64 / self.steps as f64
    }
}

impl fmt::Display for CompileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "instructions: {}", self.instructions)?;
        writeln!(f, "variants:     {}", self.variants)?;
        writeln!(f, "steps:        {}", self.steps)?;
        writeln!(f, "assertions:   {}", self.assertions)?;
        for (phase, count) in &self.assertions_per_phase {
            writeln!(f, "  {:<8} {}", phase.name(), count)?;
        }
        Ok(())
    }
}

/// One line per table entry: `opcode step {statuses} [controls]`, by path
pub fn dump_table(hdl: &Hdl, table: &Table) -> String {
    let mut out = String::new();
    for entry in table.entries() {
        let controls: Vec<String> = entry
            .controls
            .iter()
            .map(|&control| hdl.control_path(control))
            .collect();
        out.push_str(&format!(
            "{:#04x} {:<16} {:>2} {} [{}]\n",
            entry.descriptor.opcode,
            entry.descriptor.to_string(),
            entry.step_index,
            crate::ir::format_statuses(hdl, &entry.statuses),
            controls.join(" ")
        ));
    }
    out
}

//! Control and status lines.

use crate::error::Result;
use irata_spec::{ControlId, Hdl, StatusId, StructuralError};

/// Asserted state of every control line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlLines {
    asserted: Vec<bool>,
    auto_clear: Vec<bool>,
}

impl ControlLines {
    pub fn from_hdl(hdl: &Hdl) -> Self {
        Self {
            asserted: vec![false; hdl.controls().len()],
            auto_clear: hdl.controls().iter().map(|c| c.auto_clear).collect(),
        }
    }

    pub fn is_asserted(&self, control: ControlId) -> bool {
        self.asserted.get(control.index()).copied().unwrap_or(false)
    }

    pub fn set(&mut self, control: ControlId, asserted: bool) -> Result<()> {
        let line = self
            .asserted
            .get_mut(control.index())
            .ok_or(StructuralError::UnknownControl(control.0))?;
        *line = asserted;
        Ok(())
    }

    pub fn asserted(&self) -> impl Iterator<Item = ControlId> + '_ {
        self.asserted
            .iter()
            .enumerate()
            .filter(|(_, on)| **on)
            .map(|(index, _)| ControlId(index as u16))
    }

    /// De-assert every auto-clear line
    pub fn clear_auto(&mut self) {
        for (line, &auto) in self.asserted.iter_mut().zip(&self.auto_clear) {
            if auto {
                *line = false;
            }
        }
    }
}

/// Status line values with staged writes
///
/// Writes made during a phase become visible only after [`StatusLines::commit`],
/// which the simulator calls at the end of every phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLines {
    values: Vec<bool>,
    staged: Vec<(StatusId, bool)>,
}

impl StatusLines {
    pub fn from_hdl(hdl: &Hdl) -> Self {
        Self {
            values: vec![false; hdl.statuses().len()],
            staged: Vec::new(),
        }
    }

    pub fn get(&self, status: StatusId) -> bool {
        self.values.get(status.index()).copied().unwrap_or(false)
    }

    pub fn stage(&mut self, status: StatusId, value: bool) -> Result<()> {
        if status.index() >= self.values.len() {
            return Err(StructuralError::UnknownStatus(status.0).into());
        }
        self.staged.push((status, value));
        Ok(())
    }

    pub fn commit(&mut self) {
        for (status, value) in self.staged.drain(..) {
            self.values[status.index()] = value;
        }
    }
}

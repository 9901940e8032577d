//! # Control Table
//!
//! The compiled artifact. Each [`Entry`] maps one (descriptor, step index,
//! status assignment) key to the controls asserted on that tick. Keys are
//! unique; a status missing from an entry's assignment is don't-care.
//!
//! The table serializes with bincode. Entries are kept sorted, so two
//! compilations of the same instruction set produce identical bytes and the
//! same SHA-256 fingerprint.

use crate::error::{CompileError, Result};
use crate::ir::InstructionSet;
use irata_spec::{ControlId, Descriptor, StatusId};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};

/// One compiled table row
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Entry {
    pub descriptor: Descriptor,
    pub step_index: u8,
    pub statuses: BTreeMap<StatusId, bool>,
    pub controls: BTreeSet<ControlId>,
}

impl Entry {
    /// Whether the status lines satisfy this entry's preconditions
    pub fn matches(&self, status: impl Fn(StatusId) -> bool) -> bool {
        self.statuses
            .iter()
            .all(|(&id, &expected)| status(id) == expected)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    entries: Vec<Entry>,
    /// (opcode, step index) -> positions in `entries`
    index: BTreeMap<(u8, u8), Vec<usize>>,
}

impl Table {
    /// Emit one entry per step of every variant
    pub fn lower(ir: &InstructionSet) -> Result<Self> {
        let mut entries = Vec::with_capacity(ir.step_count());
        for instruction in ir.iter() {
            let steps = instruction.steps();
            if steps.len() > usize::from(u8::MAX) + 1 {
                return Err(CompileError::StepIndexOverflow {
                    descriptor: instruction.descriptor().to_string(),
                    steps: steps.len(),
                });
            }
            for (step_index, step) in steps.iter().enumerate() {
                entries.push(Entry {
                    descriptor: instruction.descriptor().clone(),
                    step_index: step_index as u8,
                    statuses: instruction.statuses().clone(),
                    controls: step.controls().clone(),
                });
            }
        }
        Self::from_entries(entries)
    }

    /// Build a table, rejecting repeated keys
    pub fn from_entries(entries: impl IntoIterator<Item = Entry>) -> Result<Self> {
        let mut sorted: BTreeSet<Entry> = BTreeSet::new();
        let mut keys: BTreeSet<(Descriptor, u8, BTreeMap<StatusId, bool>)> = BTreeSet::new();
        for entry in entries {
            let key = (entry.descriptor.clone(), entry.step_index, entry.statuses.clone());
            if !keys.insert(key) {
                return Err(CompileError::DuplicateEntry {
                    descriptor: entry.descriptor.to_string(),
                    step_index: entry.step_index,
                    statuses: format_status_ids(&entry.statuses),
                });
            }
            sorted.insert(entry);
        }

        let entries: Vec<Entry> = sorted.into_iter().collect();
        let mut index: BTreeMap<(u8, u8), Vec<usize>> = BTreeMap::new();
        for (position, entry) in entries.iter().enumerate() {
            index
                .entry((entry.descriptor.opcode, entry.step_index))
                .or_default()
                .push(position);
        }
        Ok(Self { entries, index })
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry for `opcode` at `step_index` whose preconditions hold
    pub fn lookup(&self, opcode: u8, step_index: u8, status: impl Fn(StatusId) -> bool) -> Option<&Entry> {
        self.index
            .get(&(opcode, step_index))?
            .iter()
            .map(|&position| &self.entries[position])
            .find(|entry| entry.matches(&status))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(&self.entries)?)
    }

    /// Decode a serialized table and re-check key uniqueness
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let entries: Vec<Entry> = bincode::deserialize(bytes)?;
        Self::from_entries(entries)
    }

    /// SHA-256 of the serialized table
    pub fn fingerprint(&self) -> Result<[u8; 32]> {
        let bytes = self.to_bytes()?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(hasher.finalize().into())
    }

    pub fn fingerprint_hex(&self) -> Result<String> {
        Ok(self
            .fingerprint()?
            .iter()
            .map(|byte| format!("{:02x}", byte))
            .collect())
    }
}

fn format_status_ids(statuses: &BTreeMap<StatusId, bool>) -> String {
    let parts: Vec<String> = statuses
        .iter()
        .map(|(status, value)| format!("status {}={}", status, value))
        .collect();
    format!("{{{}}}", parts.join(", "))
}

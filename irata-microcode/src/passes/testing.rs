//! Small two-register machine for exercising passes in isolation.

use super::PassContext;
use crate::ir::{Instruction, Step};
use irata_spec::{
    AddressingMode, BusId, BusWidth, Catalog, ControlId, ControlKind, Descriptor, Hdl, HdlBuilder,
    StatusId, StepIndexControls,
};
use std::collections::BTreeMap;

pub(crate) struct Fixture {
    pub hdl: Hdl,
    pub catalog: Catalog,
    pub bus: BusId,
    pub a_write: ControlId,
    pub a_read: ControlId,
    pub b_write: ControlId,
    pub b_read: ControlId,
    /// Process-phase control on `reg_a`
    pub tick: ControlId,
    /// Clear-phase control on `reg_b`
    pub latch: ControlId,
    pub carry: StatusId,
    pub zero: StatusId,
    pub step_index: StepIndexControls,
}

impl Fixture {
    pub fn new() -> Self {
        let mut b = HdlBuilder::new();
        let bus = b.bus("bus", BusWidth::Byte).unwrap();
        let reg_a = b.component(b.root(), "reg_a").unwrap();
        let reg_b = b.component(b.root(), "reg_b").unwrap();
        let counter = b.component(b.root(), "step_counter").unwrap();
        let a_write = b.control(reg_a, "write", ControlKind::BusWrite(bus)).unwrap();
        let a_read = b.control(reg_a, "read", ControlKind::BusRead(bus)).unwrap();
        let b_write = b.control(reg_b, "write", ControlKind::BusWrite(bus)).unwrap();
        let b_read = b.control(reg_b, "read", ControlKind::BusRead(bus)).unwrap();
        let tick = b.control(reg_a, "tick", ControlKind::Process).unwrap();
        let latch = b.control(reg_b, "latch", ControlKind::Clear).unwrap();
        let step_index = StepIndexControls {
            increment: b.control(counter, "increment", ControlKind::Process).unwrap(),
            reset: b.control(counter, "reset", ControlKind::Process).unwrap(),
        };
        let carry = b.status(b.root(), "carry").unwrap();
        let zero = b.status(b.root(), "zero").unwrap();

        let catalog = Catalog::new(vec![
            Descriptor::new(0x01, "nop", AddressingMode::None, "No operation"),
            Descriptor::new(0x02, "tab", AddressingMode::None, "Transfer A to B"),
            Descriptor::new(0x03, "bcs", AddressingMode::Absolute, "Branch on carry"),
        ])
        .unwrap();

        Self {
            hdl: b.build(),
            catalog,
            bus,
            a_write,
            a_read,
            b_write,
            b_read,
            tick,
            latch,
            carry,
            zero,
            step_index,
        }
    }

    pub fn ctx(&self) -> PassContext<'_> {
        PassContext {
            hdl: &self.hdl,
            catalog: &self.catalog,
            step_index: self.step_index,
        }
    }

    pub fn descriptor(&self, name: &str) -> Descriptor {
        self.catalog
            .iter()
            .find(|d| d.name == name)
            .cloned()
            .unwrap()
    }

    /// A variant whose steps are all in stage 0
    pub fn variant(&self, name: &str, statuses: &[(StatusId, bool)], steps: &[&[ControlId]]) -> Instruction {
        self.staged(name, statuses, &steps.iter().map(|s| (0u8, *s)).collect::<Vec<_>>())
    }

    pub fn staged(&self, name: &str, statuses: &[(StatusId, bool)], steps: &[(u8, &[ControlId])]) -> Instruction {
        Instruction::new(
            self.descriptor(name),
            statuses.iter().copied().collect::<BTreeMap<_, _>>(),
            steps
                .iter()
                .map(|(stage, controls)| Step::new(*stage, controls.iter().copied(), []))
                .collect(),
        )
    }
}

//! Compiler pipeline tests
//!
//! Runs DSL instruction sets through the full pipeline, both on small
//! hand-declared machines and on the complete Irata instruction set.

use irata_microcode::dsl::{self, IrataSteps};
use irata_microcode::{CompileError, Compiler, Pass, Table, ValidationError};
use irata_spec::{
    AddressingMode, Catalog, ControlKind, Descriptor, HdlBuilder, Hdl, IrataDecl,
    StatusId, StepIndexControls,
};

struct Machine {
    hdl: Hdl,
    step_index: StepIndexControls,
    carry: StatusId,
    tick: irata_spec::ControlId,
}

fn machine() -> Machine {
    let mut b = HdlBuilder::new();
    let counter = b.component(b.root(), "step_counter").unwrap();
    let step_index = StepIndexControls {
        increment: b.control(counter, "increment", ControlKind::Process).unwrap(),
        reset: b.control(counter, "reset", ControlKind::Process).unwrap(),
    };
    let tick = b.control(b.root(), "tick", ControlKind::Process).unwrap();
    let carry = b.status(b.root(), "carry").unwrap();
    Machine {
        hdl: b.build(),
        step_index,
        carry,
        tick,
    }
}

fn nop() -> Descriptor {
    Descriptor::new(0x01, "nop", AddressingMode::None, "No operation")
}

fn bcs() -> Descriptor {
    Descriptor::new(0x03, "bcs", AddressingMode::Absolute, "Branch on carry")
}

fn irata() -> (IrataDecl, Catalog) {
    (IrataDecl::build().unwrap(), Catalog::irata().unwrap())
}

// ============================================================================
// Small Machine Scenarios
// ============================================================================

#[test]
fn test_nop_compiles_to_single_entry() {
    let m = machine();
    let catalog = Catalog::new([nop()]).unwrap();
    let mut set = dsl::InstructionSet::new();
    set.create_instruction(nop()).with_control(m.step_index.reset);

    let table = Compiler::new(&m.hdl, &catalog, m.step_index).compile(&set).unwrap();
    assert_eq!(table.len(), 1);
    let entry = &table.entries()[0];
    assert_eq!(entry.step_index, 0);
    assert_eq!(entry.descriptor, nop());
    assert_eq!(entry.controls, [m.step_index.reset].into());
}

#[test]
fn test_carry_branch_completeness() {
    let m = machine();
    let catalog = Catalog::new([bcs()]).unwrap();
    let compiler = Compiler::new(&m.hdl, &catalog, m.step_index);

    let mut set = dsl::InstructionSet::new();
    set.create_instruction(bcs())
        .with_status(m.carry, true)
        .next_stage()
        .with_control(m.tick);
    set.create_instruction(bcs())
        .with_status(m.carry, false)
        .next_stage()
        .create_step();
    let table = compiler.compile(&set).unwrap();
    assert_eq!(table.len(), 2);

    set.retain(|instruction| instruction.statuses().get(&m.carry) == Some(&true));
    let err = compiler.compile(&set).unwrap_err();
    assert!(matches!(
        err,
        CompileError::Validation {
            pass: Pass::StatusCompletenessValidator,
            source: ValidationError::IncompleteStatus { ref status, missing: false, .. },
        } if status == "/carry"
    ));
    assert!(err.to_string().contains("carry"));
}

#[test]
fn test_status_table_entries_select_by_carry() {
    let m = machine();
    let catalog = Catalog::new([bcs()]).unwrap();
    let mut set = dsl::InstructionSet::new();
    set.create_instruction(bcs())
        .with_status(m.carry, true)
        .next_stage()
        .with_control(m.tick);
    set.create_instruction(bcs())
        .with_status(m.carry, false)
        .next_stage()
        .create_step();
    let table = Compiler::new(&m.hdl, &catalog, m.step_index).compile(&set).unwrap();

    let taken = table.lookup(0x03, 0, |status| status == m.carry).unwrap();
    assert!(taken.controls.contains(&m.tick));
    let skipped = table.lookup(0x03, 0, |_| false).unwrap();
    assert!(!skipped.controls.contains(&m.tick));
}

#[test]
fn test_unstaged_branch_arms_are_fetch_divergence() {
    let m = machine();
    let catalog = Catalog::new([bcs()]).unwrap();
    let mut set = dsl::InstructionSet::new();
    // Without next_stage both arms sit entirely in the fetch stage
    set.create_instruction(bcs())
        .with_status(m.carry, true)
        .with_control(m.tick);
    set.create_instruction(bcs())
        .with_status(m.carry, false)
        .create_step();
    let err = Compiler::new(&m.hdl, &catalog, m.step_index).compile(&set).unwrap_err();
    assert!(matches!(
        err,
        CompileError::Validation {
            pass: Pass::FetchStageValidator,
            source: ValidationError::FetchStageMismatch { ref preconditions, step: 0, .. },
        } if preconditions == "{/carry=true}"
    ));
}

#[test]
fn test_empty_instruction_rejected() {
    let m = machine();
    let catalog = Catalog::new([nop()]).unwrap();
    let mut set = dsl::InstructionSet::new();
    set.create_instruction(nop());
    let err = Compiler::new(&m.hdl, &catalog, m.step_index).compile(&set).unwrap_err();
    assert_eq!(
        err.to_string(),
        "StepIndexValidator failed: Instruction nop (none) has no steps"
    );
}

#[test]
fn test_dangling_status_is_structural() {
    let m = machine();
    let catalog = Catalog::new([nop()]).unwrap();
    let mut set = dsl::InstructionSet::new();
    set.create_instruction(nop())
        .with_status(StatusId(77), true)
        .create_step();
    let err = Compiler::new(&m.hdl, &catalog, m.step_index).compile(&set).unwrap_err();
    assert!(matches!(err, CompileError::Structural(_)));
}

// ============================================================================
// Irata Instruction Set
// ============================================================================

#[test]
fn test_irata_table_covers_catalog() {
    let (hw, catalog) = irata();
    let table = irata_microcode::compile_irata(&hw, &catalog).unwrap();
    for descriptor in catalog.iter() {
        assert!(
            table.lookup(descriptor.opcode, 0, |_| false).is_some(),
            "no entry for {}",
            descriptor
        );
    }
}

#[test]
fn test_removing_instruction_names_descriptor() {
    let (hw, catalog) = irata();
    let mut set = dsl::irata::build(&hw, &catalog).unwrap();
    set.retain(|instruction| {
        let d = instruction.descriptor();
        !(d.name == "lda" && d.mode == AddressingMode::Immediate)
    });
    let err = Compiler::for_irata(&hw, &catalog).validate(&set).unwrap_err();
    assert_eq!(
        err,
        ValidationError::MissingInstructions {
            missing: vec!["lda (immediate)".to_string()],
        }
    );
}

#[test]
fn test_lda_immediate_merged_steps() {
    let (hw, catalog) = irata();
    let set = dsl::irata::build(&hw, &catalog).unwrap();
    let ir = Compiler::for_irata(&hw, &catalog).compile_to_ir(&set).unwrap();
    let lda = catalog.require("lda", AddressingMode::Immediate).unwrap();
    let variant = ir.variants(lda).next().unwrap();
    // fetch (2) + [pc.w mar.r] + [mem.w a.r pc.inc reset]
    assert_eq!(variant.steps().len(), 4);
    let last = variant.steps().last().unwrap();
    assert!(last.contains(hw.memory.port.write));
    assert!(last.contains(hw.cpu.a.port.read));
    assert!(last.contains(hw.cpu.pc.increment.unwrap()));
    assert!(last.contains(hw.step_index().reset));
}

#[test]
fn test_adc_immediate_merged_steps() {
    let (hw, catalog) = irata();
    let set = dsl::irata::build(&hw, &catalog).unwrap();
    let ir = Compiler::for_irata(&hw, &catalog).compile_to_ir(&set).unwrap();
    let adc = catalog.require("adc", AddressingMode::Immediate).unwrap();
    let steps = ir.variants(adc).next().unwrap().steps();
    let alu = &hw.cpu.alu;
    assert_eq!(steps.len(), 6);
    assert!(steps[3].contains(alu.rhs.port.read));
    assert!(steps[4].contains(alu.lhs.port.read));
    assert!(steps[4].contains(alu.op(irata_spec::AluOpcode::Add)));
    assert!(steps[4].contains(hw.cpu.status_register.latch));
    assert!(steps[5].contains(alu.result.port.write));
    assert!(steps[5].contains(hw.cpu.a.port.read));
}

#[test]
fn test_fetch_divergence_rejected() {
    let (hw, catalog) = irata();
    let mut set = dsl::irata::build(&hw, &catalog).unwrap();
    set.retain(|instruction| instruction.descriptor().name != "nop");
    // nop without the fetch prefix
    set.create_instruction(catalog.require("nop", AddressingMode::None).unwrap().clone())
        .create_step();
    let err = Compiler::for_irata(&hw, &catalog).validate(&set).unwrap_err();
    assert!(matches!(err, ValidationError::FetchStageMismatch { .. }));
}

#[test]
fn test_unread_bus_names_bus() {
    let (hw, catalog) = irata();
    let mut set = dsl::irata::build(&hw, &catalog).unwrap();
    set.retain(|instruction| instruction.descriptor().name != "tax");
    dsl::irata::create_instruction(&mut set, &hw, &catalog, "tax", AddressingMode::None)
        .unwrap()
        .with_control(hw.cpu.a.port.write);
    let err = Compiler::for_irata(&hw, &catalog).compile(&set).unwrap_err();
    let source = err.validation().unwrap();
    assert!(matches!(
        source,
        ValidationError::BusNotRead { descriptor, bus, .. }
            if descriptor == "tax (none)" && bus == "/data_bus"
    ));
}

#[test]
fn test_compile_reported_pass_names() {
    let (hw, catalog) = irata();
    let compiler = Compiler::for_irata(&hw, &catalog);
    let names: Vec<&str> = compiler.pipeline().iter().map(Pass::name).collect();
    assert_eq!(
        names,
        vec![
            "BusValidator",
            "FetchStageValidator",
            "InstructionCoverageValidator",
            "StepIndexTransformer",
            "StepIndexValidator",
            "StatusCompletenessValidator",
            "StepMerger",
        ]
    );
}

#[test]
fn test_table_bytes_round_trip() {
    let (hw, catalog) = irata();
    let table = irata_microcode::compile_irata(&hw, &catalog).unwrap();
    let decoded = Table::from_bytes(&table.to_bytes().unwrap()).unwrap();
    assert_eq!(decoded, table);
    assert_eq!(decoded.fingerprint().unwrap(), table.fingerprint().unwrap());
}

#[test]
fn test_helpers_chain_on_instruction() {
    let (hw, catalog) = irata();
    let mut set = dsl::InstructionSet::new();
    set.create_instruction(catalog.require("sta", AddressingMode::Absolute).unwrap().clone())
        .fetch(&hw)
        .indirect_write_memory_at_pc(&hw, &hw.cpu.a);
    let steps = set.instructions()[0].steps();
    assert!(steps.last().unwrap().controls().contains(&hw.memory.port.read));
}

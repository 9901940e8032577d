//! # Compiler
//!
//! Drives an instruction set through the fixed pass pipeline and lowers the
//! result into a [`Table`]. The first failing pass aborts compilation; no
//! partial table is ever produced.

use crate::dsl;
use crate::error::{CompileError, Result, ValidationError};
use crate::ir::InstructionSet;
use crate::passes::{Pass, PassContext, PIPELINE, VALIDATION_PASSES};
use crate::table::Table;
use irata_spec::{Catalog, Hdl, IrataDecl, StepIndexControls};

/// Compiles DSL instruction sets against one hardware declaration and catalog
#[derive(Debug, Clone, Copy)]
pub struct Compiler<'a> {
    hdl: &'a Hdl,
    catalog: &'a Catalog,
    step_index: StepIndexControls,
}

impl<'a> Compiler<'a> {
    pub fn new(hdl: &'a Hdl, catalog: &'a Catalog, step_index: StepIndexControls) -> Self {
        Self {
            hdl,
            catalog,
            step_index,
        }
    }

    pub fn for_irata(hw: &'a IrataDecl, catalog: &'a Catalog) -> Self {
        Self::new(hw.hdl(), catalog, hw.step_index())
    }

    /// Passes in the order [`Compiler::compile`] runs them
    pub fn pipeline(&self) -> &'static [Pass] {
        &PIPELINE
    }

    pub fn hdl(&self) -> &'a Hdl {
        self.hdl
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    fn context(&self) -> PassContext<'a> {
        PassContext {
            hdl: self.hdl,
            catalog: self.catalog,
            step_index: self.step_index,
        }
    }

    /// Run the structural and coverage validators only
    pub fn validate(&self, set: &dsl::InstructionSet) -> std::result::Result<(), ValidationError> {
        let mut ir = InstructionSet::from_dsl(set, self.hdl)?;
        let ctx = self.context();
        for pass in VALIDATION_PASSES {
            ir = pass.run(&ctx, ir)?;
        }
        Ok(())
    }

    /// Run the full pipeline, stopping before lowering
    pub fn compile_to_ir(&self, set: &dsl::InstructionSet) -> Result<InstructionSet> {
        let ir = InstructionSet::from_dsl(set, self.hdl)?;
        self.run_passes(&PIPELINE, ir)
    }

    /// Run `passes` in order over an IR value
    pub fn run_passes(&self, passes: &[Pass], mut ir: InstructionSet) -> Result<InstructionSet> {
        let ctx = self.context();
        for &pass in passes {
            ir = pass
                .run(&ctx, ir)
                .map_err(|source| CompileError::Validation { pass, source })?;
            tracing::debug!(
                "{}: {} variants, {} steps",
                pass,
                ir.len(),
                ir.step_count()
            );
        }
        Ok(ir)
    }

    pub fn compile(&self, set: &dsl::InstructionSet) -> Result<Table> {
        let ir = self.compile_to_ir(set)?;
        let table = Table::lower(&ir)?;
        tracing::debug!("Lowered {} table entries", table.len());
        Ok(table)
    }
}

/// Build and compile the complete Irata instruction set
pub fn compile_irata(hw: &IrataDecl, catalog: &Catalog) -> Result<Table> {
    let set = dsl::irata::build(hw, catalog)?;
    Compiler::for_irata(hw, catalog).compile(&set)
}

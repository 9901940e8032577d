//! # Irata Microcode
//!
//! Microcode compiler for the Irata CPU.
//!
//! ## Overview
//!
//! - **DSL**: fluent builder for instruction variants and their steps
//! - **IR**: ordered, immutable instruction sets the passes fold over
//! - **Passes**: bus, fetch stage, coverage, step index, status completeness
//!   and step merging, run in a fixed order
//! - **Table**: the compiled (descriptor, step index, statuses) -> controls map
//!
//! ## Example
//!
//! ```rust
//! use irata_microcode::compile_irata;
//! use irata_spec::{Catalog, IrataDecl};
//!
//! let hw = IrataDecl::build().unwrap();
//! let catalog = Catalog::irata().unwrap();
//! let table = compile_irata(&hw, &catalog).unwrap();
//!
//! let lda = catalog.by_opcode(0x10).unwrap();
//! assert!(table.entries().iter().any(|e| &e.descriptor == lda));
//! ```

pub mod compiler;
pub mod dsl;
pub mod error;
pub mod ir;
pub mod passes;
pub mod report;
pub mod table;

pub use compiler::{compile_irata, Compiler};
pub use error::{CompileError, Result, ValidationError};
pub use passes::{Pass, PassContext, PIPELINE, VALIDATION_PASSES};
pub use report::{dump_table, CompileReport};
pub use table::{Entry, Table};

//! # Instruction DSL
//!
//! A fluent builder for microcode. An [`InstructionSet`] owns
//! [`Instruction`] variants, each owning its [`Step`]s. Nothing is validated
//! while building; conversion to IR and the compiler passes do that.
//!
//! ```rust
//! use irata_microcode::dsl::InstructionSet;
//! use irata_spec::{AddressingMode, Descriptor, IrataDecl};
//!
//! let hw = IrataDecl::build().unwrap();
//! let mut set = InstructionSet::new();
//! set.create_instruction(Descriptor::new(0x20, "tax", AddressingMode::None, ""))
//!     .copy(&hw.cpu.a, &hw.cpu.x);
//! assert_eq!(set.instructions()[0].steps().len(), 1);
//! ```

pub mod instruction;
pub mod instruction_set;
pub mod irata;
pub mod step;

pub use instruction::Instruction;
pub use instruction_set::InstructionSet;
pub use irata::IrataSteps;
pub use step::Step;

//! # Irata Spec
//!
//! Static declarations for the Irata 8-bit CPU microcode system.
//!
//! ## Overview
//!
//! - **Tick phases**: the five-phase clock cycle every component obeys
//! - **Hardware declarations**: components, buses, controls, and statuses with
//!   typed ids and unique paths
//! - **Irata**: the concrete CPU declaration built on top of the registry
//! - **Descriptors**: assembly instruction identities and the catalog the
//!   microcode must cover
//!
//! ## Example
//!
//! ```rust
//! use irata_spec::{Catalog, IrataDecl, TickPhase};
//!
//! let irata = IrataDecl::build().unwrap();
//! let halt = irata.hdl().control(irata.halt).unwrap();
//! assert_eq!(halt.phase(), TickPhase::Process);
//!
//! let catalog = Catalog::irata().unwrap();
//! assert_eq!(catalog.by_opcode(0x00).unwrap().name, "hlt");
//! ```

pub mod descriptor;
pub mod error;
pub mod hdl;
pub mod irata;
pub mod phase;

pub use descriptor::{AddressingMode, Catalog, Descriptor};
pub use error::{Result, StructuralError};
pub use hdl::{
    BusDecl, BusId, BusWidth, ComponentDecl, ComponentId, ControlDecl, ControlId, ControlKind, Hdl,
    HdlBuilder, PathTarget, StatusDecl, StatusId, StepIndexControls,
};
pub use irata::{
    AluDecl, AluOpcode, BufferDecl, BusConnected, BusPort, ControllerDecl, CpuDecl, FlagStatuses,
    IrataDecl, MemoryDecl, RegisterDecl, StatusRegisterDecl,
};
pub use phase::TickPhase;

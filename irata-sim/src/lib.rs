//! # Irata Simulator
//!
//! Tick-phase execution engine for the Irata 8-bit CPU.
//!
//! ## Features
//!
//! - **Five-phase ticks**: control, write, read, process, clear
//! - **Bus arbitration**: one setter per bus per tick
//! - **Staged status lines**: writes become visible at the next phase barrier
//! - **Atomic ticks**: a failing tick leaves no trace
//! - **Table-driven controller**: runs the compiled microcode table
//!
//! ## Example
//!
//! ```rust
//! use irata_microcode::compile_irata;
//! use irata_sim::{Irata, SimConfig};
//! use irata_spec::{Catalog, IrataDecl};
//! use std::sync::Arc;
//!
//! let hw = IrataDecl::build().unwrap();
//! let catalog = Catalog::irata().unwrap();
//! let table = Arc::new(compile_irata(&hw, &catalog).unwrap());
//!
//! // lda #$42; hlt
//! let mut irata = Irata::new(&hw, table, &[0x10, 0x42, 0x00], SimConfig::default()).unwrap();
//! let result = irata.tick_until_halt().unwrap();
//! assert_eq!(irata.a(), 0x42);
//! println!("Cycles: {}", result.cycles);
//! ```

pub mod alu;
pub mod bus;
pub mod component;
pub mod components;
pub mod config;
pub mod error;
pub mod irata;
pub mod lines;
pub mod simulator;

pub use alu::{compute, AluOutput};
pub use bus::{Bus, Buses};
pub use component::{Checkpoint, Component, TickContext};
pub use config::{ConfigError, SimConfig};
pub use error::{MemoryError, Result, RunError, SimError};
pub use irata::Irata;
pub use simulator::{RunResult, Simulator};

/// Compile the Irata microcode and run `program` to halt
pub fn run(program: &[u8], config: SimConfig) -> std::result::Result<Irata, RunError> {
    let hw = irata_spec::IrataDecl::build().map_err(SimError::from)?;
    let catalog = irata_spec::Catalog::irata().map_err(SimError::from)?;
    let table = irata_microcode::compile_irata(&hw, &catalog)?;
    let mut irata = Irata::new(&hw, std::sync::Arc::new(table), program, config)?;
    irata.tick_until_halt()?;
    Ok(irata)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_helper() {
        // ldx #$05; inx; txa; hlt
        let irata = run(&[0x12, 0x05, 0x24, 0x21, 0x00], SimConfig::default()).unwrap();
        assert_eq!(irata.x(), 0x06);
        assert_eq!(irata.a(), 0x06);
        assert!(irata.is_halted());
    }

    #[test]
    fn test_run_reports_cycle_limit() {
        // jmp $8000
        let config = SimConfig::default().with_max_cycles(100);
        let err = run(&[0x50, 0x80, 0x00], config).unwrap_err();
        assert!(matches!(
            err,
            RunError::Sim(SimError::CycleLimitExceeded { limit: 100 })
        ));
    }
}

//! Tick phases.
//!
//! Every clock cycle advances the whole component tree through the same five
//! phases, in declaration order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One phase of a clock cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TickPhase {
    /// Controller asserts the control lines for this cycle
    Control,
    /// Components push values onto buses
    Write,
    /// Components pull values off buses
    Read,
    /// Local updates: counters, ALU computation
    Process,
    /// Transient state resets to baseline
    Clear,
}

impl TickPhase {
    /// All phases in execution order
    pub const ALL: [TickPhase; 5] = [
        TickPhase::Control,
        TickPhase::Write,
        TickPhase::Read,
        TickPhase::Process,
        TickPhase::Clear,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TickPhase::Control => "control",
            TickPhase::Write => "write",
            TickPhase::Read => "read",
            TickPhase::Process => "process",
            TickPhase::Clear => "clear",
        }
    }
}

impl fmt::Display for TickPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_order() {
        let mut sorted = TickPhase::ALL;
        sorted.sort();
        assert_eq!(sorted, TickPhase::ALL);
        assert!(TickPhase::Write < TickPhase::Read);
        assert!(TickPhase::Process < TickPhase::Clear);
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(TickPhase::Control.to_string(), "control");
        assert_eq!(TickPhase::Clear.to_string(), "clear");
    }
}

//! # Simulator Configuration
//!
//! Memory map and run limits. RAM is mapped at address zero; ROM holds the
//! program and is mapped at `rom_base`.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SimConfig {
    /// Ticks before `tick_until_halt` gives up
    pub max_cycles: u64,
    pub ram_size: usize,
    pub rom_base: u16,
    pub rom_size: usize,
    /// Initial program counter
    pub entry_point: u16,
}

impl SimConfig {
    pub const DEFAULT: Self = Self {
        max_cycles: 1_000_000,
        ram_size: 0x2000,
        rom_base: 0x8000,
        rom_size: 0x8000,
        entry_point: 0x8000,
    };

    pub fn with_max_cycles(self, max_cycles: u64) -> Self {
        Self { max_cycles, ..self }
    }

    fn rom_end(&self) -> usize {
        usize::from(self.rom_base) + self.rom_size
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.ram_size.is_power_of_two() {
            return Err(ConfigError::InvalidRamSize { size: self.ram_size });
        }
        if !self.rom_size.is_power_of_two() {
            return Err(ConfigError::InvalidRomSize { size: self.rom_size });
        }
        if self.ram_size > usize::from(self.rom_base) {
            return Err(ConfigError::RamOverlapsRom {
                ram_size: self.ram_size,
                rom_base: self.rom_base,
            });
        }
        if self.rom_end() > 0x1_0000 {
            return Err(ConfigError::RomOutsideAddressSpace {
                rom_base: self.rom_base,
                rom_size: self.rom_size,
            });
        }
        let entry = usize::from(self.entry_point);
        if entry < usize::from(self.rom_base) || entry >= self.rom_end() {
            return Err(ConfigError::EntryPointOutsideRom {
                entry_point: self.entry_point,
            });
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// RAM size must be a non-zero power of two
    InvalidRamSize { size: usize },
    /// ROM size must be a non-zero power of two
    InvalidRomSize { size: usize },
    RamOverlapsRom { ram_size: usize, rom_base: u16 },
    /// ROM must end at or below 0x10000
    RomOutsideAddressSpace { rom_base: u16, rom_size: usize },
    EntryPointOutsideRom { entry_point: u16 },
    ProgramTooLarge { len: usize, rom_size: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidRamSize { size } => {
                write!(f, "ram_size {:#x} must be a non-zero power of two", size)
            }
            ConfigError::InvalidRomSize { size } => {
                write!(f, "rom_size {:#x} must be a non-zero power of two", size)
            }
            ConfigError::RamOverlapsRom { ram_size, rom_base } => {
                write!(f, "ram_size {:#x} overlaps ROM at {:#06x}", ram_size, rom_base)
            }
            ConfigError::RomOutsideAddressSpace { rom_base, rom_size } => {
                write!(
                    f,
                    "ROM at {:#06x} of {:#x} bytes exceeds the 16-bit address space",
                    rom_base, rom_size
                )
            }
            ConfigError::EntryPointOutsideRom { entry_point } => {
                write!(f, "entry_point {:#06x} is outside ROM", entry_point)
            }
            ConfigError::ProgramTooLarge { len, rom_size } => {
                write!(f, "program of {} bytes does not fit in {:#x} bytes of ROM", len, rom_size)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

//! # Memory
//!
//! A memory address register plus a list of mapped regions. Reads and
//! writes in a tick use the address held at the start of that tick; an
//! address loaded or incremented in the same tick takes effect next tick.
//!
//! RAM writes made during a tick are journaled so a failed tick can be
//! undone without copying the regions.

use super::register::WordRegister;
use crate::component::{Checkpoint, Component, TickContext};
use crate::error::{MemoryError, Result};
use irata_spec::{BusPort, ControlId, MemoryDecl, TickPhase};
use std::any::Any;
use std::sync::Arc;

/// A block of the address space
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Region {
    Ram { base: u16, data: Vec<u8> },
    /// Contents are shared between clones; nothing can write them
    Rom { base: u16, data: Arc<[u8]> },
}

fn check_size(size: usize) -> std::result::Result<(), MemoryError> {
    if size.is_power_of_two() {
        Ok(())
    } else {
        Err(MemoryError::InvalidSize { size })
    }
}

impl Region {
    pub fn ram(base: u16, size: usize) -> std::result::Result<Self, MemoryError> {
        check_size(size)?;
        Ok(Region::Ram {
            base,
            data: vec![0; size],
        })
    }

    pub fn rom(base: u16, data: Vec<u8>) -> std::result::Result<Self, MemoryError> {
        check_size(data.len())?;
        Ok(Region::Rom {
            base,
            data: data.into(),
        })
    }

    pub fn base(&self) -> u16 {
        match self {
            Region::Ram { base, .. } | Region::Rom { base, .. } => *base,
        }
    }

    pub fn size(&self) -> usize {
        match self {
            Region::Ram { data, .. } => data.len(),
            Region::Rom { data, .. } => data.len(),
        }
    }

    pub fn contains(&self, address: u16) -> bool {
        let base = usize::from(self.base());
        let address = usize::from(address);
        address >= base && address < base + self.size()
    }

    pub fn read(&self, offset: usize) -> std::result::Result<u8, MemoryError> {
        let data: &[u8] = match self {
            Region::Ram { data, .. } => data,
            Region::Rom { data, .. } => data,
        };
        data.get(offset).copied().ok_or(MemoryError::OutOfRange {
            offset,
            size: data.len(),
        })
    }

    pub fn write(&mut self, offset: usize, value: u8) -> std::result::Result<(), MemoryError> {
        match self {
            Region::Ram { data, .. } => {
                let size = data.len();
                let slot = data
                    .get_mut(offset)
                    .ok_or(MemoryError::OutOfRange { offset, size })?;
                *slot = value;
                Ok(())
            }
            Region::Rom { base, .. } => Err(MemoryError::ReadOnly {
                address: base.wrapping_add(offset as u16),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory {
    path: String,
    port: BusPort,
    address: WordRegister,
    regions: Vec<Region>,
    /// Address register value at the last checkpoint
    saved_address: u16,
    /// `(address, previous value)` for each RAM write since the checkpoint
    journal: Vec<(u16, u8)>,
}

impl Memory {
    pub fn new(decl: &MemoryDecl, regions: Vec<Region>) -> Self {
        Self {
            path: decl.path.clone(),
            port: decl.port,
            address: WordRegister::new(&decl.address),
            regions,
            saved_address: 0,
            journal: Vec::new(),
        }
    }

    /// Current memory address register value
    pub fn address(&self) -> u16 {
        self.address.value()
    }

    pub fn set_address(&mut self, address: u16) {
        self.address.set_value(address);
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    fn region_index(&self, address: u16) -> std::result::Result<usize, MemoryError> {
        self.regions
            .iter()
            .position(|region| region.contains(address))
            .ok_or(MemoryError::Unmapped { address })
    }

    pub fn read(&self, address: u16) -> std::result::Result<u8, MemoryError> {
        let region = &self.regions[self.region_index(address)?];
        region.read(usize::from(address - region.base()))
    }

    pub fn write(&mut self, address: u16, value: u8) -> std::result::Result<(), MemoryError> {
        let index = self.region_index(address)?;
        let region = &mut self.regions[index];
        let offset = usize::from(address - region.base());
        region.write(offset, value)
    }
}

impl Component for Memory {
    fn path(&self) -> &str {
        &self.path
    }

    fn controls(&self) -> Vec<ControlId> {
        let mut controls = vec![self.port.write, self.port.read];
        controls.extend(self.address.claimed());
        controls
    }

    fn participates(&self, phase: TickPhase) -> bool {
        matches!(phase, TickPhase::Write | TickPhase::Read | TickPhase::Process)
    }

    fn tick(&mut self, ctx: &mut TickContext<'_>) -> Result<()> {
        let address = self.address.value();
        match ctx.phase {
            TickPhase::Write if ctx.is_asserted(self.port.write) => {
                let value = self.read(address)?;
                ctx.write_bus(self.port.bus, u16::from(value), &self.path)?;
            }
            TickPhase::Read if ctx.is_asserted(self.port.read) => {
                let value = ctx.read_bus(self.port.bus, &self.path)? as u8;
                let previous = self.read(address)?;
                self.write(address, value)?;
                self.journal.push((address, previous));
            }
            _ => {}
        }
        self.address.step(ctx)
    }

    fn box_clone(&self) -> Box<dyn Component> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn checkpoint(&mut self) -> Checkpoint {
        self.saved_address = self.address.value();
        self.journal.clear();
        Checkpoint::Journal
    }

    fn rollback(&mut self) {
        while let Some((address, previous)) = self.journal.pop() {
            // Same address was written successfully this tick
            let _ = self.write(address, previous);
        }
        self.address.set_value(self.saved_address);
    }

    fn commit(&mut self) {
        self.journal.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::testing::Bench;
    use crate::components::Register;
    use crate::error::SimError;
    use irata_spec::IrataDecl;

    fn memory(hw: &IrataDecl) -> Memory {
        let mut rom = vec![0; 0x100];
        rom[0] = 0xaa;
        rom[1] = 0xbb;
        Memory::new(
            &hw.memory,
            vec![
                Region::ram(0x0000, 0x100).unwrap(),
                Region::rom(0x8000, rom).unwrap(),
            ],
        )
    }

    #[test]
    fn test_rom_out_of_range_and_read_only() {
        let rom = Region::rom(0x8000, vec![0x11; 0x10]).unwrap();
        assert_eq!(rom.read(0x0f), Ok(0x11));
        assert_eq!(
            rom.read(0x10),
            Err(MemoryError::OutOfRange {
                offset: 0x10,
                size: 0x10,
            })
        );

        let mut rom = rom;
        assert_eq!(rom.write(0, 1), Err(MemoryError::ReadOnly { address: 0x8000 }));
        assert_eq!(rom.write(0x20, 1), Err(MemoryError::ReadOnly { address: 0x8020 }));
    }

    #[test]
    fn test_region_sizes() {
        assert_eq!(Region::ram(0, 0), Err(MemoryError::InvalidSize { size: 0 }));
        assert_eq!(
            Region::rom(0x8000, vec![0; 3]),
            Err(MemoryError::InvalidSize { size: 3 })
        );
    }

    #[test]
    fn test_address_map() {
        let hw = IrataDecl::build().unwrap();
        let mut memory = memory(&hw);
        assert_eq!(memory.read(0x8001), Ok(0xbb));
        memory.write(0x0010, 0x42).unwrap();
        assert_eq!(memory.read(0x0010), Ok(0x42));
        assert_eq!(memory.read(0x4000), Err(MemoryError::Unmapped { address: 0x4000 }));
        assert_eq!(
            memory.write(0x8000, 0),
            Err(MemoryError::ReadOnly { address: 0x8000 })
        );
        assert_eq!(memory.read(0x80ff), Ok(0));
        assert_eq!(memory.read(0x8100), Err(MemoryError::Unmapped { address: 0x8100 }));
    }

    #[test]
    fn test_write_phase_uses_start_of_tick_address() {
        let hw = IrataDecl::build().unwrap();
        let mut memory = memory(&hw);
        let mut a = Register::new(&hw.cpu.a);
        memory.set_address(0x8000);

        let mut bench = Bench::new(&hw);
        bench.assert(&[
            hw.memory.port.write,
            hw.cpu.a.port.read,
            hw.memory.address.increment.unwrap(),
        ]);
        bench.run(&mut [&mut memory, &mut a]).unwrap();
        assert_eq!(a.value(), 0xaa);
        assert_eq!(memory.address(), 0x8001);
    }

    #[test]
    fn test_store_to_ram() {
        let hw = IrataDecl::build().unwrap();
        let mut memory = memory(&hw);
        let mut a = Register::new(&hw.cpu.a);
        a.set_value(0x37);
        memory.set_address(0x0020);

        let mut bench = Bench::new(&hw);
        bench.assert(&[hw.cpu.a.port.write, hw.memory.port.read]);
        bench.run(&mut [&mut a, &mut memory]).unwrap();
        assert_eq!(memory.read(0x0020), Ok(0x37));
    }

    #[test]
    fn test_store_to_rom_fails() {
        let hw = IrataDecl::build().unwrap();
        let mut memory = memory(&hw);
        let mut a = Register::new(&hw.cpu.a);
        memory.set_address(0x8004);

        let mut bench = Bench::new(&hw);
        bench.assert(&[hw.cpu.a.port.write, hw.memory.port.read]);
        let err = bench.run(&mut [&mut a, &mut memory]).unwrap_err();
        assert_eq!(err, SimError::Memory(MemoryError::ReadOnly { address: 0x8004 }));
    }
}

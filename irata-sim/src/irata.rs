//! # Irata Machine
//!
//! Wires the Irata components into a [`Simulator`]: RAM at address zero,
//! the program padded into ROM at `rom_base`, and PC starting at
//! `entry_point`.

use crate::component::Component;
use crate::components::{
    Alu, Controller, Memory, Region, Register, Root, ScriptedController, StatusRegister,
    WordRegister,
};
use crate::config::{ConfigError, SimConfig};
use crate::error::{MemoryError, Result};
use crate::simulator::{RunResult, Simulator};
use irata_microcode::Table;
use irata_spec::{ControlId, IrataDecl};
use std::collections::BTreeSet;
use std::sync::Arc;

#[derive(Debug)]
pub struct Irata {
    hw: IrataDecl,
    sim: Simulator,
}

impl Irata {
    /// Machine driven by a compiled control table
    pub fn new(hw: &IrataDecl, table: Arc<Table>, program: &[u8], config: SimConfig) -> Result<Self> {
        let controller = Controller::new(&hw.cpu.controller, table);
        Self::with_controller(hw, Box::new(controller), program, config)
    }

    /// Machine that asserts `script` one control set per tick
    pub fn scripted(
        hw: &IrataDecl,
        script: impl IntoIterator<Item = BTreeSet<ControlId>>,
        program: &[u8],
        config: SimConfig,
    ) -> Result<Self> {
        let controller = ScriptedController::new(&hw.cpu.controller, script);
        Self::with_controller(hw, Box::new(controller), program, config)
    }

    fn with_controller(
        hw: &IrataDecl,
        controller: Box<dyn Component>,
        program: &[u8],
        config: SimConfig,
    ) -> Result<Self> {
        config.validate()?;
        if program.len() > config.rom_size {
            return Err(ConfigError::ProgramTooLarge {
                len: program.len(),
                rom_size: config.rom_size,
            }
            .into());
        }
        let mut rom = program.to_vec();
        rom.resize(config.rom_size, 0);

        let cpu = &hw.cpu;
        let components: Vec<Box<dyn Component>> = vec![
            Box::new(Root::for_irata(hw)),
            controller,
            Box::new(Register::new(&cpu.a)),
            Box::new(Register::new(&cpu.x)),
            Box::new(Register::new(&cpu.y)),
            Box::new(Alu::new(&cpu.alu, cpu.status_register.flags.carry)),
            Box::new(StatusRegister::new(&cpu.status_register, cpu.alu.flags)),
            Box::new(WordRegister::new(&cpu.pc).with_value(config.entry_point)),
            Box::new(
                WordRegister::new(&cpu.buffer.register)
                    .with_halves(&cpu.buffer.high, &cpu.buffer.low),
            ),
            Box::new(Memory::new(
                &hw.memory,
                vec![
                    Region::ram(0, config.ram_size)?,
                    Region::rom(config.rom_base, rom)?,
                ],
            )),
        ];
        let sim = Simulator::new(hw.hdl(), components, config, hw.halted)?;
        Ok(Self { hw: hw.clone(), sim })
    }

    pub fn simulator(&self) -> &Simulator {
        &self.sim
    }

    pub fn tick(&mut self) -> Result<()> {
        self.sim.tick()
    }

    pub fn tick_until_halt(&mut self) -> Result<RunResult> {
        self.sim.tick_until_halt()
    }

    pub fn is_halted(&self) -> bool {
        self.sim.is_halted()
    }

    pub fn cycle(&self) -> u64 {
        self.sim.cycle()
    }

    fn register(&self, path: &str) -> u8 {
        self.sim
            .component_at::<Register>(path)
            .map_or(0, Register::value)
    }

    pub fn a(&self) -> u8 {
        self.register(&self.hw.cpu.a.path)
    }

    pub fn x(&self) -> u8 {
        self.register(&self.hw.cpu.x.path)
    }

    pub fn y(&self) -> u8 {
        self.register(&self.hw.cpu.y.path)
    }

    pub fn pc(&self) -> u16 {
        self.sim
            .component_at::<WordRegister>(&self.hw.cpu.pc.path)
            .map_or(0, WordRegister::value)
    }

    pub fn buffer(&self) -> u16 {
        self.sim
            .component_at::<WordRegister>(&self.hw.cpu.buffer.register.path)
            .map_or(0, WordRegister::value)
    }

    pub fn status_register(&self) -> Option<&StatusRegister> {
        self.sim
            .component_at::<StatusRegister>(&self.hw.cpu.status_register.path)
    }

    pub fn alu(&self) -> Option<&Alu> {
        self.sim.component_at::<Alu>(&self.hw.cpu.alu.path)
    }

    pub fn memory(&self) -> Option<&Memory> {
        self.sim.component_at::<Memory>(&self.hw.memory.path)
    }

    pub fn read_memory(&self, address: u16) -> std::result::Result<u8, MemoryError> {
        self.memory()
            .ok_or(MemoryError::Unmapped { address })?
            .read(address)
    }
}

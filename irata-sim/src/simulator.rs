//! # Simulator
//!
//! Owns the component arena and the shared lines and buses, and advances the
//! whole machine one tick at a time.
//!
//! Each tick runs every [`TickPhase`] in order. Within a phase, components
//! run in arena order; status writes are committed when the phase ends. After
//! Clear the buses are emptied and auto-clear controls de-asserted.
//!
//! A tick is atomic: if any phase fails, all state is restored to what it was
//! before the tick started.

use crate::bus::{Bus, Buses};
use crate::component::{Checkpoint, Component, TickContext};
use crate::config::SimConfig;
use crate::error::{Result, SimError};
use crate::lines::{ControlLines, StatusLines};
use irata_spec::{BusId, ControlId, Hdl, StatusId, StructuralError, TickPhase};

/// Outcome of running to halt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunResult {
    /// Total ticks executed when the halt status was observed
    pub cycles: u64,
}

struct Snapshot {
    components: Vec<Checkpoint>,
    controls: ControlLines,
    statuses: StatusLines,
    buses: Buses,
}

#[derive(Debug)]
pub struct Simulator {
    hdl: Hdl,
    components: Vec<Box<dyn Component>>,
    controls: ControlLines,
    statuses: StatusLines,
    buses: Buses,
    config: SimConfig,
    halted: StatusId,
    cycle: u64,
}

impl Simulator {
    /// Validate `config` and check that `components` own every declared
    /// control and status exactly once
    pub fn new(
        hdl: &Hdl,
        components: Vec<Box<dyn Component>>,
        config: SimConfig,
        halted: StatusId,
    ) -> Result<Self> {
        config.validate()?;
        hdl.status(halted)?;
        verify_topology(hdl, &components)?;
        Ok(Self {
            hdl: hdl.clone(),
            controls: ControlLines::from_hdl(hdl),
            statuses: StatusLines::from_hdl(hdl),
            buses: Buses::from_hdl(hdl),
            components,
            config,
            halted,
            cycle: 0,
        })
    }

    pub fn hdl(&self) -> &Hdl {
        &self.hdl
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Ticks completed so far
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn is_halted(&self) -> bool {
        self.statuses.get(self.halted)
    }

    pub fn status(&self, status: StatusId) -> bool {
        self.statuses.get(status)
    }

    pub fn is_asserted(&self, control: ControlId) -> bool {
        self.controls.is_asserted(control)
    }

    pub fn bus(&self, bus: BusId) -> Result<&Bus> {
        self.buses.get(bus)
    }

    pub fn components(&self) -> &[Box<dyn Component>] {
        &self.components
    }

    /// Component at `path`, if it has type `T`
    pub fn component_at<T: Component + 'static>(&self, path: &str) -> Option<&T> {
        self.components
            .iter()
            .find(|component| component.path() == path)
            .and_then(|component| component.as_any().downcast_ref::<T>())
    }

    pub fn tick(&mut self) -> Result<()> {
        let snapshot = Snapshot {
            components: self
                .components
                .iter_mut()
                .map(|component| component.checkpoint())
                .collect(),
            controls: self.controls.clone(),
            statuses: self.statuses.clone(),
            buses: self.buses.clone(),
        };
        match self.run_phases() {
            Ok(()) => {
                for component in self.components.iter_mut() {
                    component.commit();
                }
                self.cycle += 1;
                Ok(())
            }
            Err(err) => {
                for (component, checkpoint) in self.components.iter_mut().zip(snapshot.components) {
                    match checkpoint {
                        Checkpoint::Snapshot(saved) => *component = saved,
                        Checkpoint::Journal => component.rollback(),
                    }
                }
                self.controls = snapshot.controls;
                self.statuses = snapshot.statuses;
                self.buses = snapshot.buses;
                Err(err)
            }
        }
    }

    fn run_phases(&mut self) -> Result<()> {
        for phase in TickPhase::ALL {
            let mut ctx = TickContext::new(
                phase,
                self.cycle,
                &mut self.controls,
                &mut self.statuses,
                &mut self.buses,
            );
            for component in self.components.iter_mut() {
                if component.participates(phase) {
                    component.tick(&mut ctx)?;
                }
            }
            if phase == TickPhase::Control {
                tracing::trace!(
                    "cycle {}: {}",
                    self.cycle,
                    self.controls
                        .asserted()
                        .map(|control| self.hdl.control_path(control))
                        .collect::<Vec<_>>()
                        .join(" ")
                );
            }
            self.statuses.commit();
        }
        self.buses.clear();
        self.controls.clear_auto();
        Ok(())
    }

    /// Tick until the halt status is set
    ///
    /// Fails with [`SimError::CycleLimitExceeded`] once `max_cycles` ticks
    /// have run without halting.
    pub fn tick_until_halt(&mut self) -> Result<RunResult> {
        while !self.is_halted() {
            if self.cycle >= self.config.max_cycles {
                return Err(SimError::CycleLimitExceeded {
                    limit: self.config.max_cycles,
                });
            }
            self.tick()?;
        }
        tracing::debug!("Halted after {} cycles", self.cycle);
        Ok(RunResult { cycles: self.cycle })
    }
}

/// Every declared control and status has exactly one owner, and nothing
/// claims an id the registry does not know
fn verify_topology(hdl: &Hdl, components: &[Box<dyn Component>]) -> std::result::Result<(), StructuralError> {
    let mut control_owners: Vec<Option<&str>> = vec![None; hdl.controls().len()];
    let mut status_owners: Vec<Option<&str>> = vec![None; hdl.statuses().len()];

    for component in components {
        for control in component.controls() {
            let owner = control_owners
                .get_mut(control.index())
                .ok_or_else(|| StructuralError::UndeclaredClaim {
                    component: component.path().to_string(),
                    id: control.0,
                })?;
            if let Some(first) = owner {
                return Err(StructuralError::ControlOwnedTwice {
                    path: hdl.control_path(control),
                    first: first.to_string(),
                    second: component.path().to_string(),
                });
            }
            *owner = Some(component.path());
        }
        for status in component.statuses() {
            let owner = status_owners
                .get_mut(status.index())
                .ok_or_else(|| StructuralError::UndeclaredClaim {
                    component: component.path().to_string(),
                    id: status.0,
                })?;
            if let Some(first) = owner {
                return Err(StructuralError::StatusOwnedTwice {
                    path: hdl.status_path(status),
                    first: first.to_string(),
                    second: component.path().to_string(),
                });
            }
            *owner = Some(component.path());
        }
    }

    if let Some(decl) = hdl
        .controls()
        .iter()
        .zip(&control_owners)
        .find_map(|(decl, owner)| owner.is_none().then_some(decl))
    {
        return Err(StructuralError::UnownedControl {
            path: decl.path.clone(),
        });
    }
    if let Some(decl) = hdl
        .statuses()
        .iter()
        .zip(&status_owners)
        .find_map(|(decl, owner)| owner.is_none().then_some(decl))
    {
        return Err(StructuralError::UnownedStatus {
            path: decl.path.clone(),
        });
    }
    Ok(())
}

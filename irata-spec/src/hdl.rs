//! # Hardware Declarations
//!
//! A flat registry of the static hardware schema: components, buses, control
//! lines, and status lines. Everything is addressed by a typed id and by a
//! unique slash path such as `/cpu/a/write`.
//!
//! The registry is built once with [`HdlBuilder`] and is immutable afterwards.
//! Instruction definitions and runtime components refer to declarations by id.

use crate::error::{Result, StructuralError};
use crate::phase::TickPhase;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

macro_rules! decl_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub u16);

        impl $name {
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

decl_id!(
    /// Identifies a component declaration
    ComponentId
);
decl_id!(
    /// Identifies a control line
    ControlId
);
decl_id!(
    /// Identifies a status line
    StatusId
);
decl_id!(
    /// Identifies a bus
    BusId
);

/// Width of the values carried by a bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BusWidth {
    Byte,
    Word,
}

/// What a control line does when asserted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKind {
    /// Push the owner's value onto a bus
    BusWrite(BusId),
    /// Pull a bus value into the owner
    BusRead(BusId),
    /// Local update
    Process,
    /// End-of-cycle update
    Clear,
}

impl ControlKind {
    /// The phase in which this control is consumed
    pub const fn phase(self) -> TickPhase {
        match self {
            ControlKind::BusWrite(_) => TickPhase::Write,
            ControlKind::BusRead(_) => TickPhase::Read,
            ControlKind::Process => TickPhase::Process,
            ControlKind::Clear => TickPhase::Clear,
        }
    }

    pub const fn bus(self) -> Option<BusId> {
        match self {
            ControlKind::BusWrite(bus) | ControlKind::BusRead(bus) => Some(bus),
            ControlKind::Process | ControlKind::Clear => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentDecl {
    pub id: ComponentId,
    pub name: String,
    pub path: String,
    pub parent: Option<ComponentId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlDecl {
    pub id: ControlId,
    pub name: String,
    pub path: String,
    /// Declared owner
    pub component: ComponentId,
    pub kind: ControlKind,
    /// Whether the line drops at the end of every cycle
    pub auto_clear: bool,
}

impl ControlDecl {
    #[inline]
    pub const fn phase(&self) -> TickPhase {
        self.kind.phase()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusDecl {
    pub id: StatusId,
    pub name: String,
    pub path: String,
    pub component: ComponentId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusDecl {
    pub id: BusId,
    pub name: String,
    pub path: String,
    pub width: BusWidth,
}

/// Controls that drive a controller's step counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepIndexControls {
    pub increment: ControlId,
    pub reset: ControlId,
}

impl StepIndexControls {
    pub fn contains(&self, control: ControlId) -> bool {
        control == self.increment || control == self.reset
    }
}

/// Anything a declaration path can resolve to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathTarget {
    Component(ComponentId),
    Control(ControlId),
    Status(StatusId),
    Bus(BusId),
}

/// Immutable hardware declaration registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hdl {
    components: Vec<ComponentDecl>,
    controls: Vec<ControlDecl>,
    statuses: Vec<StatusDecl>,
    buses: Vec<BusDecl>,
    paths: BTreeMap<String, PathTarget>,
}

impl Hdl {
    pub fn root(&self) -> ComponentId {
        ComponentId(0)
    }

    pub fn component(&self, id: ComponentId) -> Result<&ComponentDecl> {
        self.components
            .get(id.index())
            .ok_or(StructuralError::UnknownComponent(id.0))
    }

    pub fn control(&self, id: ControlId) -> Result<&ControlDecl> {
        self.controls
            .get(id.index())
            .ok_or(StructuralError::UnknownControl(id.0))
    }

    pub fn status(&self, id: StatusId) -> Result<&StatusDecl> {
        self.statuses
            .get(id.index())
            .ok_or(StructuralError::UnknownStatus(id.0))
    }

    pub fn bus(&self, id: BusId) -> Result<&BusDecl> {
        self.buses
            .get(id.index())
            .ok_or(StructuralError::UnknownBus(id.0))
    }

    pub fn components(&self) -> &[ComponentDecl] {
        &self.components
    }

    pub fn controls(&self) -> &[ControlDecl] {
        &self.controls
    }

    pub fn statuses(&self) -> &[StatusDecl] {
        &self.statuses
    }

    pub fn buses(&self) -> &[BusDecl] {
        &self.buses
    }

    /// Resolve a path to whatever is declared there
    pub fn lookup(&self, path: &str) -> Result<PathTarget> {
        self.paths
            .get(path)
            .copied()
            .ok_or_else(|| StructuralError::UnknownPath {
                path: path.to_string(),
            })
    }

    pub fn control_at(&self, path: &str) -> Result<&ControlDecl> {
        match self.lookup(path)? {
            PathTarget::Control(id) => self.control(id),
            _ => Err(StructuralError::UnknownPath {
                path: path.to_string(),
            }),
        }
    }

    pub fn status_at(&self, path: &str) -> Result<&StatusDecl> {
        match self.lookup(path)? {
            PathTarget::Status(id) => self.status(id),
            _ => Err(StructuralError::UnknownPath {
                path: path.to_string(),
            }),
        }
    }

    pub fn component_at(&self, path: &str) -> Result<&ComponentDecl> {
        match self.lookup(path)? {
            PathTarget::Component(id) => self.component(id),
            _ => Err(StructuralError::UnknownPath {
                path: path.to_string(),
            }),
        }
    }

    /// Controls declared directly on a component
    pub fn controls_of(&self, component: ComponentId) -> impl Iterator<Item = &ControlDecl> {
        self.controls
            .iter()
            .filter(move |control| control.component == component)
    }

    /// Path of a control, or a placeholder for dangling ids
    pub fn control_path(&self, id: ControlId) -> String {
        self.control(id)
            .map(|c| c.path.clone())
            .unwrap_or_else(|_| format!("<control {}>", id))
    }

    pub fn status_path(&self, id: StatusId) -> String {
        self.status(id)
            .map(|s| s.path.clone())
            .unwrap_or_else(|_| format!("<status {}>", id))
    }

    pub fn bus_path(&self, id: BusId) -> String {
        self.bus(id)
            .map(|b| b.path.clone())
            .unwrap_or_else(|_| format!("<bus {}>", id))
    }
}

/// Builder for [`Hdl`]
#[derive(Debug)]
pub struct HdlBuilder {
    hdl: Hdl,
}

impl HdlBuilder {
    /// Start a registry containing only the root component `/`
    pub fn new() -> Self {
        let root = ComponentDecl {
            id: ComponentId(0),
            name: String::new(),
            path: "/".to_string(),
            parent: None,
        };
        let mut paths = BTreeMap::new();
        paths.insert(root.path.clone(), PathTarget::Component(root.id));
        Self {
            hdl: Hdl {
                components: vec![root],
                controls: Vec::new(),
                statuses: Vec::new(),
                buses: Vec::new(),
                paths,
            },
        }
    }

    pub fn root(&self) -> ComponentId {
        self.hdl.root()
    }

    pub fn component(&mut self, parent: ComponentId, name: &str) -> Result<ComponentId> {
        let path = self.child_path(parent, name)?;
        let id = ComponentId(next_id(self.hdl.components.len(), "component")?);
        self.claim(&path, PathTarget::Component(id))?;
        self.hdl.components.push(ComponentDecl {
            id,
            name: name.to_string(),
            path,
            parent: Some(parent),
        });
        Ok(id)
    }

    /// Declare a bus under the root
    pub fn bus(&mut self, name: &str, width: BusWidth) -> Result<BusId> {
        let path = self.child_path(self.root(), name)?;
        let id = BusId(next_id(self.hdl.buses.len(), "bus")?);
        self.claim(&path, PathTarget::Bus(id))?;
        self.hdl.buses.push(BusDecl {
            id,
            name: name.to_string(),
            path,
            width,
        });
        Ok(id)
    }

    /// Declare an auto-clearing control
    pub fn control(&mut self, component: ComponentId, name: &str, kind: ControlKind) -> Result<ControlId> {
        self.control_with(component, name, kind, true)
    }

    pub fn control_with(
        &mut self,
        component: ComponentId,
        name: &str,
        kind: ControlKind,
        auto_clear: bool,
    ) -> Result<ControlId> {
        if let Some(bus) = kind.bus() {
            self.hdl.bus(bus)?;
        }
        let path = self.child_path(component, name)?;
        let id = ControlId(next_id(self.hdl.controls.len(), "control")?);
        self.claim(&path, PathTarget::Control(id))?;
        self.hdl.controls.push(ControlDecl {
            id,
            name: name.to_string(),
            path,
            component,
            kind,
            auto_clear,
        });
        Ok(id)
    }

    pub fn status(&mut self, component: ComponentId, name: &str) -> Result<StatusId> {
        let path = self.child_path(component, name)?;
        let id = StatusId(next_id(self.hdl.statuses.len(), "status")?);
        self.claim(&path, PathTarget::Status(id))?;
        self.hdl.statuses.push(StatusDecl {
            id,
            name: name.to_string(),
            path,
            component,
        });
        Ok(id)
    }

    /// Path of an already declared component
    pub fn path(&self, component: ComponentId) -> Result<String> {
        Ok(self.hdl.component(component)?.path.clone())
    }

    pub fn build(self) -> Hdl {
        self.hdl
    }

    fn child_path(&self, parent: ComponentId, name: &str) -> Result<String> {
        let parent = self.hdl.component(parent)?;
        Ok(if parent.path == "/" {
            format!("/{}", name)
        } else {
            format!("{}/{}", parent.path, name)
        })
    }

    fn claim(&mut self, path: &str, target: PathTarget) -> Result<()> {
        if self.hdl.paths.contains_key(path) {
            return Err(StructuralError::DuplicatePath {
                path: path.to_string(),
            });
        }
        self.hdl.paths.insert(path.to_string(), target);
        Ok(())
    }
}

impl Default for HdlBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Id for the next declaration in an arena of length `len`
fn next_id(len: usize, kind: &'static str) -> Result<u16> {
    u16::try_from(len).map_err(|_| StructuralError::TooManyDeclarations { kind })
}

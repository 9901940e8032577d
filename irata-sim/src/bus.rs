//! # Bus Arbitration
//!
//! A bus is a single-slot mailbox. At most one setter may drive it per tick;
//! a second, different setter is a conflict even when it writes the same
//! value. The slot is emptied at the end of every tick.

use crate::error::{Result, SimError};
use irata_spec::{BusId, BusWidth, Hdl};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bus {
    path: String,
    width: BusWidth,
    value: Option<u16>,
    setter: Option<String>,
}

impl Bus {
    pub fn new(path: impl Into<String>, width: BusWidth) -> Self {
        Self {
            path: path.into(),
            width,
            value: None,
            setter: None,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn width(&self) -> BusWidth {
        self.width
    }

    /// Drive the bus; the same setter may overwrite its own value
    pub fn set_value(&mut self, value: u16, setter: &str) -> Result<()> {
        if let Some(first) = &self.setter {
            if first != setter {
                return Err(SimError::BusConflict {
                    bus: self.path.clone(),
                    first: first.clone(),
                    second: setter.to_string(),
                });
            }
        }
        let value = match self.width {
            BusWidth::Byte => value & 0xff,
            BusWidth::Word => value,
        };
        self.value = Some(value);
        self.setter = Some(setter.to_string());
        Ok(())
    }

    /// Value set this tick, if any
    pub fn value(&self) -> Option<u16> {
        self.value
    }

    pub fn setter(&self) -> Option<&str> {
        self.setter.as_deref()
    }

    pub fn tick_clear(&mut self) {
        self.value = None;
        self.setter = None;
    }
}

/// Every bus declared in an [`Hdl`], indexed by [`BusId`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buses {
    buses: Vec<Bus>,
}

impl Buses {
    pub fn from_hdl(hdl: &Hdl) -> Self {
        Self {
            buses: hdl
                .buses()
                .iter()
                .map(|decl| Bus::new(decl.path.clone(), decl.width))
                .collect(),
        }
    }

    pub fn get(&self, id: BusId) -> Result<&Bus> {
        self.buses
            .get(id.index())
            .ok_or_else(|| irata_spec::StructuralError::UnknownBus(id.0).into())
    }

    pub fn get_mut(&mut self, id: BusId) -> Result<&mut Bus> {
        self.buses
            .get_mut(id.index())
            .ok_or_else(|| irata_spec::StructuralError::UnknownBus(id.0).into())
    }

    pub fn clear(&mut self) {
        for bus in &mut self.buses {
            bus.tick_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_setter_conflicts() {
        let mut bus = Bus::new("/data_bus", BusWidth::Byte);
        bus.set_value(0x12, "regA").unwrap();
        let err = bus.set_value(0x12, "regB").unwrap_err();
        assert_eq!(
            err,
            SimError::BusConflict {
                bus: "/data_bus".to_string(),
                first: "regA".to_string(),
                second: "regB".to_string(),
            }
        );
        // The first write stands
        assert_eq!(bus.value(), Some(0x12));
        assert_eq!(bus.setter(), Some("regA"));
    }

    #[test]
    fn test_clear_allows_new_setter() {
        let mut bus = Bus::new("/data_bus", BusWidth::Byte);
        bus.set_value(1, "regA").unwrap();
        assert!(bus.set_value(1, "regB").is_err());
        bus.tick_clear();
        assert_eq!(bus.value(), None);
        bus.set_value(2, "regB").unwrap();
        assert_eq!(bus.value(), Some(2));
    }

    #[test]
    fn test_same_setter_overwrites() {
        let mut bus = Bus::new("/address_bus", BusWidth::Word);
        bus.set_value(0x1234, "/cpu/pc").unwrap();
        bus.set_value(0x8000, "/cpu/pc").unwrap();
        assert_eq!(bus.value(), Some(0x8000));
    }

    #[test]
    fn test_byte_bus_truncates() {
        let mut bus = Bus::new("/data_bus", BusWidth::Byte);
        bus.set_value(0x1ff, "regA").unwrap();
        assert_eq!(bus.value(), Some(0xff));
    }

    #[test]
    fn test_clear_without_write() {
        let mut bus = Bus::new("/data_bus", BusWidth::Byte);
        bus.tick_clear();
        assert_eq!(bus.value(), None);
        assert_eq!(bus.setter(), None);
    }
}

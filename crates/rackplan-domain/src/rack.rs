use crate::{FieldUpdate, PlacedDevice};
use rackplan_core::Editable;
use serde::{Deserialize, Serialize};

/// Nominal mounting width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RackWidth {
    #[serde(rename = "10")]
    Ten,
    #[default]
    #[serde(rename = "19")]
    Nineteen,
    #[serde(rename = "23")]
    TwentyThree,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rack {
    pub name: String,
    /// Height in rack units.
    pub height: u32,
    #[serde(default)]
    pub width: RackWidth,
    /// Number units top-down instead of bottom-up.
    #[serde(default)]
    pub desc_units: bool,
    #[serde(default = "default_starting_unit")]
    pub starting_unit: u32,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub devices: Vec<PlacedDevice>,
}

fn default_starting_unit() -> u32 {
    1
}

impl Rack {
    pub fn new(name: impl Into<String>, height: u32) -> Self {
        Self {
            name: name.into(),
            height,
            width: RackWidth::default(),
            desc_units: false,
            starting_unit: 1,
            notes: None,
            devices: Vec::new(),
        }
    }
}

/// Partial update of rack settings. Devices are never touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RackUpdate {
    pub name: Option<String>,
    pub height: Option<u32>,
    pub width: Option<RackWidth>,
    pub desc_units: Option<bool>,
    pub starting_unit: Option<u32>,
    pub notes: FieldUpdate<String>,
}

impl RackUpdate {
    pub fn height(height: u32) -> Self {
        Self {
            height: Some(height),
            ..Default::default()
        }
    }

    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

impl Editable<Rack> for RackUpdate {
    fn capture(rack: &Rack, changes: &Self) -> Self {
        Self {
            name: changes.name.as_ref().map(|_| rack.name.clone()),
            height: changes.height.map(|_| rack.height),
            width: changes.width.map(|_| rack.width),
            desc_units: changes.desc_units.map(|_| rack.desc_units),
            starting_unit: changes.starting_unit.map(|_| rack.starting_unit),
            notes: changes.notes.capture(&rack.notes),
        }
    }

    fn apply_to(&self, rack: &mut Rack) {
        if let Some(name) = &self.name {
            rack.name = name.clone();
        }
        if let Some(height) = self.height {
            rack.height = height;
        }
        if let Some(width) = self.width {
            rack.width = width;
        }
        if let Some(desc_units) = self.desc_units {
            rack.desc_units = desc_units;
        }
        if let Some(starting_unit) = self.starting_unit {
            rack.starting_unit = starting_unit;
        }
        self.notes.apply_to(&mut rack.notes);
    }

    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.height.is_none()
            && self.width.is_none()
            && self.desc_units.is_none()
            && self.starting_unit.is_none()
            && !self.notes.is_change()
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub type DeviceId = Uuid;

/// Which side of the rack a device is mounted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeviceFace {
    #[default]
    Front,
    Rear,
    Both,
}

impl DeviceFace {
    /// Whether two mounting faces share any side of the rack.
    pub fn overlaps(self, other: DeviceFace) -> bool {
        self == DeviceFace::Both || other == DeviceFace::Both || self == other
    }
}

impl fmt::Display for DeviceFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceFace::Front => write!(f, "front"),
            DeviceFace::Rear => write!(f, "rear"),
            DeviceFace::Both => write!(f, "both"),
        }
    }
}

impl FromStr for DeviceFace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "front" => Ok(DeviceFace::Front),
            "rear" => Ok(DeviceFace::Rear),
            "both" => Ok(DeviceFace::Both),
            other => Err(format!("unknown face '{}'", other)),
        }
    }
}

/// A device instance mounted in the rack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedDevice {
    pub id: DeviceId,
    /// Slug of the device type this is an instance of.
    pub device_type: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Lowest occupied rack unit, 1-based.
    pub position: u32,
    #[serde(default)]
    pub face: DeviceFace,
}

impl PlacedDevice {
    pub fn new(device_type: impl Into<String>, position: u32, face: DeviceFace) -> Self {
        Self {
            id: Uuid::new_v4(),
            device_type: device_type.into(),
            name: None,
            position,
            face,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.device_type)
    }
}

//! Live layout state and the raw mutation surface commands operate on.
//!
//! Methods on [`LayoutMutations`] are history-unaware: they change state and
//! nothing else. Each one is atomic, either applying fully or reporting
//! failure without touching the layout. Undo/redo is layered on top by
//! [`crate::commands`] and [`crate::History`].

use crate::{DeviceFace, DeviceType, DeviceTypeUpdate, PlacedDevice, Rack, RackUpdate};
use rackplan_core::{Editable, RackError, RackResult};
use serde::{Deserialize, Serialize};

/// Raw, history-unaware mutators.
#[cfg_attr(test, mockall::automock)]
pub trait LayoutMutations {
    // Device types
    fn add_device_type(&mut self, device_type: DeviceType) -> RackResult<()>;
    fn remove_device_type(&mut self, slug: &str) -> Option<DeviceType>;
    fn update_device_type(&mut self, slug: &str, update: DeviceTypeUpdate) -> RackResult<()>;

    // Placed devices
    /// Appends the device and returns the index it was assigned.
    fn place_device(&mut self, device: PlacedDevice) -> usize;
    fn insert_device(&mut self, index: usize, device: PlacedDevice) -> RackResult<()>;
    fn remove_device_at(&mut self, index: usize) -> Option<PlacedDevice>;
    fn move_device(&mut self, index: usize, position: u32) -> bool;
    fn update_device_face(&mut self, index: usize, face: DeviceFace) -> RackResult<()>;
    fn update_device_name(&mut self, index: usize, name: Option<String>) -> RackResult<()>;

    // Rack
    fn update_rack(&mut self, update: RackUpdate);
    fn replace_rack(&mut self, rack: Rack);
    fn clear_rack_devices(&mut self) -> Vec<PlacedDevice>;
    fn restore_rack_devices(&mut self, devices: Vec<PlacedDevice>);
}

/// Read access used by factories and placement checks.
pub trait LayoutView {
    fn rack(&self) -> &Rack;
    fn device_types(&self) -> &[DeviceType];

    fn device_at(&self, index: usize) -> Option<&PlacedDevice> {
        self.rack().devices.get(index)
    }

    fn device_type(&self, slug: &str) -> Option<&DeviceType> {
        self.device_types().iter().find(|t| t.slug == slug)
    }

    /// Indices of placed devices of the given type, ascending.
    fn device_indices_of_type(&self, slug: &str) -> Vec<usize> {
        self.rack()
            .devices
            .iter()
            .enumerate()
            .filter(|(_, d)| d.device_type == slug)
            .map(|(i, _)| i)
            .collect()
    }
}

/// The document being edited: one rack and the device types it may hold.
///
/// Device types are kept sorted by slug so removing and re-adding a type
/// returns it to the same slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub rack: Rack,
    #[serde(default)]
    pub device_types: Vec<DeviceType>,
}

impl Layout {
    pub fn new(rack: Rack) -> Self {
        Self {
            rack,
            device_types: Vec::new(),
        }
    }

    fn type_slot(&self, slug: &str) -> Result<usize, usize> {
        self.device_types
            .binary_search_by(|t| t.slug.as_str().cmp(slug))
    }
}

impl LayoutView for Layout {
    fn rack(&self) -> &Rack {
        &self.rack
    }

    fn device_types(&self) -> &[DeviceType] {
        &self.device_types
    }

    fn device_type(&self, slug: &str) -> Option<&DeviceType> {
        self.type_slot(slug).ok().map(|i| &self.device_types[i])
    }
}

impl LayoutMutations for Layout {
    fn add_device_type(&mut self, device_type: DeviceType) -> RackResult<()> {
        match self.type_slot(&device_type.slug) {
            Ok(_) => Err(RackError::Validation(format!(
                "device type '{}' already exists",
                device_type.slug
            ))),
            Err(slot) => {
                self.device_types.insert(slot, device_type);
                Ok(())
            }
        }
    }

    fn remove_device_type(&mut self, slug: &str) -> Option<DeviceType> {
        self.type_slot(slug)
            .ok()
            .map(|slot| self.device_types.remove(slot))
    }

    fn update_device_type(&mut self, slug: &str, update: DeviceTypeUpdate) -> RackResult<()> {
        let slot = self
            .type_slot(slug)
            .map_err(|_| RackError::device_type_not_found(slug))?;
        update.apply_to(&mut self.device_types[slot]);
        Ok(())
    }

    fn place_device(&mut self, device: PlacedDevice) -> usize {
        self.rack.devices.push(device);
        self.rack.devices.len() - 1
    }

    fn insert_device(&mut self, index: usize, device: PlacedDevice) -> RackResult<()> {
        if index > self.rack.devices.len() {
            return Err(RackError::NotFound(format!(
                "cannot insert at index {} into {} devices",
                index,
                self.rack.devices.len()
            )));
        }
        self.rack.devices.insert(index, device);
        Ok(())
    }

    fn remove_device_at(&mut self, index: usize) -> Option<PlacedDevice> {
        if index < self.rack.devices.len() {
            Some(self.rack.devices.remove(index))
        } else {
            None
        }
    }

    fn move_device(&mut self, index: usize, position: u32) -> bool {
        if position == 0 {
            return false;
        }
        match self.rack.devices.get_mut(index) {
            Some(device) => {
                device.position = position;
                true
            }
            None => false,
        }
    }

    fn update_device_face(&mut self, index: usize, face: DeviceFace) -> RackResult<()> {
        let device = self
            .rack
            .devices
            .get_mut(index)
            .ok_or_else(|| RackError::device_not_found(index))?;
        device.face = face;
        Ok(())
    }

    fn update_device_name(&mut self, index: usize, name: Option<String>) -> RackResult<()> {
        let device = self
            .rack
            .devices
            .get_mut(index)
            .ok_or_else(|| RackError::device_not_found(index))?;
        device.name = name;
        Ok(())
    }

    fn update_rack(&mut self, update: RackUpdate) {
        update.apply_to(&mut self.rack);
    }

    fn replace_rack(&mut self, rack: Rack) {
        self.rack = rack;
    }

    fn clear_rack_devices(&mut self) -> Vec<PlacedDevice> {
        std::mem::take(&mut self.rack.devices)
    }

    fn restore_rack_devices(&mut self, devices: Vec<PlacedDevice>) {
        self.rack.devices.extend(devices);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> Layout {
        Layout::new(Rack::new("Lab", 42))
    }

    #[test]
    fn test_device_types_stay_sorted() {
        let mut layout = layout();
        layout
            .add_device_type(DeviceType::new("switch", "Switch", 1))
            .unwrap();
        layout
            .add_device_type(DeviceType::new("pdu", "PDU", 1))
            .unwrap();
        layout
            .add_device_type(DeviceType::new("server", "Server", 2))
            .unwrap();

        let slugs: Vec<_> = layout.device_types.iter().map(|t| t.slug.as_str()).collect();
        assert_eq!(slugs, vec!["pdu", "server", "switch"]);
        assert!(layout.device_type("server").is_some());
    }

    #[test]
    fn test_duplicate_type_rejected() {
        let mut layout = layout();
        layout
            .add_device_type(DeviceType::new("pdu", "PDU", 1))
            .unwrap();
        let err = layout
            .add_device_type(DeviceType::new("pdu", "Other", 1))
            .unwrap_err();
        assert!(matches!(err, RackError::Validation(_)));
        assert_eq!(layout.device_types.len(), 1);
    }

    #[test]
    fn test_place_returns_assigned_index() {
        let mut layout = layout();
        assert_eq!(
            layout.place_device(PlacedDevice::new("a", 1, DeviceFace::Front)),
            0
        );
        assert_eq!(
            layout.place_device(PlacedDevice::new("b", 3, DeviceFace::Front)),
            1
        );
    }

    #[test]
    fn test_raw_ops_on_missing_index() {
        let mut layout = layout();
        assert!(layout.remove_device_at(0).is_none());
        assert!(!layout.move_device(0, 5));
        assert!(layout.update_device_face(0, DeviceFace::Rear).is_err());
        assert!(layout.update_device_name(0, None).is_err());
        assert!(layout
            .insert_device(1, PlacedDevice::new("a", 1, DeviceFace::Front))
            .is_err());
    }

    #[test]
    fn test_move_rejects_position_zero() {
        let mut layout = layout();
        layout.place_device(PlacedDevice::new("a", 4, DeviceFace::Front));
        assert!(!layout.move_device(0, 0));
        assert_eq!(layout.rack.devices[0].position, 4);
    }

    #[test]
    fn test_clear_and_restore() {
        let mut layout = layout();
        layout.place_device(PlacedDevice::new("a", 1, DeviceFace::Front));
        layout.place_device(PlacedDevice::new("b", 2, DeviceFace::Rear));
        let before = layout.rack.devices.clone();

        let removed = layout.clear_rack_devices();
        assert!(layout.rack.devices.is_empty());
        layout.restore_rack_devices(removed);
        assert_eq!(layout.rack.devices, before);
    }

    #[test]
    fn test_device_indices_of_type() {
        let mut layout = layout();
        layout.place_device(PlacedDevice::new("a", 1, DeviceFace::Front));
        layout.place_device(PlacedDevice::new("b", 2, DeviceFace::Front));
        layout.place_device(PlacedDevice::new("a", 3, DeviceFace::Front));
        assert_eq!(layout.device_indices_of_type("a"), vec![0, 2]);
    }
}

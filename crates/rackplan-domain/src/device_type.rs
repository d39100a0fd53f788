use crate::FieldUpdate;
use rackplan_core::Editable;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceCategory {
    #[default]
    Server,
    Network,
    Storage,
    Power,
    PatchPanel,
    CableManagement,
    Shelf,
    Blank,
    Other,
}

/// A device model that can be placed into the rack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceType {
    pub slug: String,
    #[serde(default)]
    pub manufacturer: Option<String>,
    pub model: String,
    pub u_height: u32,
    #[serde(default = "default_full_depth")]
    pub is_full_depth: bool,
    #[serde(default)]
    pub category: DeviceCategory,
    #[serde(default)]
    pub colour: Option<String>,
}

fn default_full_depth() -> bool {
    true
}

impl DeviceType {
    pub fn new(slug: impl Into<String>, model: impl Into<String>, u_height: u32) -> Self {
        Self {
            slug: slug.into(),
            manufacturer: None,
            model: model.into(),
            u_height,
            is_full_depth: true,
            category: DeviceCategory::default(),
            colour: None,
        }
    }

    pub fn half_depth(mut self) -> Self {
        self.is_full_depth = false;
        self
    }

    pub fn with_category(mut self, category: DeviceCategory) -> Self {
        self.category = category;
        self
    }
}

/// Partial update of a device type. The slug is the identity and never changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceTypeUpdate {
    pub manufacturer: FieldUpdate<String>,
    pub model: Option<String>,
    pub u_height: Option<u32>,
    pub is_full_depth: Option<bool>,
    pub category: Option<DeviceCategory>,
    pub colour: FieldUpdate<String>,
}

impl Editable<DeviceType> for DeviceTypeUpdate {
    fn capture(device_type: &DeviceType, changes: &Self) -> Self {
        Self {
            manufacturer: changes.manufacturer.capture(&device_type.manufacturer),
            model: changes.model.as_ref().map(|_| device_type.model.clone()),
            u_height: changes.u_height.map(|_| device_type.u_height),
            is_full_depth: changes.is_full_depth.map(|_| device_type.is_full_depth),
            category: changes.category.map(|_| device_type.category),
            colour: changes.colour.capture(&device_type.colour),
        }
    }

    fn apply_to(&self, device_type: &mut DeviceType) {
        self.manufacturer.apply_to(&mut device_type.manufacturer);
        if let Some(model) = &self.model {
            device_type.model = model.clone();
        }
        if let Some(u_height) = self.u_height {
            device_type.u_height = u_height;
        }
        if let Some(is_full_depth) = self.is_full_depth {
            device_type.is_full_depth = is_full_depth;
        }
        if let Some(category) = self.category {
            device_type.category = category;
        }
        self.colour.apply_to(&mut device_type.colour);
    }

    fn is_empty(&self) -> bool {
        !self.manufacturer.is_change()
            && self.model.is_none()
            && self.u_height.is_none()
            && self.is_full_depth.is_none()
            && self.category.is_none()
            && !self.colour.is_change()
    }
}

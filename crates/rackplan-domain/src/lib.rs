pub mod commands;
pub mod device;
pub mod device_type;
pub mod field_update;
pub mod history;
pub mod layout;
pub mod placement;
pub mod rack;

pub use commands::{Command, CommandAction, CommandKind};
pub use device::{DeviceFace, DeviceId, PlacedDevice};
pub use device_type::{DeviceCategory, DeviceType, DeviceTypeUpdate};
pub use field_update::FieldUpdate;
pub use history::History;
pub use layout::{Layout, LayoutMutations, LayoutView};
pub use rack::{Rack, RackUpdate, RackWidth};

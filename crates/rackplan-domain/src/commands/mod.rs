//! Reversible editor commands.
//!
//! A [`Command`] pairs a human-readable description with a [`CommandAction`]
//! carrying everything needed to apply the change and take it back. Factories
//! in the submodules build commands from before/after values; they clone any
//! borrowed input so later edits to the live layout cannot leak into a
//! captured snapshot.

use crate::{DeviceType, DeviceTypeUpdate, LayoutMutations, PlacedDevice, Rack, RackUpdate};
use chrono::{DateTime, Utc};
use rackplan_core::RackResult;
use serde::Serialize;
use std::fmt;
use std::sync::Mutex;

pub mod device_commands;
pub mod device_type_commands;
pub mod rack_commands;

pub use device_commands::*;
pub use device_type_commands::*;
pub use rack_commands::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandKind {
    PlaceDevice,
    MoveDevice,
    RemoveDevice,
    UpdateDeviceFace,
    UpdateDeviceName,
    AddDeviceType,
    UpdateDeviceType,
    DeleteDeviceType,
    UpdateRack,
    ReplaceRack,
    ClearRack,
    Batch,
}

impl CommandKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::PlaceDevice => "PLACE_DEVICE",
            CommandKind::MoveDevice => "MOVE_DEVICE",
            CommandKind::RemoveDevice => "REMOVE_DEVICE",
            CommandKind::UpdateDeviceFace => "UPDATE_DEVICE_FACE",
            CommandKind::UpdateDeviceName => "UPDATE_DEVICE_NAME",
            CommandKind::AddDeviceType => "ADD_DEVICE_TYPE",
            CommandKind::UpdateDeviceType => "UPDATE_DEVICE_TYPE",
            CommandKind::DeleteDeviceType => "DELETE_DEVICE_TYPE",
            CommandKind::UpdateRack => "UPDATE_RACK",
            CommandKind::ReplaceRack => "REPLACE_RACK",
            CommandKind::ClearRack => "CLEAR_RACK",
            CommandKind::Batch => "BATCH",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The data a command needs to move the layout forward and back.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandAction {
    /// `placed_index` is filled in by the first forward and targeted by reverse.
    PlaceDevice {
        device: PlacedDevice,
        placed_index: Option<usize>,
    },
    MoveDevice {
        index: usize,
        from: u32,
        to: u32,
    },
    RemoveDevice {
        index: usize,
        device: PlacedDevice,
    },
    UpdateDeviceFace {
        index: usize,
        before: crate::DeviceFace,
        after: crate::DeviceFace,
    },
    UpdateDeviceName {
        index: usize,
        before: Option<String>,
        after: Option<String>,
    },
    AddDeviceType {
        device_type: DeviceType,
    },
    UpdateDeviceType {
        slug: String,
        before: DeviceTypeUpdate,
        after: DeviceTypeUpdate,
    },
    /// `dependents` holds placed instances of the type, ascending by index.
    DeleteDeviceType {
        device_type: DeviceType,
        dependents: Vec<(usize, PlacedDevice)>,
    },
    UpdateRack {
        before: RackUpdate,
        after: RackUpdate,
    },
    ReplaceRack {
        before: Box<Rack>,
        after: Box<Rack>,
    },
    ClearRack {
        devices: Vec<PlacedDevice>,
    },
    Batch(Vec<Command>),
}

/// One reversible user action.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub action: CommandAction,
}

static LAST_CREATED_AT: Mutex<Option<DateTime<Utc>>> = Mutex::new(None);

/// Wall-clock time, clamped so it never runs backwards between commands.
fn next_created_at() -> DateTime<Utc> {
    let now = Utc::now();
    let mut last = LAST_CREATED_AT
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let stamp = match *last {
        Some(previous) if previous > now => previous,
        _ => now,
    };
    *last = Some(stamp);
    stamp
}

impl Command {
    pub fn new(description: impl Into<String>, action: CommandAction) -> Self {
        Self {
            description: description.into(),
            created_at: next_created_at(),
            action,
        }
    }

    pub fn kind(&self) -> CommandKind {
        match &self.action {
            CommandAction::PlaceDevice { .. } => CommandKind::PlaceDevice,
            CommandAction::MoveDevice { .. } => CommandKind::MoveDevice,
            CommandAction::RemoveDevice { .. } => CommandKind::RemoveDevice,
            CommandAction::UpdateDeviceFace { .. } => CommandKind::UpdateDeviceFace,
            CommandAction::UpdateDeviceName { .. } => CommandKind::UpdateDeviceName,
            CommandAction::AddDeviceType { .. } => CommandKind::AddDeviceType,
            CommandAction::UpdateDeviceType { .. } => CommandKind::UpdateDeviceType,
            CommandAction::DeleteDeviceType { .. } => CommandKind::DeleteDeviceType,
            CommandAction::UpdateRack { .. } => CommandKind::UpdateRack,
            CommandAction::ReplaceRack { .. } => CommandKind::ReplaceRack,
            CommandAction::ClearRack { .. } => CommandKind::ClearRack,
            CommandAction::Batch(_) => CommandKind::Batch,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Apply the change to the layout.
    pub fn forward(&mut self, surface: &mut dyn LayoutMutations) -> RackResult<()> {
        match &mut self.action {
            CommandAction::PlaceDevice {
                device,
                placed_index,
            } => device_commands::place_forward(surface, device, placed_index),
            CommandAction::MoveDevice { index, to, .. } => {
                device_commands::move_to(surface, *index, *to)
            }
            CommandAction::RemoveDevice { index, device } => {
                device_commands::remove_forward(surface, *index, device)
            }
            CommandAction::UpdateDeviceFace { index, after, .. } => {
                surface.update_device_face(*index, *after)
            }
            CommandAction::UpdateDeviceName { index, after, .. } => {
                surface.update_device_name(*index, after.clone())
            }
            CommandAction::AddDeviceType { device_type } => {
                surface.add_device_type(device_type.clone())
            }
            CommandAction::UpdateDeviceType { slug, after, .. } => {
                surface.update_device_type(slug, after.clone())
            }
            CommandAction::DeleteDeviceType {
                device_type,
                dependents,
            } => device_type_commands::delete_forward(surface, device_type, dependents),
            CommandAction::UpdateRack { after, .. } => {
                surface.update_rack(after.clone());
                Ok(())
            }
            CommandAction::ReplaceRack { after, .. } => {
                surface.replace_rack(after.as_ref().clone());
                Ok(())
            }
            CommandAction::ClearRack { devices } => {
                *devices = surface.clear_rack_devices();
                Ok(())
            }
            CommandAction::Batch(children) => batch_forward(surface, children),
        }
    }

    /// Undo the effect of the most recent [`Command::forward`].
    pub fn reverse(&mut self, surface: &mut dyn LayoutMutations) -> RackResult<()> {
        match &mut self.action {
            CommandAction::PlaceDevice {
                device,
                placed_index,
            } => device_commands::place_reverse(surface, device, placed_index),
            CommandAction::MoveDevice { index, from, .. } => {
                device_commands::move_to(surface, *index, *from)
            }
            CommandAction::RemoveDevice { index, device } => {
                surface.insert_device(*index, device.clone())
            }
            CommandAction::UpdateDeviceFace { index, before, .. } => {
                surface.update_device_face(*index, *before)
            }
            CommandAction::UpdateDeviceName { index, before, .. } => {
                surface.update_device_name(*index, before.clone())
            }
            CommandAction::AddDeviceType { device_type } => {
                device_type_commands::add_reverse(surface, device_type)
            }
            CommandAction::UpdateDeviceType { slug, before, .. } => {
                surface.update_device_type(slug, before.clone())
            }
            CommandAction::DeleteDeviceType {
                device_type,
                dependents,
            } => device_type_commands::delete_reverse(surface, device_type, dependents),
            CommandAction::UpdateRack { before, .. } => {
                surface.update_rack(before.clone());
                Ok(())
            }
            CommandAction::ReplaceRack { before, .. } => {
                surface.replace_rack(before.as_ref().clone());
                Ok(())
            }
            CommandAction::ClearRack { devices } => {
                surface.restore_rack_devices(devices.clone());
                Ok(())
            }
            CommandAction::Batch(children) => batch_reverse(surface, children),
        }
    }
}

/// Group commands so they undo and redo as one step.
pub fn batch(description: impl Into<String>, commands: Vec<Command>) -> Command {
    Command::new(description, CommandAction::Batch(commands))
}

fn batch_forward(surface: &mut dyn LayoutMutations, children: &mut [Command]) -> RackResult<()> {
    let mut failure = None;
    for (i, child) in children.iter_mut().enumerate() {
        if let Err(e) = child.forward(surface) {
            failure = Some((i, e));
            break;
        }
    }

    let Some((failed_at, error)) = failure else {
        return Ok(());
    };
    // Take back what this pass already applied.
    for child in children[..failed_at].iter_mut().rev() {
        if let Err(rollback) = child.reverse(surface) {
            tracing::warn!(
                "Rollback of '{}' failed after batch error: {}",
                child.description,
                rollback
            );
        }
    }
    Err(error)
}

fn batch_reverse(surface: &mut dyn LayoutMutations, children: &mut [Command]) -> RackResult<()> {
    let mut failure = None;
    for (i, child) in children.iter_mut().enumerate().rev() {
        if let Err(e) = child.reverse(surface) {
            failure = Some((i, e));
            break;
        }
    }

    let Some((failed_at, error)) = failure else {
        return Ok(());
    };
    for child in children[failed_at + 1..].iter_mut() {
        if let Err(rollback) = child.forward(surface) {
            tracing::warn!(
                "Re-applying '{}' failed after batch error: {}",
                child.description,
                rollback
            );
        }
    }
    Err(error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::MockLayoutMutations;
    use crate::{DeviceFace, Layout, LayoutView};
    use mockall::predicate::eq;
    use mockall::Sequence;
    use rackplan_core::RackError;

    #[test]
    fn test_created_at_never_decreases() {
        let first = Command::new("a", CommandAction::ClearRack { devices: vec![] });
        let second = Command::new("b", CommandAction::ClearRack { devices: vec![] });
        assert!(second.created_at >= first.created_at);
    }

    #[test]
    fn test_kind_tags() {
        let cmd = rack_commands::update_rack(RackUpdate::height(42), RackUpdate::height(20));
        assert_eq!(cmd.kind(), CommandKind::UpdateRack);
        assert_eq!(cmd.kind().to_string(), "UPDATE_RACK");
        assert_eq!(batch("Group", vec![cmd]).kind(), CommandKind::Batch);
    }

    #[test]
    fn test_batch_forward_in_order_reverse_in_reverse_order() {
        let mut surface = MockLayoutMutations::new();
        let mut seq = Sequence::new();

        for name in ["c1", "c2", "c3"] {
            surface
                .expect_update_device_name()
                .with(eq(0), eq(Some(name.to_string())))
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_, _| Ok(()));
        }
        for name in ["b3", "b2", "b1"] {
            surface
                .expect_update_device_name()
                .with(eq(0), eq(Some(name.to_string())))
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_, _| Ok(()));
        }

        let names = [("b1", "c1"), ("b2", "c2"), ("b3", "c3")];
        let children = names
            .iter()
            .map(|(before, after)| {
                update_device_name(0, Some(before.to_string()), Some(after.to_string()))
            })
            .collect();
        let mut cmd = batch("Rename thrice", children);

        cmd.forward(&mut surface).unwrap();
        cmd.reverse(&mut surface).unwrap();
    }

    #[test]
    fn test_batch_rolls_back_applied_children_on_failure() {
        let mut layout = Layout::new(Rack::new("Lab", 42));
        layout.place_device(PlacedDevice::new("a", 1, DeviceFace::Front));
        let before = layout.clone();

        let mut cmd = batch(
            "Flip and move",
            vec![
                update_device_face(0, DeviceFace::Front, DeviceFace::Rear),
                move_device(7, 1, 5),
            ],
        );

        let err = cmd.forward(&mut layout).unwrap_err();
        assert!(matches!(err, RackError::NotFound(_)));
        assert_eq!(layout, before);
    }

    #[test]
    fn test_forward_reverse_round_trip_on_layout() {
        let mut layout = Layout::new(Rack::new("Lab", 42));
        layout.place_device(PlacedDevice::new("a", 1, DeviceFace::Front));
        layout.place_device(PlacedDevice::new("b", 4, DeviceFace::Rear));
        let before = layout.clone();

        let mut cmd = remove_device(&layout, 0).unwrap();
        for _ in 0..3 {
            cmd.forward(&mut layout).unwrap();
            assert_eq!(layout.rack().devices.len(), 1);
            cmd.reverse(&mut layout).unwrap();
            assert_eq!(layout, before);
        }
    }
}

use super::{Command, CommandAction};
use crate::{DeviceFace, LayoutMutations, LayoutView, PlacedDevice};
use rackplan_core::{RackError, RackResult};

/// Place a device. The index is assigned when the command first runs.
pub fn place_device(device: &PlacedDevice) -> Command {
    Command::new(
        format!("Place {}", device.display_name()),
        CommandAction::PlaceDevice {
            device: device.clone(),
            placed_index: None,
        },
    )
}

/// Move the device at `index` from one starting unit to another.
pub fn move_device(index: usize, from: u32, to: u32) -> Command {
    Command::new("Move device", CommandAction::MoveDevice { index, from, to })
}

/// Remove the device at `index`, snapshotting it for undo.
pub fn remove_device(layout: &dyn LayoutView, index: usize) -> RackResult<Command> {
    let device = layout
        .device_at(index)
        .ok_or_else(|| RackError::device_not_found(index))?;
    Ok(Command::new(
        format!("Remove {}", device.display_name()),
        CommandAction::RemoveDevice {
            index,
            device: device.clone(),
        },
    ))
}

pub fn update_device_face(index: usize, before: DeviceFace, after: DeviceFace) -> Command {
    Command::new(
        format!("Change device face to {}", after),
        CommandAction::UpdateDeviceFace {
            index,
            before,
            after,
        },
    )
}

pub fn update_device_name(index: usize, before: Option<String>, after: Option<String>) -> Command {
    let description = match &after {
        Some(name) => format!("Rename device to {}", name),
        None => "Clear device name".to_string(),
    };
    Command::new(
        description,
        CommandAction::UpdateDeviceName {
            index,
            before,
            after,
        },
    )
}

pub(super) fn place_forward(
    surface: &mut dyn LayoutMutations,
    device: &PlacedDevice,
    placed_index: &mut Option<usize>,
) -> RackResult<()> {
    *placed_index = Some(surface.place_device(device.clone()));
    Ok(())
}

pub(super) fn place_reverse(
    surface: &mut dyn LayoutMutations,
    device: &mut PlacedDevice,
    placed_index: &mut Option<usize>,
) -> RackResult<()> {
    let index = placed_index.ok_or_else(|| {
        RackError::InvalidCommand(format!(
            "cannot undo placement of '{}' before it was applied",
            device.device_type
        ))
    })?;
    let removed = surface
        .remove_device_at(index)
        .ok_or_else(|| RackError::device_not_found(index))?;
    // Keep any edits made while placed so redo puts back the same device.
    *device = removed;
    *placed_index = None;
    Ok(())
}

pub(super) fn move_to(
    surface: &mut dyn LayoutMutations,
    index: usize,
    position: u32,
) -> RackResult<()> {
    if surface.move_device(index, position) {
        Ok(())
    } else {
        Err(RackError::NotFound(format!(
            "cannot move device {} to U{}",
            index, position
        )))
    }
}

pub(super) fn remove_forward(
    surface: &mut dyn LayoutMutations,
    index: usize,
    device: &mut PlacedDevice,
) -> RackResult<()> {
    *device = surface
        .remove_device_at(index)
        .ok_or_else(|| RackError::device_not_found(index))?;
    Ok(())
}

use super::{Command, CommandAction};
use crate::{LayoutView, Rack, RackUpdate};
use rackplan_core::{Editable, RackError, RackResult};

/// Update rack settings from explicit before/after values.
pub fn update_rack(before: RackUpdate, after: RackUpdate) -> Command {
    let description = match (&after.name, after.height) {
        (None, Some(height)) => format!("Resize rack to {}U", height),
        (Some(name), None) => format!("Rename rack to {}", name),
        _ => "Update rack".to_string(),
    };
    Command::new(description, CommandAction::UpdateRack { before, after })
}

/// Update rack settings, capturing the current values of the fields `after` sets.
pub fn update_rack_from(layout: &dyn LayoutView, after: RackUpdate) -> RackResult<Command> {
    if after.is_empty() {
        return Err(RackError::InvalidCommand(
            "rack update changes nothing".to_string(),
        ));
    }
    let before = RackUpdate::capture(layout.rack(), &after);
    Ok(update_rack(before, after))
}

/// Swap the whole rack. Both racks are copied now, not when the command runs.
pub fn replace_rack(before: &Rack, after: &Rack) -> Command {
    Command::new(
        format!("Replace rack with {}", after.name),
        CommandAction::ReplaceRack {
            before: Box::new(before.clone()),
            after: Box::new(after.clone()),
        },
    )
}

/// Remove every placed device from the rack.
///
/// The devices present now are snapshotted for the label; forward replaces the
/// snapshot with whatever the surface actually removed.
pub fn clear_rack(layout: &dyn LayoutView) -> Command {
    let devices = layout.rack().devices.clone();
    Command::new(
        format!("Clear rack ({} devices)", devices.len()),
        CommandAction::ClearRack { devices },
    )
}

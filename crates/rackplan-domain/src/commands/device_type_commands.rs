use super::{Command, CommandAction};
use crate::{DeviceType, DeviceTypeUpdate, LayoutMutations, LayoutView, PlacedDevice};
use rackplan_core::{Editable, RackError, RackResult};

pub fn add_device_type(device_type: &DeviceType) -> Command {
    Command::new(
        format!("Add device type {}", device_type.model),
        CommandAction::AddDeviceType {
            device_type: device_type.clone(),
        },
    )
}

/// Update a device type, capturing the fields `after` touches from the current value.
pub fn update_device_type(
    layout: &dyn LayoutView,
    slug: &str,
    after: DeviceTypeUpdate,
) -> RackResult<Command> {
    let current = layout
        .device_type(slug)
        .ok_or_else(|| RackError::device_type_not_found(slug))?;
    let before = DeviceTypeUpdate::capture(current, &after);
    Ok(Command::new(
        format!("Update device type {}", current.model),
        CommandAction::UpdateDeviceType {
            slug: slug.to_string(),
            before,
            after,
        },
    ))
}

/// Delete a device type together with every placed instance of it.
pub fn delete_device_type(layout: &dyn LayoutView, slug: &str) -> RackResult<Command> {
    let device_type = layout
        .device_type(slug)
        .ok_or_else(|| RackError::device_type_not_found(slug))?;
    let dependents: Vec<(usize, PlacedDevice)> = layout
        .device_indices_of_type(slug)
        .into_iter()
        .filter_map(|i| layout.device_at(i).map(|d| (i, d.clone())))
        .collect();

    let description = if dependents.is_empty() {
        format!("Delete device type {}", device_type.model)
    } else {
        format!(
            "Delete device type {} and {} placed device(s)",
            device_type.model,
            dependents.len()
        )
    };
    Ok(Command::new(
        description,
        CommandAction::DeleteDeviceType {
            device_type: device_type.clone(),
            dependents,
        },
    ))
}

pub(super) fn add_reverse(
    surface: &mut dyn LayoutMutations,
    device_type: &DeviceType,
) -> RackResult<()> {
    surface
        .remove_device_type(&device_type.slug)
        .map(|_| ())
        .ok_or_else(|| RackError::device_type_not_found(&device_type.slug))
}

/// Children go first, highest index first, so earlier indices stay valid.
pub(super) fn delete_forward(
    surface: &mut dyn LayoutMutations,
    device_type: &mut DeviceType,
    dependents: &mut [(usize, PlacedDevice)],
) -> RackResult<()> {
    let mut removed_count = 0;
    let mut failure = None;
    for (index, device) in dependents.iter_mut().rev() {
        match surface.remove_device_at(*index) {
            Some(removed) => {
                *device = removed;
                removed_count += 1;
            }
            None => {
                failure = Some(RackError::device_not_found(*index));
                break;
            }
        }
    }

    if failure.is_none() {
        match surface.remove_device_type(&device_type.slug) {
            Some(removed) => {
                *device_type = removed;
                return Ok(());
            }
            None => failure = Some(RackError::device_type_not_found(&device_type.slug)),
        }
    }

    let start = dependents.len() - removed_count;
    for (index, device) in dependents[start..].iter() {
        if let Err(e) = surface.insert_device(*index, device.clone()) {
            tracing::warn!("Could not put back device at {}: {}", index, e);
        }
    }
    Err(failure.unwrap_or_else(|| RackError::Internal("device type removal failed".to_string())))
}

/// Parent goes back first so restored devices always reference a known type.
pub(super) fn delete_reverse(
    surface: &mut dyn LayoutMutations,
    device_type: &DeviceType,
    dependents: &[(usize, PlacedDevice)],
) -> RackResult<()> {
    surface.add_device_type(device_type.clone())?;

    let mut inserted = 0;
    let mut failure = None;
    for (index, device) in dependents {
        match surface.insert_device(*index, device.clone()) {
            Ok(()) => inserted += 1,
            Err(e) => {
                failure = Some(e);
                break;
            }
        }
    }
    let Some(failure) = failure else {
        return Ok(());
    };

    for (index, _) in dependents[..inserted].iter().rev() {
        if surface.remove_device_at(*index).is_none() {
            tracing::warn!("Could not take back restored device at {}", index);
        }
    }
    if surface.remove_device_type(&device_type.slug).is_none() {
        tracing::warn!("Could not take back device type {}", device_type.slug);
    }
    Err(failure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::MockLayoutMutations;
    use crate::{DeviceFace, FieldUpdate, Layout, Rack};
    use mockall::predicate::eq;
    use mockall::Sequence;

    fn layout() -> Layout {
        let mut layout = Layout::new(Rack::new("Lab", 42));
        layout
            .add_device_type(DeviceType::new("server", "1U Server", 1))
            .unwrap();
        layout
            .add_device_type(DeviceType::new("switch", "Switch", 1))
            .unwrap();
        layout.place_device(PlacedDevice::new("server", 1, DeviceFace::Front));
        layout.place_device(PlacedDevice::new("switch", 2, DeviceFace::Front));
        layout.place_device(PlacedDevice::new("server", 3, DeviceFace::Front));
        layout
    }

    #[test]
    fn test_add_then_undo() {
        let mut layout = layout();
        let before = layout.clone();
        let mut cmd = add_device_type(&DeviceType::new("pdu", "PDU", 1));

        cmd.forward(&mut layout).unwrap();
        assert!(layout.device_type("pdu").is_some());
        cmd.reverse(&mut layout).unwrap();
        assert_eq!(layout, before);
    }

    #[test]
    fn test_update_round_trip() {
        let mut layout = layout();
        let before = layout.clone();
        let after = DeviceTypeUpdate {
            u_height: Some(2),
            manufacturer: FieldUpdate::Set("Dell".to_string()),
            ..Default::default()
        };
        let mut cmd = update_device_type(&layout, "server", after).unwrap();

        cmd.forward(&mut layout).unwrap();
        let updated = layout.device_type("server").unwrap();
        assert_eq!(updated.u_height, 2);
        assert_eq!(updated.manufacturer.as_deref(), Some("Dell"));

        cmd.reverse(&mut layout).unwrap();
        assert_eq!(layout, before);
    }

    #[test]
    fn test_delete_with_children_round_trip() {
        let mut layout = layout();
        let before = layout.clone();
        let mut cmd = delete_device_type(&layout, "server").unwrap();

        cmd.forward(&mut layout).unwrap();
        assert!(layout.device_type("server").is_none());
        assert_eq!(layout.rack.devices.len(), 1);
        assert_eq!(layout.rack.devices[0].device_type, "switch");

        cmd.reverse(&mut layout).unwrap();
        assert_eq!(layout, before);
    }

    #[test]
    fn test_delete_restores_parent_before_children() {
        let server = DeviceType::new("server", "1U Server", 1);
        let a = PlacedDevice::new("server", 1, DeviceFace::Front);
        let b = PlacedDevice::new("server", 3, DeviceFace::Front);

        let mut surface = MockLayoutMutations::new();
        let mut seq = Sequence::new();
        surface
            .expect_add_device_type()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        surface
            .expect_insert_device()
            .with(eq(0), eq(a.clone()))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        surface
            .expect_insert_device()
            .with(eq(2), eq(b.clone()))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));

        let mut cmd = Command::new(
            "Delete device type",
            CommandAction::DeleteDeviceType {
                device_type: server,
                dependents: vec![(0, a), (2, b)],
            },
        );
        cmd.reverse(&mut surface).unwrap();
    }

    #[test]
    fn test_failed_delete_reverse_takes_back_partial_restore() {
        let server = DeviceType::new("server", "1U Server", 1);
        let a = PlacedDevice::new("server", 1, DeviceFace::Front);
        let b = PlacedDevice::new("server", 3, DeviceFace::Front);

        let mut surface = MockLayoutMutations::new();
        let mut seq = Sequence::new();
        surface
            .expect_add_device_type()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        surface
            .expect_insert_device()
            .with(eq(0), eq(a.clone()))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        surface
            .expect_insert_device()
            .with(eq(2), eq(b.clone()))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|index, _| Err(RackError::Validation(format!("index {} out of range", index))));
        let restored = a.clone();
        surface
            .expect_remove_device_at()
            .with(eq(0))
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| Some(restored.clone()));
        surface
            .expect_remove_device_type()
            .withf(|slug| slug == "server")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Some(DeviceType::new("server", "1U Server", 1)));

        let mut cmd = Command::new(
            "Delete device type",
            CommandAction::DeleteDeviceType {
                device_type: server,
                dependents: vec![(0, a), (2, b)],
            },
        );
        assert!(matches!(
            cmd.reverse(&mut surface),
            Err(RackError::Validation(_))
        ));
    }

    #[test]
    fn test_delete_forward_removes_children_highest_first() {
        let mut surface = MockLayoutMutations::new();
        let mut seq = Sequence::new();
        surface
            .expect_remove_device_at()
            .with(eq(2))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Some(PlacedDevice::new("server", 3, DeviceFace::Front)));
        surface
            .expect_remove_device_at()
            .with(eq(0))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Some(PlacedDevice::new("server", 1, DeviceFace::Front)));
        surface
            .expect_remove_device_type()
            .withf(|slug| slug == "server")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Some(DeviceType::new("server", "1U Server", 1)));

        let layout = layout();
        let mut cmd = delete_device_type(&layout, "server").unwrap();
        cmd.forward(&mut surface).unwrap();
    }

    #[test]
    fn test_missing_type_is_not_found() {
        let layout = layout();
        assert!(matches!(
            delete_device_type(&layout, "ghost"),
            Err(RackError::NotFound(_))
        ));
        assert!(matches!(
            update_device_type(&layout, "ghost", DeviceTypeUpdate::default()),
            Err(RackError::NotFound(_))
        ));
    }
}

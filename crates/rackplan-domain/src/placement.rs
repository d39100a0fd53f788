//! Placement legality checks, run before a placement or move command is built.

use crate::{DeviceFace, LayoutView};
use rackplan_core::{RackError, RackResult};

/// Highest unit occupied by a device of `u_height` whose bottom sits at `position`.
pub fn top_unit(position: u32, u_height: u32) -> RackResult<u32> {
    position
        .checked_add(u_height.max(1) - 1)
        .ok_or_else(|| {
            RackError::Validation(format!(
                "a {}U device at U{} runs past the highest addressable unit",
                u_height, position
            ))
        })
}

/// Occupied unit range `[bottom, top]` of a device.
fn unit_range(position: u32, u_height: u32) -> RackResult<(u32, u32)> {
    Ok((position, top_unit(position, u_height)?))
}

fn ranges_overlap(a: (u32, u32), b: (u32, u32)) -> bool {
    a.0 <= b.1 && b.0 <= a.1
}

/// Indices of placed devices that would collide with a device of type `slug`
/// at `position` on `face`. The device at `exclude_index` is ignored so a move
/// does not collide with itself.
pub fn find_collisions(
    layout: &dyn LayoutView,
    slug: &str,
    position: u32,
    face: DeviceFace,
    exclude_index: Option<usize>,
) -> RackResult<Vec<usize>> {
    let candidate = layout
        .device_type(slug)
        .ok_or_else(|| RackError::device_type_not_found(slug))?;
    let range = unit_range(position, candidate.u_height)?;

    let mut collisions = Vec::new();
    for (index, other) in layout.rack().devices.iter().enumerate() {
        if Some(index) == exclude_index {
            continue;
        }
        // Devices whose type is gone take up a single unit.
        let (other_height, other_full_depth) = layout
            .device_type(&other.device_type)
            .map(|t| (t.u_height, t.is_full_depth))
            .unwrap_or((1, false));

        let faces_clash = candidate.is_full_depth
            || other_full_depth
            || face.overlaps(other.face);
        let other_range =
            unit_range(other.position, other_height).unwrap_or((other.position, u32::MAX));
        if faces_clash && ranges_overlap(range, other_range) {
            collisions.push(index);
        }
    }
    Ok(collisions)
}

/// Check that a device of type `slug` fits at `position` on `face`.
pub fn can_place(
    layout: &dyn LayoutView,
    slug: &str,
    position: u32,
    face: DeviceFace,
    exclude_index: Option<usize>,
) -> RackResult<()> {
    let device_type = layout
        .device_type(slug)
        .ok_or_else(|| RackError::device_type_not_found(slug))?;

    if position == 0 {
        return Err(RackError::Validation(
            "position must be at least 1".to_string(),
        ));
    }

    let top = top_unit(position, device_type.u_height)?;
    let rack_height = layout.rack().height;
    if top > rack_height {
        return Err(RackError::Validation(format!(
            "'{}' at U{} needs U{} but the rack is {}U",
            slug, position, top, rack_height
        )));
    }

    let collisions = find_collisions(layout, slug, position, face, exclude_index)?;
    if let Some(first) = collisions.first() {
        return Err(RackError::Validation(format!(
            "U{}-U{} on the {} face is occupied by device {}",
            position, top, face, first
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DeviceType, Layout, LayoutMutations, PlacedDevice, Rack};

    fn layout() -> Layout {
        let mut layout = Layout::new(Rack::new("Lab", 10));
        layout
            .add_device_type(DeviceType::new("server-2u", "2U Server", 2))
            .unwrap();
        layout
            .add_device_type(DeviceType::new("patch", "Patch Panel", 1).half_depth())
            .unwrap();
        layout
    }

    #[test]
    fn test_fits_in_empty_rack() {
        assert!(can_place(&layout(), "server-2u", 1, DeviceFace::Front, None).is_ok());
        assert!(can_place(&layout(), "server-2u", 9, DeviceFace::Front, None).is_ok());
    }

    #[test]
    fn test_rejects_overflow_and_zero() {
        let layout = layout();
        assert!(can_place(&layout, "server-2u", 10, DeviceFace::Front, None).is_err());
        assert!(can_place(&layout, "server-2u", 0, DeviceFace::Front, None).is_err());
    }

    #[test]
    fn test_highest_position_is_rejected_not_wrapped() {
        let layout = layout();
        let err = can_place(&layout, "server-2u", u32::MAX, DeviceFace::Front, None).unwrap_err();
        assert!(matches!(err, RackError::Validation(_)));
        assert!(find_collisions(&layout, "server-2u", u32::MAX, DeviceFace::Front, None).is_err());
        assert!(top_unit(u32::MAX, 1).is_ok());
    }

    #[test]
    fn test_unknown_type_is_not_found() {
        let err = can_place(&layout(), "ghost", 1, DeviceFace::Front, None).unwrap_err();
        assert!(matches!(err, RackError::NotFound(_)));
    }

    #[test]
    fn test_full_depth_blocks_both_faces() {
        let mut layout = layout();
        layout.place_device(PlacedDevice::new("server-2u", 3, DeviceFace::Front));

        assert!(can_place(&layout, "patch", 4, DeviceFace::Rear, None).is_err());
        assert_eq!(
            find_collisions(&layout, "patch", 4, DeviceFace::Rear, None).unwrap(),
            vec![0]
        );
        assert!(can_place(&layout, "patch", 5, DeviceFace::Rear, None).is_ok());
    }

    #[test]
    fn test_half_depth_devices_share_a_unit_on_opposite_faces() {
        let mut layout = layout();
        layout.place_device(PlacedDevice::new("patch", 1, DeviceFace::Front));

        assert!(can_place(&layout, "patch", 1, DeviceFace::Rear, None).is_ok());
        assert!(can_place(&layout, "patch", 1, DeviceFace::Front, None).is_err());
        assert!(can_place(&layout, "patch", 1, DeviceFace::Both, None).is_err());
    }

    #[test]
    fn test_move_ignores_itself() {
        let mut layout = layout();
        layout.place_device(PlacedDevice::new("server-2u", 1, DeviceFace::Front));
        assert!(can_place(&layout, "server-2u", 2, DeviceFace::Front, Some(0)).is_ok());
        assert!(can_place(&layout, "server-2u", 2, DeviceFace::Front, None).is_err());
    }
}

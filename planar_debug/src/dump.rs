// Copyright 2026 the Planar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text dumps of a frame's assignment and of a plane inventory.
//!
//! The layer table uses the column layout composer dumps have always used,
//! so existing log tooling keeps working:
//!
//! ```text
//!  LAYER |          TYPE          |   PLANE  | INDEX | Z Order
//! -------+------------------------+----------+-------+--------
//!    0   |                 HWC_FB |      N/A |  -1   |  -1
//!    1   |            HWC_OVERLAY |  OVERLAY |   0   |   1
//!    2   | HWC_FRAMEBUFFER_TARGET |  PRIMARY |   0   |   0
//! ```

use std::fmt::Write;

use planar_core::inventory::PlaneInventory;
use planar_core::layer::{Layer, LayerAssignment, LayerRole};
use planar_core::plane::PlaneType;

/// Composition label of a layer, as printed in the TYPE column.
#[must_use]
pub fn type_label(layer: &Layer) -> &'static str {
    match (layer.role, layer.assignment) {
        (LayerRole::FrameBufferTarget, _) => "HWC_FRAMEBUFFER_TARGET",
        (_, _) if layer.flags.sideband => "HWC_SIDEBAND",
        (LayerRole::Preplaced, _) => "HWC_OVERLAY",
        (_, LayerAssignment::Plane { plane, .. }) if plane.plane_type == PlaneType::Cursor => {
            "HWC_CURSOR_OVERLAY"
        }
        (_, LayerAssignment::Plane { .. }) => "HWC_OVERLAY",
        (_, LayerAssignment::GpuComposed) => "HWC_FB",
        (_, LayerAssignment::Unassigned) => "UNASSIGNED",
    }
}

/// Renders the assignment table of a frame.
#[must_use]
pub fn layers(layers: &[Layer]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, " LAYER |          TYPE          |   PLANE  | INDEX | Z Order ");
    let _ = writeln!(out, "-------+------------------------+----------+-------+--------");
    for layer in layers {
        let (plane, index, z_order) = match layer.assignment {
            LayerAssignment::Plane { plane, z_order } => (
                plane.plane_type.name(),
                i64::from(plane.index),
                i64::from(z_order),
            ),
            LayerAssignment::Unassigned | LayerAssignment::GpuComposed => ("N/A", -1, -1),
        };
        let _ = writeln!(
            out,
            "  {:2}   | {:>22} | {:>8} | {:3}   | {:3} ",
            layer.index,
            type_label(layer),
            plane,
            index,
            z_order,
        );
    }
    out
}

/// Renders the free and reclaimed state of each plane type.
#[must_use]
pub fn inventory(inventory: &PlaneInventory) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "display {}: {} reclaimed",
        inventory.display().0,
        inventory.reclaimed_count(),
    );
    for ty in PlaneType::ALL {
        let total = inventory.total(ty);
        if total == 0 {
            continue;
        }
        let _ = writeln!(
            out,
            "  {:>8} {}/{} available",
            ty.name(),
            inventory.free_count(ty),
            total,
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use planar_core::display::DisplayId;
    use planar_core::inventory::InventoryConfig;
    use planar_core::kurbo::Rect;
    use planar_core::layer::{BufferId, LayerFlags};
    use planar_core::plane::PlaneHandle;

    const SCREEN: Rect = Rect::new(0.0, 0.0, 1920.0, 1080.0);

    #[test]
    fn table_marks_gpu_and_plane_layers() {
        let mut wallpaper = Layer::new(0, BufferId(1), SCREEN);
        wallpaper.assignment = LayerAssignment::GpuComposed;
        let mut pointer = Layer::new(1, BufferId(2), Rect::new(10.0, 10.0, 74.0, 74.0));
        pointer.assignment = LayerAssignment::Plane {
            plane: PlaneHandle::new(PlaneType::Cursor, 0),
            z_order: 1,
        };
        let mut target = Layer::frame_buffer_target(2, None, SCREEN);
        target.assignment = LayerAssignment::Plane {
            plane: PlaneHandle::new(PlaneType::Primary, 0),
            z_order: 0,
        };

        let table = layers(&[wallpaper, pointer, target]);
        let rows: Vec<&str> = table.lines().collect();
        assert_eq!(rows.len(), 5);
        assert!(rows[0].starts_with(" LAYER |"));
        assert_eq!(rows[2], "   0   |                 HWC_FB |      N/A |  -1   |  -1 ");
        assert_eq!(rows[3], "   1   |     HWC_CURSOR_OVERLAY |   CURSOR |   0   |   1 ");
        assert!(rows[4].contains("HWC_FRAMEBUFFER_TARGET |  PRIMARY"));
    }

    #[test]
    fn sideband_label_wins_over_assignment() {
        let mut tv = Layer::new(0, BufferId(1), SCREEN).with_flags(LayerFlags {
            sideband: true,
            ..LayerFlags::default()
        });
        tv.assignment = LayerAssignment::GpuComposed;
        assert_eq!(type_label(&tv), "HWC_SIDEBAND");
    }

    #[test]
    fn inventory_lists_present_types() {
        let mut inv = PlaneInventory::new(DisplayId(1), InventoryConfig::secondary_pipe());
        let sprite = inv.acquire(PlaneType::Sprite).unwrap();
        let text = inventory(&inv);
        assert!(text.starts_with("display 1: 0 reclaimed"));
        assert!(text.contains("  SPRITE 0/1 available"));
        assert!(text.contains(" OVERLAY 2/2 available"));

        inv.reclaim(sprite);
        let text = inventory(&inv);
        assert!(text.starts_with("display 1: 1 reclaimed"));
        assert!(text.contains("  SPRITE 1/1 available"));
    }
}

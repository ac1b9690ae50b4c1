// Copyright 2026 the Planar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-frame layer record.

use kurbo::Rect;

use super::format::{Blending, PixelFormat, Transform};
use super::id::BufferId;
use crate::plane::{PlaneHandle, PlaneType};

/// Per-layer boolean flags set by the compositor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LayerFlags {
    /// The compositor asked for this layer to be skipped by hardware
    /// composition; it is always GPU composed.
    pub skip: bool,
    /// Explicit override: compose this layer with the GPU. Also set by the
    /// pass itself when a commit fails and the layer is demoted.
    pub force_gpu: bool,
    /// Content arrives through a sideband stream; never placed on a plane.
    pub sideband: bool,
    /// The layer is the pointer.
    pub is_cursor: bool,
    /// Content changed since the previous frame.
    pub updated: bool,
}

/// What a layer is for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LayerRole {
    /// Ordinary content.
    #[default]
    Content,
    /// The GPU composition output. Exactly one per frame.
    FrameBufferTarget,
    /// Already placed on hardware by an upstream analyzer; the pass neither
    /// classifies it nor touches its assignment.
    Preplaced,
}

/// Result of the pass for one layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LayerAssignment {
    /// Not decided (yet), or the frame was dropped.
    #[default]
    Unassigned,
    /// Scanned out by a hardware plane at stack position `z_order`
    /// (0 = bottom of the committed plane stack).
    Plane {
        /// The bound plane.
        plane: PlaneHandle,
        /// Position in the committed plane stack.
        z_order: u32,
    },
    /// Composed by the GPU into the frame buffer target.
    GpuComposed,
}

impl LayerAssignment {
    /// Returns the plane type, if the layer is on a plane.
    #[must_use]
    pub const fn plane_type(self) -> Option<PlaneType> {
        match self {
            Self::Plane { plane, .. } => Some(plane.plane_type),
            Self::Unassigned | Self::GpuComposed => None,
        }
    }

    /// Whether the layer is on a hardware plane.
    #[must_use]
    pub const fn is_plane(self) -> bool {
        matches!(self, Self::Plane { .. })
    }
}

/// One visible surface for this frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    /// Z-order position in the input list, 0 = bottom.
    pub index: u32,
    /// Role of the layer in the frame.
    pub role: LayerRole,
    /// Buffer to scan out; `None` for a layer without content.
    pub buffer: Option<BufferId>,
    /// Source crop in buffer pixels.
    pub src_rect: Rect,
    /// Destination rectangle on the display.
    pub dst_rect: Rect,
    /// Pixel format of the buffer.
    pub format: PixelFormat,
    /// Row stride of the buffer in bytes (first plane).
    pub stride: u32,
    /// Transform applied at scan-out.
    pub transform: Transform,
    /// Blending with lower layers.
    pub blending: Blending,
    /// Plane-wide alpha, 255 = opaque.
    pub plane_alpha: u8,
    /// Compositor flags.
    pub flags: LayerFlags,
    /// Written by the pass.
    pub assignment: LayerAssignment,
}

impl Layer {
    /// Creates an opaque, unscaled BGRA content layer covering `dst_rect`.
    ///
    /// The source crop is the destination size anchored at the origin, and
    /// the stride is derived from the width.
    #[must_use]
    pub fn new(index: u32, buffer: BufferId, dst_rect: Rect) -> Self {
        let src_rect = Rect::from_origin_size((0.0, 0.0), dst_rect.size());
        #[expect(
            clippy::cast_possible_truncation,
            reason = "display frames are far below u32::MAX pixels wide"
        )]
        let stride = (dst_rect.width().max(0.0) as u32) * PixelFormat::BGRA_8888.bytes_per_pixel();
        Self {
            index,
            role: LayerRole::Content,
            buffer: Some(buffer),
            src_rect,
            dst_rect,
            format: PixelFormat::BGRA_8888,
            stride,
            transform: Transform::Identity,
            blending: Blending::None,
            plane_alpha: u8::MAX,
            flags: LayerFlags::default(),
            assignment: LayerAssignment::Unassigned,
        }
    }

    /// Creates the frame buffer target layer covering the whole display.
    #[must_use]
    pub fn frame_buffer_target(index: u32, buffer: Option<BufferId>, display: Rect) -> Self {
        let mut layer = Self::new(index, BufferId(0), display);
        layer.buffer = buffer;
        layer.role = LayerRole::FrameBufferTarget;
        layer.blending = Blending::Premultiplied;
        layer
    }

    /// Sets the source crop.
    #[must_use]
    pub fn with_src(mut self, src_rect: Rect) -> Self {
        self.src_rect = src_rect;
        self
    }

    /// Sets the pixel format.
    #[must_use]
    pub fn with_format(mut self, format: PixelFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets the transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Sets the blending mode.
    #[must_use]
    pub fn with_blending(mut self, blending: Blending) -> Self {
        self.blending = blending;
        self
    }

    /// Sets the flags.
    #[must_use]
    pub fn with_flags(mut self, flags: LayerFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Sets the role.
    #[must_use]
    pub fn with_role(mut self, role: LayerRole) -> Self {
        self.role = role;
        self
    }

    /// Whether source and destination sizes differ.
    ///
    /// Sizes are compared after truncating the source crop to whole pixels.
    #[must_use]
    pub fn is_scaled(&self) -> bool {
        let src = self.src_rect.abs().trunc().size();
        let dst = self.dst_rect.abs().size();
        let (src_w, src_h) = if self.transform.swaps_axes() {
            (src.height, src.width)
        } else {
            (src.width, src.height)
        };
        src_w != dst.width || src_h != dst.height
    }

    /// Whether the layer can be treated as fully opaque.
    #[must_use]
    pub fn is_opaque(&self) -> bool {
        self.plane_alpha == u8::MAX
            && (self.blending == Blending::None || !self.format.has_alpha())
    }

    /// Whether the pass may consider this layer for a hardware plane at all.
    ///
    /// Skipped, forced, sideband and buffer-less layers stay on the GPU.
    #[must_use]
    pub fn is_plane_eligible(&self) -> bool {
        self.role == LayerRole::Content
            && !self.flags.skip
            && !self.flags.force_gpu
            && !self.flags.sideband
            && self.buffer.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_layer_is_unscaled_and_opaque() {
        let l = Layer::new(0, BufferId(1), Rect::new(10.0, 10.0, 110.0, 60.0));
        assert!(!l.is_scaled());
        assert!(l.is_opaque());
        assert!(l.is_plane_eligible());
        assert_eq!(l.stride, 400);
    }

    #[test]
    fn fractional_crop_is_truncated_before_comparing() {
        let l = Layer::new(0, BufferId(1), Rect::new(0.0, 0.0, 64.0, 64.0))
            .with_src(Rect::new(0.0, 0.0, 64.7, 64.2));
        assert!(!l.is_scaled());
    }

    #[test]
    fn rotation_swaps_axes_for_scaling_check() {
        let l = Layer::new(0, BufferId(1), Rect::new(0.0, 0.0, 200.0, 100.0))
            .with_src(Rect::new(0.0, 0.0, 100.0, 200.0));
        assert!(l.is_scaled());
        assert!(!l.with_transform(Transform::Rot90).is_scaled());
    }

    #[test]
    fn flags_remove_eligibility() {
        let base = Layer::new(0, BufferId(1), Rect::new(0.0, 0.0, 8.0, 8.0));
        for flags in [
            LayerFlags {
                skip: true,
                ..LayerFlags::default()
            },
            LayerFlags {
                force_gpu: true,
                ..LayerFlags::default()
            },
            LayerFlags {
                sideband: true,
                ..LayerFlags::default()
            },
        ] {
            assert!(!base.clone().with_flags(flags).is_plane_eligible());
        }
        let mut no_buffer = base.clone();
        no_buffer.buffer = None;
        assert!(!no_buffer.is_plane_eligible());
    }

    #[test]
    fn blended_alpha_layer_is_not_opaque() {
        let l = Layer::new(0, BufferId(1), Rect::new(0.0, 0.0, 8.0, 8.0))
            .with_blending(Blending::Premultiplied);
        assert!(!l.is_opaque());
        assert!(l.with_format(PixelFormat::BGRX_8888).is_opaque());
    }
}

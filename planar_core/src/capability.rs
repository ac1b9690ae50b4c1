// Copyright 2026 the Planar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The capability oracle seam.
//!
//! The classifier never hard-codes what a plane can scan out; it asks a
//! [`CapabilityOracle`]. Real deployments back the oracle with the driver's
//! per-plane format and scaling tables. [`LimitsOracle`] is a table-driven
//! implementation whose thresholds come from [`CapabilityLimits`].

use kurbo::Size;

use crate::layer::{Blending, Layer, PixelFormat, Transform};
use crate::plane::PlaneType;

/// Answers whether a plane type can scan out a layer as-is.
///
/// Answers must be pure: for the same layer the oracle must give the same
/// answer for the whole pass, or the search loses its determinism.
pub trait CapabilityOracle {
    /// Whether a plane of `plane_type` can display `layer`.
    fn supports(&self, plane_type: PlaneType, layer: &Layer) -> bool;

    /// Whether an unscaled, unblended RGB layer is small enough to be
    /// offered to an overlay plane as well as to sprites.
    ///
    /// The default never offers RGB layers to overlays.
    fn rgb_overlay_fits(&self, layer: &Layer) -> bool {
        _ = layer;
        false
    }
}

impl<T: CapabilityOracle + ?Sized> CapabilityOracle for &T {
    fn supports(&self, plane_type: PlaneType, layer: &Layer) -> bool {
        (**self).supports(plane_type, layer)
    }

    fn rgb_overlay_fits(&self, layer: &Layer) -> bool {
        (**self).rgb_overlay_fits(layer)
    }
}

/// Hardware-tuned thresholds for [`LimitsOracle`].
///
/// These are device data, not algorithm constants. Take them from the
/// display engine's documentation or validation results.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CapabilityLimits {
    /// Largest cursor plane size.
    pub cursor_max: Size,
    /// Largest stride, in bytes, an RGB layer may have to be offered to an
    /// overlay plane.
    pub rgb_overlay_max_stride: u32,
    /// Largest source crop any plane can fetch.
    pub max_source: Size,
    /// Largest source/destination ratio an overlay can shrink by.
    pub overlay_max_downscale: f64,
    /// Largest destination/source ratio an overlay can stretch by.
    pub overlay_max_upscale: f64,
    /// Sprites can rotate by 180 degrees during scan-out.
    pub sprite_rotate_180: bool,
}

impl CapabilityLimits {
    /// Creates limits with the given cursor size and RGB-overlay stride and
    /// typical values for the rest.
    #[must_use]
    pub const fn new(cursor_max: Size, rgb_overlay_max_stride: u32) -> Self {
        Self {
            cursor_max,
            rgb_overlay_max_stride,
            max_source: Size::new(4096.0, 4096.0),
            overlay_max_downscale: 4.0,
            overlay_max_upscale: 8.0,
            sprite_rotate_180: false,
        }
    }

    /// Limits of a mid-range mobile display engine.
    #[must_use]
    pub const fn mobile() -> Self {
        Self::new(Size::new(256.0, 256.0), 4096)
    }

    /// Accepts anything the plane types can structurally handle.
    #[must_use]
    pub const fn permissive() -> Self {
        Self {
            cursor_max: Size::new(f64::INFINITY, f64::INFINITY),
            rgb_overlay_max_stride: u32::MAX,
            max_source: Size::new(f64::INFINITY, f64::INFINITY),
            overlay_max_downscale: f64::INFINITY,
            overlay_max_upscale: f64::INFINITY,
            sprite_rotate_180: true,
        }
    }
}

impl Default for CapabilityLimits {
    fn default() -> Self {
        Self::mobile()
    }
}

/// A [`CapabilityOracle`] driven by a [`CapabilityLimits`] table.
///
/// | Plane   | Formats        | Scaling        | Transform          |
/// |---------|----------------|----------------|--------------------|
/// | cursor  | RGBA/BGRA      | none           | identity           |
/// | overlay | RGB and YUV    | within limits  | any                |
/// | sprite  | RGB            | none           | identity (or 180°) |
/// | primary | RGB            | none           | identity           |
///
/// Overlays additionally refuse coverage blending.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LimitsOracle {
    limits: CapabilityLimits,
}

impl LimitsOracle {
    /// Creates an oracle from a limits table.
    #[must_use]
    pub const fn new(limits: CapabilityLimits) -> Self {
        Self { limits }
    }

    /// Shorthand for `LimitsOracle::new(CapabilityLimits::permissive())`.
    #[must_use]
    pub const fn permissive() -> Self {
        Self::new(CapabilityLimits::permissive())
    }

    /// The thresholds in use.
    #[must_use]
    pub fn limits(&self) -> &CapabilityLimits {
        &self.limits
    }

    fn source_fits(&self, layer: &Layer) -> bool {
        let src = layer.src_rect.abs().size();
        src.width <= self.limits.max_source.width && src.height <= self.limits.max_source.height
    }

    fn scale_fits(&self, layer: &Layer) -> bool {
        let src = layer.src_rect.abs().size();
        let dst = layer.dst_rect.abs().size();
        let (sw, sh) = if layer.transform.swaps_axes() {
            (src.height, src.width)
        } else {
            (src.width, src.height)
        };
        if sw <= 0.0 || sh <= 0.0 || dst.width <= 0.0 || dst.height <= 0.0 {
            return false;
        }
        let (rx, ry) = (sw / dst.width, sh / dst.height);
        let down = self.limits.overlay_max_downscale;
        let up = self.limits.overlay_max_upscale;
        rx <= down && ry <= down && rx * up >= 1.0 && ry * up >= 1.0
    }
}

impl CapabilityOracle for LimitsOracle {
    fn supports(&self, plane_type: PlaneType, layer: &Layer) -> bool {
        if !self.source_fits(layer) {
            return false;
        }
        match plane_type {
            PlaneType::Cursor => {
                let dst = layer.dst_rect.abs().size();
                (layer.format == PixelFormat::BGRA_8888 || layer.format == PixelFormat::RGBA_8888)
                    && layer.transform.is_identity()
                    && !layer.is_scaled()
                    && dst.width <= self.limits.cursor_max.width
                    && dst.height <= self.limits.cursor_max.height
            }
            PlaneType::Overlay => {
                (layer.format.is_yuv() || layer.format.is_rgb())
                    && layer.blending != Blending::Coverage
                    && self.scale_fits(layer)
            }
            PlaneType::Sprite => {
                let rotation_ok = layer.transform.is_identity()
                    || (self.limits.sprite_rotate_180 && layer.transform == Transform::Rot180);
                layer.format.is_rgb() && rotation_ok && !layer.is_scaled()
            }
            PlaneType::Primary => {
                layer.format.is_rgb() && layer.transform.is_identity() && !layer.is_scaled()
            }
        }
    }

    fn rgb_overlay_fits(&self, layer: &Layer) -> bool {
        layer.format.is_rgb() && layer.stride <= self.limits.rgb_overlay_max_stride
    }
}

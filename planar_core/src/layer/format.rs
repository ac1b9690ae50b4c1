// Copyright 2026 the Planar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Buffer format, transform and blending descriptors.

use core::fmt;

/// A pixel format, identified by its DRM fourcc code.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelFormat(pub u32);

const fn fourcc(code: &[u8; 4]) -> u32 {
    (code[0] as u32) | ((code[1] as u32) << 8) | ((code[2] as u32) << 16) | ((code[3] as u32) << 24)
}

impl PixelFormat {
    /// 32-bit BGRA with alpha.
    pub const BGRA_8888: Self = Self(fourcc(b"AR24"));
    /// 32-bit BGR, alpha byte ignored.
    pub const BGRX_8888: Self = Self(fourcc(b"XR24"));
    /// 32-bit RGBA with alpha.
    pub const RGBA_8888: Self = Self(fourcc(b"AB24"));
    /// 32-bit RGB, alpha byte ignored.
    pub const RGBX_8888: Self = Self(fourcc(b"XB24"));
    /// 16-bit RGB.
    pub const RGB_565: Self = Self(fourcc(b"RG16"));
    /// Two-plane 4:2:0 YUV.
    pub const NV12: Self = Self(fourcc(b"NV12"));
    /// Packed 4:2:2 YUV.
    pub const YUYV: Self = Self(fourcc(b"YUYV"));

    /// Whether the format is one of the RGB formats.
    #[must_use]
    pub const fn is_rgb(self) -> bool {
        matches!(
            self,
            Self::BGRA_8888 | Self::BGRX_8888 | Self::RGBA_8888 | Self::RGBX_8888 | Self::RGB_565
        )
    }

    /// Whether the format is a YUV video format.
    #[must_use]
    pub const fn is_yuv(self) -> bool {
        matches!(self, Self::NV12 | Self::YUYV)
    }

    /// Whether the format carries an alpha channel.
    #[must_use]
    pub const fn has_alpha(self) -> bool {
        matches!(self, Self::BGRA_8888 | Self::RGBA_8888)
    }

    /// Bytes per pixel of the first plane.
    #[must_use]
    pub const fn bytes_per_pixel(self) -> u32 {
        match self {
            Self::RGB_565 | Self::YUYV => 2,
            Self::NV12 => 1,
            _ => 4,
        }
    }
}

impl fmt::Debug for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = self.0.to_le_bytes();
        if b.iter().all(u8::is_ascii_graphic) {
            write!(
                f,
                "PixelFormat({}{}{}{})",
                b[0] as char, b[1] as char, b[2] as char, b[3] as char
            )
        } else {
            write!(f, "PixelFormat({:#010x})", self.0)
        }
    }
}

/// Rotation and reflection applied at scan-out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Transform {
    /// No transform.
    #[default]
    Identity,
    /// Mirror horizontally.
    FlipH,
    /// Mirror vertically.
    FlipV,
    /// Rotate 90 degrees clockwise.
    Rot90,
    /// Rotate 180 degrees.
    Rot180,
    /// Rotate 270 degrees clockwise.
    Rot270,
}

impl Transform {
    /// Returns `true` for [`Identity`](Self::Identity).
    #[must_use]
    pub const fn is_identity(self) -> bool {
        matches!(self, Self::Identity)
    }

    /// Whether width and height are swapped on screen.
    #[must_use]
    pub const fn swaps_axes(self) -> bool {
        matches!(self, Self::Rot90 | Self::Rot270)
    }
}

/// How a layer blends with what is below it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Blending {
    /// Opaque; no blending.
    #[default]
    None,
    /// Source-over with premultiplied alpha.
    Premultiplied,
    /// Source-over with straight (coverage) alpha.
    Coverage,
}

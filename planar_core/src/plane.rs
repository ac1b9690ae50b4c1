// Copyright 2026 the Planar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hardware plane types and handles.

use core::fmt;

/// A class of fixed-function compositing plane.
///
/// Variants are declared in assignment priority order: the search tries to
/// fill cursor planes first and falls through to [`Primary`](Self::Primary),
/// which always exists and hosts the frame buffer target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PlaneType {
    /// Small unscaled plane reserved for the pointer.
    Cursor,
    /// Scaling plane, usually with YUV support (video).
    Overlay,
    /// RGB plane without scaling.
    Sprite,
    /// The bottom plane of the pipe; scans out the frame buffer target.
    Primary,
}

impl PlaneType {
    /// All plane types in priority order.
    pub const ALL: [Self; 4] = [Self::Cursor, Self::Overlay, Self::Sprite, Self::Primary];

    /// Returns the next-weaker plane type, or `None` for [`Primary`](Self::Primary).
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Cursor => Some(Self::Overlay),
            Self::Overlay => Some(Self::Sprite),
            Self::Sprite => Some(Self::Primary),
            Self::Primary => None,
        }
    }

    /// Array slot for per-type tables.
    #[inline]
    #[must_use]
    pub const fn slot(self) -> usize {
        match self {
            Self::Cursor => 0,
            Self::Overlay => 1,
            Self::Sprite => 2,
            Self::Primary => 3,
        }
    }

    /// Short upper-case name used in dumps.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cursor => "CURSOR",
            Self::Overlay => "OVERLAY",
            Self::Sprite => "SPRITE",
            Self::Primary => "PRIMARY",
        }
    }

    /// Whether planes of this type take part in the RGB blend chain.
    #[must_use]
    pub const fn is_rgb(self) -> bool {
        matches!(self, Self::Sprite | Self::Primary)
    }
}

/// A concrete hardware plane: its type plus its index within that type.
///
/// Handles are produced by [`PlaneInventory::acquire`](crate::inventory::PlaneInventory::acquire)
/// and are only meaningful for the display whose inventory produced them.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlaneHandle {
    /// Plane class.
    pub plane_type: PlaneType,
    /// Index within the class.
    pub index: u8,
}

impl PlaneHandle {
    /// Creates a handle.
    #[must_use]
    pub const fn new(plane_type: PlaneType, index: u8) -> Self {
        Self { plane_type, index }
    }
}

impl fmt::Debug for PlaneHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.plane_type.name(), self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_order_ends_at_primary() {
        let mut chain = alloc::vec::Vec::new();
        let mut t = Some(PlaneType::Cursor);
        while let Some(ty) = t {
            chain.push(ty);
            t = ty.next();
        }
        assert_eq!(chain, PlaneType::ALL);
        assert!(PlaneType::Cursor < PlaneType::Primary);
    }

    #[test]
    fn slots_are_distinct() {
        for (i, ty) in PlaneType::ALL.into_iter().enumerate() {
            assert_eq!(ty.slot(), i);
        }
    }

    #[test]
    fn handle_debug_format() {
        let h = PlaneHandle::new(PlaneType::Sprite, 2);
        assert_eq!(alloc::format!("{h:?}"), "SPRITE#2");
    }
}

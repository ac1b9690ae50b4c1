// Copyright 2026 the Planar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-display plane inventory.
//!
//! Each display pipe owns one [`PlaneInventory`]. Planes of a type are
//! tracked in two bitmasks:
//!
//! - **free**: idle planes that may be bound this frame.
//! - **reclaimed**: planes that scanned out a previous frame and have been
//!   handed back. They are bound in preference to free planes because their
//!   cached configuration may still match. Once the caller has disabled
//!   them, [`release_reclaimed`](PlaneInventory::release_reclaimed) merges
//!   them into the free set.
//!
//! Both sets count as available to the search. Nothing here is shared
//! between displays; a handle from one inventory must never be returned to
//! another.

use crate::display::DisplayId;
use crate::plane::{PlaneHandle, PlaneType};

/// Number of planes of each type a display pipe owns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InventoryConfig {
    /// Primary planes. At least one.
    pub primary: u8,
    /// Cursor planes.
    pub cursor: u8,
    /// Overlay planes.
    pub overlay: u8,
    /// Sprite planes.
    pub sprite: u8,
}

impl InventoryConfig {
    /// The main pipe of a typical mobile display engine.
    #[must_use]
    pub const fn single_pipe() -> Self {
        Self {
            primary: 1,
            cursor: 1,
            overlay: 2,
            sprite: 3,
        }
    }

    /// A secondary (external) pipe sharing the overlays but only one sprite.
    #[must_use]
    pub const fn secondary_pipe() -> Self {
        Self {
            primary: 1,
            cursor: 1,
            overlay: 2,
            sprite: 1,
        }
    }

    /// Only the primary plane; every frame is pure GPU composition.
    #[must_use]
    pub const fn primary_only() -> Self {
        Self {
            primary: 1,
            cursor: 0,
            overlay: 0,
            sprite: 0,
        }
    }

    /// Planes of the given type.
    #[must_use]
    pub const fn count(&self, plane_type: PlaneType) -> u8 {
        match plane_type {
            PlaneType::Cursor => self.cursor,
            PlaneType::Overlay => self.overlay,
            PlaneType::Sprite => self.sprite,
            PlaneType::Primary => self.primary,
        }
    }
}

/// Free and reclaimed planes of one display.
#[derive(Clone, Debug)]
pub struct PlaneInventory {
    display: DisplayId,
    counts: [u8; 4],
    free: [u32; 4],
    reclaimed: [u32; 4],
}

impl PlaneInventory {
    /// Creates an inventory with every plane free.
    ///
    /// # Panics
    ///
    /// Panics if `config` has no primary plane or more than 32 planes of a
    /// type.
    #[must_use]
    pub fn new(display: DisplayId, config: InventoryConfig) -> Self {
        assert!(config.primary >= 1, "a display needs a primary plane");
        let mut counts = [0_u8; 4];
        let mut free = [0_u32; 4];
        for ty in PlaneType::ALL {
            let n = config.count(ty);
            assert!(n <= 32, "at most 32 planes per type, got {n} {ty:?}");
            counts[ty.slot()] = n;
            free[ty.slot()] = mask_of(n);
        }
        Self {
            display,
            counts,
            free,
            reclaimed: [0; 4],
        }
    }

    /// The display this inventory belongs to.
    #[must_use]
    pub fn display(&self) -> DisplayId {
        self.display
    }

    /// Total planes of a type, bound or not.
    #[must_use]
    pub fn total(&self, plane_type: PlaneType) -> u32 {
        u32::from(self.counts[plane_type.slot()])
    }

    /// Planes of a type available for binding (free or reclaimed).
    #[must_use]
    pub fn free_count(&self, plane_type: PlaneType) -> u32 {
        let s = plane_type.slot();
        (self.free[s] | self.reclaimed[s]).count_ones()
    }

    /// Whether a specific plane is available.
    #[must_use]
    pub fn is_available(&self, plane: PlaneHandle) -> bool {
        let s = plane.plane_type.slot();
        plane.index < 32 && (self.free[s] | self.reclaimed[s]) & (1 << plane.index) != 0
    }

    /// Takes the lowest-numbered available plane of a type, preferring
    /// reclaimed planes.
    pub fn acquire(&mut self, plane_type: PlaneType) -> Option<PlaneHandle> {
        let s = plane_type.slot();
        let set = if self.reclaimed[s] != 0 {
            &mut self.reclaimed[s]
        } else {
            &mut self.free[s]
        };
        if *set == 0 {
            return None;
        }
        let bit = set.trailing_zeros();
        *set &= !(1 << bit);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "bit index of a u32 is below 32"
        )]
        let index = bit as u8;
        Some(PlaneHandle::new(plane_type, index))
    }

    /// Hands a bound plane back after its frame was replaced or abandoned.
    ///
    /// Reclaiming a plane that is already available is a no-op.
    pub fn reclaim(&mut self, plane: PlaneHandle) {
        let s = plane.plane_type.slot();
        debug_assert!(
            plane.index < self.counts[s],
            "plane {plane:?} does not belong to {:?}",
            self.display
        );
        if self.is_available(plane) {
            return;
        }
        self.reclaimed[s] |= 1 << plane.index;
    }

    /// Moves every reclaimed plane back into the free set.
    ///
    /// Call after the reclaimed planes have been disabled in hardware.
    pub fn release_reclaimed(&mut self) {
        for s in 0..4 {
            self.free[s] |= self.reclaimed[s];
            self.reclaimed[s] = 0;
        }
    }

    /// Number of reclaimed planes still waiting to be released.
    #[must_use]
    pub fn reclaimed_count(&self) -> u32 {
        self.reclaimed.iter().map(|m| m.count_ones()).sum()
    }
}

const fn mask_of(n: u8) -> u32 {
    if n >= 32 { u32::MAX } else { (1_u32 << n) - 1 }
}

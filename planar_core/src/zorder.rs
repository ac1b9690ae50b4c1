// Copyright 2026 the Planar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Blend-chain validation of a tentative plane stack.
//!
//! Before the search accepts a slot stack it asks the display's
//! [`ZOrderPolicy`] whether the hardware can blend planes in that order. A
//! rejection is an ordinary search failure and makes the search backtrack.
//! The pure-GPU fallback is never validated; a display that cannot scan out
//! its primary plane alone is misconfigured, not a policy concern.

use crate::plane::PlaneType;
use crate::search::SearchSlot;

/// Validates a plane stack, sorted bottom to top.
pub trait ZOrderPolicy {
    /// Whether the hardware can blend `stack` in this order.
    fn is_valid(&self, stack: &[SearchSlot]) -> bool;
}

impl<T: ZOrderPolicy + ?Sized> ZOrderPolicy for &T {
    fn is_valid(&self, stack: &[SearchSlot]) -> bool {
        (**self).is_valid(stack)
    }
}

/// Accepts every non-empty stack.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Unrestricted;

impl ZOrderPolicy for Unrestricted {
    fn is_valid(&self, stack: &[SearchSlot]) -> bool {
        !stack.is_empty()
    }
}

/// Blend-chain constraints of a display pipe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ZOrderLimits {
    /// Largest number of planes in one stack.
    pub max_planes: u8,
    /// Largest number of RGB (sprite and primary) planes in one stack.
    pub max_rgb_planes: u8,
    /// When an overlay is the bottom plane, the largest number of RGB planes
    /// that can be blended on top of it. `None` if unlimited.
    pub max_rgb_over_bottom_overlay: Option<u8>,
    /// A cursor plane, if present, must be the topmost plane.
    pub cursor_on_top: bool,
}

impl ZOrderLimits {
    /// Limits of the main pipe.
    #[must_use]
    pub const fn primary_pipe() -> Self {
        Self {
            max_planes: 5,
            max_rgb_planes: 4,
            max_rgb_over_bottom_overlay: Some(2),
            cursor_on_top: true,
        }
    }

    /// Limits of the secondary pipe: one sprite plus the primary.
    #[must_use]
    pub const fn secondary_pipe() -> Self {
        Self {
            max_planes: 5,
            max_rgb_planes: 2,
            max_rgb_over_bottom_overlay: None,
            cursor_on_top: true,
        }
    }
}

/// A [`ZOrderPolicy`] enforcing [`ZOrderLimits`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlendChainPolicy {
    limits: ZOrderLimits,
}

impl BlendChainPolicy {
    /// Creates a policy.
    #[must_use]
    pub const fn new(limits: ZOrderLimits) -> Self {
        Self { limits }
    }

    /// The limits in use.
    #[must_use]
    pub fn limits(&self) -> &ZOrderLimits {
        &self.limits
    }
}

impl ZOrderPolicy for BlendChainPolicy {
    fn is_valid(&self, stack: &[SearchSlot]) -> bool {
        let Some(bottom) = stack.first() else {
            return false;
        };
        if stack.len() > usize::from(self.limits.max_planes) {
            return false;
        }
        let rgb = stack.iter().filter(|s| s.plane_type.is_rgb()).count();
        if rgb > usize::from(self.limits.max_rgb_planes) {
            return false;
        }
        if bottom.plane_type == PlaneType::Overlay
            && let Some(max) = self.limits.max_rgb_over_bottom_overlay
            && rgb > usize::from(max)
        {
            return false;
        }
        if self.limits.cursor_on_top {
            let last = stack.len() - 1;
            if stack
                .iter()
                .enumerate()
                .any(|(i, s)| s.plane_type == PlaneType::Cursor && i != last)
            {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    fn stack(types: &[PlaneType]) -> Vec<SearchSlot> {
        types
            .iter()
            .zip(0_u32..)
            .map(|(&plane_type, i)| SearchSlot {
                plane_type,
                layer: i,
                candidate_rank: 0,
                z_order: i,
            })
            .collect()
    }

    #[test]
    fn unrestricted_only_rejects_empty() {
        assert!(!Unrestricted.is_valid(&[]));
        assert!(Unrestricted.is_valid(&stack(&[PlaneType::Cursor, PlaneType::Primary])));
    }

    #[test]
    fn plane_and_rgb_caps() {
        let policy = BlendChainPolicy::new(ZOrderLimits::primary_pipe());
        use PlaneType::{Overlay, Primary, Sprite};
        assert!(policy.is_valid(&stack(&[Primary, Sprite, Sprite, Sprite])));
        assert!(!policy.is_valid(&stack(&[Primary, Sprite, Sprite, Sprite, Sprite])));
        assert!(!policy.is_valid(&stack(&[Primary, Overlay, Overlay, Sprite, Sprite, Sprite])));
    }

    #[test]
    fn bottom_overlay_limits_rgb_on_top() {
        let policy = BlendChainPolicy::new(ZOrderLimits::primary_pipe());
        use PlaneType::{Overlay, Primary, Sprite};
        assert!(policy.is_valid(&stack(&[Overlay, Primary, Sprite])));
        assert!(!policy.is_valid(&stack(&[Overlay, Primary, Sprite, Sprite])));
        assert!(
            policy.is_valid(&stack(&[Primary, Overlay, Sprite, Sprite])),
            "limit only applies when the overlay is at the bottom"
        );
    }

    #[test]
    fn cursor_must_be_topmost() {
        let policy = BlendChainPolicy::new(ZOrderLimits::secondary_pipe());
        use PlaneType::{Cursor, Primary};
        assert!(policy.is_valid(&stack(&[Primary, Cursor])));
        assert!(!policy.is_valid(&stack(&[Cursor, Primary])));
    }

    #[test]
    fn secondary_pipe_allows_one_sprite() {
        let policy = BlendChainPolicy::new(ZOrderLimits::secondary_pipe());
        use PlaneType::{Primary, Sprite};
        assert!(policy.is_valid(&stack(&[Primary, Sprite])));
        assert!(!policy.is_valid(&stack(&[Primary, Sprite, Sprite])));
    }
}

// Copyright 2026 the Planar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Candidate classification.
//!
//! [`classify`] walks a frame bottom to top and sorts every layer into the
//! plane types that could scan it out. A layer lands in at most one
//! candidate set. Layers that no plane can take, or that are barred from
//! planes by their flags, are still *composable*: they end up in the frame
//! buffer target, and the overlap analysis has to account for them.
//!
//! Unscaled, unblended RGB layers are held back until every layer has been
//! seen. If a genuine overlay candidate turned up they join the overlay set,
//! so that overlays are not left idle while video competes with them for
//! sprites. Otherwise they are sprite candidates.

use alloc::vec::Vec;

use crate::capability::CapabilityOracle;
use crate::layer::{Blending, Layer, LayerRole, LayerStack};
use crate::plane::PlaneType;

/// Per-type candidate sets of one frame.
///
/// All sets hold stack positions in ascending order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Candidates {
    sets: [Vec<usize>; 3],
    composable: Vec<usize>,
    target: usize,
    allocation_skipped: bool,
}

impl Candidates {
    /// Candidates for a plane type. Always empty for
    /// [`Primary`](PlaneType::Primary), which is resolved separately.
    #[must_use]
    pub fn of(&self, plane_type: PlaneType) -> &[usize] {
        match plane_type {
            PlaneType::Primary => &[],
            ty => &self.sets[ty.slot()],
        }
    }

    /// Every layer that is composed this frame, candidate or not.
    #[must_use]
    pub fn composable(&self) -> &[usize] {
        &self.composable
    }

    /// Stack position of the frame buffer target.
    #[must_use]
    pub fn target(&self) -> usize {
        self.target
    }

    /// Nothing is composable; plane allocation is not attempted.
    #[must_use]
    pub fn allocation_skipped(&self) -> bool {
        self.allocation_skipped
    }

    /// The plane type `pos` is a candidate for, if any.
    #[must_use]
    pub fn candidate_type(&self, pos: usize) -> Option<PlaneType> {
        [PlaneType::Cursor, PlaneType::Overlay, PlaneType::Sprite]
            .into_iter()
            .find(|&ty| self.sets[ty.slot()].binary_search(&pos).is_ok())
    }

    /// Total number of candidates over all types.
    #[must_use]
    pub fn candidate_count(&self) -> usize {
        self.sets.iter().map(Vec::len).sum()
    }
}

/// Classifies the layers of one frame.
///
/// `forces_full_frame_scaling` is set for pipes that scale the whole frame.
/// In that mode cursor and RGB-overlay handling is off, and a single sprite
/// candidate is admitted only for a frame with exactly two content layers.
#[must_use]
pub fn classify<O>(stack: &LayerStack<'_>, oracle: &O, forces_full_frame_scaling: bool) -> Candidates
where
    O: CapabilityOracle + ?Sized,
{
    let mut out = Candidates {
        target: stack.target(),
        ..Candidates::default()
    };
    let content_len = stack.content_len();
    let mut rgb_overlay = Vec::new();

    for (pos, layer) in stack.iter().enumerate() {
        if layer.role != LayerRole::Content {
            continue;
        }
        out.composable.push(pos);
        if !layer.is_plane_eligible() {
            continue;
        }

        if forces_full_frame_scaling {
            if content_len == 2
                && out.sets[PlaneType::Sprite.slot()].is_empty()
                && oracle.supports(PlaneType::Sprite, layer)
            {
                out.sets[PlaneType::Sprite.slot()].push(pos);
            } else if oracle.supports(PlaneType::Overlay, layer) {
                out.sets[PlaneType::Overlay.slot()].push(pos);
            }
            continue;
        }

        if is_cursor_candidate(stack, pos, layer, oracle) {
            out.sets[PlaneType::Cursor.slot()].push(pos);
        } else if is_rgb_overlay_eligible(layer, oracle) {
            rgb_overlay.push(pos);
        } else if oracle.supports(PlaneType::Sprite, layer) {
            out.sets[PlaneType::Sprite.slot()].push(pos);
        } else if oracle.supports(PlaneType::Overlay, layer) {
            out.sets[PlaneType::Overlay.slot()].push(pos);
        }
    }

    out.allocation_skipped = out.composable.is_empty() && stack.len() > 1;

    if !rgb_overlay.is_empty() {
        let into = if out.sets[PlaneType::Overlay.slot()].is_empty() {
            PlaneType::Sprite
        } else {
            PlaneType::Overlay
        };
        let set = &mut out.sets[into.slot()];
        set.extend(rgb_overlay);
        set.sort_unstable();
    }

    out
}

fn is_cursor_candidate<O>(stack: &LayerStack<'_>, pos: usize, layer: &Layer, oracle: &O) -> bool
where
    O: CapabilityOracle + ?Sized,
{
    layer.flags.is_cursor
        && stack.len() >= 2
        && pos == stack.len() - 2
        && layer.transform.is_identity()
        && !layer.is_scaled()
        && oracle.supports(PlaneType::Cursor, layer)
}

fn is_rgb_overlay_eligible<O>(layer: &Layer, oracle: &O) -> bool
where
    O: CapabilityOracle + ?Sized,
{
    layer.format.is_rgb()
        && !layer.is_scaled()
        && layer.blending == Blending::None
        && layer.transform.is_identity()
        && layer.plane_alpha == u8::MAX
        && oracle.rgb_overlay_fits(layer)
}

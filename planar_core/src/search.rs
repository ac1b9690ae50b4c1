// Copyright 2026 the Planar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backtracking plane assignment.
//!
//! The search descends one level per plane type in priority order (cursor,
//! overlay, sprite) and resolves the primary plane last. At each level it
//! tries to place as many candidates as there are free planes, then one
//! fewer, down to none. For a given count `k`, combinations of candidates are
//! enumerated in lexicographic order of their candidate rank, so the first
//! combination tried is always the lowest `k` candidates.
//!
//! Tentative placements live in a flat [`SearchSlot`] vector that is pushed
//! on descent and popped on backtrack. A branch succeeds once the primary
//! level produces a stack that the display's [`ZOrderPolicy`] accepts. If no
//! branch succeeds, the frame buffer target goes on the primary plane alone,
//! which every display can scan out.

use alloc::vec::Vec;

use crate::capability::CapabilityOracle;
use crate::classify::Candidates;
use crate::display::DisplayId;
use crate::inventory::PlaneInventory;
use crate::layer::LayerStack;
use crate::overlap;
use crate::plane::PlaneType;
#[cfg(feature = "trace-rich")]
use crate::trace::BacktrackEvent;
use crate::trace::Tracer;
use crate::zorder::ZOrderPolicy;

/// One tentative layer-to-plane-type placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SearchSlot {
    /// Plane type the layer is placed on.
    pub plane_type: PlaneType,
    /// Stack position of the layer (the frame buffer target for a primary
    /// slot that hosts GPU output).
    pub layer: u32,
    /// Position of the layer in its candidate set.
    pub candidate_rank: u32,
    /// Depth used to order the plane stack; the layer's stack position, or
    /// the position the frame buffer target borrows.
    pub z_order: u32,
}

/// The outcome of the search for one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    slots: Vec<SearchSlot>,
    target: u32,
    forced_fallback: bool,
}

impl Assignment {
    /// Plane stack, bottom to top. A slot's committed z-order is its
    /// position in this slice.
    #[must_use]
    pub fn slots(&self) -> &[SearchSlot] {
        &self.slots
    }

    /// Committed z-order of the frame buffer target, or `None` if every
    /// composable layer is on a plane.
    #[must_use]
    pub fn target_z(&self) -> Option<u32> {
        self.slots
            .iter()
            .position(|s| s.layer == self.target)
            .map(to_u32)
    }

    /// The search found nothing and fell back to pure GPU composition.
    #[must_use]
    pub fn forced_fallback(&self) -> bool {
        self.forced_fallback
    }

    /// Number of planes of a type in the stack.
    #[must_use]
    pub fn count(&self, plane_type: PlaneType) -> usize {
        self.slots
            .iter()
            .filter(|s| s.plane_type == plane_type)
            .count()
    }

    /// The slot placing the layer at stack position `pos`, if any.
    #[must_use]
    pub fn slot_of(&self, pos: usize) -> Option<(u32, &SearchSlot)> {
        self.slots
            .iter()
            .enumerate()
            .find(|(_, s)| s.layer as usize == pos && s.layer != self.target)
            .map(|(z, s)| (to_u32(z), s))
    }

    /// Only the frame buffer target is scanned out.
    #[must_use]
    pub fn is_pure_gpu(&self) -> bool {
        self.slots.len() == 1 && self.slots[0].layer == self.target
    }
}

/// Runs the search for one frame.
///
/// Plane counts are taken from `inventory` without acquiring anything; the
/// caller binds concrete planes once the assignment is final.
#[must_use]
pub fn assign<O, P>(
    stack: &LayerStack<'_>,
    candidates: &Candidates,
    inventory: &PlaneInventory,
    oracle: &O,
    policy: &P,
    frame_index: u64,
    tracer: &mut Tracer<'_>,
) -> Assignment
where
    O: CapabilityOracle + ?Sized,
    P: ZOrderPolicy + ?Sized,
{
    let mut free = [0_u32; 4];
    for ty in PlaneType::ALL {
        free[ty.slot()] = inventory.free_count(ty);
    }

    let mut search = Search {
        stack,
        candidates,
        oracle,
        policy,
        free,
        slots: Vec::with_capacity(stack.len()),
        covered: alloc::vec![false; stack.len()],
        result: None,
        trace: (tracer, frame_index, inventory.display()),
    };

    let target = to_u32(stack.target());
    let found = if search.assign_type(PlaneType::Cursor) {
        search.result.take()
    } else {
        None
    };
    match found {
        Some(slots) => Assignment {
            slots,
            target,
            forced_fallback: false,
        },
        None => Assignment {
            slots: alloc::vec![SearchSlot {
                plane_type: PlaneType::Primary,
                layer: target,
                candidate_rank: 0,
                z_order: 0,
            }],
            target,
            forced_fallback: true,
        },
    }
}

struct Search<'s, 'a, 't, O: ?Sized, P: ?Sized> {
    stack: &'s LayerStack<'a>,
    candidates: &'s Candidates,
    oracle: &'s O,
    policy: &'s P,
    free: [u32; 4],
    slots: Vec<SearchSlot>,
    /// Indexed by stack position.
    covered: Vec<bool>,
    result: Option<Vec<SearchSlot>>,
    trace: (&'s mut Tracer<'t>, u64, DisplayId),
}

impl<O, P> Search<'_, '_, '_, O, P>
where
    O: CapabilityOracle + ?Sized,
    P: ZOrderPolicy + ?Sized,
{
    fn assign_type(&mut self, plane_type: PlaneType) -> bool {
        let Some(next) = plane_type.next() else {
            return self.assign_primary();
        };
        let all = self.candidates;
        let candidates = all.of(plane_type);
        let free = self.free[plane_type.slot()] as usize;
        let n = free.min(candidates.len());
        if n == 0 {
            return self.assign_type(next);
        }
        for k in (0..=n).rev() {
            if self.assign_combination(plane_type, 0, k) {
                return true;
            }
            debug_assert!(
                self.slots.iter().all(|s| s.plane_type < plane_type),
                "slots of {plane_type:?} left behind after backtracking"
            );
            self.backtracked(plane_type, k);
        }
        false
    }

    /// Places `remaining` more candidates of `plane_type`, choosing from
    /// ranks `start..`.
    fn assign_combination(&mut self, plane_type: PlaneType, start: usize, remaining: usize) -> bool {
        if remaining == 0 {
            return match plane_type.next() {
                Some(next) => self.assign_type(next),
                None => false,
            };
        }
        let all = self.candidates;
        let candidates = all.of(plane_type);
        for rank in start..=candidates.len() - remaining {
            let pos = candidates[rank];
            self.push(plane_type, pos, rank, pos);
            if self.assign_combination(plane_type, rank + 1, remaining - 1) {
                return true;
            }
            self.pop();
        }
        false
    }

    fn assign_primary(&mut self) -> bool {
        let all = self.candidates;
        let composable = all.composable();
        let layers = composable.len();
        let placed = self.slots.len();

        // Everything but one sprite candidate is on a plane: the primary
        // plane scans that layer out directly and the GPU stays idle. A pipe
        // with nothing but its primary plane always composes on the GPU.
        if layers > 0
            && placed == layers - 1
            && self.has_overlay_planes()
            && let Some((rank, pos)) = self.trailing_free_sprite()
            && self.free[PlaneType::Primary.slot()] > 0
            && self.oracle.supports(PlaneType::Primary, self.stack.get(pos))
            && self.attach_with(PlaneType::Primary, pos, rank, pos)
        {
            return true;
        }
        let target = self.stack.target();
        if placed == 0 {
            return self.attach_with(PlaneType::Primary, target, 0, 0);
        }
        if placed == layers {
            return self.attach();
        }

        let covered: Vec<bool> = composable.iter().map(|&p| self.covered[p]).collect();
        for (i, &pos) in composable.iter().enumerate() {
            if covered[i] {
                continue;
            }
            if overlap::can_use_as_target(self.stack, composable, &covered, i)
                && self.attach_with(PlaneType::Primary, target, 0, pos)
            {
                return true;
            }
        }
        false
    }

    /// Whether any cursor, overlay or sprite plane is free this frame.
    fn has_overlay_planes(&self) -> bool {
        [PlaneType::Cursor, PlaneType::Overlay, PlaneType::Sprite]
            .iter()
            .any(|ty| self.free[ty.slot()] > 0)
    }

    /// The lowest sprite candidate above the topmost placed one.
    fn trailing_free_sprite(&self) -> Option<(usize, usize)> {
        let sprites = self.candidates.of(PlaneType::Sprite);
        let mut found = None;
        for (rank, &pos) in sprites.iter().enumerate().rev() {
            if self.covered[pos] {
                break;
            }
            found = Some((rank, pos));
        }
        found
    }

    fn attach_with(&mut self, plane_type: PlaneType, pos: usize, rank: usize, z: usize) -> bool {
        self.push(plane_type, pos, rank, z);
        if self.attach() {
            return true;
        }
        self.pop();
        false
    }

    fn attach(&mut self) -> bool {
        let mut stack = self.slots.clone();
        stack.sort_by_key(|s| s.z_order);
        if !self.policy.is_valid(&stack) {
            return false;
        }
        self.result = Some(stack);
        true
    }

    fn backtracked(&mut self, plane_type: PlaneType, k: usize) {
        #[cfg(feature = "trace-rich")]
        {
            let (tracer, frame_index, display) = &mut self.trace;
            tracer.backtrack(&BacktrackEvent {
                frame_index: *frame_index,
                display: *display,
                plane_type,
                k: to_u32(k),
            });
        }
        #[cfg(not(feature = "trace-rich"))]
        {
            _ = (&self.trace, plane_type, k);
        }
    }

    fn push(&mut self, plane_type: PlaneType, pos: usize, rank: usize, z: usize) {
        debug_assert!(!self.covered[pos], "layer {pos} placed twice");
        debug_assert!(
            to_u32(self.slots.iter().filter(|s| s.plane_type == plane_type).count())
                < self.free[plane_type.slot()],
            "over capacity for {plane_type:?}"
        );
        self.covered[pos] = pos != self.stack.target();
        self.slots.push(SearchSlot {
            plane_type,
            layer: to_u32(pos),
            candidate_rank: to_u32(rank),
            z_order: to_u32(z),
        });
    }

    fn pop(&mut self) {
        if let Some(slot) = self.slots.pop() {
            self.covered[slot.layer as usize] = false;
        }
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "layer counts and ranks are far below u32::MAX"
)]
pub(crate) fn to_u32(n: usize) -> u32 {
    n as u32
}

// Copyright 2026 the Planar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame buffer target placement.
//!
//! When only some composable layers end up on planes, the rest are composed
//! by the GPU into the frame buffer target, which then scans out at a single
//! z position. Choosing the z position of an uncovered layer `t` implicitly
//! moves every other uncovered layer to `t`'s depth. That is only invisible
//! if no plane layer lies between an uncovered layer and `t` while
//! overlapping it on screen.

use kurbo::Rect;

use crate::layer::LayerStack;

/// Whether two display rectangles overlap.
///
/// Rectangles that merely share an edge do not intersect.
#[must_use]
pub fn intersects(a: Rect, b: Rect) -> bool {
    !(b.x1 <= a.x0 || b.x0 >= a.x1 || b.y0 >= a.y1 || b.y1 <= a.y0)
}

/// Whether the frame buffer target can take the z position of
/// `composable[target]`.
///
/// `composable` lists stack positions of the composable layers bottom to
/// top, and `covered[i]` tells whether `composable[i]` sits on a plane.
/// `target` must index an uncovered entry.
#[must_use]
pub fn can_use_as_target(
    stack: &LayerStack<'_>,
    composable: &[usize],
    covered: &[bool],
    target: usize,
) -> bool {
    debug_assert_eq!(composable.len(), covered.len());
    debug_assert!(!covered[target], "target must be GPU composed");

    let rect = |i: usize| stack.get(composable[i]).dst_rect;

    // GPU layers below the target move up past the plane layers between them.
    for below in 0..target {
        if covered[below] {
            continue;
        }
        for between in below + 1..target {
            if covered[between] && intersects(rect(between), rect(below)) {
                return false;
            }
        }
    }

    // GPU layers above the target move down past the plane layers between them.
    for above in target + 1..composable.len() {
        if covered[above] {
            continue;
        }
        for between in target + 1..above {
            if covered[between] && intersects(rect(above), rect(between)) {
                return false;
            }
        }
    }

    true
}

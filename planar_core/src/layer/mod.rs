// Copyright 2026 the Planar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame layer records.
//!
//! A *layer* is one visible surface the compositor wants shown this frame.
//! The compositor regenerates the layer list every frame; each [`Layer`]
//! carries:
//!
//! - Its z-order position (`index`, 0 = bottom), which is fixed for the
//!   whole pass and never renumbered.
//! - Geometry: a source crop and a display frame, both [`kurbo::Rect`].
//! - Buffer properties: [`PixelFormat`], stride, [`Transform`], [`Blending`]
//!   and plane alpha, which the capability oracle inspects.
//! - [`LayerFlags`] set by the compositor, and a [`LayerRole`] that marks
//!   the frame buffer target.
//! - The [`LayerAssignment`] written back by the pass.
//!
//! [`LayerStack`] validates a frame's list before any classification runs.

mod format;
mod id;
mod record;
mod stack;

pub use format::{Blending, PixelFormat, Transform};
pub use id::BufferId;
pub use record::{Layer, LayerAssignment, LayerFlags, LayerRole};
pub use stack::LayerStack;

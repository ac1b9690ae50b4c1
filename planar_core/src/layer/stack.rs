// Copyright 2026 the Planar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Validated view of one frame's layer list.

use super::record::{Layer, LayerRole};
use crate::error::LayerListError;

/// A borrowed, validated layer list.
///
/// Construction checks that the list is non-empty, that every layer's
/// `index` equals its position, and that exactly one layer is the frame
/// buffer target. Positions and indices are therefore interchangeable for
/// the rest of the pass.
#[derive(Clone, Copy, Debug)]
pub struct LayerStack<'a> {
    layers: &'a [Layer],
    target: usize,
}

impl<'a> LayerStack<'a> {
    /// Validates `layers`.
    ///
    /// # Errors
    ///
    /// Returns [`LayerListError`] if the list is empty, mis-numbered, or
    /// does not have exactly one frame buffer target.
    pub fn new(layers: &'a [Layer]) -> Result<Self, LayerListError> {
        if layers.is_empty() {
            return Err(LayerListError::Empty);
        }
        let mut target: Option<usize> = None;
        for (pos, layer) in layers.iter().enumerate() {
            let position = position_u32(pos);
            if layer.index != position {
                return Err(LayerListError::IndexMismatch {
                    position,
                    index: layer.index,
                });
            }
            if layer.role == LayerRole::FrameBufferTarget {
                if let Some(first) = target {
                    return Err(LayerListError::DuplicateFrameBufferTarget {
                        first: position_u32(first),
                        second: position,
                    });
                }
                target = Some(pos);
            }
        }
        let target = target.ok_or(LayerListError::MissingFrameBufferTarget)?;
        Ok(Self { layers, target })
    }

    /// Number of layers, including the frame buffer target.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Always `false`; an empty list fails validation.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Position of the frame buffer target.
    #[inline]
    #[must_use]
    pub fn target(&self) -> usize {
        self.target
    }

    /// Returns the layer at `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is out of range.
    #[inline]
    #[must_use]
    pub fn get(&self, pos: usize) -> &'a Layer {
        &self.layers[pos]
    }

    /// Iterates over all layers bottom to top.
    pub fn iter(&self) -> core::slice::Iter<'a, Layer> {
        self.layers.iter()
    }

    /// Number of layers excluding the frame buffer target.
    #[must_use]
    pub fn content_len(&self) -> usize {
        self.layers
            .iter()
            .filter(|l| l.role != LayerRole::FrameBufferTarget)
            .count()
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "a frame never carries more than u32::MAX layers"
)]
fn position_u32(pos: usize) -> u32 {
    pos as u32
}

// Copyright 2026 the Planar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors that cross the pass boundary.
//!
//! Capability rejections, plane exhaustion, search exhaustion and overlap
//! conflicts are resolved inside the pass and never surface as errors. Only
//! malformed input and a repeated commit failure reach the caller.

use core::fmt;

use crate::plane::{PlaneHandle, PlaneType};

/// A frame's layer list is malformed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerListError {
    /// The list has no layers at all.
    Empty,
    /// No layer has [`LayerRole::FrameBufferTarget`](crate::layer::LayerRole::FrameBufferTarget).
    MissingFrameBufferTarget,
    /// More than one layer claims to be the frame buffer target.
    DuplicateFrameBufferTarget {
        /// Position of the first target.
        first: u32,
        /// Position of the second target.
        second: u32,
    },
    /// A layer's `index` does not match its position in the list.
    IndexMismatch {
        /// Position in the list.
        position: u32,
        /// The layer's `index` field.
        index: u32,
    },
}

impl fmt::Display for LayerListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "layer list is empty"),
            Self::MissingFrameBufferTarget => write!(f, "no frame buffer target in layer list"),
            Self::DuplicateFrameBufferTarget { first, second } => write!(
                f,
                "duplicate frame buffer target at positions {first} and {second}"
            ),
            Self::IndexMismatch { position, index } => {
                write!(f, "layer at position {position} has index {index}")
            }
        }
    }
}

impl core::error::Error for LayerListError {}

/// The display driver rejected a commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommitError {
    /// A specific plane rejected its configuration (geometry, format, ...).
    PlaneRejected {
        /// The offending plane.
        plane: PlaneHandle,
    },
    /// No free plane of the requested type was left when binding.
    PlaneUnavailable {
        /// The exhausted type.
        plane_type: PlaneType,
    },
    /// The device failed the flip with a driver error code.
    Device {
        /// Driver error code.
        code: i32,
    },
}

impl fmt::Display for CommitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlaneRejected { plane } => write!(f, "plane {plane:?} rejected its configuration"),
            Self::PlaneUnavailable { plane_type } => {
                write!(f, "no free {} plane left to bind", plane_type.name())
            }
            Self::Device { code } => write!(f, "display device commit failed ({code})"),
        }
    }
}

impl core::error::Error for CommitError {}

/// Why a frame could not be presented.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameError {
    /// The input layer list was malformed.
    InvalidLayers(LayerListError),
    /// The commit failed, and so did the retry with every plane layer
    /// demoted to the GPU. The caller drops the frame.
    Dropped {
        /// Error from the first attempt.
        first: CommitError,
        /// Error from the retry.
        second: CommitError,
    },
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLayers(e) => write!(f, "invalid layer list: {e}"),
            Self::Dropped { first, second } => {
                write!(f, "frame dropped: commit failed twice ({first}; then {second})")
            }
        }
    }
}

impl core::error::Error for FrameError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::InvalidLayers(e) => Some(e),
            Self::Dropped { second, .. } => Some(second),
        }
    }
}

impl From<LayerListError> for FrameError {
    fn from(e: LayerListError) -> Self {
        Self::InvalidLayers(e)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            LayerListError::IndexMismatch {
                position: 2,
                index: 5
            }
            .to_string(),
            "layer at position 2 has index 5"
        );
        let e = FrameError::Dropped {
            first: CommitError::Device { code: -22 },
            second: CommitError::PlaneRejected {
                plane: PlaneHandle::new(PlaneType::Sprite, 1),
            },
        };
        assert_eq!(
            e.to_string(),
            "frame dropped: commit failed twice (display device commit failed (-22); \
             then plane SPRITE#1 rejected its configuration)"
        );
    }

    #[test]
    fn source_chain() {
        use core::error::Error;

        let e = FrameError::from(LayerListError::Empty);
        assert!(e.source().is_some(), "invalid layers carries its cause");
    }
}

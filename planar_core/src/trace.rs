// Copyright 2026 the Planar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the assignment pass.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! pass calls at each stage. All method bodies default to no-ops, so
//! implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`): gates [`BacktrackEvent`] and the
//!   corresponding `TraceSink` method.

use crate::display::DisplayId;
use crate::error::CommitError;
#[cfg(feature = "trace-rich")]
use crate::plane::PlaneType;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted once classification of a frame's layers is done.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClassifyEvent {
    /// Pass counter of the display.
    pub frame_index: u64,
    /// Which display.
    pub display: DisplayId,
    /// 1 for the first pass of a frame, 2 for the retry.
    pub attempt: u8,
    /// Cursor candidates.
    pub cursor: u32,
    /// Overlay candidates (after RGB-overlay folding).
    pub overlay: u32,
    /// Sprite candidates (after RGB-overlay folding).
    pub sprite: u32,
    /// Layers that are composed somewhere (plane or GPU).
    pub composable: u32,
    /// Plane allocation was skipped because nothing is composable.
    pub allocation_skipped: bool,
}

/// Emitted after the search produced an assignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AssignEvent {
    /// Pass counter of the display.
    pub frame_index: u64,
    /// Which display.
    pub display: DisplayId,
    /// 1 for the first pass of a frame, 2 for the retry.
    pub attempt: u8,
    /// Hardware slots per plane type, indexed by [`PlaneType::slot`](crate::plane::PlaneType::slot).
    pub slots: [u32; 4],
    /// Layers left for the GPU.
    pub gpu_layers: u32,
    /// Committed z-order of the frame buffer target, if it is scanned out.
    pub target_z: Option<u32>,
    /// The search exhausted every branch and the pure-GPU fallback was used.
    pub forced_fallback: bool,
}

/// Emitted right before the commit request is handed to the committer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommitEvent {
    /// Pass counter of the display.
    pub frame_index: u64,
    /// Which display.
    pub display: DisplayId,
    /// 1 for the first commit of a frame, 2 for the retry.
    pub attempt: u8,
    /// Plane entries in the request.
    pub entries: u32,
}

/// Emitted when the committer rejects a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommitFailedEvent {
    /// Pass counter of the display.
    pub frame_index: u64,
    /// Which display.
    pub display: DisplayId,
    /// Which attempt failed.
    pub attempt: u8,
    /// The committer's error.
    pub error: CommitError,
}

/// Emitted when the retry failed too and the frame is abandoned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameDroppedEvent {
    /// Pass counter of the display.
    pub frame_index: u64,
    /// Which display.
    pub display: DisplayId,
    /// Error from the first attempt.
    pub first: CommitError,
    /// Error from the retry.
    pub second: CommitError,
}

/// One abandoned branch of the backtracking search.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BacktrackEvent {
    /// Pass counter of the display.
    pub frame_index: u64,
    /// Which display.
    pub display: DisplayId,
    /// The plane type whose count is being lowered.
    pub plane_type: PlaneType,
    /// The plane count that found no feasible completion.
    pub k: u32,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the assignment pass.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called after classification.
    fn on_classify(&mut self, e: &ClassifyEvent) {
        _ = e;
    }

    /// Called after the search settled on an assignment.
    fn on_assign(&mut self, e: &AssignEvent) {
        _ = e;
    }

    /// Called before a commit request is submitted.
    fn on_commit(&mut self, e: &CommitEvent) {
        _ = e;
    }

    /// Called when a commit fails.
    fn on_commit_failed(&mut self, e: &CommitFailedEvent) {
        _ = e;
    }

    /// Called when a frame is dropped.
    fn on_frame_dropped(&mut self, e: &FrameDroppedEvent) {
        _ = e;
    }

    /// Called for every abandoned search branch (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_backtrack(&mut self, e: &BacktrackEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`ClassifyEvent`].
    #[inline]
    pub fn classify(&mut self, e: &ClassifyEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_classify(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`AssignEvent`].
    #[inline]
    pub fn assign(&mut self, e: &AssignEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_assign(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CommitEvent`].
    #[inline]
    pub fn commit(&mut self, e: &CommitEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_commit(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CommitFailedEvent`].
    #[inline]
    pub fn commit_failed(&mut self, e: &CommitFailedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_commit_failed(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FrameDroppedEvent`].
    #[inline]
    pub fn frame_dropped(&mut self, e: &FrameDroppedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_dropped(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`BacktrackEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn backtrack(&mut self, e: &BacktrackEvent) {
        if let Some(s) = &mut self.sink {
            s.on_backtrack(e);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_classify() -> ClassifyEvent {
        ClassifyEvent {
            frame_index: 42,
            display: DisplayId(0),
            attempt: 1,
            cursor: 1,
            overlay: 0,
            sprite: 2,
            composable: 4,
            allocation_skipped: false,
        }
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_classify(&sample_classify());
        sink.on_commit_failed(&CommitFailedEvent {
            frame_index: 42,
            display: DisplayId(0),
            attempt: 1,
            error: CommitError::Device { code: -5 },
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.classify(&sample_classify());
        tracer.commit(&CommitEvent {
            frame_index: 42,
            display: DisplayId(0),
            attempt: 1,
            entries: 3,
        });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            frames: Vec<u64>,
        }
        impl TraceSink for RecordingSink {
            fn on_classify(&mut self, e: &ClassifyEvent) {
                self.frames.push(e.frame_index);
            }
        }

        let mut sink = RecordingSink { frames: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        tracer.classify(&sample_classify());
        drop(tracer);
        assert_eq!(sink.frames, &[42]);
    }
}

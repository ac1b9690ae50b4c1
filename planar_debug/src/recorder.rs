// Copyright 2026 the Planar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as little-endian records, one tag byte followed by the event
//! fields. [`decode`] reads them back as an iterator of [`RecordedEvent`].

use planar_core::display::DisplayId;
use planar_core::error::CommitError;
use planar_core::plane::{PlaneHandle, PlaneType};
use planar_core::trace::{
    AssignEvent, BacktrackEvent, ClassifyEvent, CommitEvent, CommitFailedEvent, FrameDroppedEvent,
    TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_CLASSIFY: u8 = 1;
const TAG_ASSIGN: u8 = 2;
const TAG_COMMIT: u8 = 3;
const TAG_COMMIT_FAILED: u8 = 4;
const TAG_FRAME_DROPPED: u8 = 5;
const TAG_BACKTRACK: u8 = 6;

const ERR_PLANE_REJECTED: u8 = 0;
const ERR_PLANE_UNAVAILABLE: u8 = 1;
const ERR_DEVICE: u8 = 2;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_option_u32(&mut self, v: Option<u32>) {
        self.write_bool(v.is_some());
        self.write_u32(v.unwrap_or(0));
    }

    fn write_plane_type(&mut self, ty: PlaneType) {
        #[expect(clippy::cast_possible_truncation, reason = "four plane types")]
        let slot = ty.slot() as u8;
        self.write_u8(slot);
    }

    fn write_header(&mut self, tag: u8, frame_index: u64, display: DisplayId) {
        self.write_u8(tag);
        self.write_u64(frame_index);
        self.write_u32(display.0);
    }

    fn write_error(&mut self, e: CommitError) {
        match e {
            CommitError::PlaneRejected { plane } => {
                self.write_u8(ERR_PLANE_REJECTED);
                self.write_plane_type(plane.plane_type);
                self.write_u8(plane.index);
            }
            CommitError::PlaneUnavailable { plane_type } => {
                self.write_u8(ERR_PLANE_UNAVAILABLE);
                self.write_plane_type(plane_type);
            }
            CommitError::Device { code } => {
                self.write_u8(ERR_DEVICE);
                self.buf.extend_from_slice(&code.to_le_bytes());
            }
        }
    }
}

impl TraceSink for RecorderSink {
    fn on_classify(&mut self, e: &ClassifyEvent) {
        self.write_header(TAG_CLASSIFY, e.frame_index, e.display);
        self.write_u8(e.attempt);
        self.write_u32(e.cursor);
        self.write_u32(e.overlay);
        self.write_u32(e.sprite);
        self.write_u32(e.composable);
        self.write_bool(e.allocation_skipped);
    }

    fn on_assign(&mut self, e: &AssignEvent) {
        self.write_header(TAG_ASSIGN, e.frame_index, e.display);
        self.write_u8(e.attempt);
        for n in e.slots {
            self.write_u32(n);
        }
        self.write_u32(e.gpu_layers);
        self.write_option_u32(e.target_z);
        self.write_bool(e.forced_fallback);
    }

    fn on_commit(&mut self, e: &CommitEvent) {
        self.write_header(TAG_COMMIT, e.frame_index, e.display);
        self.write_u8(e.attempt);
        self.write_u32(e.entries);
    }

    fn on_commit_failed(&mut self, e: &CommitFailedEvent) {
        self.write_header(TAG_COMMIT_FAILED, e.frame_index, e.display);
        self.write_u8(e.attempt);
        self.write_error(e.error);
    }

    fn on_frame_dropped(&mut self, e: &FrameDroppedEvent) {
        self.write_header(TAG_FRAME_DROPPED, e.frame_index, e.display);
        self.write_error(e.first);
        self.write_error(e.second);
    }

    fn on_backtrack(&mut self, e: &BacktrackEvent) {
        self.write_header(TAG_BACKTRACK, e.frame_index, e.display);
        self.write_plane_type(e.plane_type);
        self.write_u32(e.k);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordedEvent {
    /// A [`ClassifyEvent`].
    Classify(ClassifyEvent),
    /// An [`AssignEvent`].
    Assign(AssignEvent),
    /// A [`CommitEvent`].
    Commit(CommitEvent),
    /// A [`CommitFailedEvent`].
    CommitFailed(CommitFailedEvent),
    /// A [`FrameDroppedEvent`].
    FrameDropped(FrameDroppedEvent),
    /// A [`BacktrackEvent`].
    Backtrack(BacktrackEvent),
}

impl RecordedEvent {
    /// Pass counter of the display the event belongs to.
    #[must_use]
    pub fn frame_index(&self) -> u64 {
        match self {
            Self::Classify(e) => e.frame_index,
            Self::Assign(e) => e.frame_index,
            Self::Commit(e) => e.frame_index,
            Self::CommitFailed(e) => e.frame_index,
            Self::FrameDropped(e) => e.frame_index,
            Self::Backtrack(e) => e.frame_index,
        }
    }

    /// The display the event belongs to.
    #[must_use]
    pub fn display(&self) -> DisplayId {
        match self {
            Self::Classify(e) => e.display,
            Self::Assign(e) => e.display,
            Self::Commit(e) => e.display,
            Self::CommitFailed(e) => e.display,
            Self::FrameDropped(e) => e.display,
            Self::Backtrack(e) => e.display,
        }
    }
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
///
/// Stops at the first unknown tag or truncated record.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?.try_into().ok()?;
        self.pos += N;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        Some(self.take::<1>()?[0])
    }

    fn read_bool(&mut self) -> Option<bool> {
        Some(self.read_u8()? != 0)
    }

    fn read_u32(&mut self) -> Option<u32> {
        Some(u32::from_le_bytes(self.take()?))
    }

    fn read_i32(&mut self) -> Option<i32> {
        Some(i32::from_le_bytes(self.take()?))
    }

    fn read_u64(&mut self) -> Option<u64> {
        Some(u64::from_le_bytes(self.take()?))
    }

    fn read_option_u32(&mut self) -> Option<Option<u32>> {
        let present = self.read_bool()?;
        let val = self.read_u32()?;
        Some(present.then_some(val))
    }

    fn read_plane_type(&mut self) -> Option<PlaneType> {
        PlaneType::ALL.get(usize::from(self.read_u8()?)).copied()
    }

    fn read_display(&mut self) -> Option<DisplayId> {
        Some(DisplayId(self.read_u32()?))
    }

    fn read_error(&mut self) -> Option<CommitError> {
        Some(match self.read_u8()? {
            ERR_PLANE_REJECTED => CommitError::PlaneRejected {
                plane: PlaneHandle::new(self.read_plane_type()?, self.read_u8()?),
            },
            ERR_PLANE_UNAVAILABLE => CommitError::PlaneUnavailable {
                plane_type: self.read_plane_type()?,
            },
            ERR_DEVICE => CommitError::Device {
                code: self.read_i32()?,
            },
            _ => return None,
        })
    }

    fn decode_classify(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Classify(ClassifyEvent {
            frame_index: self.read_u64()?,
            display: self.read_display()?,
            attempt: self.read_u8()?,
            cursor: self.read_u32()?,
            overlay: self.read_u32()?,
            sprite: self.read_u32()?,
            composable: self.read_u32()?,
            allocation_skipped: self.read_bool()?,
        }))
    }

    fn decode_assign(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Assign(AssignEvent {
            frame_index: self.read_u64()?,
            display: self.read_display()?,
            attempt: self.read_u8()?,
            slots: [
                self.read_u32()?,
                self.read_u32()?,
                self.read_u32()?,
                self.read_u32()?,
            ],
            gpu_layers: self.read_u32()?,
            target_z: self.read_option_u32()?,
            forced_fallback: self.read_bool()?,
        }))
    }

    fn decode_commit(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Commit(CommitEvent {
            frame_index: self.read_u64()?,
            display: self.read_display()?,
            attempt: self.read_u8()?,
            entries: self.read_u32()?,
        }))
    }

    fn decode_commit_failed(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::CommitFailed(CommitFailedEvent {
            frame_index: self.read_u64()?,
            display: self.read_display()?,
            attempt: self.read_u8()?,
            error: self.read_error()?,
        }))
    }

    fn decode_frame_dropped(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FrameDropped(FrameDroppedEvent {
            frame_index: self.read_u64()?,
            display: self.read_display()?,
            first: self.read_error()?,
            second: self.read_error()?,
        }))
    }

    fn decode_backtrack(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Backtrack(BacktrackEvent {
            frame_index: self.read_u64()?,
            display: self.read_display()?,
            plane_type: self.read_plane_type()?,
            k: self.read_u32()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_CLASSIFY => self.decode_classify(),
            TAG_ASSIGN => self.decode_assign(),
            TAG_COMMIT => self.decode_commit(),
            TAG_COMMIT_FAILED => self.decode_commit_failed(),
            TAG_FRAME_DROPPED => self.decode_frame_dropped(),
            TAG_BACKTRACK => self.decode_backtrack(),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_assign() -> AssignEvent {
        AssignEvent {
            frame_index: 7,
            display: DisplayId(1),
            attempt: 2,
            slots: [0, 1, 2, 1],
            gpu_layers: 3,
            target_z: Some(1),
            forced_fallback: false,
        }
    }

    #[test]
    fn assign_survives_recording() {
        let mut rec = RecorderSink::new();
        rec.on_assign(&sample_assign());

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events, vec![RecordedEvent::Assign(sample_assign())]);
        assert_eq!(events[0].frame_index(), 7);
        assert_eq!(events[0].display(), DisplayId(1));
    }

    #[test]
    fn every_commit_error_kind_survives_recording() {
        let mut rec = RecorderSink::new();
        let dropped = FrameDroppedEvent {
            frame_index: 3,
            display: DisplayId(0),
            first: CommitError::PlaneRejected {
                plane: PlaneHandle::new(PlaneType::Overlay, 1),
            },
            second: CommitError::Device { code: -16 },
        };
        let failed = CommitFailedEvent {
            frame_index: 4,
            display: DisplayId(0),
            attempt: 1,
            error: CommitError::PlaneUnavailable {
                plane_type: PlaneType::Cursor,
            },
        };
        rec.on_frame_dropped(&dropped);
        rec.on_commit_failed(&failed);

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(
            events,
            vec![
                RecordedEvent::FrameDropped(dropped),
                RecordedEvent::CommitFailed(failed),
            ]
        );
    }

    #[test]
    fn mixed_events_keep_their_order() {
        let mut rec = RecorderSink::new();
        rec.on_classify(&ClassifyEvent {
            frame_index: 1,
            display: DisplayId(0),
            attempt: 1,
            cursor: 0,
            overlay: 1,
            sprite: 0,
            composable: 2,
            allocation_skipped: false,
        });
        rec.on_backtrack(&BacktrackEvent {
            frame_index: 1,
            display: DisplayId(0),
            plane_type: PlaneType::Overlay,
            k: 1,
        });
        rec.on_commit(&CommitEvent {
            frame_index: 1,
            display: DisplayId(0),
            attempt: 1,
            entries: 1,
        });

        let kinds: Vec<&str> = decode(rec.as_bytes())
            .map(|e| match e {
                RecordedEvent::Classify(_) => "classify",
                RecordedEvent::Backtrack(_) => "backtrack",
                RecordedEvent::Commit(_) => "commit",
                _ => "other",
            })
            .collect();
        assert_eq!(kinds, ["classify", "backtrack", "commit"]);
    }

    #[test]
    fn truncated_recording_stops_cleanly() {
        let mut rec = RecorderSink::new();
        rec.on_assign(&sample_assign());
        rec.on_assign(&sample_assign());
        let bytes = rec.into_bytes();
        let cut = &bytes[..bytes.len() - 3];
        assert_eq!(decode(cut).count(), 1);
        assert_eq!(decode(&[]).count(), 0);
        assert_eq!(decode(&[0xff, 0, 0]).count(), 0, "unknown tag");
    }
}

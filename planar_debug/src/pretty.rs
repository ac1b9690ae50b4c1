// Copyright 2026 the Planar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use planar_core::plane::PlaneType;
use planar_core::trace::{
    AssignEvent, BacktrackEvent, ClassifyEvent, CommitEvent, CommitFailedEvent, FrameDroppedEvent,
    TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    backtracks: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("backtracks", &self.backtracks)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self {
            writer,
            backtracks: false,
        }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            backtracks: false,
        }
    }

    /// Also prints every abandoned search branch. Off by default; a busy
    /// frame can produce hundreds.
    #[must_use]
    pub fn with_backtracks(mut self, on: bool) -> Self {
        self.backtracks = on;
        self
    }

    /// Consumes the sink and returns the destination.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn slots(counts: &[u32; 4]) -> String {
    PlaneType::ALL
        .iter()
        .filter(|ty| counts[ty.slot()] > 0)
        .map(|ty| format!("{}x{}", ty.name().to_ascii_lowercase(), counts[ty.slot()]))
        .collect::<Vec<_>>()
        .join(",")
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_classify(&mut self, e: &ClassifyEvent) {
        let _ = writeln!(
            self.writer,
            "[classify] frame={} display={} attempt={} cursor={} overlay={} sprite={} composable={}{}",
            e.frame_index,
            e.display.0,
            e.attempt,
            e.cursor,
            e.overlay,
            e.sprite,
            e.composable,
            if e.allocation_skipped { " skipped" } else { "" },
        );
    }

    fn on_assign(&mut self, e: &AssignEvent) {
        let target = match e.target_z {
            Some(z) => format!("z{z}"),
            None => "-".to_owned(),
        };
        let _ = writeln!(
            self.writer,
            "[assign] frame={} display={} attempt={} planes=[{}] gpu={} target={}{}",
            e.frame_index,
            e.display.0,
            e.attempt,
            slots(&e.slots),
            e.gpu_layers,
            target,
            if e.forced_fallback { " fallback" } else { "" },
        );
    }

    fn on_commit(&mut self, e: &CommitEvent) {
        let _ = writeln!(
            self.writer,
            "[commit] frame={} display={} attempt={} entries={}",
            e.frame_index, e.display.0, e.attempt, e.entries,
        );
    }

    fn on_commit_failed(&mut self, e: &CommitFailedEvent) {
        let _ = writeln!(
            self.writer,
            "[commit:failed] frame={} display={} attempt={} error=\"{}\"",
            e.frame_index, e.display.0, e.attempt, e.error,
        );
    }

    fn on_frame_dropped(&mut self, e: &FrameDroppedEvent) {
        let _ = writeln!(
            self.writer,
            "[dropped] frame={} display={} first=\"{}\" second=\"{}\"",
            e.frame_index, e.display.0, e.first, e.second,
        );
    }

    fn on_backtrack(&mut self, e: &BacktrackEvent) {
        if !self.backtracks {
            return;
        }
        let _ = writeln!(
            self.writer,
            "[backtrack] frame={} display={} {} k={}",
            e.frame_index,
            e.display.0,
            e.plane_type.name().to_ascii_lowercase(),
            e.k,
        );
    }
}

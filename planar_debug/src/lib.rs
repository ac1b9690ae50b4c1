// Copyright 2026 the Planar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, JSON export and state dumps for planar
//! diagnostics.
//!
//! This crate provides [`TraceSink`](planar_core::trace::TraceSink)
//! implementations and dump helpers for development and post-mortem
//! analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`json::export`]: writes recorded bytes as a JSON event array, and
//!   [`json::snapshot`] renders one presented frame.
//! - [`dump`]: the plane-assignment table of a frame and the free/reclaimed
//!   state of a plane inventory.

pub mod dump;
pub mod json;
pub mod pretty;
pub mod recorder;

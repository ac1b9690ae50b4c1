// Copyright 2026 the Planar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame hardware compositing-plane assignment.
//!
//! `planar_core` decides, for every frame a display presents, which layers
//! can be scanned out directly by fixed-function hardware planes (cursor,
//! overlay, sprite, primary) and which must be composed by the GPU into the
//! frame buffer target. It is `no_std` compatible (with `alloc`) and performs
//! no I/O apart from the single commit call it hands to the caller's
//! [`PlaneCommitter`](commit::PlaneCommitter).
//!
//! # Architecture
//!
//! One pass runs to completion inside a display-refresh callback:
//!
//! ```text
//!   &mut [Layer] ──► LayerStack::new() ──► classify() ──► Candidates
//!                                                            │
//!                 ┌──────────────────────────────────────────┘
//!                 ▼
//!   search::assign() ──► Assignment ──► bind() ──► CommitRequest
//!        │     ▲                                        │
//!        │     └── overlap::can_use_as_target()         ▼
//!        └──────── ZOrderPolicy::is_valid()     PlaneCommitter::commit()
//!                                                       │
//!                  on first failure: demote + re-run ◄──┘
//! ```
//!
//! **[`layer`]**: The per-frame layer record, its flags and the
//! [`LayerAssignment`](layer::LayerAssignment) written back for the renderer.
//!
//! **[`plane`]**: Plane types in assignment priority order and concrete
//! plane handles.
//!
//! **[`inventory`]**: Per-display free/reclaimed plane bookkeeping.
//!
//! **[`capability`]**: The capability oracle seam and a limits-driven
//! reference implementation.
//!
//! **[`classify`]**: Partitions a layer stack into typed candidate sets.
//!
//! **[`search`]**: The backtracking plane assigner.
//!
//! **[`overlap`]**: Decides where the frame buffer target may sit in the
//! z-order without reordering visible content.
//!
//! **[`zorder`]**: Device blend-chain validation of a tentative plane stack.
//!
//! **[`commit`]**: Binds concrete planes, submits them and handles the
//! one-shot demote-and-retry on commit failure.
//!
//! **[`display`]**: A display pipe owning its inventory, oracle and policy.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! pass instrumentation, with a zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-step
//!   backtracking events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub use kurbo;

pub mod capability;
pub mod classify;
pub mod commit;
pub mod display;
pub mod error;
pub mod inventory;
pub mod layer;
pub mod overlap;
pub mod plane;
pub mod search;
pub mod trace;
pub mod zorder;

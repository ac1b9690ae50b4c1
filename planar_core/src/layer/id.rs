// Copyright 2026 the Planar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Buffer identity.

use core::fmt;

/// An opaque reference to a layer's pixel buffer.
///
/// Buffers are allocated and imported outside this crate; the pass only
/// forwards the id into the [`CommitRequest`](crate::commit::CommitRequest).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BufferId(pub u64);

impl fmt::Debug for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BufferId({:#x})", self.0)
    }
}

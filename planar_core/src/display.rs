// Copyright 2026 the Planar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Display pipes.
//!
//! A [`Display`] owns everything one pipe needs to run the pass: its
//! [`PlaneInventory`], the [`CapabilityOracle`] and [`ZOrderPolicy`] for its
//! hardware, and the planes bound by the last presented frame. Displays
//! share no mutable state, so each can run its pass independently.
//!
//! The pass itself is [`Display::present`], implemented in
//! [`commit`](crate::commit).

use alloc::vec::Vec;
use core::fmt;

use crate::capability::CapabilityOracle;
use crate::inventory::{InventoryConfig, PlaneInventory};
use crate::plane::PlaneHandle;
use crate::zorder::{Unrestricted, ZOrderPolicy};

/// Identifies a display pipe.
///
/// The value is chosen by the caller and passed through untouched.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DisplayId(pub u32);

impl fmt::Debug for DisplayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DisplayId({})", self.0)
    }
}

/// Static configuration of a display pipe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Identifier carried in commits and trace events.
    pub id: DisplayId,
    /// The pipe scales the whole frame (e.g. a mirrored external panel).
    /// At most one sprite candidate is admitted in this mode.
    pub forces_full_frame_scaling: bool,
    /// Planes owned by the pipe.
    pub inventory: InventoryConfig,
}

impl DisplayConfig {
    /// The built-in panel.
    #[must_use]
    pub const fn internal(id: DisplayId) -> Self {
        Self {
            id,
            forces_full_frame_scaling: false,
            inventory: InventoryConfig::single_pipe(),
        }
    }

    /// An external output driven by the secondary pipe.
    #[must_use]
    pub const fn external(id: DisplayId) -> Self {
        Self {
            id,
            forces_full_frame_scaling: false,
            inventory: InventoryConfig::secondary_pipe(),
        }
    }
}

/// One display pipe and its plane state.
#[derive(Debug)]
pub struct Display<O, P = Unrestricted> {
    pub(crate) config: DisplayConfig,
    pub(crate) inventory: PlaneInventory,
    pub(crate) oracle: O,
    pub(crate) policy: P,
    pub(crate) frame_index: u64,
    pub(crate) bound: Vec<PlaneHandle>,
    /// GPU-composed layer positions of the last presented frame.
    pub(crate) last_gpu: Vec<u32>,
}

impl<O: CapabilityOracle> Display<O> {
    /// Creates a display that accepts any non-empty plane stack.
    #[must_use]
    pub fn new(config: DisplayConfig, oracle: O) -> Self {
        Self::with_policy(config, oracle, Unrestricted)
    }
}

impl<O: CapabilityOracle, P: ZOrderPolicy> Display<O, P> {
    /// Creates a display with a device-specific z-order policy.
    ///
    /// # Panics
    ///
    /// Panics if the inventory configuration is invalid (see
    /// [`PlaneInventory::new`]).
    #[must_use]
    pub fn with_policy(config: DisplayConfig, oracle: O, policy: P) -> Self {
        Self {
            inventory: PlaneInventory::new(config.id, config.inventory),
            config,
            oracle,
            policy,
            frame_index: 0,
            bound: Vec::new(),
            last_gpu: Vec::new(),
        }
    }
}

impl<O, P> Display<O, P> {
    /// The display's identifier.
    #[must_use]
    pub fn id(&self) -> DisplayId {
        self.config.id
    }

    /// Static configuration.
    #[must_use]
    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// Switches full-frame scaling on or off, e.g. when mirroring starts.
    pub fn set_forces_full_frame_scaling(&mut self, on: bool) {
        self.config.forces_full_frame_scaling = on;
    }

    /// Plane bookkeeping.
    #[must_use]
    pub fn inventory(&self) -> &PlaneInventory {
        &self.inventory
    }

    /// The capability oracle.
    #[must_use]
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Mutable access to the oracle, for oracles with runtime state.
    pub fn oracle_mut(&mut self) -> &mut O {
        &mut self.oracle
    }

    /// The z-order policy.
    #[must_use]
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Number of passes run so far.
    #[must_use]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Planes scanning out the last presented frame.
    #[must_use]
    pub fn bound_planes(&self) -> &[PlaneHandle] {
        &self.bound
    }

    /// Returns reclaimed planes to the free set.
    ///
    /// Call once the driver has disabled the planes the last frame gave up.
    pub fn release_reclaimed_planes(&mut self) {
        self.inventory.release_reclaimed();
    }
}

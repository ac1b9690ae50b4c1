// Copyright 2026 the Planar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Plane binding, commit and the demote-and-retry fallback.
//!
//! [`Display::present`] runs one frame through an explicit state machine:
//!
//! ```text
//!   Assign ──► Commit ──ok──► done
//!     ▲          │
//!     │        error
//!     │          ▼
//!     └─────── Demote ──second error──► FrameError::Dropped
//! ```
//!
//! `Assign` classifies the layers, runs the search and binds concrete planes
//! from the inventory. `Demote` hands the bound planes back and, on the first
//! failure, moves every plane layer to the GPU before assigning again. There
//! is exactly one retry.

use alloc::vec::Vec;

use crate::capability::CapabilityOracle;
use crate::classify::{Candidates, classify};
use crate::display::{Display, DisplayId};
use crate::error::{CommitError, FrameError, LayerListError};
use crate::layer::{BufferId, Layer, LayerAssignment, LayerRole, LayerStack};
use crate::plane::{PlaneHandle, PlaneType};
use crate::search::{self, Assignment, to_u32};
use crate::trace::{
    AssignEvent, ClassifyEvent, CommitEvent, CommitFailedEvent, FrameDroppedEvent, Tracer,
};
use crate::zorder::ZOrderPolicy;

/// One plane of a commit request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommitEntry {
    /// The bound plane.
    pub plane: PlaneHandle,
    /// Stack position of the layer it scans out.
    pub layer: u32,
    /// Buffer to flip to.
    pub buffer: Option<BufferId>,
    /// Position in the plane stack, 0 = bottom.
    pub z_order: u32,
}

/// Everything the driver needs to flip one frame, submitted atomically.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitRequest {
    /// Target display.
    pub display: DisplayId,
    /// Pass counter of the display.
    pub frame_index: u64,
    /// Planes bottom to top.
    pub entries: Vec<CommitEntry>,
}

/// The display driver's flip call.
pub trait PlaneCommitter {
    /// Applies `request` atomically.
    ///
    /// # Errors
    ///
    /// Returns a [`CommitError`] if the hardware rejects the configuration.
    /// Nothing of a rejected request may remain applied.
    fn commit(&mut self, request: &CommitRequest) -> Result<(), CommitError>;
}

/// Summary of a presented frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameOutcome {
    /// Pass counter of the display.
    pub frame_index: u64,
    /// 1, or 2 if the first commit failed and the retry succeeded.
    pub attempts: u8,
    /// Content layers scanned out by planes.
    pub hardware_layers: u32,
    /// Content layers composed by the GPU.
    pub gpu_layers: u32,
    /// Committed z-order of the frame buffer target, if it is scanned out.
    pub target_z: Option<u32>,
    /// The GPU layers are the same as last frame and none was updated, so
    /// the previous frame buffer target contents can be reused.
    pub gpu_reuse: bool,
    /// Nothing was composable and no plane was allocated or committed.
    pub allocation_skipped: bool,
    /// The search found nothing and fell back to pure GPU composition.
    pub forced_fallback: bool,
}

enum Step {
    Assign {
        attempt: u8,
        first: Option<CommitError>,
    },
    Commit {
        attempt: u8,
        first: Option<CommitError>,
        request: CommitRequest,
        candidates: Candidates,
        assignment: Assignment,
    },
    Demote {
        attempt: u8,
        first: Option<CommitError>,
        error: CommitError,
        assignment: Assignment,
    },
}

impl<O: CapabilityOracle, P: ZOrderPolicy> Display<O, P> {
    /// Assigns planes for one frame and commits them.
    ///
    /// On return, every content and target layer's `assignment` is set:
    /// [`Plane`](LayerAssignment::Plane) or
    /// [`GpuComposed`](LayerAssignment::GpuComposed) on success,
    /// [`Unassigned`](LayerAssignment::Unassigned) when the frame was
    /// dropped. [`Preplaced`](LayerRole::Preplaced) layers are not touched.
    ///
    /// Planes bound by the previous frame are reclaimed first. `force_gpu`
    /// flags set while demoting are cleared again before returning.
    ///
    /// # Errors
    ///
    /// - [`FrameError::InvalidLayers`] if `layers` is malformed. Nothing is
    ///   changed and the frame counter does not advance.
    /// - [`FrameError::Dropped`] if the commit and its retry both failed.
    pub fn present<C>(
        &mut self,
        layers: &mut [Layer],
        committer: &mut C,
        tracer: &mut Tracer<'_>,
    ) -> Result<FrameOutcome, FrameError>
    where
        C: PlaneCommitter + ?Sized,
    {
        LayerStack::new(layers)?;
        let frame_index = self.frame_index;
        self.frame_index += 1;
        self.reclaim_bound();
        clear_assignments(layers);

        let mut demoted = Vec::new();
        let result = self.run(layers, committer, tracer, frame_index, &mut demoted);
        for pos in demoted {
            layers[pos].flags.force_gpu = false;
        }
        result
    }

    fn run<C>(
        &mut self,
        layers: &mut [Layer],
        committer: &mut C,
        tracer: &mut Tracer<'_>,
        frame_index: u64,
        demoted: &mut Vec<usize>,
    ) -> Result<FrameOutcome, FrameError>
    where
        C: PlaneCommitter + ?Sized,
    {
        let display = self.id();
        let mut step = Step::Assign {
            attempt: 1,
            first: None,
        };
        loop {
            step = match step {
                Step::Assign { attempt, first } => {
                    let Some((candidates, assignment)) =
                        self.plan(layers, frame_index, attempt, tracer)?
                    else {
                        self.last_gpu.clear();
                        return Ok(FrameOutcome {
                            frame_index,
                            attempts: attempt,
                            allocation_skipped: true,
                            ..FrameOutcome::default()
                        });
                    };
                    match self.bind(layers, &candidates, &assignment, frame_index) {
                        Ok(request) => Step::Commit {
                            attempt,
                            first,
                            request,
                            candidates,
                            assignment,
                        },
                        Err(error) => Step::Demote {
                            attempt,
                            first,
                            error,
                            assignment,
                        },
                    }
                }
                Step::Commit {
                    attempt,
                    first,
                    request,
                    candidates,
                    assignment,
                } => {
                    tracer.commit(&CommitEvent {
                        frame_index,
                        display,
                        attempt,
                        entries: to_u32(request.entries.len()),
                    });
                    match committer.commit(&request) {
                        Ok(()) => {
                            return Ok(self.finish(
                                layers,
                                &candidates,
                                &assignment,
                                frame_index,
                                attempt,
                            ));
                        }
                        Err(error) => Step::Demote {
                            attempt,
                            first,
                            error,
                            assignment,
                        },
                    }
                }
                Step::Demote {
                    attempt,
                    first,
                    error,
                    assignment,
                } => {
                    tracer.commit_failed(&CommitFailedEvent {
                        frame_index,
                        display,
                        attempt,
                        error,
                    });
                    self.reclaim_bound();
                    if let Some(first) = first {
                        clear_assignments(layers);
                        self.last_gpu.clear();
                        tracer.frame_dropped(&FrameDroppedEvent {
                            frame_index,
                            display,
                            first,
                            second: error,
                        });
                        return Err(FrameError::Dropped {
                            first,
                            second: error,
                        });
                    }
                    for slot in assignment.slots() {
                        let pos = slot.layer as usize;
                        let layer = &mut layers[pos];
                        if layer.role == LayerRole::Content {
                            layer.flags.force_gpu = true;
                            layer.assignment = LayerAssignment::GpuComposed;
                            demoted.push(pos);
                        }
                    }
                    Step::Assign {
                        attempt: attempt + 1,
                        first: Some(error),
                    }
                }
            };
        }
    }

    /// Classifies and searches. `None` means allocation is skipped.
    fn plan(
        &self,
        layers: &[Layer],
        frame_index: u64,
        attempt: u8,
        tracer: &mut Tracer<'_>,
    ) -> Result<Option<(Candidates, Assignment)>, LayerListError> {
        let stack = LayerStack::new(layers)?;
        let candidates = classify(&stack, &self.oracle, self.config.forces_full_frame_scaling);
        tracer.classify(&ClassifyEvent {
            frame_index,
            display: self.id(),
            attempt,
            cursor: to_u32(candidates.of(PlaneType::Cursor).len()),
            overlay: to_u32(candidates.of(PlaneType::Overlay).len()),
            sprite: to_u32(candidates.of(PlaneType::Sprite).len()),
            composable: to_u32(candidates.composable().len()),
            allocation_skipped: candidates.allocation_skipped(),
        });
        if candidates.allocation_skipped() {
            return Ok(None);
        }

        let assignment = search::assign(
            &stack,
            &candidates,
            &self.inventory,
            &self.oracle,
            &self.policy,
            frame_index,
            tracer,
        );
        let mut slots = [0_u32; 4];
        for ty in PlaneType::ALL {
            slots[ty.slot()] = to_u32(assignment.count(ty));
        }
        let hardware = assignment.slots().len() - usize::from(assignment.target_z().is_some());
        tracer.assign(&AssignEvent {
            frame_index,
            display: self.id(),
            attempt,
            slots,
            gpu_layers: to_u32(candidates.composable().len() - hardware),
            target_z: assignment.target_z(),
            forced_fallback: assignment.forced_fallback(),
        });
        Ok(Some((candidates, assignment)))
    }

    /// Acquires a plane per slot and writes every composable layer's
    /// assignment.
    fn bind(
        &mut self,
        layers: &mut [Layer],
        candidates: &Candidates,
        assignment: &Assignment,
        frame_index: u64,
    ) -> Result<CommitRequest, CommitError> {
        for &pos in candidates.composable() {
            layers[pos].assignment = LayerAssignment::GpuComposed;
        }
        let mut entries = Vec::with_capacity(assignment.slots().len());
        for (z, slot) in assignment.slots().iter().enumerate() {
            let plane = self
                .inventory
                .acquire(slot.plane_type)
                .ok_or(CommitError::PlaneUnavailable {
                    plane_type: slot.plane_type,
                })?;
            self.bound.push(plane);
            let z_order = to_u32(z);
            let layer = &mut layers[slot.layer as usize];
            layer.assignment = LayerAssignment::Plane { plane, z_order };
            entries.push(CommitEntry {
                plane,
                layer: slot.layer,
                buffer: layer.buffer,
                z_order,
            });
        }
        Ok(CommitRequest {
            display: self.id(),
            frame_index,
            entries,
        })
    }

    fn finish(
        &mut self,
        layers: &[Layer],
        candidates: &Candidates,
        assignment: &Assignment,
        frame_index: u64,
        attempt: u8,
    ) -> FrameOutcome {
        let gpu: Vec<u32> = candidates
            .composable()
            .iter()
            .copied()
            .filter(|&pos| layers[pos].assignment == LayerAssignment::GpuComposed)
            .map(to_u32)
            .collect();
        let gpu_reuse = attempt == 1
            && !gpu.is_empty()
            && gpu == self.last_gpu
            && gpu.iter().all(|&pos| !layers[pos as usize].flags.updated);
        let hardware = candidates.composable().len() - gpu.len();
        let gpu_layers = to_u32(gpu.len());
        self.last_gpu = gpu;
        FrameOutcome {
            frame_index,
            attempts: attempt,
            hardware_layers: to_u32(hardware),
            gpu_layers,
            target_z: assignment.target_z(),
            gpu_reuse,
            allocation_skipped: false,
            forced_fallback: assignment.forced_fallback(),
        }
    }
}

impl<O, P> Display<O, P> {
    fn reclaim_bound(&mut self) {
        for plane in self.bound.drain(..) {
            self.inventory.reclaim(plane);
        }
    }
}

fn clear_assignments(layers: &mut [Layer]) {
    for layer in layers {
        if layer.role != LayerRole::Preplaced {
            layer.assignment = LayerAssignment::Unassigned;
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use kurbo::Rect;

    use super::*;
    use crate::capability::LimitsOracle;
    use crate::display::DisplayConfig;
    use crate::inventory::InventoryConfig;
    use crate::layer::{LayerFlags, PixelFormat};

    const SCREEN: Rect = Rect::new(0.0, 0.0, 1920.0, 1080.0);

    struct Only(&'static [PlaneType]);

    impl CapabilityOracle for Only {
        fn supports(&self, plane_type: PlaneType, _: &Layer) -> bool {
            self.0.contains(&plane_type)
        }
    }

    /// Records requests and fails the first `failures` of them.
    #[derive(Default)]
    struct Driver {
        failures: u32,
        requests: Vec<CommitRequest>,
    }

    impl PlaneCommitter for Driver {
        fn commit(&mut self, request: &CommitRequest) -> Result<(), CommitError> {
            self.requests.push(request.clone());
            if self.failures > 0 {
                self.failures -= 1;
                return Err(CommitError::Device { code: -22 });
            }
            Ok(())
        }
    }

    fn at(i: u32, rect: Rect) -> Layer {
        Layer::new(i, BufferId(u64::from(i) + 1), rect)
    }

    fn with_target(mut layers: Vec<Layer>) -> Vec<Layer> {
        let n = u32::try_from(layers.len()).unwrap();
        layers.push(Layer::frame_buffer_target(n, Some(BufferId(1000)), SCREEN));
        layers
    }

    fn config(inventory: InventoryConfig) -> DisplayConfig {
        DisplayConfig {
            id: DisplayId(0),
            forces_full_frame_scaling: false,
            inventory,
        }
    }

    fn cursor_frame() -> Vec<Layer> {
        let mut cursor = at(1, Rect::new(10.0, 10.0, 74.0, 74.0));
        cursor.flags.is_cursor = true;
        with_target(vec![at(0, SCREEN), cursor])
    }

    const CURSOR_ONLY: InventoryConfig = InventoryConfig {
        primary: 1,
        cursor: 1,
        overlay: 0,
        sprite: 0,
    };

    fn plane(ty: PlaneType, z_order: u32) -> LayerAssignment {
        LayerAssignment::Plane {
            plane: PlaneHandle::new(ty, 0),
            z_order,
        }
    }

    #[test]
    fn cursor_on_plane_rest_on_gpu() {
        let mut display = Display::new(config(CURSOR_ONLY), Only(&[PlaneType::Cursor]));
        let mut layers = cursor_frame();
        let mut driver = Driver::default();
        let out = display
            .present(&mut layers, &mut driver, &mut Tracer::none())
            .unwrap();

        assert_eq!(layers[0].assignment, LayerAssignment::GpuComposed);
        assert_eq!(layers[1].assignment, plane(PlaneType::Cursor, 1));
        assert_eq!(layers[2].assignment, plane(PlaneType::Primary, 0));
        assert_eq!(out.target_z, Some(0));
        assert_eq!((out.hardware_layers, out.gpu_layers), (1, 1));
        assert_eq!(driver.requests.len(), 1);
        assert_eq!(driver.requests[0].entries.len(), 2);
        assert_eq!(driver.requests[0].entries[0].buffer, Some(BufferId(1000)));
    }

    #[test]
    fn forced_layers_use_target_alone() {
        let forced = LayerFlags {
            force_gpu: true,
            ..LayerFlags::default()
        };
        let mut layers = with_target((0..4).map(|i| at(i, SCREEN).with_flags(forced)).collect());
        let mut display = Display::new(
            DisplayConfig::internal(DisplayId(0)),
            LimitsOracle::default(),
        );
        let mut driver = Driver::default();
        let out = display
            .present(&mut layers, &mut driver, &mut Tracer::none())
            .unwrap();
        assert!(
            layers[..4]
                .iter()
                .all(|l| l.assignment == LayerAssignment::GpuComposed)
        );
        assert_eq!(driver.requests[0].entries.len(), 1);
        assert_eq!(out.hardware_layers, 0);
        assert_eq!(out.gpu_layers, 4);
    }

    #[test]
    fn full_frame_scaling_puts_lowest_layer_on_sprite() {
        let mut cfg = config(InventoryConfig {
            primary: 1,
            cursor: 0,
            overlay: 0,
            sprite: 1,
        });
        cfg.forces_full_frame_scaling = true;
        let mut display = Display::new(cfg, LimitsOracle::default());
        let mut layers = with_target(vec![
            at(0, Rect::new(0.0, 0.0, 800.0, 600.0)),
            at(1, Rect::new(900.0, 0.0, 1700.0, 600.0)),
        ]);
        display
            .present(&mut layers, &mut Driver::default(), &mut Tracer::none())
            .unwrap();
        assert_eq!(layers[0].assignment.plane_type(), Some(PlaneType::Sprite));
        assert_eq!(layers[1].assignment, LayerAssignment::GpuComposed);
    }

    #[test]
    fn overlap_conflict_composes_everything_on_gpu() {
        struct VideoOnly;
        impl CapabilityOracle for VideoOnly {
            fn supports(&self, plane_type: PlaneType, layer: &Layer) -> bool {
                plane_type == PlaneType::Overlay && layer.format.is_yuv()
            }
        }
        let big = Rect::new(0.0, 0.0, 800.0, 600.0);
        let mut layers = with_target(vec![
            at(0, big),
            at(1, big).with_format(PixelFormat::NV12),
            at(2, big),
        ]);
        let mut display = Display::new(DisplayConfig::internal(DisplayId(0)), VideoOnly);
        let out = display
            .present(&mut layers, &mut Driver::default(), &mut Tracer::none())
            .unwrap();
        assert_eq!(out.hardware_layers, 0);
        assert_eq!(out.target_z, Some(0));
        assert!(!out.forced_fallback);
    }

    #[test]
    fn failed_commit_demotes_and_retries_once() {
        let mut display = Display::new(config(CURSOR_ONLY), Only(&[PlaneType::Cursor]));
        let mut layers = cursor_frame();
        let mut driver = Driver {
            failures: 1,
            ..Driver::default()
        };
        let out = display
            .present(&mut layers, &mut driver, &mut Tracer::none())
            .unwrap();

        assert_eq!(out.attempts, 2);
        assert_eq!(driver.requests.len(), 2);
        assert_eq!(driver.requests[1].entries.len(), 1, "only the target remains");
        assert_eq!(layers[0].assignment, LayerAssignment::GpuComposed);
        assert_eq!(layers[1].assignment, LayerAssignment::GpuComposed);
        assert!(!layers[1].flags.force_gpu, "demotion lasts one frame");
        assert_eq!(display.bound_planes(), &[PlaneHandle::new(PlaneType::Primary, 0)]);
    }

    #[test]
    fn second_failure_drops_frame() {
        let mut display = Display::new(config(CURSOR_ONLY), Only(&[PlaneType::Cursor]));
        let mut layers = cursor_frame();
        let mut driver = Driver {
            failures: 2,
            ..Driver::default()
        };
        let err = display
            .present(&mut layers, &mut driver, &mut Tracer::none())
            .unwrap_err();

        assert_eq!(
            err,
            FrameError::Dropped {
                first: CommitError::Device { code: -22 },
                second: CommitError::Device { code: -22 },
            }
        );
        assert_eq!(driver.requests.len(), 2, "no third attempt");
        assert!(
            layers
                .iter()
                .all(|l| l.assignment == LayerAssignment::Unassigned)
        );
        assert!(display.bound_planes().is_empty());
        assert_eq!(display.inventory().free_count(PlaneType::Cursor), 1);
        assert_eq!(display.inventory().free_count(PlaneType::Primary), 1);
    }

    #[test]
    fn invalid_layers_leave_display_untouched() {
        let mut display = Display::new(config(CURSOR_ONLY), LimitsOracle::default());
        let mut layers = vec![at(0, SCREEN)];
        let err = display
            .present(&mut layers, &mut Driver::default(), &mut Tracer::none())
            .unwrap_err();
        assert_eq!(
            err,
            FrameError::InvalidLayers(LayerListError::MissingFrameBufferTarget)
        );
        assert_eq!(display.frame_index(), 0);
    }

    #[test]
    fn unchanged_gpu_layers_allow_reuse() {
        let mut display = Display::new(config(CURSOR_ONLY), Only(&[PlaneType::Cursor]));
        let mut driver = Driver::default();
        let mut layers = cursor_frame();
        let first = display
            .present(&mut layers, &mut driver, &mut Tracer::none())
            .unwrap();
        assert!(!first.gpu_reuse, "nothing to reuse on the first frame");

        let second = display
            .present(&mut layers, &mut driver, &mut Tracer::none())
            .unwrap();
        assert!(second.gpu_reuse);
        assert_eq!(second.frame_index, 1);

        layers[0].flags.updated = true;
        let third = display
            .present(&mut layers, &mut driver, &mut Tracer::none())
            .unwrap();
        assert!(!third.gpu_reuse);
    }

    #[test]
    fn previous_planes_are_reclaimed_and_reused() {
        let mut display = Display::new(config(CURSOR_ONLY), Only(&[PlaneType::Cursor]));
        let mut driver = Driver::default();
        let mut layers = cursor_frame();
        display
            .present(&mut layers, &mut driver, &mut Tracer::none())
            .unwrap();
        let first: Vec<PlaneHandle> = display.bound_planes().to_vec();
        display
            .present(&mut layers, &mut driver, &mut Tracer::none())
            .unwrap();
        assert_eq!(display.bound_planes(), first.as_slice());
        assert_eq!(display.inventory().reclaimed_count(), 0);
    }

    #[test]
    fn zero_plane_inventory_composes_everything() {
        let mut display = Display::new(
            config(InventoryConfig::primary_only()),
            LimitsOracle::permissive(),
        );
        let mut layers = with_target((0..3).map(|i| at(i, SCREEN)).collect());
        let out = display
            .present(&mut layers, &mut Driver::default(), &mut Tracer::none())
            .unwrap();
        assert!(
            layers[..3]
                .iter()
                .all(|l| l.assignment == LayerAssignment::GpuComposed)
        );
        assert_eq!(out.gpu_layers, 3);

        let mut layers = with_target(vec![at(0, Rect::new(0.0, 0.0, 100.0, 100.0))]);
        let out = display
            .present(&mut layers, &mut Driver::default(), &mut Tracer::none())
            .unwrap();
        assert_eq!(
            layers[0].assignment,
            LayerAssignment::GpuComposed,
            "a lone layer stays off the primary plane"
        );
        assert_eq!(layers[1].assignment, plane(PlaneType::Primary, 0));
        assert_eq!((out.hardware_layers, out.gpu_layers), (0, 1));
        assert_eq!(out.target_z, Some(0));
    }

    #[test]
    fn gpu_layer_below_overlapping_overlay_keeps_the_overlay() {
        struct VideoOnly;
        impl CapabilityOracle for VideoOnly {
            fn supports(&self, plane_type: PlaneType, layer: &Layer) -> bool {
                plane_type == PlaneType::Overlay && layer.format.is_yuv()
            }
        }
        let big = Rect::new(0.0, 0.0, 800.0, 600.0);
        let mut layers = with_target(vec![at(0, big), at(1, big).with_format(PixelFormat::NV12)]);
        let mut display = Display::new(DisplayConfig::internal(DisplayId(0)), VideoOnly);
        let out = display
            .present(&mut layers, &mut Driver::default(), &mut Tracer::none())
            .unwrap();
        assert_eq!(layers[0].assignment, LayerAssignment::GpuComposed);
        assert_eq!(layers[1].assignment, plane(PlaneType::Overlay, 1));
        assert_eq!(layers[2].assignment, plane(PlaneType::Primary, 0));
        assert_eq!(out.target_z, Some(0), "target takes the GPU layer's depth");
        assert_eq!((out.hardware_layers, out.gpu_layers), (1, 1));
    }

    #[test]
    fn sprite_order_follows_layer_order() {
        let mut display = Display::new(
            DisplayConfig::internal(DisplayId(0)),
            Only(&[PlaneType::Sprite]),
        );
        let mut layers = with_target(
            (0..5)
                .map(|i| {
                    let x = f64::from(i) * 300.0;
                    at(i, Rect::new(x, 0.0, x + 200.0, 200.0))
                })
                .collect(),
        );
        display
            .present(&mut layers, &mut Driver::default(), &mut Tracer::none())
            .unwrap();
        let sprite_z: Vec<u32> = layers
            .iter()
            .filter_map(|l| match l.assignment {
                LayerAssignment::Plane { plane, z_order } if plane.plane_type == PlaneType::Sprite => {
                    Some(z_order)
                }
                _ => None,
            })
            .collect();
        assert_eq!(sprite_z.len(), 3);
        assert!(sprite_z.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn preplaced_only_frame_skips_allocation() {
        let mut preplaced = at(0, SCREEN).with_role(LayerRole::Preplaced);
        preplaced.assignment = plane(PlaneType::Overlay, 0);
        let mut layers = with_target(vec![preplaced]);
        let mut display = Display::new(config(CURSOR_ONLY), LimitsOracle::default());
        let mut driver = Driver::default();
        let out = display
            .present(&mut layers, &mut driver, &mut Tracer::none())
            .unwrap();
        assert!(out.allocation_skipped);
        assert!(driver.requests.is_empty());
        assert_eq!(layers[0].assignment, plane(PlaneType::Overlay, 0));
    }

    #[test]
    fn displays_are_independent() {
        let mut internal = Display::new(
            DisplayConfig::internal(DisplayId(0)),
            LimitsOracle::default(),
        );
        let mut external = Display::new(
            DisplayConfig::external(DisplayId(1)),
            LimitsOracle::default(),
        );
        let mut a = with_target((0..2).map(|i| at(i, SCREEN)).collect());
        let mut b = a.clone();
        let mut driver = Driver::default();
        internal
            .present(&mut a, &mut driver, &mut Tracer::none())
            .unwrap();
        external
            .present(&mut b, &mut driver, &mut Tracer::none())
            .unwrap();
        assert_eq!(driver.requests[0].display, DisplayId(0));
        assert_eq!(driver.requests[1].display, DisplayId(1));
        assert_eq!(internal.inventory().display(), DisplayId(0));
        assert!(!external.bound_planes().is_empty());
    }

    #[cfg(feature = "trace")]
    #[test]
    fn retry_is_traced() {
        use crate::trace::TraceSink;

        #[derive(Default)]
        struct Counts {
            classify: u32,
            commit: u32,
            failed: u32,
            dropped: u32,
        }
        impl TraceSink for Counts {
            fn on_classify(&mut self, _: &ClassifyEvent) {
                self.classify += 1;
            }
            fn on_commit(&mut self, _: &CommitEvent) {
                self.commit += 1;
            }
            fn on_commit_failed(&mut self, _: &CommitFailedEvent) {
                self.failed += 1;
            }
            fn on_frame_dropped(&mut self, _: &FrameDroppedEvent) {
                self.dropped += 1;
            }
        }

        let mut display = Display::new(config(CURSOR_ONLY), Only(&[PlaneType::Cursor]));
        let mut layers = cursor_frame();
        let mut sink = Counts::default();
        let mut driver = Driver {
            failures: 1,
            ..Driver::default()
        };
        display
            .present(&mut layers, &mut driver, &mut Tracer::new(&mut sink))
            .unwrap();
        assert_eq!(
            (sink.classify, sink.commit, sink.failed, sink.dropped),
            (2, 2, 1, 0)
        );
    }
}

// Copyright 2026 the Planar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated frame loop over two displays.
//!
//! Presents a few synthetic frames (wallpaper, scaled video, status bar and
//! pointer) on an internal panel and a mirrored external output. The fake
//! driver rejects one commit on the panel to show the demote-and-retry path,
//! and both attempts of one external frame to show a dropped frame. Events
//! go to a [`PrettyPrintSink`](planar_debug::pretty::PrettyPrintSink) and a
//! [`RecorderSink`](planar_debug::recorder::RecorderSink); the recording is
//! exported as `plane_trace.json` and the last panel frame as
//! `plane_snapshot.json`.

use std::fs::File;
use std::io::{BufWriter, Write};

use planar_core::capability::LimitsOracle;
use planar_core::commit::{CommitRequest, PlaneCommitter};
use planar_core::display::{Display, DisplayConfig, DisplayId};
use planar_core::error::CommitError;
use planar_core::kurbo::Rect;
use planar_core::layer::{Blending, BufferId, Layer, LayerFlags, PixelFormat};
use planar_core::trace::{
    AssignEvent, BacktrackEvent, ClassifyEvent, CommitEvent, CommitFailedEvent, FrameDroppedEvent,
    TraceSink, Tracer,
};
use planar_core::zorder::{BlendChainPolicy, ZOrderLimits};

use planar_debug::pretty::PrettyPrintSink;
use planar_debug::recorder::RecorderSink;
use planar_debug::{dump, json};

const FRAME_COUNT: u64 = 6;
const PANEL: Rect = Rect::new(0.0, 0.0, 1920.0, 1080.0);

/// Forwards every event to both sinks.
struct Fanout<'a> {
    pretty: &'a mut PrettyPrintSink,
    recorder: &'a mut RecorderSink,
}

impl TraceSink for Fanout<'_> {
    fn on_classify(&mut self, e: &ClassifyEvent) {
        self.pretty.on_classify(e);
        self.recorder.on_classify(e);
    }

    fn on_assign(&mut self, e: &AssignEvent) {
        self.pretty.on_assign(e);
        self.recorder.on_assign(e);
    }

    fn on_commit(&mut self, e: &CommitEvent) {
        self.pretty.on_commit(e);
        self.recorder.on_commit(e);
    }

    fn on_commit_failed(&mut self, e: &CommitFailedEvent) {
        self.pretty.on_commit_failed(e);
        self.recorder.on_commit_failed(e);
    }

    fn on_frame_dropped(&mut self, e: &FrameDroppedEvent) {
        self.pretty.on_frame_dropped(e);
        self.recorder.on_frame_dropped(e);
    }

    fn on_backtrack(&mut self, e: &BacktrackEvent) {
        self.pretty.on_backtrack(e);
        self.recorder.on_backtrack(e);
    }
}

/// A driver that accepts everything except scripted failures.
struct SimDriver {
    /// `(display, frame, commits left to reject)`.
    failures: Vec<(DisplayId, u64, u8)>,
    flips: u32,
}

impl PlaneCommitter for SimDriver {
    fn commit(&mut self, request: &CommitRequest) -> Result<(), CommitError> {
        let scripted = self.failures.iter_mut().find(|(display, frame, left)| {
            *display == request.display && *frame == request.frame_index && *left > 0
        });
        if let Some((_, _, left)) = scripted {
            *left -= 1;
            return Err(match request.entries.last() {
                Some(entry) => CommitError::PlaneRejected { plane: entry.plane },
                None => CommitError::Device { code: -22 },
            });
        }
        self.flips += 1;
        Ok(())
    }
}

/// The layers of frame `frame`: video starts on frame 2, the status bar
/// redraws every other frame.
fn scene(frame: u64) -> Vec<Layer> {
    let mut layers = vec![Layer::new(0, BufferId(1), PANEL).with_format(PixelFormat::BGRX_8888)];
    if frame >= 2 {
        layers.push(
            Layer::new(1, BufferId(100 + frame), Rect::new(160.0, 90.0, 1760.0, 990.0))
                .with_src(Rect::new(0.0, 0.0, 1280.0, 720.0))
                .with_format(PixelFormat::NV12),
        );
    }
    let mut status = Layer::new(0, BufferId(2), Rect::new(0.0, 0.0, 1920.0, 48.0))
        .with_blending(Blending::Premultiplied);
    status.flags.updated = frame % 2 == 0;
    layers.push(status);
    layers.push(
        Layer::new(0, BufferId(3), Rect::new(900.0, 500.0, 964.0, 564.0)).with_flags(LayerFlags {
            is_cursor: true,
            ..LayerFlags::default()
        }),
    );
    layers.push(Layer::frame_buffer_target(0, Some(BufferId(4)), PANEL));
    for (layer, index) in layers.iter_mut().zip(0_u32..) {
        layer.index = index;
    }
    layers
}

fn main() {
    // -- sinks -------------------------------------------------------------
    let mut pretty = PrettyPrintSink::new(Box::new(std::io::stdout()));
    let mut recorder = RecorderSink::new();

    // -- displays ----------------------------------------------------------
    let mut panel = Display::with_policy(
        DisplayConfig::internal(DisplayId(0)),
        LimitsOracle::default(),
        BlendChainPolicy::new(ZOrderLimits::primary_pipe()),
    );
    let mut external = Display::new(
        DisplayConfig::external(DisplayId(1)),
        LimitsOracle::default(),
    );
    external.set_forces_full_frame_scaling(true);

    let mut driver = SimDriver {
        failures: vec![(DisplayId(0), 3, 1), (DisplayId(1), 4, 2)],
        flips: 0,
    };

    // -- simulated loop ----------------------------------------------------
    let mut last_panel = Vec::new();
    let mut last_outcome = None;
    for frame in 0..FRAME_COUNT {
        let mut panel_layers = scene(frame);
        let mut external_layers = scene(frame);

        {
            let mut fanout = Fanout {
                pretty: &mut pretty,
                recorder: &mut recorder,
            };
            let mut tracer = Tracer::new(&mut fanout);

            match panel.present(&mut panel_layers, &mut driver, &mut tracer) {
                Ok(outcome) => {
                    println!(
                        "panel frame {}: {} on planes, {} on gpu, reuse={}",
                        outcome.frame_index,
                        outcome.hardware_layers,
                        outcome.gpu_layers,
                        outcome.gpu_reuse,
                    );
                    last_outcome = Some(outcome);
                }
                Err(e) => println!("panel frame {frame}: {e}"),
            }
            if let Err(e) = external.present(&mut external_layers, &mut driver, &mut tracer) {
                println!("external frame {frame}: {e}");
            }
        }

        print!("{}", dump::layers(&panel_layers));

        // The driver disables planes given up by this frame right away.
        panel.release_reclaimed_planes();
        external.release_reclaimed_planes();
        last_panel = panel_layers;
    }

    print!("{}", dump::inventory(panel.inventory()));
    print!("{}", dump::inventory(external.inventory()));
    println!("{} flips", driver.flips);

    // -- export ------------------------------------------------------------
    let path = "plane_trace.json";
    let file = File::create(path).expect("failed to create plane_trace.json");
    let mut writer = BufWriter::new(file);
    json::export(recorder.as_bytes(), &mut writer).expect("failed to write trace");
    println!("Wrote {path} ({FRAME_COUNT} frames)");

    if let Some(outcome) = last_outcome {
        let path = "plane_snapshot.json";
        let file = File::create(path).expect("failed to create plane_snapshot.json");
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &json::snapshot(&last_panel, &outcome))
            .expect("failed to write snapshot");
        writer.flush().expect("failed to flush snapshot");
        println!("Wrote {path}");
    }
}

// Copyright 2026 the Planar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON export.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes them as a JSON array, one object per event. [`snapshot`] turns
//! a presented frame into a JSON object for attaching to bug reports.

use std::io::{self, Write};

use serde_json::{Value, json};

use planar_core::commit::FrameOutcome;
use planar_core::error::CommitError;
use planar_core::layer::{Layer, LayerAssignment};
use planar_core::plane::PlaneType;

use crate::dump::type_label;
use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as a pretty-printed JSON array.
///
/// Every object carries `event`, `frame_index` and `display`; the remaining
/// keys depend on the event.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let events: Vec<Value> = decode(bytes).map(|e| event_json(&e)).collect();
    serde_json::to_writer_pretty(&mut *writer, &events)?;
    writeln!(writer)?;
    Ok(())
}

fn event_json(recorded: &RecordedEvent) -> Value {
    let (name, args) = match recorded {
        RecordedEvent::Classify(e) => (
            "Classify",
            json!({
                "attempt": e.attempt,
                "cursor": e.cursor,
                "overlay": e.overlay,
                "sprite": e.sprite,
                "composable": e.composable,
                "allocation_skipped": e.allocation_skipped,
            }),
        ),
        RecordedEvent::Assign(e) => (
            "Assign",
            json!({
                "attempt": e.attempt,
                "planes": plane_counts(&e.slots),
                "gpu_layers": e.gpu_layers,
                "target_z": e.target_z,
                "forced_fallback": e.forced_fallback,
            }),
        ),
        RecordedEvent::Commit(e) => (
            "Commit",
            json!({
                "attempt": e.attempt,
                "entries": e.entries,
            }),
        ),
        RecordedEvent::CommitFailed(e) => (
            "CommitFailed",
            json!({
                "attempt": e.attempt,
                "error": error_json(e.error),
            }),
        ),
        RecordedEvent::FrameDropped(e) => (
            "FrameDropped",
            json!({
                "first": error_json(e.first),
                "second": error_json(e.second),
            }),
        ),
        RecordedEvent::Backtrack(e) => (
            "Backtrack",
            json!({
                "plane_type": e.plane_type.name(),
                "k": e.k,
            }),
        ),
    };
    json!({
        "event": name,
        "frame_index": recorded.frame_index(),
        "display": recorded.display().0,
        "args": args,
    })
}

fn plane_counts(slots: &[u32; 4]) -> Value {
    let map = PlaneType::ALL
        .iter()
        .map(|ty| (ty.name().to_owned(), json!(slots[ty.slot()])))
        .collect();
    Value::Object(map)
}

fn error_json(e: CommitError) -> Value {
    let kind = match e {
        CommitError::PlaneRejected { .. } => "PlaneRejected",
        CommitError::PlaneUnavailable { .. } => "PlaneUnavailable",
        CommitError::Device { .. } => "Device",
    };
    json!({
        "kind": kind,
        "message": e.to_string(),
    })
}

/// Renders a presented frame: the outcome plus each layer's assignment.
#[must_use]
pub fn snapshot(layers: &[Layer], outcome: &FrameOutcome) -> Value {
    let layers: Vec<Value> = layers
        .iter()
        .map(|layer| {
            let (plane, index, z_order) = match layer.assignment {
                LayerAssignment::Plane { plane, z_order } => (
                    Value::from(plane.plane_type.name()),
                    Value::from(plane.index),
                    Value::from(z_order),
                ),
                LayerAssignment::Unassigned | LayerAssignment::GpuComposed => {
                    (Value::Null, Value::Null, Value::Null)
                }
            };
            json!({
                "index": layer.index,
                "type": type_label(layer),
                "plane": plane,
                "plane_index": index,
                "z_order": z_order,
                "dst": [layer.dst_rect.x0, layer.dst_rect.y0, layer.dst_rect.x1, layer.dst_rect.y1],
            })
        })
        .collect();

    json!({
        "frame_index": outcome.frame_index,
        "attempts": outcome.attempts,
        "hardware_layers": outcome.hardware_layers,
        "gpu_layers": outcome.gpu_layers,
        "target_z": outcome.target_z,
        "gpu_reuse": outcome.gpu_reuse,
        "allocation_skipped": outcome.allocation_skipped,
        "forced_fallback": outcome.forced_fallback,
        "layers": layers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use planar_core::display::DisplayId;
    use planar_core::kurbo::Rect;
    use planar_core::layer::BufferId;
    use planar_core::plane::PlaneHandle;
    use planar_core::trace::{AssignEvent, CommitFailedEvent, TraceSink};

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_assign(&AssignEvent {
            frame_index: 2,
            display: DisplayId(1),
            attempt: 1,
            slots: [0, 1, 0, 1],
            gpu_layers: 2,
            target_z: Some(0),
            forced_fallback: false,
        });
        rec.on_commit_failed(&CommitFailedEvent {
            frame_index: 2,
            display: DisplayId(1),
            attempt: 1,
            error: CommitError::Device { code: -5 },
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 2);

        assert_eq!(parsed[0]["event"], "Assign");
        assert_eq!(parsed[0]["display"], 1);
        assert_eq!(parsed[0]["args"]["planes"]["OVERLAY"], 1);
        assert_eq!(parsed[0]["args"]["target_z"], 0);

        assert_eq!(parsed[1]["event"], "CommitFailed");
        assert_eq!(parsed[1]["args"]["error"]["kind"], "Device");
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn snapshot_lists_assignments() {
        let mut video = Layer::new(0, BufferId(1), Rect::new(0.0, 0.0, 640.0, 360.0));
        video.assignment = LayerAssignment::Plane {
            plane: PlaneHandle::new(PlaneType::Overlay, 0),
            z_order: 1,
        };
        let mut target =
            Layer::frame_buffer_target(1, Some(BufferId(9)), Rect::new(0.0, 0.0, 1920.0, 1080.0));
        target.assignment = LayerAssignment::Plane {
            plane: PlaneHandle::new(PlaneType::Primary, 0),
            z_order: 0,
        };
        let outcome = FrameOutcome {
            frame_index: 5,
            attempts: 1,
            hardware_layers: 1,
            ..FrameOutcome::default()
        };

        let v = snapshot(&[video, target], &outcome);
        assert_eq!(v["frame_index"], 5);
        assert_eq!(v["layers"][0]["plane"], "OVERLAY");
        assert_eq!(v["layers"][0]["z_order"], 1);
        assert_eq!(v["layers"][1]["type"], "HWC_FRAMEBUFFER_TARGET");
        assert!(v["target_z"].is_null());
    }
}

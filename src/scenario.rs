//! The built-in scenario: Critical Chain schedule for the
//! "Online Examination System Upgrade" project.
//!
//! All coordinates live in the layout table below; the builder functions
//! only assemble descriptors from it. Swapping the scenario for a different
//! project means editing this table (or loading a scene YAML), not the
//! rendering code.

use crate::geometry::{Point, Rect, Size};
use crate::scene::{
    Anchor, AnchorRef, ConnectorDescriptor, ConnectorStyle, Scene, ShapeDescriptor, ShapeKind,
};

// ---- Layout table ----

/// Leftmost task column origin.
const X0: f32 = 0.8;
/// Horizontal step between task columns.
const DX: f32 = 2.4;
/// Baseline of the critical chain row.
const Y_MAIN: f32 = 1.0;
/// Baseline of the F feeder row.
const Y_FEED_F: f32 = 2.1;
/// Baseline of the G feeder row.
const Y_FEED_G: f32 = 1.6;
/// Air gap left between feeder/flag arrows and shape edges.
const ARROW_GAP: f32 = 0.2;

const TASK_SIZE: Size = Size {
    width: 1.8,
    height: 0.8,
};
const BUFFER_SIZE: Size = Size {
    width: 1.6,
    height: 0.8,
};
/// Triangle flags: 0.5 wide at a 0.58 height-to-width aspect.
const FLAG_SIZE: Size = Size {
    width: 0.5,
    height: 0.29,
};

/// Fraction along a task's bottom edge where resource-buffer arrows land.
const FLAG_TARGET_FRACTION: f32 = 0.78;

fn task(id: &str, column: f32, y: f32) -> ShapeDescriptor {
    ShapeDescriptor {
        id: id.to_string(),
        kind: ShapeKind::Task,
        label: id.to_string(),
        position: Point::new(X0 + column * DX, y),
        size: TASK_SIZE,
    }
}

fn buffer(id: &str, kind: ShapeKind, label: &str, column: f32, y: f32) -> ShapeDescriptor {
    ShapeDescriptor {
        id: id.to_string(),
        kind,
        label: label.to_string(),
        position: Point::new(X0 + column * DX, y),
        size: BUFFER_SIZE,
    }
}

fn flag(id: &str, label: &str, x: f32, y: f32) -> ShapeDescriptor {
    ShapeDescriptor {
        id: id.to_string(),
        kind: ShapeKind::ResourceBuffer,
        label: label.to_string(),
        position: Point::new(x, y),
        size: FLAG_SIZE,
    }
}

fn arrow(from: AnchorRef, to: AnchorRef) -> ConnectorDescriptor {
    ConnectorDescriptor {
        from,
        to,
        style: ConnectorStyle::Solid,
        inset: 0.0,
    }
}

/// Build the fixed exam-upgrade scene: the critical chain A→B→C→D→E→H→I
/// ending in the project buffer, feeders F and G joining through feeding
/// buffers, and resource-buffer flags ahead of the DBA and QA handoffs.
pub fn exam_upgrade_scene() -> Scene {
    let shapes = vec![
        // Critical chain, left to right.
        task("A", 0.0, Y_MAIN),
        task("B", 1.0, Y_MAIN),
        task("C", 2.0, Y_MAIN),
        task("D", 3.0, Y_MAIN),
        task("E", 4.0, Y_MAIN),
        task("H", 5.0, Y_MAIN),
        task("I", 6.0, Y_MAIN),
        buffer("PB", ShapeKind::ProjectBuffer, "PB", 7.0, Y_MAIN),
        // Feeding chains.
        task("F", 2.6, Y_FEED_F),
        buffer("FB1", ShapeKind::FeedingBuffer, "FB", 4.15, Y_FEED_F),
        task("G", 3.45, Y_FEED_G),
        buffer("FB2", ShapeKind::FeedingBuffer, "FB", 5.0, Y_FEED_G),
        // Resource alerts below the chain.
        flag("RB-DBA", "RB (DBA)", X0 + 2.0 * DX - 1.0, Y_MAIN - 1.0),
        flag("RB-QA", "RB (QA)", X0 + 5.0 * DX - 1.0, Y_MAIN - 1.0),
    ];

    let mut connectors: Vec<ConnectorDescriptor> = Vec::new();

    // Spine arrows.
    for pair in ["A", "B", "C", "D", "E", "H", "I", "PB"].windows(2) {
        connectors.push(arrow(
            AnchorRef::new(pair[0], Anchor::Right),
            AnchorRef::new(pair[1], Anchor::Left),
        ));
    }

    // Feeder task into its buffer, buffer down into the spine.
    for (feeder, fb, target) in [("F", "FB1", "E"), ("G", "FB2", "H")] {
        connectors.push(arrow(
            AnchorRef::new(feeder, Anchor::Right),
            AnchorRef::new(fb, Anchor::Left),
        ));
        connectors.push(ConnectorDescriptor {
            from: AnchorRef::new(fb, Anchor::Bottom),
            to: AnchorRef::new(target, Anchor::Top),
            style: ConnectorStyle::Solid,
            inset: ARROW_GAP,
        });
    }

    // Flag arrows point up at the task whose resource must be ready.
    for (fb, target) in [("RB-DBA", "C"), ("RB-QA", "H")] {
        connectors.push(ConnectorDescriptor {
            from: AnchorRef::new(fb, Anchor::Bottom),
            to: AnchorRef::new(target, Anchor::BottomAt(FLAG_TARGET_FRACTION)),
            style: ConnectorStyle::Dashed,
            inset: ARROW_GAP,
        });
    }

    Scene {
        title: "Critical Chain Schedule with Buffers".to_string(),
        subtitle: "(Online Examination System Upgrade)".to_string(),
        legend: "Legend: Task = Rounded Rectangle  |  FB/PB = Trapezoid (Buffers)  |  RB = Triangle Flag"
            .to_string(),
        viewport: Rect::new(0.0, -1.5, X0 + 8.4 * DX, 5.3),
        shapes,
        connectors,
    }
}

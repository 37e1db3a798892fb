//! Shape and connector rendering.
//!
//! Turns a validated [`Scene`] into a finished [`Canvas`]. Each shape kind
//! maps to one geometric primitive with a fixed palette color; connectors
//! become straight arrows between resolved anchor points.

use crate::canvas::{Canvas, PX_PER_UNIT};
use crate::geometry::Point;
use crate::scene::{ConnectorStyle, Scene, SceneError, ShapeDescriptor, ShapeKind};

/// Corner radius of task boxes, in pixels.
const TASK_CORNER_PX: f32 = 6.0;
/// Left-edge indent of buffer trapezoids, as a fraction of their width.
const TRAP_INDENT: f32 = 0.4;
/// Horizontal position of a buffer label, as a fraction of its width.
/// Off-center because the trapezoid's left edge slopes away.
const BUFFER_LABEL_FRACTION: f32 = 0.7;
/// World-unit gap between a flag's apex and its label baseline.
const FLAG_LABEL_GAP: f32 = 0.11;

const LABEL_FONT_PX: f32 = 15.0;
const FLAG_FONT_PX: f32 = 14.0;
const TITLE_FONT_PX: f32 = 19.0;
const SUBTITLE_FONT_PX: f32 = 15.0;
const LEGEND_FONT_PX: f32 = 14.0;

/// Fixed colors, one per shape kind. No runtime computation.
pub struct Palette {
    pub task: &'static str,
    pub feeding_buffer: &'static str,
    pub project_buffer: &'static str,
    pub resource_buffer: &'static str,
    pub edge: &'static str,
    pub text: &'static str,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            task: "#E8E8E8",
            feeding_buffer: "#8EC9FF",
            project_buffer: "#FFC933",
            resource_buffer: "#FFB0B0",
            edge: "#222222",
            text: "#1a1a1a",
        }
    }
}

impl Palette {
    fn fill_for(&self, kind: ShapeKind) -> &'static str {
        match kind {
            ShapeKind::Task => self.task,
            ShapeKind::FeedingBuffer => self.feeding_buffer,
            ShapeKind::ProjectBuffer => self.project_buffer,
            ShapeKind::ResourceBuffer => self.resource_buffer,
        }
    }
}

/// Where a shape's label is placed. Task and buffer labels sit inside the
/// shape; flag labels sit just above the triangle's apex.
pub fn label_anchor(shape: &ShapeDescriptor) -> Point {
    let bounds = shape.bounds();
    match shape.kind {
        ShapeKind::Task => bounds.center(),
        ShapeKind::FeedingBuffer | ShapeKind::ProjectBuffer => Point::new(
            bounds.x + bounds.width * BUFFER_LABEL_FRACTION,
            bounds.y + bounds.height / 2.0,
        ),
        ShapeKind::ResourceBuffer => Point::new(
            bounds.x + bounds.width / 2.0,
            bounds.y + bounds.height + FLAG_LABEL_GAP,
        ),
    }
}

fn draw_shape(canvas: &mut Canvas, shape: &ShapeDescriptor, palette: &Palette) {
    let bounds = shape.bounds();
    let fill = palette.fill_for(shape.kind);

    match shape.kind {
        ShapeKind::Task => {
            canvas.rounded_rect(bounds, TASK_CORNER_PX, fill, palette.edge);
            canvas.text_centered(
                label_anchor(shape),
                &shape.label,
                LABEL_FONT_PX,
                palette.text,
                true,
            );
        }
        ShapeKind::FeedingBuffer | ShapeKind::ProjectBuffer => {
            let indent = bounds.width * TRAP_INDENT;
            canvas.polygon(
                &[
                    Point::new(bounds.x, bounds.y),
                    Point::new(bounds.x + bounds.width, bounds.y),
                    Point::new(bounds.x + bounds.width, bounds.y + bounds.height),
                    Point::new(bounds.x + indent, bounds.y + bounds.height),
                ],
                fill,
                palette.edge,
            );
            canvas.text_centered(
                label_anchor(shape),
                &shape.label,
                LABEL_FONT_PX,
                palette.text,
                true,
            );
        }
        ShapeKind::ResourceBuffer => {
            canvas.polygon(
                &[
                    Point::new(bounds.x, bounds.y),
                    Point::new(bounds.x + bounds.width, bounds.y),
                    Point::new(bounds.x + bounds.width / 2.0, bounds.y + bounds.height),
                ],
                fill,
                palette.edge,
            );
            canvas.text_above(
                label_anchor(shape),
                &shape.label,
                FLAG_FONT_PX,
                palette.text,
                true,
            );
        }
    }
}

/// Render a scene into a finished canvas. Validates the scene first, so a
/// structurally broken scene never reaches the drawing surface.
pub fn render_scene(scene: &Scene) -> Result<Canvas, SceneError> {
    scene.validate()?;

    let palette = Palette::default();
    let mut canvas = Canvas::new(scene.viewport, PX_PER_UNIT);

    let center_x = scene.viewport.x + scene.viewport.width / 2.0;
    let top = scene.viewport.y + scene.viewport.height;
    if !scene.title.is_empty() {
        canvas.text_centered(
            Point::new(center_x, top - 0.35),
            &scene.title,
            TITLE_FONT_PX,
            palette.text,
            true,
        );
    }
    if !scene.subtitle.is_empty() {
        canvas.text_centered(
            Point::new(center_x, top - 0.75),
            &scene.subtitle,
            SUBTITLE_FONT_PX,
            palette.text,
            false,
        );
    }
    if !scene.legend.is_empty() {
        canvas.text_centered(
            Point::new(center_x, scene.viewport.y + 0.25),
            &scene.legend,
            LEGEND_FONT_PX,
            palette.text,
            false,
        );
    }

    for shape in &scene.shapes {
        draw_shape(&mut canvas, shape, &palette);
    }

    for (index, connector) in scene.connectors.iter().enumerate() {
        let from =
            scene
                .resolve(&connector.from)
                .ok_or_else(|| SceneError::DanglingConnector {
                    index,
                    shape_id: connector.from.shape.clone(),
                })?;
        let to = scene
            .resolve(&connector.to)
            .ok_or_else(|| SceneError::DanglingConnector {
                index,
                shape_id: connector.to.shape.clone(),
            })?;
        canvas.arrow(
            from,
            to,
            palette.edge,
            connector.style == ConnectorStyle::Dashed,
            connector.inset,
        );
    }

    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::exam_upgrade_scene;
    use crate::scene::Anchor;

    /// Rough text extent in world units: average glyph advance of 0.6em.
    fn label_extent(label: &str, font_px: f32) -> (f32, f32) {
        let width_px = label.chars().count() as f32 * font_px * 0.6;
        (width_px / PX_PER_UNIT, font_px / PX_PER_UNIT)
    }

    #[test]
    fn test_inline_labels_fit_their_shapes() {
        let margin = 0.05;
        for shape in &exam_upgrade_scene().shapes {
            if shape.kind == ShapeKind::ResourceBuffer {
                continue; // flag labels are adjacent by design
            }
            let (w, h) = label_extent(&shape.label, LABEL_FONT_PX);
            let anchor = label_anchor(shape);
            let bounds = shape.bounds();
            assert!(
                bounds.contains(Point::new(anchor.x - w / 2.0, anchor.y - h / 2.0), margin),
                "label of '{}' overflows left/bottom",
                shape.id
            );
            assert!(
                bounds.contains(Point::new(anchor.x + w / 2.0, anchor.y + h / 2.0), margin),
                "label of '{}' overflows right/top",
                shape.id
            );
        }
    }

    #[test]
    fn test_flag_labels_stay_adjacent() {
        for shape in &exam_upgrade_scene().shapes {
            if shape.kind != ShapeKind::ResourceBuffer {
                continue;
            }
            let anchor = label_anchor(shape);
            assert!(
                shape.bounds().contains(anchor, 0.5),
                "label of '{}' drifted away from its flag",
                shape.id
            );
        }
    }

    #[test]
    fn test_connector_endpoints_are_declared_anchors() {
        let scene = exam_upgrade_scene();
        for connector in &scene.connectors {
            for endpoint in [&connector.from, &connector.to] {
                let shape = scene.shape(&endpoint.shape).unwrap();
                let point = shape.anchor(endpoint.anchor);
                match endpoint.anchor {
                    Anchor::Center => assert_eq!(point, shape.bounds().center()),
                    _ => assert!(
                        shape.bounds().on_boundary(point, 1e-4),
                        "connector endpoint on '{}' is not on its boundary",
                        endpoint.shape
                    ),
                }
            }
        }
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let scene = exam_upgrade_scene();
        let first = render_scene(&scene).unwrap().finish();
        let second = render_scene(&scene).unwrap().finish();
        assert_eq!(first, second);
    }

    #[test]
    fn test_svg_primitive_inventory() {
        let scene = exam_upgrade_scene();
        let svg = render_scene(&scene).unwrap().finish();

        // 9 task boxes, 3 trapezoids + 2 triangles, 13 arrows.
        assert_eq!(svg.matches("<rect x=").count(), 9);
        assert_eq!(svg.matches("<polygon points=").count(), 5);
        assert_eq!(svg.matches("<line x1=").count(), scene.connectors.len());
        // Only the two resource-buffer arrows are dashed.
        assert_eq!(svg.matches("stroke-dasharray").count(), 2);
        // Every palette color is in use.
        for color in ["#E8E8E8", "#8EC9FF", "#FFC933", "#FFB0B0"] {
            assert!(svg.contains(color), "missing {color}");
        }
    }

    #[test]
    fn test_titles_and_legend_are_drawn() {
        let scene = exam_upgrade_scene();
        let svg = render_scene(&scene).unwrap().finish();
        assert!(svg.contains("Critical Chain Schedule with Buffers"));
        assert!(svg.contains("(Online Examination System Upgrade)"));
        assert!(svg.contains("Legend:"));
    }

    #[test]
    fn test_invalid_scene_is_rejected_before_drawing() {
        let mut scene = exam_upgrade_scene();
        scene.connectors[0].to.shape = "ghost".to_string();
        assert!(render_scene(&scene).is_err());
    }
}

//! The drawing surface.
//!
//! A [`Canvas`] accumulates SVG elements in world coordinates and maps them
//! into pixel space (y flipped, since SVG grows downward). It is an owned
//! value threaded through the rendering pass; nothing draws to it except
//! the pipeline that created it.

use std::fmt::Write as _;

use crate::geometry::{Point, Rect};

/// Pixel density of world units at the base (100 DPI) resolution.
pub const PX_PER_UNIT: f32 = 60.0;

/// Outline and arrow stroke width in pixels.
const STROKE_WIDTH: f32 = 1.4;

pub struct Canvas {
    viewport: Rect,
    scale: f32,
    background: String,
    body: String,
}

impl Canvas {
    /// Create a canvas covering `viewport`, at `scale` pixels per world unit.
    pub fn new(viewport: Rect, scale: f32) -> Self {
        Canvas {
            viewport,
            scale,
            background: "#ffffff".to_string(),
            body: String::new(),
        }
    }

    /// Canvas width in whole pixels.
    pub fn pixel_width(&self) -> u32 {
        (self.viewport.width * self.scale).ceil() as u32
    }

    /// Canvas height in whole pixels.
    pub fn pixel_height(&self) -> u32 {
        (self.viewport.height * self.scale).ceil() as u32
    }

    /// Map a world point into pixel space.
    fn map(&self, p: Point) -> (f32, f32) {
        let x = (p.x - self.viewport.x) * self.scale;
        let y = (self.viewport.y + self.viewport.height - p.y) * self.scale;
        (x, y)
    }

    /// Map a world length into pixels.
    fn map_len(&self, len: f32) -> f32 {
        len * self.scale
    }

    /// Draw a rounded rectangle with the given corner radius in pixels.
    pub fn rounded_rect(&mut self, bounds: Rect, corner_px: f32, fill: &str, stroke: &str) {
        // The rect's top-left in pixel space is the world top-left corner.
        let (x, y) = self.map(Point::new(bounds.x, bounds.y + bounds.height));
        let w = self.map_len(bounds.width);
        let h = self.map_len(bounds.height);
        self.body.push_str(&format!(
            "  <rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" rx=\"{:.1}\" ry=\"{:.1}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\" />\n",
            x, y, w, h, corner_px, corner_px, fill, stroke, STROKE_WIDTH
        ));
    }

    /// Draw a closed polygon through the given world points.
    pub fn polygon(&mut self, points: &[Point], fill: &str, stroke: &str) {
        let mapped = points
            .iter()
            .map(|&p| {
                let (x, y) = self.map(p);
                format!("{:.1},{:.1}", x, y)
            })
            .collect::<Vec<_>>()
            .join(" ");
        self.body.push_str(&format!(
            "  <polygon points=\"{}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\" />\n",
            mapped, fill, stroke, STROKE_WIDTH
        ));
    }

    /// Draw a directional arrow from `from` to `to`, pulling both endpoints
    /// back by `inset` world units along the line.
    pub fn arrow(&mut self, from: Point, to: Point, stroke: &str, dashed: bool, inset: f32) {
        let (from, to) = shorten(from, to, inset);
        let (x1, y1) = self.map(from);
        let (x2, y2) = self.map(to);
        let dash_attr = if dashed {
            " stroke-dasharray=\"6 4\""
        } else {
            ""
        };
        self.body.push_str(&format!(
            "  <line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"{}\" stroke-width=\"{}\" marker-end=\"url(#arrow-end)\"{} />\n",
            x1, y1, x2, y2, stroke, STROKE_WIDTH, dash_attr
        ));
    }

    /// Draw text centered (horizontally and vertically) on a world point.
    pub fn text_centered(&mut self, at: Point, text: &str, font_px: f32, color: &str, bold: bool) {
        let (x, y) = self.map(at);
        self.body.push_str(&format!(
            "  <text x=\"{:.1}\" y=\"{:.1}\" fill=\"{}\" font-size=\"{:.0}\"{} text-anchor=\"middle\" dominant-baseline=\"middle\">{}</text>\n",
            x,
            y,
            color,
            font_px,
            weight_attr(bold),
            escape_xml(text)
        ));
    }

    /// Draw text horizontally centered with its baseline sitting on a world
    /// point, so the text reads above the point.
    pub fn text_above(&mut self, at: Point, text: &str, font_px: f32, color: &str, bold: bool) {
        let (x, y) = self.map(at);
        self.body.push_str(&format!(
            "  <text x=\"{:.1}\" y=\"{:.1}\" fill=\"{}\" font-size=\"{:.0}\"{} text-anchor=\"middle\">{}</text>\n",
            x,
            y,
            color,
            font_px,
            weight_attr(bold),
            escape_xml(text)
        ));
    }

    /// Assemble the finished SVG document.
    pub fn finish(self) -> String {
        let width = self.pixel_width();
        let height = self.pixel_height();
        let mut svg = String::new();
        let _ = write!(
            svg,
            r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" font-family="Helvetica, Arial, sans-serif">
  <defs>
    <marker id="arrow-end" markerWidth="8" markerHeight="8" refX="6" refY="4" orient="auto" markerUnits="strokeWidth">
      <path d="M1,1 L6,4 L1,7 z" fill="context-stroke" />
    </marker>
  </defs>
  <rect width="100%" height="100%" fill="{background}" />
"##,
            width = width,
            height = height,
            background = self.background,
        );
        svg.push_str(&self.body);
        svg.push_str("</svg>\n");
        svg
    }
}

fn weight_attr(bold: bool) -> &'static str {
    if bold { " font-weight=\"bold\"" } else { "" }
}

/// Pull both endpoints of a segment inward by `inset`. Segments shorter
/// than twice the inset are left untouched.
fn shorten(from: Point, to: Point, inset: f32) -> (Point, Point) {
    if inset <= 0.0 {
        return (from, to);
    }
    let length = from.distance(to);
    if length <= inset * 2.0 {
        return (from, to);
    }
    let ux = (to.x - from.x) / length;
    let uy = (to.y - from.y) / length;
    (
        Point::new(from.x + ux * inset, from.y + uy * inset),
        Point::new(to.x - ux * inset, to.y - uy * inset),
    )
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Canvas {
        Canvas::new(Rect::new(0.0, 0.0, 10.0, 10.0), PX_PER_UNIT)
    }

    #[test]
    fn test_pixel_dimensions_round_up() {
        let c = Canvas::new(Rect::new(0.0, -1.5, 20.96, 5.25), PX_PER_UNIT);
        assert_eq!(c.pixel_width(), 1258); // 20.96 * 60 = 1257.6, rounded up
        assert_eq!(c.pixel_height(), 315); // 5.25 * 60 = 315 exactly
    }

    #[test]
    fn test_y_axis_is_flipped() {
        let mut c = canvas();
        // World (1, 9) is near the top of the viewport, so its pixel y is small.
        c.text_centered(Point::new(1.0, 9.0), "hi", 14.0, "#000000", false);
        let svg = c.finish();
        assert!(svg.contains("x=\"60.0\" y=\"60.0\""));
    }

    #[test]
    fn test_arrow_inset_shortens_segment() {
        let mut c = canvas();
        c.arrow(Point::new(1.0, 5.0), Point::new(3.0, 5.0), "#222222", false, 0.5);
        let svg = c.finish();
        assert!(svg.contains("x1=\"90.0\""));
        assert!(svg.contains("x2=\"150.0\""));
    }

    #[test]
    fn test_short_segment_keeps_endpoints() {
        let (from, to) = shorten(Point::new(0.0, 0.0), Point::new(0.3, 0.0), 0.2);
        assert_eq!(from, Point::new(0.0, 0.0));
        assert_eq!(to, Point::new(0.3, 0.0));
    }

    #[test]
    fn test_dashed_arrow_has_dasharray() {
        let mut c = canvas();
        c.arrow(Point::new(0.0, 0.0), Point::new(5.0, 0.0), "#222222", true, 0.0);
        let svg = c.finish();
        assert!(svg.contains("stroke-dasharray"));
    }

    #[test]
    fn test_solid_arrow_has_no_dasharray() {
        let mut c = canvas();
        c.arrow(Point::new(0.0, 0.0), Point::new(5.0, 0.0), "#222222", false, 0.0);
        let svg = c.finish();
        assert!(!svg.contains("stroke-dasharray"));
    }

    #[test]
    fn test_labels_are_escaped() {
        let mut c = canvas();
        c.text_centered(Point::new(5.0, 5.0), "R&D <phase>", 14.0, "#000000", true);
        let svg = c.finish();
        assert!(svg.contains("R&amp;D &lt;phase&gt;"));
        assert!(!svg.contains("R&D"));
    }

    #[test]
    fn test_document_is_well_formed() {
        let mut c = canvas();
        c.rounded_rect(Rect::new(1.0, 1.0, 2.0, 1.0), 6.0, "#eeeeee", "#222222");
        c.polygon(
            &[
                Point::new(4.0, 1.0),
                Point::new(5.0, 1.0),
                Point::new(4.5, 2.0),
            ],
            "#ffb0b0",
            "#222222",
        );
        let svg = c.finish();
        assert!(svg.starts_with("<?xml"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("<rect x="));
        assert!(svg.contains("<polygon points="));
        assert!(svg.contains("marker id=\"arrow-end\""));
    }
}

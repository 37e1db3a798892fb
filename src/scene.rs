//! Scene model: the descriptors that define what the diagram contains.
//!
//! A [`Scene`] is plain data: an ordered list of shape descriptors and an
//! ordered list of connectors between them. Connectors reference shapes by
//! id and anchor side rather than by raw coordinates, so a connector cannot
//! point at empty space once the scene passes [`Scene::validate`].
//!
//! Scenes are serializable, so an alternative scenario can be loaded from a
//! YAML file without touching the rendering code.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect, Size};

/// What kind of diagram element a shape represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    /// A schedule task, drawn as a rounded rectangle.
    Task,
    /// Time cushion where a feeding chain joins the critical chain,
    /// drawn as a left-facing trapezoid.
    FeedingBuffer,
    /// Time cushion at the end of the critical chain, drawn like a
    /// feeding buffer but in its own color.
    ProjectBuffer,
    /// Scheduling alert flag, drawn as a triangle with its label above.
    ResourceBuffer,
}

/// A named anchor on a shape's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    Left,
    Right,
    Top,
    Bottom,
    Center,
    /// Point on the top edge at a horizontal fraction.
    TopAt(f32),
    /// Point on the bottom edge at a horizontal fraction.
    BottomAt(f32),
}

impl Anchor {
    /// Resolve the anchor to a concrete point on a bounding box.
    pub fn resolve(&self, bounds: &Rect) -> Point {
        match self {
            Anchor::Left => bounds.left_mid(),
            Anchor::Right => bounds.right_mid(),
            Anchor::Top => bounds.top_mid(),
            Anchor::Bottom => bounds.bottom_mid(),
            Anchor::Center => bounds.center(),
            Anchor::TopAt(fraction) => bounds.top_at(*fraction),
            Anchor::BottomAt(fraction) => bounds.bottom_at(*fraction),
        }
    }
}

/// One shape in the diagram. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeDescriptor {
    /// Unique id used by connectors to reference this shape.
    pub id: String,
    pub kind: ShapeKind,
    pub label: String,
    /// Bottom-left corner in world coordinates.
    pub position: Point,
    pub size: Size,
}

impl ShapeDescriptor {
    /// The shape's bounding box.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    /// Resolve a named anchor against this shape's bounding box.
    pub fn anchor(&self, anchor: Anchor) -> Point {
        anchor.resolve(&self.bounds())
    }
}

/// Line style for a connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorStyle {
    Solid,
    Dashed,
}

/// A shape id plus the anchor side the connector attaches to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorRef {
    pub shape: String,
    pub anchor: Anchor,
}

impl AnchorRef {
    pub fn new(shape: impl Into<String>, anchor: Anchor) -> Self {
        AnchorRef {
            shape: shape.into(),
            anchor,
        }
    }
}

/// A directed arrow between two shape anchors. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorDescriptor {
    pub from: AnchorRef,
    pub to: AnchorRef,
    pub style: ConnectorStyle,
    /// World units to pull each endpoint back along the arrow, leaving a
    /// visual air gap at the shape boundary. Applied at draw time only;
    /// the descriptor endpoints stay on the declared anchors.
    #[serde(default)]
    pub inset: f32,
}

/// Structural defects in scene data. These are programming-time (or
/// scene-file-authoring) defects, caught before any rendering happens.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("duplicate shape id '{0}'")]
    DuplicateShapeId(String),

    #[error("connector {index} references unknown shape '{shape_id}'")]
    DanglingConnector { index: usize, shape_id: String },

    #[error("shape '{0}' has a non-positive size")]
    DegenerateShape(String),

    #[error("scene viewport has a non-positive size")]
    DegenerateViewport,
}

/// Errors loading a scene from a YAML file.
#[derive(Debug, thiserror::Error)]
pub enum SceneLoadError {
    #[error("failed to read scene file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse scene file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error(transparent)]
    Invalid(#[from] SceneError),
}

/// The complete diagram description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scene {
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub legend: String,
    /// World-coordinate region mapped onto the canvas.
    pub viewport: Rect,
    pub shapes: Vec<ShapeDescriptor>,
    pub connectors: Vec<ConnectorDescriptor>,
}

impl Scene {
    /// Look up a shape by id.
    pub fn shape(&self, id: &str) -> Option<&ShapeDescriptor> {
        self.shapes.iter().find(|s| s.id == id)
    }

    /// Resolve a connector endpoint to a concrete world point.
    pub fn resolve(&self, anchor_ref: &AnchorRef) -> Option<Point> {
        self.shape(&anchor_ref.shape)
            .map(|s| s.anchor(anchor_ref.anchor))
    }

    /// Check the scene for structural defects: duplicate shape ids,
    /// connectors referencing shapes that do not exist, and degenerate
    /// dimensions.
    pub fn validate(&self) -> Result<(), SceneError> {
        if self.viewport.width <= 0.0 || self.viewport.height <= 0.0 {
            return Err(SceneError::DegenerateViewport);
        }

        let mut seen = std::collections::HashSet::new();
        for shape in &self.shapes {
            if !seen.insert(shape.id.as_str()) {
                return Err(SceneError::DuplicateShapeId(shape.id.clone()));
            }
            if shape.size.width <= 0.0 || shape.size.height <= 0.0 {
                return Err(SceneError::DegenerateShape(shape.id.clone()));
            }
        }

        for (index, connector) in self.connectors.iter().enumerate() {
            for endpoint in [&connector.from, &connector.to] {
                if !seen.contains(endpoint.shape.as_str()) {
                    return Err(SceneError::DanglingConnector {
                        index,
                        shape_id: endpoint.shape.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Load and validate a scene from a YAML file.
    pub fn load(path: &Path) -> Result<Self, SceneLoadError> {
        let content = std::fs::read_to_string(path)?;
        let scene: Scene = serde_yaml::from_str(&content)?;
        scene.validate()?;
        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn shape(id: &str, kind: ShapeKind) -> ShapeDescriptor {
        ShapeDescriptor {
            id: id.to_string(),
            kind,
            label: id.to_string(),
            position: Point::new(0.0, 0.0),
            size: Size::new(2.0, 1.0),
        }
    }

    fn two_task_scene() -> Scene {
        let mut b = shape("b", ShapeKind::Task);
        b.position = Point::new(3.0, 0.0);
        Scene {
            title: "test".to_string(),
            subtitle: String::new(),
            legend: String::new(),
            viewport: Rect::new(0.0, 0.0, 6.0, 2.0),
            shapes: vec![shape("a", ShapeKind::Task), b],
            connectors: vec![ConnectorDescriptor {
                from: AnchorRef::new("a", Anchor::Right),
                to: AnchorRef::new("b", Anchor::Left),
                style: ConnectorStyle::Solid,
                inset: 0.0,
            }],
        }
    }

    #[test]
    fn test_valid_scene_passes() {
        assert!(two_task_scene().validate().is_ok());
    }

    #[test]
    fn test_dangling_connector_rejected() {
        let mut scene = two_task_scene();
        scene.connectors[0].to.shape = "missing".to_string();
        let err = scene.validate().unwrap_err();
        assert!(
            matches!(err, SceneError::DanglingConnector { index: 0, shape_id } if shape_id == "missing")
        );
    }

    #[test]
    fn test_duplicate_shape_id_rejected() {
        let mut scene = two_task_scene();
        scene.shapes.push(shape("a", ShapeKind::FeedingBuffer));
        let err = scene.validate().unwrap_err();
        assert!(matches!(err, SceneError::DuplicateShapeId(id) if id == "a"));
    }

    #[test]
    fn test_degenerate_shape_rejected() {
        let mut scene = two_task_scene();
        scene.shapes[0].size.height = 0.0;
        let err = scene.validate().unwrap_err();
        assert!(matches!(err, SceneError::DegenerateShape(id) if id == "a"));
    }

    #[test]
    fn test_anchor_resolution() {
        let scene = two_task_scene();
        let from = scene.resolve(&scene.connectors[0].from).unwrap();
        let to = scene.resolve(&scene.connectors[0].to).unwrap();
        assert_eq!(from, Point::new(2.0, 0.5));
        assert_eq!(to, Point::new(3.0, 0.5));
        assert!(scene.resolve(&AnchorRef::new("missing", Anchor::Left)).is_none());
    }

    #[test]
    fn test_yaml_round_trip() {
        let scene = two_task_scene();
        let yaml = serde_yaml::to_string(&scene).unwrap();
        let parsed: Scene = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, scene);
    }

    #[test]
    fn test_load_validates() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("scene.yml");

        let mut scene = two_task_scene();
        scene.connectors[0].from.shape = "ghost".to_string();
        std::fs::write(&path, serde_yaml::to_string(&scene).unwrap()).unwrap();

        let err = Scene::load(&path).unwrap_err();
        assert!(matches!(err, SceneLoadError::Invalid(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Scene::load(Path::new("/nonexistent/scene.yml")).unwrap_err();
        assert!(matches!(err, SceneLoadError::Io(_)));
    }
}

pub mod canvas;
pub mod error_fmt;
pub mod export;
pub mod geometry;
pub mod render;
pub mod scenario;
pub mod scene;

// Re-export commonly used types for convenience
pub use canvas::{Canvas, PX_PER_UNIT};
pub use export::{export, ExportError, ExportOptions, ExportedFiles};
pub use geometry::{Point, Rect, Size};
pub use render::{render_scene, Palette};
pub use scenario::exam_upgrade_scene;
pub use scene::{
    Anchor, AnchorRef, ConnectorDescriptor, ConnectorStyle, Scene, SceneError, SceneLoadError,
    ShapeDescriptor, ShapeKind,
};

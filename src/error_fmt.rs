use std::fmt;

use owo_colors::OwoColorize;

use crate::export::ExportError;
use crate::scene::{SceneError, SceneLoadError};

/// Application error with context for actionable error messages.
#[derive(Debug)]
pub enum AppError {
    /// Scene file could not be loaded
    SceneFile { path: String, source: SceneLoadError },
    /// Built-in or loaded scene failed structural validation
    InvalidScene(SceneError),
    /// Export failed
    Export(ExportError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::SceneFile { path, source } => {
                write!(f, "{}", format_scene_file_error(source, path))
            }
            AppError::InvalidScene(source) => {
                write!(f, "{}", format_scene_error(source))
            }
            AppError::Export(source) => {
                write!(f, "{}", format_export_error(source))
            }
        }
    }
}

impl std::error::Error for AppError {}

/// Extension trait to add file path context to scene-load results.
pub trait SceneResultExt<T> {
    fn with_path(self, path: &str) -> Result<T, AppError>;
}

impl<T> SceneResultExt<T> for Result<T, SceneLoadError> {
    fn with_path(self, path: &str) -> Result<T, AppError> {
        self.map_err(|e| AppError::SceneFile {
            path: path.to_string(),
            source: e,
        })
    }
}

// ============================================================================
// Formatting functions (internal implementation)
// ============================================================================

fn format_scene_file_error(error: &SceneLoadError, path: &str) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}: ", "error".red().bold()));

    match error {
        SceneLoadError::Io(io_err) => {
            out.push_str(&format!("failed to read scene file {}\n", path.cyan()));
            out.push('\n');
            out.push_str(&format!("  {}\n", io_err.to_string().dimmed()));
            out.push('\n');
            out.push_str(&format!("  {}:\n", "To fix this".bold()));
            out.push_str("    1. Check the spelling of the path\n");
            out.push_str(&format!(
                "    2. Or omit {} to render the built-in schedule\n",
                "--scene".cyan()
            ));
        }
        SceneLoadError::Parse(yaml_err) => {
            out.push_str(&format!("invalid YAML in {}\n", path.cyan()));
            out.push('\n');
            out.push_str(&format!("  {}\n", yaml_err.to_string().dimmed()));
            out.push('\n');
            out.push_str(&format!("  {}:\n", "To fix this".bold()));
            out.push_str("    Correct the scene file at the location above. A scene needs\n");
            out.push_str(&format!(
                "    {}, {}, {}, and {} keys.\n",
                "title".cyan(),
                "viewport".cyan(),
                "shapes".cyan(),
                "connectors".cyan()
            ));
        }
        SceneLoadError::Invalid(scene_err) => {
            out.push_str(&format!("scene file {} is not drawable\n", path.cyan()));
            out.push('\n');
            out.push_str(&scene_error_detail(scene_err));
        }
    }

    out
}

fn format_scene_error(error: &SceneError) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}: ", "error".red().bold()));
    out.push_str("scene is not drawable\n");
    out.push('\n');
    out.push_str(&scene_error_detail(error));

    out
}

fn scene_error_detail(error: &SceneError) -> String {
    let mut out = String::new();

    match error {
        SceneError::DuplicateShapeId(id) => {
            out.push_str(&format!(
                "  {}\n",
                format!("Multiple shapes define id '{}'.", id).dimmed()
            ));
            out.push('\n');
            out.push_str(&format!("  {}:\n", "To fix this".bold()));
            out.push_str(&format!(
                "    Rename one of the shapes so every {} is unique.\n",
                "id".cyan()
            ));
        }
        SceneError::DanglingConnector { index, shape_id } => {
            out.push_str(&format!(
                "  {}\n",
                format!(
                    "Connector {} references shape '{}', which does not exist.",
                    index, shape_id
                )
                .dimmed()
            ));
            out.push('\n');
            out.push_str(&format!("  {}:\n", "To fix this".bold()));
            out.push_str(&format!(
                "    1. Add a shape with {} to the scene\n",
                format!("id: {}", shape_id).cyan()
            ));
            out.push_str("    2. Or point the connector at an existing shape id\n");
        }
        SceneError::DegenerateShape(id) => {
            out.push_str(&format!(
                "  {}\n",
                format!("Shape '{}' has zero or negative width or height.", id).dimmed()
            ));
            out.push('\n');
            out.push_str(&format!("  {}:\n", "To fix this".bold()));
            out.push_str(&format!(
                "    Give the shape a positive {} in world units.\n",
                "size".cyan()
            ));
        }
        SceneError::DegenerateViewport => {
            out.push_str(&format!(
                "  {}\n",
                "The viewport has zero or negative width or height.".dimmed()
            ));
            out.push('\n');
            out.push_str(&format!("  {}:\n", "To fix this".bold()));
            out.push_str(&format!(
                "    Give the scene's {} a positive width and height.\n",
                "viewport".cyan()
            ));
        }
    }

    out
}

fn format_export_error(error: &ExportError) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}: ", "error".red().bold()));

    match error {
        ExportError::OutDirMissing(dir) => {
            out.push_str(&format!("output directory not found: {}\n", dir.yellow()));
            out.push('\n');
            out.push_str(&format!(
                "  {}\n",
                "The output directory must exist before exporting.".dimmed()
            ));
            out.push('\n');
            out.push_str(&format!("  {}:\n", "To fix this".bold()));
            out.push_str(&format!(
                "    1. Create the directory: {}\n",
                format!("mkdir -p {}", dir).cyan()
            ));
            out.push_str(&format!(
                "    2. Or use a different directory: {}\n",
                "chainplot -d /path/to/dir".cyan()
            ));
        }
        ExportError::Write { path, source } => {
            out.push_str(&format!("failed to write {}\n", path.cyan()));
            out.push('\n');
            out.push_str(&format!("  {}\n", source.to_string().dimmed()));
            out.push('\n');
            out.push_str(&format!(
                "  {}\n",
                "Any sibling files written during this run were removed.".dimmed()
            ));
            out.push('\n');
            out.push_str(&format!("  {}:\n", "To fix this".bold()));
            out.push_str("    1. Check write permission on the output directory\n");
            out.push_str(&format!(
                "    2. Or export somewhere writable: {}\n",
                "chainplot -d /tmp".cyan()
            ));
        }
        ExportError::Png(message) => {
            out.push_str(&format!("{}\n", "PNG export failed".yellow()));
            out.push('\n');
            out.push_str(&format!("  {}\n", message.dimmed()));
        }
        ExportError::Pdf(message) => {
            out.push_str(&format!("{}\n", "PDF export failed".yellow()));
            out.push('\n');
            out.push_str(&format!("  {}\n", message.dimmed()));
        }
    }

    out
}

impl From<SceneError> for AppError {
    fn from(e: SceneError) -> Self {
        AppError::InvalidScene(e)
    }
}

impl From<ExportError> for AppError {
    fn from(e: ExportError) -> Self {
        AppError::Export(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip_ansi(s: &str) -> String {
        let re = regex::Regex::new(r"\x1b\[[0-9;]*m").unwrap();
        re.replace_all(s, "").to_string()
    }

    #[test]
    fn test_format_dangling_connector() {
        let err = AppError::InvalidScene(SceneError::DanglingConnector {
            index: 3,
            shape_id: "ghost".to_string(),
        });
        let output = err.to_string();
        let stripped = strip_ansi(&output);

        assert!(stripped.contains("error:"));
        assert!(stripped.contains("Connector 3"));
        assert!(stripped.contains("ghost"));
        assert!(stripped.contains("To fix this"));
        assert!(stripped.contains("id: ghost"));
    }

    #[test]
    fn test_format_duplicate_shape_id() {
        let err = AppError::InvalidScene(SceneError::DuplicateShapeId("A".to_string()));
        let output = err.to_string();
        let stripped = strip_ansi(&output);

        assert!(stripped.contains("error:"));
        assert!(stripped.contains("Multiple shapes define id 'A'"));
        assert!(stripped.contains("To fix this"));
    }

    #[test]
    fn test_format_out_dir_missing() {
        let err = AppError::Export(ExportError::OutDirMissing("/nonexistent/path".to_string()));
        let output = err.to_string();
        let stripped = strip_ansi(&output);

        assert!(stripped.contains("error:"));
        assert!(stripped.contains("/nonexistent/path"));
        assert!(stripped.contains("mkdir"));
        assert!(stripped.contains("To fix this"));
    }

    #[test]
    fn test_format_write_failure_mentions_rollback() {
        let err = AppError::Export(ExportError::Write {
            path: "/out/chart.png".to_string(),
            source: std::io::Error::other("disk full"),
        });
        let stripped = strip_ansi(&err.to_string());

        assert!(stripped.contains("failed to write /out/chart.png"));
        assert!(stripped.contains("disk full"));
        assert!(stripped.contains("were removed"));
        assert!(stripped.contains("To fix this"));
    }

    #[test]
    fn test_extension_trait_scene_load() {
        let result: Result<(), SceneLoadError> =
            Err(SceneLoadError::Invalid(SceneError::DegenerateViewport));
        let app_result = result.with_path("scene.yml");
        assert!(app_result.is_err());

        let err = app_result.unwrap_err();
        assert!(matches!(err, AppError::SceneFile { path, .. } if path == "scene.yml"));
    }

    #[test]
    fn test_format_scene_file_parse_error() {
        let yaml_err = serde_yaml::from_str::<crate::scene::Scene>("not: [valid").unwrap_err();
        let err = AppError::SceneFile {
            path: "scene.yml".to_string(),
            source: SceneLoadError::Parse(yaml_err),
        };
        let stripped = strip_ansi(&err.to_string());

        assert!(stripped.contains("error:"));
        assert!(stripped.contains("invalid YAML in scene.yml"));
        assert!(stripped.contains("To fix this"));
    }
}

//! Export of a finished canvas to the three output encodings.
//!
//! One canvas produces `<base>.svg`, `<base>.png`, and `<base>.pdf` in a
//! single run. The PNG is rasterized from the SVG text with resvg at a
//! configurable DPI; the PDF conversion parses the same SVG text with
//! svg2pdf's own bundled parser. All three byte buffers are produced in
//! memory before the first write, and an already-written sibling is
//! removed if a later write fails, so a failed export never leaves a
//! partial set of files behind.

use std::io;
use std::path::{Path, PathBuf};

use tiny_skia::{Pixmap, Transform};

use crate::canvas::Canvas;

/// Pixel density the canvas is defined at. The PNG `dpi` option scales
/// relative to this; SVG and PDF always use the base resolution.
pub const BASE_DPI: f32 = 100.0;

/// Where and how the exported files are written.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Base filename, without extension.
    pub base_name: String,
    /// Directory the three files are written into. Must already exist.
    pub out_dir: PathBuf,
    /// PNG resolution in dots per inch.
    pub dpi: u32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            base_name: "critical_chain".to_string(),
            out_dir: PathBuf::from("."),
            dpi: 300,
        }
    }
}

/// Errors reported by the export step. This is the only part of the
/// pipeline with an externally observable failure mode.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("output directory '{0}' does not exist or is not a directory")]
    OutDirMissing(String),

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("PNG encoding failed: {0}")]
    Png(String),

    #[error("PDF encoding failed: {0}")]
    Pdf(String),
}

/// Paths of the files written by a successful export.
#[derive(Debug)]
pub struct ExportedFiles {
    pub svg: PathBuf,
    pub png: PathBuf,
    pub pdf: PathBuf,
}

impl ExportedFiles {
    pub fn all(&self) -> [&Path; 3] {
        [&self.svg, &self.png, &self.pdf]
    }
}

/// Write the canvas to all three formats.
pub fn export(canvas: Canvas, options: &ExportOptions) -> Result<ExportedFiles, ExportError> {
    if !options.out_dir.is_dir() {
        return Err(ExportError::OutDirMissing(
            options.out_dir.display().to_string(),
        ));
    }

    let svg = canvas.finish();
    let png = encode_png(&svg, options.dpi)?;
    let pdf = encode_pdf(&svg)?;

    let file = |ext: &str| options.out_dir.join(format!("{}.{}", options.base_name, ext));
    let paths = ExportedFiles {
        svg: file("svg"),
        png: file("png"),
        pdf: file("pdf"),
    };

    let outputs: [(&Path, &[u8]); 3] = [
        (&paths.svg, svg.as_bytes()),
        (&paths.png, &png),
        (&paths.pdf, &pdf),
    ];
    for (index, (path, bytes)) in outputs.iter().enumerate() {
        if let Err(source) = std::fs::write(path, bytes) {
            // Roll back the siblings written before the failure.
            for (written, _) in &outputs[..index] {
                let _ = std::fs::remove_file(written);
            }
            return Err(ExportError::Write {
                path: path.display().to_string(),
                source,
            });
        }
    }

    Ok(paths)
}

/// Rasterize the SVG document at `dpi`.
fn encode_png(svg: &str, dpi: u32) -> Result<Vec<u8>, ExportError> {
    if dpi == 0 {
        return Err(ExportError::Png("dpi must be greater than zero".to_string()));
    }
    let scale = dpi as f32 / BASE_DPI;

    let mut options = resvg::usvg::Options::default();
    options.fontdb_mut().load_system_fonts();

    let tree = resvg::usvg::Tree::from_str(svg, &options)
        .map_err(|err| ExportError::Png(format!("failed to parse generated SVG: {err}")))?;

    let size = tree.size().to_int_size();
    let scaled_width = ((size.width() as f32) * scale).ceil() as u32;
    let scaled_height = ((size.height() as f32) * scale).ceil() as u32;

    let mut pixmap = Pixmap::new(scaled_width, scaled_height).ok_or_else(|| {
        ExportError::Png(format!(
            "failed to allocate {scaled_width}x{scaled_height} surface"
        ))
    })?;

    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|err| ExportError::Png(err.to_string()))
}

/// Convert the SVG document to a single-page PDF at the base resolution.
fn encode_pdf(svg: &str) -> Result<Vec<u8>, ExportError> {
    let mut options = svg2pdf::usvg::Options::default();
    options.fontdb_mut().load_system_fonts();

    let tree = svg2pdf::usvg::Tree::from_str(svg, &options)
        .map_err(|err| ExportError::Pdf(format!("failed to parse generated SVG: {err}")))?;

    svg2pdf::to_pdf(
        &tree,
        svg2pdf::ConversionOptions::default(),
        svg2pdf::PageOptions::default(),
    )
    .map_err(|err| ExportError::Pdf(err.to_string()))
}

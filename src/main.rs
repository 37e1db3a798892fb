use std::path::PathBuf;

use clap::Parser;
use owo_colors::OwoColorize;

use chainplot::error_fmt::{AppError, SceneResultExt};
use chainplot::export::{export, ExportOptions};
use chainplot::render::render_scene;
use chainplot::scenario::exam_upgrade_scene;
use chainplot::scene::Scene;

#[derive(Parser)]
#[command(name = "chainplot")]
#[command(about = "Render a Critical Chain schedule diagram to SVG, PNG, and PDF")]
struct Cli {
    /// Base name of the output files (without extension)
    #[arg(long, short, default_value = "critical_chain")]
    output: String,

    /// Directory the output files are written into
    #[arg(long, short = 'd', default_value = ".")]
    out_dir: PathBuf,

    /// Render a scene from a YAML file instead of the built-in schedule
    #[arg(long)]
    scene: Option<PathBuf>,

    /// PNG resolution in dots per inch
    #[arg(long, default_value_t = 300)]
    dpi: u32,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprint!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let scene = match &cli.scene {
        Some(path) => Scene::load(path).with_path(&path.display().to_string())?,
        None => exam_upgrade_scene(),
    };

    let canvas = render_scene(&scene)?;

    let options = ExportOptions {
        base_name: cli.output,
        out_dir: cli.out_dir,
        dpi: cli.dpi,
    };
    let files = export(canvas, &options)?;

    for path in files.all() {
        println!(
            "{} {}",
            "exported:".bright_green(),
            path.display().to_string().bright_green()
        );
    }

    Ok(())
}

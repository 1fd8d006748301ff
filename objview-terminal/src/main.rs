//! objview terminal viewer
//!
//! Loads an OBJ file (or a built-in cube) and renders it as an ASCII wireframe.
//! Controls:
//!   - Arrow keys: rotate
//!   - WASD: move
//!   - +/-: zoom
//!   - P: toggle projection, V: vertex style, E: edge style
//!   - R: reset view, Space: toggle spin
//!   - Q/ESC: quit
//!
//! The render style is restored from the settings file at startup and saved
//! back on quit.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use objview_core::{
    CenteringMode, EdgeStyle, Facade, NormalizationParameters, ProjectionMode, RenderStyle, Scene,
    SceneInfo, VertexStyle,
};
use objview_terminal::{settings, TerminalApp};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Parser)]
#[command(name = "objview-terminal")]
#[command(version)]
#[command(about = "View Wavefront OBJ files in the terminal.", long_about = None)]
struct Args {
    /// The OBJ file to display. A cube is shown when omitted.
    input: Option<PathBuf>,
    /// Largest half extent of the scene after normalization.
    #[arg(long, short, default_value_t = 1.0)]
    target_extent: f64,
    /// Point of the input moved to the origin.
    #[arg(long, short, default_value_t = Centering::BoundingBox, value_enum)]
    centering: Centering,
    /// Initial projection. Overrides the saved setting.
    #[arg(long, short, value_enum)]
    projection: Option<Projection>,
    /// Initial vertex style. Overrides the saved setting.
    #[arg(long, value_enum)]
    vertex_style: Option<Vertices>,
    /// Draw edges dotted.
    #[arg(long)]
    dotted: bool,
    /// Keep the scene spinning.
    #[arg(long)]
    spin: bool,
    /// View settings file. Defaults to `~/.config/objview/settings.json`.
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Neither restore nor save view settings.
    #[arg(long, conflicts_with = "settings")]
    no_settings: bool,
    /// Where to put the log output
    #[arg(long, short)]
    log: Option<PathBuf>,
    /// Log debug events as well.
    #[arg(long, short)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Centering {
    BoundingBox,
    Centroid,
}

impl From<Centering> for CenteringMode {
    fn from(value: Centering) -> Self {
        match value {
            Centering::BoundingBox => CenteringMode::BoundingBox,
            Centering::Centroid => CenteringMode::Centroid,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Projection {
    Perspective,
    Orthographic,
}

impl From<Projection> for ProjectionMode {
    fn from(value: Projection) -> Self {
        match value {
            Projection::Perspective => ProjectionMode::Perspective,
            Projection::Orthographic => ProjectionMode::Orthographic,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Vertices {
    Square,
    Circle,
    Invisible,
}

impl From<Vertices> for VertexStyle {
    fn from(value: Vertices) -> Self {
        match value {
            Vertices::Square => VertexStyle::Square,
            Vertices::Circle => VertexStyle::Circle,
            Vertices::Invisible => VertexStyle::Invisible,
        }
    }
}

/// The terminal belongs to the renderer, so logs only go to a file
fn init_logging(args: &Args) -> Result<()> {
    let Some(path) = &args.log else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };

    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_max_level(level)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .finish(),
    )?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let params = NormalizationParameters::new(args.target_extent, args.centering.into());
    let settings_path = if args.no_settings {
        None
    } else {
        args.settings.clone().or_else(settings::default_path)
    };
    let style = initial_style(&args, settings_path.as_deref());

    let mut facade = Facade::new();
    facade.subscribe(|scene: &SceneInfo| {
        info!(
            vertices = scene.vertex_count,
            figures = scene.figure_count,
            edges = scene.edge_count,
            "scene ready"
        );
    });

    match &args.input {
        Some(path) => facade
            .load_scene(path, &params)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => facade.load("cube", Scene::cube(2.0), &params)?,
    };

    let mut app = TerminalApp::new(facade, style)?.with_spin(args.spin);
    app.run()?;

    if let Some(path) = &settings_path {
        settings::save(path, app.style())?;
    }

    Ok(())
}

/// Saved style, or the default one, with command line overrides on top
fn initial_style(args: &Args, settings_path: Option<&Path>) -> RenderStyle {
    let saved = settings_path.and_then(|path| {
        settings::load(path)
            .inspect_err(|e| warn!(error = %e, "ignoring saved settings"))
            .ok()
            .flatten()
    });
    let mut style = saved.unwrap_or_default();

    if let Some(projection) = args.projection {
        style.projection = projection.into();
    }
    if let Some(vertices) = args.vertex_style {
        style.vertex_style = vertices.into();
    }
    if args.dotted {
        style.edge_style = EdgeStyle::Dotted;
    }
    style
}

/// prim3d terminal viewer - spinning cube, sphere and cone
///
/// Controls:
///   - WASD / Arrow Keys: Orbit the scene
///   - E/R: Roll
///   - Space: Pause/resume the spin
///   - Q/ESC: Quit
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use prim3d_core::geometry::{SPHERE_HEIGHT_SEGMENTS, SPHERE_WIDTH_SEGMENTS};
use prim3d_core::{ConeOptions, Scene, SceneConfig, ShapeSelection};
use prim3d_terminal::{snapshot, AppOptions, TerminalApp};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ShapeArg {
    All,
    Cube,
    Sphere,
    Cone,
}

impl From<ShapeArg> for ShapeSelection {
    fn from(shape: ShapeArg) -> Self {
        match shape {
            ShapeArg::All => ShapeSelection::All,
            ShapeArg::Cube => ShapeSelection::Cube,
            ShapeArg::Sphere => ShapeSelection::Sphere,
            ShapeArg::Cone => ShapeSelection::Cone,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "prim3d-terminal")]
#[command(about = "Render procedurally generated solids in the terminal")]
#[command(version)]
struct Cli {
    /// Which solids to show
    #[arg(long, value_enum, default_value_t = ShapeArg::All)]
    shape: ShapeArg,

    /// Target frames per second
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Edge length of the cube
    #[arg(long, default_value_t = 1.0)]
    cube_size: f32,

    /// Longitude divisions of the sphere (min 3)
    #[arg(long, default_value_t = SPHERE_WIDTH_SEGMENTS)]
    sphere_width_segments: u32,

    /// Latitude divisions of the sphere (min 2)
    #[arg(long, default_value_t = SPHERE_HEIGHT_SEGMENTS)]
    sphere_height_segments: u32,

    /// Radial divisions of the cone
    #[arg(long, default_value_t = 32)]
    cone_segments: u32,

    /// Start with the spin animation paused
    #[arg(long)]
    no_spin: bool,

    /// Print a single frame of the given COLSxROWS size and exit
    #[arg(long, value_name = "COLSxROWS", value_parser = parse_size)]
    snapshot: Option<(usize, usize)>,

    /// Frame tick used for --snapshot
    #[arg(long, default_value_t = 0)]
    tick: u64,
}

fn parse_size(value: &str) -> Result<(usize, usize), String> {
    let (cols, rows) = value
        .split_once('x')
        .ok_or_else(|| format!("expected COLSxROWS, got '{value}'"))?;
    let cols = cols.trim().parse().map_err(|e| format!("invalid column count: {e}"))?;
    let rows = rows.trim().parse().map_err(|e| format!("invalid row count: {e}"))?;
    Ok((cols, rows))
}

impl Cli {
    fn scene_config(&self) -> SceneConfig {
        SceneConfig {
            shapes: self.shape.into(),
            cube_size: self.cube_size,
            sphere_width_segments: self.sphere_width_segments,
            sphere_height_segments: self.sphere_height_segments,
            cone: ConeOptions {
                radial_segments: self.cone_segments,
                ..ConeOptions::default()
            },
            ..SceneConfig::default()
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let scene = Scene::from_config(&cli.scene_config());

    if let Some((cols, rows)) = cli.snapshot {
        println!("{}", snapshot(&scene, cols, rows, cli.tick));
        return Ok(());
    }

    let options = AppOptions {
        fps: cli.fps,
        spin: !cli.no_spin,
    };
    let mut app = TerminalApp::new(scene, options).context("failed to query terminal size")?;
    app.run().context("terminal viewer failed")?;

    Ok(())
}

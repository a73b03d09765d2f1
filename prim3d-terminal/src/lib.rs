/// Terminal front-end: draws the procedural solids as lit ASCII art
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use prim3d_core::{draw_parameters, RotationState, Scene, Transform};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f32 = 0.5;

const ORBIT_STEP: f32 = 0.1;

/// Runtime options of the terminal viewer
#[derive(Debug, Clone, Copy)]
pub struct AppOptions {
    /// Target frames per second
    pub fps: u32,
    /// Advance the spin animation every frame
    pub spin: bool,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self { fps: 30, spin: true }
    }
}

/// Viewport aspect ratio of a character grid
pub fn viewport_aspect(width: usize, height: usize) -> f32 {
    width as f32 * CELL_ASPECT / height.max(1) as f32
}

/// Draw every mesh of `scene` for frame `tick` into `renderer`
pub fn render_scene(renderer: &mut AsciiRenderer, scene: &Scene, orbit: &RotationState, tick: u64) {
    let aspect = viewport_aspect(renderer.width(), renderer.height());
    let orbit = Transform::rotation_matrix(orbit);

    renderer.clear();
    for mesh in &scene.meshes {
        let params = draw_parameters(mesh, &scene.camera, &scene.lighting, aspect, tick);
        renderer.render_mesh(&mesh.geometry, &params, &orbit);
    }
}

/// Render a single frame off-screen and return it as text
pub fn snapshot(scene: &Scene, width: usize, height: usize, tick: u64) -> String {
    let mut renderer = AsciiRenderer::new(width, height);
    render_scene(&mut renderer, scene, &RotationState::default(), tick);
    renderer.to_text()
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    scene: Scene,
    options: AppOptions,
    orbit: RotationState,
    renderer: AsciiRenderer,
    tick: u64,
    spinning: bool,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(scene: Scene, options: AppOptions) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        // Last row is reserved for the status line
        let rows = height.saturating_sub(1).max(1);

        Ok(Self {
            scene,
            options,
            orbit: RotationState::default(),
            renderer: AsciiRenderer::new(width as usize, rows as usize),
            tick: 0,
            spinning: options.spin,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
        info!(
            width = self.renderer.width(),
            height = self.renderer.height(),
            "terminal viewer started"
        );

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_secs(1) / self.options.fps.max(1);

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_input()?;
            }

            self.update();
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
                debug!(fps = self.fps, tick = self.tick, "frame rate");
            }
        }

        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
            if kind == KeyEventKind::Release {
                return Ok(());
            }
            match code {
                KeyCode::Char('q') | KeyCode::Esc => self.running = false,
                KeyCode::Char('w') | KeyCode::Up => self.orbit.rotate(ORBIT_STEP, 0.0, 0.0),
                KeyCode::Char('s') | KeyCode::Down => self.orbit.rotate(-ORBIT_STEP, 0.0, 0.0),
                KeyCode::Char('a') | KeyCode::Left => self.orbit.rotate(0.0, -ORBIT_STEP, 0.0),
                KeyCode::Char('d') | KeyCode::Right => self.orbit.rotate(0.0, ORBIT_STEP, 0.0),
                KeyCode::Char('e') => self.orbit.rotate(0.0, 0.0, ORBIT_STEP),
                KeyCode::Char('r') => self.orbit.rotate(0.0, 0.0, -ORBIT_STEP),
                KeyCode::Char(' ') => self.spinning = !self.spinning,
                _ => {}
            }
        }
        Ok(())
    }

    fn update(&mut self) {
        if self.spinning {
            self.tick += 1;
        }
    }

    fn render(&mut self) -> io::Result<()> {
        render_scene(&mut self.renderer, &self.scene, &self.orbit, self.tick);

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.renderer.draw(&mut stdout)?;

        queue!(
            stdout,
            cursor::MoveTo(0, self.renderer.height() as u16),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "prim3d | FPS: {:.1} | WASD/Arrows=Orbit E/R=Roll Space=Spin Q=Quit",
                self.fps
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prim3d_core::{SceneConfig, ShapeSelection};

    #[test]
    fn test_viewport_aspect() {
        assert!((viewport_aspect(80, 40) - 1.0).abs() < 1e-6);
        assert!((viewport_aspect(80, 0) - 40.0).abs() < 1e-6);
    }

    #[test]
    fn test_snapshot_dimensions() {
        let frame = snapshot(&Scene::demo(), 60, 20, 0);
        let lines: Vec<&str> = frame.lines().collect();
        assert_eq!(lines.len(), 20);
        assert!(lines.iter().all(|line| line.chars().count() == 60));
    }

    #[test]
    fn test_empty_viewport_snapshot() {
        assert_eq!(viewport_aspect(0, 20), 0.0);
        assert_eq!(snapshot(&Scene::demo(), 0, 20, 0), "");
        assert_eq!(snapshot(&Scene::demo(), 20, 0, 0), "");
    }

    #[test]
    fn test_snapshot_draws_something() {
        let frame = snapshot(&Scene::demo(), 80, 40, 10);
        assert!(frame.chars().any(|c| c != ' ' && c != '\n'));
    }

    #[test]
    fn test_snapshot_is_deterministic() {
        let scene = Scene::from_config(&SceneConfig {
            shapes: ShapeSelection::Cone,
            ..SceneConfig::default()
        });
        assert_eq!(snapshot(&scene, 40, 20, 7), snapshot(&scene, 40, 20, 7));
    }

    #[test]
    fn test_empty_scene_is_blank() {
        let mut scene = Scene::demo();
        scene.meshes.clear();
        let frame = snapshot(&scene, 10, 4, 0);
        assert!(frame.chars().all(|c| c == ' ' || c == '\n'));
    }
}

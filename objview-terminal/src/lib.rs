//! Terminal front end: keyboard driven viewer over the objview facade
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use objview_core::{
    Facade, FileReader, InteractionState, RenderStyle, SceneDrawer, ViewerError,
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub mod renderer;
pub mod settings;

pub use renderer::AsciiRenderer;

/// Pixels of simulated pointer drag per key press
const DRAG_STEP: f64 = 10.0;
/// Pixels of simulated drag per frame while spinning
const SPIN_STEP: f64 = 1.0;
/// Rows reserved for the status line
const STATUS_ROWS: u16 = 1;

/// Main application struct for terminal 3D viewing
pub struct TerminalApp<R: FileReader> {
    facade: Facade<R>,
    interaction: InteractionState,
    style: RenderStyle,
    renderer: AsciiRenderer,
    spin: bool,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl<R: FileReader> TerminalApp<R> {
    pub fn new(facade: Facade<R>, style: RenderStyle) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(
            facade,
            style,
            width as usize,
            height.saturating_sub(STATUS_ROWS) as usize,
        ))
    }

    pub fn with_size(facade: Facade<R>, style: RenderStyle, width: usize, height: usize) -> Self {
        Self {
            facade,
            interaction: InteractionState::new(),
            style,
            renderer: AsciiRenderer::new(width, height),
            spin: false,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        }
    }

    /// Keep yawing the scene every frame
    pub fn with_spin(mut self, spin: bool) -> Self {
        self.spin = spin;
        self
    }

    pub fn facade(&self) -> &Facade<R> {
        &self.facade
    }

    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> anyhow::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                match event::read()? {
                    Event::Key(KeyEvent {
                        code,
                        kind: KeyEventKind::Press,
                        ..
                    }) => self.handle_key(code)?,
                    Event::Resize(width, height) => self.resize(width, height),
                    _ => {}
                }
            }

            self.update()?;
            self.render()?;

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
            }
        }

        Ok(())
    }

    /// Map a key to a gesture and forward the resulting absolute values
    pub fn handle_key(&mut self, code: KeyCode) -> Result<(), ViewerError> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Up => self.rotate(0.0, -DRAG_STEP)?,
            KeyCode::Down => self.rotate(0.0, DRAG_STEP)?,
            KeyCode::Left => self.rotate(-DRAG_STEP, 0.0)?,
            KeyCode::Right => self.rotate(DRAG_STEP, 0.0)?,
            KeyCode::Char('w') => self.pan(0.0, -DRAG_STEP)?,
            KeyCode::Char('s') => self.pan(0.0, DRAG_STEP)?,
            KeyCode::Char('a') => self.pan(-DRAG_STEP, 0.0)?,
            KeyCode::Char('d') => self.pan(DRAG_STEP, 0.0)?,
            KeyCode::Char('+') | KeyCode::Char('=') => self.zoom(1)?,
            KeyCode::Char('-') => self.zoom(-1)?,
            KeyCode::Char('p') => {
                self.style.projection = self.style.projection.toggled();
                debug!(projection = ?self.style.projection, "projection changed");
            }
            KeyCode::Char('v') => self.style.vertex_style = self.style.vertex_style.next(),
            KeyCode::Char('e') => self.style.edge_style = self.style.edge_style.toggled(),
            KeyCode::Char('r') => self.reset_view()?,
            KeyCode::Char(' ') => self.spin = !self.spin,
            _ => {}
        }
        Ok(())
    }

    fn rotate(&mut self, dx: f64, dy: f64) -> Result<(), ViewerError> {
        let (x, y, z) = self.interaction.drag_rotate(dx, dy);
        self.facade.rotate_scene(x, y, z)
    }

    fn pan(&mut self, dx: f64, dy: f64) -> Result<(), ViewerError> {
        let (x, y, z) = self.interaction.drag_move(dx, dy);
        self.facade.move_scene(x, y, z)
    }

    fn zoom(&mut self, steps: i32) -> Result<(), ViewerError> {
        let scale = self.interaction.zoom(steps);
        self.facade.scale_scene(scale)
    }

    fn reset_view(&mut self) -> Result<(), ViewerError> {
        self.interaction.reset();
        let (rx, ry, rz) = self.interaction.rotation();
        let (mx, my, mz) = self.interaction.translation();
        self.facade.rotate_scene(rx, ry, rz)?;
        self.facade.move_scene(mx, my, mz)?;
        self.facade.scale_scene(self.interaction.scale())?;
        info!("view reset");
        Ok(())
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.renderer = AsciiRenderer::new(
            width as usize,
            height.saturating_sub(STATUS_ROWS) as usize,
        );
    }

    fn update(&mut self) -> Result<(), ViewerError> {
        if self.spin {
            self.rotate(SPIN_STEP, 0.0)?;
        }
        Ok(())
    }

    /// Draw the current scene into the renderer's buffer
    pub fn draw_frame(&mut self) {
        match self.facade.snapshot() {
            Some(scene) => self.renderer.draw_scene(&scene, &self.style),
            None => self.renderer.clear(),
        }
    }

    pub fn renderer(&self) -> &AsciiRenderer {
        &self.renderer
    }

    /// One line summary of the scene and its transform
    pub fn status_line(&self) -> String {
        let name = self.facade.name().unwrap_or("<none>");
        let (vertices, figures) = self
            .facade
            .info()
            .map(|i| (i.vertex_count, i.figure_count))
            .unwrap_or_default();
        let (rx, ry, _) = self.interaction.rotation();
        let (mx, my, _) = self.interaction.translation();
        format!(
            "{name} | V:{vertices} F:{figures} | rot {rx:.0},{ry:.0} move {mx:.2},{my:.2} scale {:.2} | {:?} | FPS: {:.1} | Arrows=Rotate WASD=Move +/-=Zoom P=Proj V/E=Style R=Reset Space=Spin Q=Quit",
            self.interaction.scale(),
            self.style.projection,
            self.fps,
        )
    }

    fn render(&mut self) -> io::Result<()> {
        self.draw_frame();

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, STATUS_ROWS))?;
        self.renderer.draw(&mut stdout)?;

        let status: String = self.status_line().chars().take(self.renderer.width()).collect();
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(status),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use objview_core::{
        EdgeStyle, FacadeState, NormalizationParameters, ProjectionMode, Scene, VertexStyle,
    };
    use std::path::Path;

    struct NoFiles;

    impl FileReader for NoFiles {
        fn read(&self, path: &Path) -> io::Result<String> {
            Err(io::Error::new(
                io::ErrorKind::NotFound,
                path.display().to_string(),
            ))
        }
    }

    fn app() -> TerminalApp<NoFiles> {
        let mut facade = Facade::with_reader(NoFiles);
        facade
            .load("cube", Scene::cube(2.0), &NormalizationParameters::default())
            .unwrap();
        TerminalApp::with_size(facade, RenderStyle::default(), 60, 30)
    }

    #[test]
    fn test_keys_drive_absolute_transforms() {
        let mut app = app();
        app.handle_key(KeyCode::Right).unwrap();
        app.handle_key(KeyCode::Right).unwrap();
        app.handle_key(KeyCode::Char('d')).unwrap();
        app.handle_key(KeyCode::Char('+')).unwrap();

        let state = app.facade().transform_state().unwrap();
        assert_eq!(state.rotation.y, 2.0 * DRAG_STEP * 0.5);
        assert!((state.translation.x - DRAG_STEP * 0.01).abs() < 1e-12);
        assert!((state.scale - 1.1).abs() < 1e-12);
    }

    #[test]
    fn test_reset_returns_to_identity() {
        let mut app = app();
        let baseline = app.facade().scene().unwrap().clone();
        app.handle_key(KeyCode::Up).unwrap();
        app.handle_key(KeyCode::Char('a')).unwrap();
        app.handle_key(KeyCode::Char('-')).unwrap();
        app.handle_key(KeyCode::Char('r')).unwrap();

        for (v, b) in app
            .facade()
            .scene()
            .unwrap()
            .vertices()
            .iter()
            .zip(baseline.vertices())
        {
            assert!(v.position().distance(&b.position()) < 1e-9);
        }
    }

    #[test]
    fn test_style_keys() {
        let mut app = app();
        app.handle_key(KeyCode::Char('p')).unwrap();
        app.handle_key(KeyCode::Char('v')).unwrap();
        app.handle_key(KeyCode::Char('e')).unwrap();
        assert_eq!(app.style().projection, ProjectionMode::Orthographic);
        assert_eq!(app.style().vertex_style, VertexStyle::Invisible);
        assert_eq!(app.style().edge_style, EdgeStyle::Dotted);
    }

    #[test]
    fn test_quit() {
        let mut app = app();
        assert!(app.is_running());
        app.handle_key(KeyCode::Char('q')).unwrap();
        assert!(!app.is_running());
    }

    #[test]
    fn test_transform_keys_need_a_scene() {
        let mut app = TerminalApp::with_size(
            Facade::with_reader(NoFiles),
            RenderStyle::default(),
            20,
            10,
        );
        assert_eq!(app.facade().state(), FacadeState::Empty);
        assert!(matches!(
            app.handle_key(KeyCode::Left),
            Err(ViewerError::NoScene)
        ));
        app.draw_frame();
        assert!(app.renderer().rows().iter().all(|r| r.trim().is_empty()));
    }

    #[test]
    fn test_frame_and_status() {
        let mut app = app();
        app.draw_frame();
        assert!(app.renderer().rows().iter().any(|r| r.contains('o')));
        let status = app.status_line();
        assert!(status.starts_with("cube | V:8 F:6"));
    }
}

/// Terminal front end: event loop, HUD and line rasterizer
use anyhow::Context;
use crossterm::{
    cursor,
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::{Print, ResetColor, SetForegroundColor},
    terminal,
};
use pinhole_core::{CameraController, Config, Projector, World};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod cli;
pub mod input;
pub mod renderer;

pub use input::{Command, InputMapper};
pub use renderer::AsciiRenderer;

const CONTROLS: &[&str] = &[
    "[ESC] quit",
    "[W] forward",
    "[A] left",
    "[S] backward",
    "[D] right",
    "[SPACE] up",
    "[C] down",
    "[Q/E] roll",
    "[MOUSE] look",
];

/// Main application struct for terminal wireframe rendering
pub struct TerminalApp {
    config: Config,
    world: World,
    controller: CameraController,
    projector: Projector,
    renderer: AsciiRenderer,
    input: InputMapper,
    running: bool,
    last_fps_sample: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let (cols, rows) = terminal::size().context("failed to query terminal size")?;
        Self::with_size(config, cols, rows)
    }

    /// Build the app for a terminal of `cols` x `rows` cells
    pub fn with_size(config: Config, cols: u16, rows: u16) -> anyhow::Result<Self> {
        let world = config.build_world().context("failed to build the scene")?;
        let controller =
            CameraController::new(&config.controls).context("failed to set up camera controls")?;
        let projector = Projector::new(config.display.width, config.display.height);
        let renderer = AsciiRenderer::new(cols as usize, rows as usize, config.display.background);
        let input = InputMapper::new(pixels_per_cell(&config, cols, rows));

        log::info!(
            "scene ready: {} shapes, {}x{} cells for a {}x{} screen",
            world.shapes().len(),
            cols,
            rows,
            config.display.width,
            config.display.height
        );

        Ok(Self {
            config,
            world,
            controller,
            projector,
            renderer,
            input,
            running: true,
            last_fps_sample: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        terminal::enable_raw_mode()?;

        // Key release events are needed to stop moving when a key is let go
        let enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if !enhanced {
            log::warn!("terminal does not report key releases; press the opposite key to stop");
        }

        let result = enter_terminal(enhanced)
            .context("failed to set up the terminal")
            .and_then(|()| self.main_loop());

        // Cleanup runs even if setup or the loop failed; their error wins
        let restored = restore_terminal(enhanced).context("failed to restore the terminal");
        result.and(restored)
    }

    fn main_loop(&mut self) -> anyhow::Result<()> {
        let target_frame_time = Duration::from_secs_f64(1.0 / self.config.display.target_frame_rate);
        let mut previous_frame = Instant::now();

        while self.running {
            let frame_start = Instant::now();
            let dt = (frame_start - previous_frame).as_secs_f64();
            previous_frame = frame_start;

            // Handle input
            while event::poll(Duration::ZERO)? {
                let event = event::read()?;
                if let Some(command) = self.input.map_event(&event) {
                    self.apply(command);
                }
            }
            if !self.running {
                break;
            }

            // Update
            self.step(dt)?;

            // Render
            let mut stdout = stdout();
            self.render(&mut stdout)?;
            stdout.flush()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_fps_sample).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_fps_sample).as_secs_f32();
                self.frame_count = 0;
                self.last_fps_sample = now;
            }
        }

        log::info!("quit requested");
        Ok(())
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Quit => self.running = false,
            Command::Translate(event) => self.controller.translate_event(event),
            Command::Look { dx, dy } => self.controller.look_event(dx, dy),
            Command::ReleaseAll => self.controller.release_all(),
            Command::Resize { cols, rows } => {
                log::debug!("terminal resized to {cols}x{rows}");
                self.renderer.resize(cols as usize, rows as usize);
                self.input
                    .set_pixels_per_cell(pixels_per_cell(&self.config, cols, rows));
            }
        }
    }

    /// Advance controls, then the world, by `dt` seconds
    pub fn step(&mut self, dt: f64) -> anyhow::Result<()> {
        self.controller
            .update(self.world.camera_mut(), dt)
            .context("failed to resolve camera controls")?;
        self.world.update(dt).context("failed to update the world")?;
        Ok(())
    }

    pub fn render<W: Write>(&mut self, writer: &mut W) -> std::io::Result<()> {
        let display = &self.config.display;
        let frame = self.projector.project_world(&self.world);

        self.renderer.clear();
        self.renderer.render_frame(&frame, display.width, display.height);
        self.renderer
            .draw_crosshair(display.crosshair_size, display.width, display.height, display.ui_color);
        queue!(writer, cursor::MoveTo(0, 0))?;
        self.renderer.draw(writer)?;

        self.draw_hud(writer)
    }

    fn draw_hud<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let width = self.renderer.width() as u16;
        let height = self.renderer.height() as u16;
        let aperture = self.world.camera().aperture();
        let position = format!("({:.1}, {:.1}, {:.1})", aperture.x, aperture.y, aperture.z);
        let fps = format!("FPS: {:.1}", self.fps);

        queue!(
            writer,
            SetForegroundColor(renderer::to_term(self.config.display.ui_color))
        )?;
        for (row, line) in CONTROLS.iter().enumerate().take(height.saturating_sub(1) as usize) {
            queue!(writer, cursor::MoveTo(0, row as u16), Print(line))?;
        }
        queue!(
            writer,
            cursor::MoveTo(width.saturating_sub(position.len() as u16), 0),
            Print(&position),
            cursor::MoveTo(0, height.saturating_sub(1)),
            Print(&fps),
            ResetColor
        )?;
        Ok(())
    }
}

fn enter_terminal(enhanced: bool) -> io::Result<()> {
    execute!(
        stdout(),
        terminal::EnterAlternateScreen,
        cursor::Hide,
        EnableMouseCapture,
        EnableFocusChange
    )?;
    if enhanced {
        execute!(
            stdout(),
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }
    Ok(())
}

fn restore_terminal(enhanced: bool) -> io::Result<()> {
    let mut steps: Vec<Box<dyn FnOnce() -> io::Result<()>>> = Vec::new();
    if enhanced {
        steps.push(Box::new(|| execute!(stdout(), PopKeyboardEnhancementFlags)));
    }
    steps.push(Box::new(|| {
        execute!(
            stdout(),
            DisableFocusChange,
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )
    }));
    steps.push(Box::new(terminal::disable_raw_mode));
    run_all(steps)
}

/// Run every step in order, returning the first error
fn run_all(steps: Vec<Box<dyn FnOnce() -> io::Result<()>>>) -> io::Result<()> {
    steps.into_iter().fold(Ok(()), |first, step| {
        let result = step();
        if let Err(err) = &result {
            log::error!("terminal restore step failed: {err}");
        }
        first.and(result)
    })
}

/// Virtual screen pixels covered by one terminal cell
fn pixels_per_cell(config: &Config, cols: u16, rows: u16) -> (f64, f64) {
    (
        config.display.width / cols.max(1) as f64,
        config.display.height / rows.max(1) as f64,
    )
}

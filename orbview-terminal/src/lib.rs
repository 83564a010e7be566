/// Terminal host for the orbview viewer
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use orbview_core::{
    BuildTicket, KeyAction, KeyMap, LoopControl, Menu, RenderMode, Selection, StatusSnapshot,
    Viewer, ViewerConfig,
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod renderer;

pub use renderer::{AsciiRenderer, CELL_ASPECT};

type TerminalViewer = Viewer<AsciiRenderer, StatusSnapshot>;

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    viewer: TerminalViewer,
    labels: Vec<String>,
    pending: Vec<(Instant, BuildTicket)>,
    started: Instant,
    control: LoopControl,
}

impl TerminalApp {
    pub fn new(config: ViewerConfig) -> io::Result<Self> {
        let (columns, rows) = terminal::size()?;
        let gpu = AsciiRenderer::new(columns as usize, rows as usize);
        let (width, height) = gpu.pixel_size();

        let menu = Menu::builtin();
        let labels = menu.entries().map(|entry| entry.label.clone()).collect();
        let keymap = KeyMap::default()
            .bind("k", KeyAction::Forward)
            .bind("j", KeyAction::Backward);
        let viewer = Viewer::new(gpu, StatusSnapshot::default(), config, menu, width, height)
            .map_err(io::Error::other)?
            .with_keymap(keymap);

        Ok(Self {
            viewer,
            labels,
            pending: Vec::new(),
            started: Instant::now(),
            control: LoopControl::Continue,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            cursor::Hide,
            EnableMouseCapture
        )?;

        let result = self.main_loop();

        // Cleanup
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;
        terminal::disable_raw_mode()?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.control == LoopControl::Continue {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                let event = event::read()?;
                self.handle_event(event);
            }

            self.run_due_builds();

            // Render
            let now_ms = self.started.elapsed().as_secs_f64() * 1000.0;
            if self.viewer.tick(now_ms) == LoopControl::Stop {
                self.control = LoopControl::Stop;
            }
            self.present()?;

            // Frame timing
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(columns, rows) => {
                let gpu = AsciiRenderer::new(columns as usize, rows as usize);
                let (width, height) = gpu.pixel_size();
                *self.viewer.gpu_mut() = gpu;
                self.viewer.resize(width, height);
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, KeyEvent { code, kind, .. }: KeyEvent) {
        if kind != KeyEventKind::Press {
            return;
        }
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.control = LoopControl::Stop;
            }
            KeyCode::Char(digit @ '1'..='9') => {
                let index = digit as usize - '1' as usize;
                if let Some(label) = self.labels.get(index).cloned() {
                    self.select(&label);
                }
            }
            KeyCode::Char(c) => {
                self.viewer.key_pressed(&c.to_string());
            }
            KeyCode::Up => {
                self.viewer.key_pressed("ArrowUp");
            }
            KeyCode::Down => {
                self.viewer.key_pressed("ArrowDown");
            }
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if !matches!(mouse.kind, MouseEventKind::Moved | MouseEventKind::Drag(_)) {
            return;
        }
        let (width, height) = self.viewer.gpu().pixel_size();
        self.viewer.pointer_moved(
            mouse.column as f32,
            (mouse.row as usize * CELL_ASPECT) as f32,
            width as f32,
            height as f32,
        );
    }

    fn select(&mut self, label: &str) {
        match self.viewer.select(label) {
            Ok(Selection::Build(ticket)) => {
                let due = Instant::now() + self.viewer.config().build_delay;
                self.pending.push((due, ticket));
            }
            Ok(Selection::ModeChanged(_)) => {}
            Err(err) => log::warn!("{err}"),
        }
    }

    /// Complete deferred builds whose delay has elapsed, oldest first
    fn run_due_builds(&mut self) {
        let now = Instant::now();
        let (due, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|(at, _)| *at <= now);
        self.pending = waiting;
        for (_, ticket) in due {
            // Failures are logged by the scheduler and leave the old model up
            let _ = self.viewer.complete_build(ticket);
        }
    }

    fn present(&mut self) -> io::Result<()> {
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.viewer.gpu().draw(&mut stdout)?;

        // Draw UI overlay
        let status = self.viewer.status();
        let mode = match self.viewer.input().mode {
            RenderMode::Normal => "mono",
            RenderMode::Stereo => "stereo",
        };
        let mut header = format!(
            "orbview | FPS: {:.1} | {mode} | W/S=Dolly [/]=Eyes Q=Quit",
            self.viewer.animation().fps()
        );
        if let Some(hud) = &status.hud {
            header.push_str(&format!(" | {hud}"));
        }
        if status.busy {
            header.push_str(" | building...");
        }
        let legend: Vec<String> = self
            .labels
            .iter()
            .enumerate()
            .map(|(i, label)| format!("{}={label}", i + 1))
            .collect();

        let (_, rows) = terminal::size()?;
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(header),
            cursor::MoveTo(0, rows.saturating_sub(1)),
            Print(legend.join("  ")),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

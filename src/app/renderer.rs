use std::{
    io::{Stdout, Write},
    sync::{atomic::AtomicBool, mpsc::Receiver},
    time::Duration,
};

use crossterm::{
    cursor, queue,
    style::{self, Attribute, Color, Stylize},
    terminal,
};
use unicode_truncate::UnicodeTruncateStr;

use crate::app::UserActionEvent;
use crate::maze::GridEvent;

use super::lattice::{Glyph, Lattice};

#[derive(Debug, PartialEq, Eq)]
pub enum RendererStatus {
    Completed,
    Cancelled,
}

/// Render-thread side of the animation: drains grid events from the carver,
/// mirrors them into a glyph lattice and paints only the touched positions.
pub struct Renderer {
    /// Standard output handle to write to the terminal
    stdout: Stdout,
    lattice: Option<Lattice>,
    /// Time to wait between rendered events; adjusted by SpeedUp/SlowDown.
    refresh: Duration,
    /// Carve events applied so far, for the status line.
    carved: u64,
}

impl Renderer {
    /// Rows reserved below the maze for the status line.
    pub const NUM_STATUS_ROWS: u16 = 1;
    /// Fastest and slowest animation paces reachable via SpeedUp/SlowDown.
    const MIN_REFRESH: Duration = Duration::from_micros(50);
    const MAX_REFRESH: Duration = Duration::from_millis(512);

    pub fn new(refresh: Duration) -> Self {
        Renderer {
            stdout: std::io::stdout(),
            lattice: None,
            refresh,
            carved: 0,
        }
    }

    /// Render loop. Exits when the grid event channel disconnects (generation
    /// finished or was abandoned) or the cancel flag is raised.
    pub fn render(
        &mut self,
        grid_event_rx: Receiver<GridEvent>,
        user_action_event_rx: Receiver<UserActionEvent>,
        cancel: &AtomicBool,
        done: &AtomicBool,
    ) -> std::io::Result<RendererStatus> {
        let status = loop {
            if cancel.load(std::sync::atomic::Ordering::Relaxed) {
                break RendererStatus::Cancelled;
            }

            // Handle any pending user actions without blocking
            match user_action_event_rx.try_recv() {
                Ok(action) => {
                    tracing::debug!("[render] received user action: {:?}", action);
                    match action {
                        UserActionEvent::Cancel => break RendererStatus::Cancelled,
                        UserActionEvent::Pause => {
                            if !self.pause_until_resumed(&user_action_event_rx)? {
                                break RendererStatus::Cancelled;
                            }
                        }
                        other => self.handle_action(other)?,
                    }
                }
                Err(std::sync::mpsc::TryRecvError::Empty) => {}
                Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                    // Main loop is gone; keep draining grid events regardless
                }
            }

            // Block and wait for the next grid event
            match grid_event_rx.recv() {
                Err(_e) => break RendererStatus::Completed,
                Ok(event) => {
                    self.render_grid_event(&event)?;
                    std::thread::sleep(self.refresh);
                }
            }
        };

        // Park the cursor below the maze before handing the terminal back
        if let Some(lattice) = &self.lattice {
            queue!(
                self.stdout,
                cursor::MoveTo(0, lattice.height() as u16 + Renderer::NUM_STATUS_ROWS)
            )?;
            self.stdout.flush()?;
        }
        done.store(true, std::sync::atomic::Ordering::Relaxed);
        Ok(status)
    }

    /// Applies one grid event to the lattice and repaints what it touched.
    fn render_grid_event(&mut self, event: &GridEvent) -> std::io::Result<()> {
        match *event {
            GridEvent::Initial { width, height } => {
                let lattice = Lattice::new(width, height);
                self.carved = 0;
                self.draw_full(&lattice)?;
                self.lattice = Some(lattice);
            }
            _ => {
                let Some(lattice) = &mut self.lattice else {
                    // Updates before the initial event have nowhere to land
                    return Ok(());
                };
                if let GridEvent::Carved { .. } = event {
                    self.carved += 1;
                }
                let touched: Vec<_> = lattice
                    .apply(event)
                    .into_iter()
                    .map(|(x, y)| (x, y, lattice.get(x, y)))
                    .collect();
                for (x, y, glyph) in touched {
                    queue!(
                        self.stdout,
                        cursor::MoveTo(x as u16 * Glyph::CELL_WIDTH, y as u16),
                        style::Print(glyph)
                    )?;
                }
                self.draw_status()?;
                self.stdout.flush()?;
            }
        }
        Ok(())
    }

    /// Repaints the whole lattice, e.g. after the initial event or a resize.
    fn draw_full(&mut self, lattice: &Lattice) -> std::io::Result<()> {
        queue!(self.stdout, cursor::MoveTo(0, 0))?;
        for y in 0..lattice.height() {
            for x in 0..lattice.width() {
                queue!(self.stdout, style::Print(lattice.get(x, y)))?;
            }
            queue!(self.stdout, style::Print("\r\n"))?;
        }
        self.stdout.flush()
    }

    /// One-line progress summary under the maze, truncated to the terminal.
    fn draw_status(&mut self) -> std::io::Result<()> {
        let Some(lattice) = &self.lattice else {
            return Ok(());
        };
        let line = format!(
            "carved {}  refresh {:?}  (Enter pause, Up/Down speed, Esc quit)",
            self.carved, self.refresh
        );
        let width = terminal::size().map(|(w, _)| w as usize).unwrap_or(80);
        let (truncated, _) = line.unicode_truncate(width);
        queue!(
            self.stdout,
            cursor::MoveTo(0, lattice.height() as u16),
            terminal::Clear(terminal::ClearType::CurrentLine),
            style::PrintStyledContent(
                truncated
                    .to_string()
                    .with(Color::DarkGrey)
                    .attribute(Attribute::Dim)
            )
        )
    }

    fn handle_action(&mut self, action: UserActionEvent) -> std::io::Result<()> {
        match action {
            UserActionEvent::SpeedUp => {
                self.refresh = (self.refresh / 2).max(Renderer::MIN_REFRESH);
            }
            UserActionEvent::SlowDown => {
                self.refresh = (self.refresh * 2).min(Renderer::MAX_REFRESH);
            }
            UserActionEvent::Resize => {
                if let Some(lattice) = self.lattice.take() {
                    self.draw_full(&lattice)?;
                    self.lattice = Some(lattice);
                    self.draw_status()?;
                    self.stdout.flush()?;
                }
            }
            UserActionEvent::Pause | UserActionEvent::Resume | UserActionEvent::Cancel => {
                // Handled by the render loop itself
            }
        }
        Ok(())
    }

    /// Blocks until a Resume arrives. Returns false when the animation should
    /// be cancelled instead.
    fn pause_until_resumed(
        &mut self,
        user_action_event_rx: &Receiver<UserActionEvent>,
    ) -> std::io::Result<bool> {
        loop {
            match user_action_event_rx.recv() {
                // Channel disconnected; treat like a resume and let the main
                // render loop discover the shutdown.
                Err(_e) => return Ok(true),
                Ok(UserActionEvent::Resume) => return Ok(true),
                Ok(UserActionEvent::Cancel) => return Ok(false),
                Ok(action) => self.handle_action(action)?,
            }
        }
    }
}

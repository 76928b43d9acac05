mod config;
mod lattice;
mod renderer;

pub use config::{AppConfig, USAGE};

use std::{
    io::{Stdout, Write},
    sync::{
        Arc,
        atomic::AtomicBool,
        mpsc::{Receiver, Sender},
    },
    time::Duration,
};

use crossterm::{
    cursor,
    event::{self, KeyCode},
    execute, queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};

use crate::{
    generator::{Carver, GenStats},
    maze::GridEvent,
};

use lattice::{Glyph, Lattice};
use renderer::{Renderer, RendererStatus};

enum UserInputEvent {
    KeyPress(event::KeyEvent),
    Resize,
}

#[derive(Debug)]
pub(crate) enum UserActionEvent {
    /// Pause the animation
    Pause,
    /// Resume the animation
    Resume,
    /// Terminal resize
    Resize,
    /// Increase animation speed
    SpeedUp,
    /// Decrease animation speed
    SlowDown,
    /// Cancel the animation
    Cancel,
}

/// Maximum number of grid events to buffer in the channel between compute and render threads
const MAX_EVENTS_IN_CHANNEL_BUFFER: usize = 1000;
/// Timeout for receiving input events, a.k.a. how often to check for render done/cancel flags
const INPUT_RECV_TIMEOUT: Duration = Duration::from_millis(100);
/// Timeout for polling input events in the input thread, a.k.a.
/// how often to check for render done/cancel flags
const USER_INPUT_EVENT_POLL_TIMEOUT: Duration = Duration::from_millis(100);
/// Starting pace of the animation; adjustable at runtime with Up/Down
const INITIAL_REFRESH: Duration = Duration::from_millis(4);

/// Set a panic hook to restore terminal state on panic
/// This ensures that the terminal is not left in raw mode or alternate screen on panic
/// even if the panic occurs in a different thread
fn set_panic_hook() {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal(&mut std::io::stdout()); // ignore any errors as we are already failing
        hook(panic_info);
    }));
}

/// Setup terminal in raw mode and enter alternate screen
/// Also sets a panic hook to restore terminal on panic
fn setup_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
    terminal::enable_raw_mode()?;
    set_panic_hook();
    queue!(
        stdout,
        terminal::EnterAlternateScreen,
        terminal::Clear(ClearType::All),
        cursor::Hide,
        cursor::MoveTo(0, 0)
    )?;
    stdout.flush()?;
    Ok(())
}

/// Restore terminal to original state
/// Leave alternate screen and disable raw mode
fn restore_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
    queue!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
    stdout.flush()?;
    terminal::disable_raw_mode()?;
    Ok(())
}

/// Batch mode: generate to completion without animation, then print the
/// finished maze and the statistics table once.
pub fn batch(config: &AppConfig) -> std::io::Result<()> {
    let mut carver = Carver::new(config.width, config.height, config.seed, config.origin)
        .map_err(std::io::Error::other)?;
    let started = std::time::Instant::now();
    carver.generate_full();
    let elapsed = started.elapsed();

    let lattice = Lattice::from_grid(
        carver.grid(),
        carver.boundary_start(),
        carver.boundary_finish(),
    );
    let mut stdout = std::io::stdout();
    lattice.print(&mut stdout)?;
    writeln!(stdout)?;
    writeln!(stdout, "{}", carver.stats())?;
    writeln!(stdout, "Generated in:             {:.2?}", elapsed)?;
    Ok(())
}

/// Interactive mode: animate the carving, with pause/resume, speed control
/// and cancellation.
pub fn run(config: &AppConfig) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();

    // Check up front that the maze fits the terminal; the renderer assumes it does.
    let (term_width, term_height) = terminal::size()?;
    let needed_width = (config.width as u32 * 2 + 1) * Glyph::CELL_WIDTH as u32;
    let needed_height = config.height as u32 * 2 + 1 + Renderer::NUM_STATUS_ROWS as u32;
    if (term_width as u32) < needed_width || (term_height as u32) < needed_height {
        writeln!(
            stdout,
            "Terminal size {}x{} is too small for a {}x{} maze (needs {}x{}).",
            term_width, term_height, config.width, config.height, needed_width, needed_height
        )?;
        return Ok(());
    }

    // Validate dimensions and origin before any terminal state is touched
    Carver::validate(config.width, config.height, config.origin).map_err(std::io::Error::other)?;

    setup_terminal(&mut stdout)?;
    let outcome = animate(config);
    restore_terminal(&mut stdout)?;

    let (status, stats) = outcome?;
    match status {
        RendererStatus::Cancelled => {
            tracing::info!("animation was cancelled by the user");
            writeln!(stdout, "Cancelled.")?;
        }
        RendererStatus::Completed => {
            execute!(
                stdout,
                style::PrintStyledContent(
                    "Maze complete.\r\n"
                        .with(Color::Green)
                        .attribute(Attribute::Bold)
                )
            )?;
            if let Some(stats) = stats {
                writeln!(stdout, "{}", stats)?;
            }
        }
    }
    Ok(())
}

/// Spawns the compute, render and input threads and runs the main event loop
/// until the animation finishes or is cancelled.
fn animate(config: &AppConfig) -> std::io::Result<(RendererStatus, Option<GenStats>)> {
    // Flag to indicate rendering is done. Set to true by the render thread when it finishes.
    let render_done = Arc::new(AtomicBool::new(false));
    // Flag to indicate rendering should be cancelled. Set to true on an Esc key event.
    let render_cancel = Arc::new(AtomicBool::new(false));

    let (user_input_event_tx, user_input_event_rx) = std::sync::mpsc::channel::<UserInputEvent>();
    let render_done_for_input = render_done.clone();
    let render_cancel_for_input = render_cancel.clone();
    // Spawn a thread to listen for user input
    let input_thread_handle = std::thread::spawn(move || -> std::io::Result<()> {
        listen_to_user_input(
            user_input_event_tx,
            &render_done_for_input,
            &render_cancel_for_input,
        )
    });

    let (grid_event_tx, grid_event_rx) =
        std::sync::mpsc::sync_channel::<GridEvent>(MAX_EVENTS_IN_CHANNEL_BUFFER);
    let (user_action_event_tx, user_action_event_rx) =
        std::sync::mpsc::channel::<UserActionEvent>();

    // Spawn a thread to listen for grid updates and render the maze
    let render_cancel_for_render = render_cancel.clone();
    let render_done_for_render = render_done.clone();
    let render_thread_handle = std::thread::spawn(move || {
        let mut renderer = Renderer::new(INITIAL_REFRESH);
        renderer.render(
            grid_event_rx,
            user_action_event_rx,
            &render_cancel_for_render,
            &render_done_for_render,
        )
    });

    // Spawn a thread to step the carver; it stops between steps on cancel,
    // leaving the grid in a legal partially-carved state.
    let (width, height, seed, origin) = (config.width, config.height, config.seed, config.origin);
    let render_cancel_for_compute = render_cancel.clone();
    let compute_thread_handle = std::thread::spawn(move || -> Option<GenStats> {
        // Dimensions and origin were validated by the caller
        let mut carver =
            Carver::with_events(width, height, seed, origin, Some(grid_event_tx)).ok()?;
        while !carver.is_complete() {
            if render_cancel_for_compute.load(std::sync::atomic::Ordering::Relaxed) {
                tracing::info!("compute thread detected cancel, stopping generation");
                return Some(carver.stats());
            }
            carver.step();
        }
        Some(carver.stats())
        // Carver is dropped here, closing the grid event channel
    });

    // Main thread loop to forward user input to the renderer during the animation
    app_loop(user_input_event_rx, user_action_event_tx, &render_done, &render_cancel);

    // Wait for input thread to finish
    let _ = input_thread_handle.join();

    let stats = compute_thread_handle.join().expect("compute thread panicked");
    let status = render_thread_handle.join().expect("render thread panicked")?;
    Ok((status, stats))
}

/// Main-thread loop translating input events into renderer actions.
fn app_loop(
    user_input_event_rx: Receiver<UserInputEvent>,
    user_action_event_tx: Sender<UserActionEvent>,
    render_done: &AtomicBool,
    render_cancel: &AtomicBool,
) {
    tracing::info!("started main app loop");
    // Flag to indicate if the animation is currently paused
    let mut is_paused = false;
    loop {
        // Check if render is done
        if render_done.load(std::sync::atomic::Ordering::Relaxed) {
            break;
        }

        let event = match user_input_event_rx.recv_timeout(INPUT_RECV_TIMEOUT) {
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {
                // Check render_done again
                continue;
            }
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => {
                // Input thread has exited
                break;
            }
            Ok(UserInputEvent::Resize) => Some(UserActionEvent::Resize),
            Ok(UserInputEvent::KeyPress(key_event)) => match key_event.code {
                KeyCode::Esc => {
                    tracing::debug!("[app loop] Esc pressed, notifying renderer");
                    user_action_event_tx.send(UserActionEvent::Cancel).ok();
                    render_cancel.store(true, std::sync::atomic::Ordering::Relaxed);
                    break;
                }
                KeyCode::Enter => {
                    let event = if is_paused {
                        UserActionEvent::Resume
                    } else {
                        UserActionEvent::Pause
                    };
                    is_paused = !is_paused;
                    Some(event)
                }
                KeyCode::Up => Some(UserActionEvent::SpeedUp),
                KeyCode::Down => Some(UserActionEvent::SlowDown),
                _ => None, // Ignore other keys
            },
        };

        if let Some(event) = event {
            if user_action_event_tx.send(event).is_err() {
                // Render thread has exited
                break;
            }
        }
    }
    tracing::info!("exiting main app loop");
}

/// Listen for user input events (key presses and resize)
/// This function runs in a separate thread, and is the only place where user input is read
fn listen_to_user_input(
    user_input_event_tx: Sender<UserInputEvent>,
    render_done: &AtomicBool,
    render_cancel: &AtomicBool,
) -> std::io::Result<()> {
    loop {
        // Check if render is done or canceled
        if render_done.load(std::sync::atomic::Ordering::Relaxed)
            || render_cancel.load(std::sync::atomic::Ordering::Relaxed)
        {
            return Ok(());
        }

        // Poll for events with a timeout
        if !event::poll(USER_INPUT_EVENT_POLL_TIMEOUT)? {
            // No event available, continue loop to check flags again
            continue;
        }

        let input_event = match event::read()? {
            event::Event::Key(key_event) if key_event.kind == event::KeyEventKind::Press => {
                UserInputEvent::KeyPress(key_event)
            }
            event::Event::Resize(_, _) => UserInputEvent::Resize,
            _ => continue, // Ignore other events
        };

        // Should exit input thread on Esc key
        let should_exit = matches!(
            input_event,
            UserInputEvent::KeyPress(event::KeyEvent {
                code: KeyCode::Esc,
                ..
            })
        );

        // Send the input event to the main thread
        if user_input_event_tx.send(input_event).is_err() {
            // Receiver has been dropped, exit the thread
            return Ok(());
        }

        if should_exit {
            tracing::debug!("[input loop] Esc pressed, exiting");
            return Ok(());
        }
    }
}

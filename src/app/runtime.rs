//! TUI runtime for DevOps GPT
//!
//! The loop owns the [`App`] (and with it the session). Requests run as
//! background tasks and report back over an mpsc channel; see
//! `background.rs` for why channel sends are allowed to fail silently.

use crate::api::Backend;
use crate::app::{background, input, RuntimeContext};
use crate::session::{Outcome, Request};
use crate::ui;
use crate::ui::App;
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Spinner frame interval
const TICK: Duration = Duration::from_millis(100);

/// Run the TUI until the user quits.
///
/// `startup` requests (from `--resume` / `--analyze`) are dispatched before
/// the first frame.
pub async fn run_tui(mut app: App, backend: Arc<dyn Backend>, startup: Vec<Request>) -> Result<()> {
    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;

    let (tx, rx) = mpsc::channel::<Outcome>();
    let ctx = RuntimeContext {
        backend: &backend,
        tx: &tx,
    };

    for request in startup {
        background::dispatch(request, &ctx);
    }
    app.flush_notices();
    tracing::info!(api = %app.settings.api_base_url, "session started");

    let result = run_loop(&mut terminal, &mut app, &rx, &ctx);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    tracing::info!("session ended");
    result
}

/// Main event loop with background message handling
fn run_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: &mpsc::Receiver<Outcome>,
    ctx: &RuntimeContext,
) -> Result<()> {
    let mut last_tick = Instant::now();

    loop {
        // Clear expired toasts
        app.clear_expired_toast();

        // Advance spinner animation
        if last_tick.elapsed() >= TICK {
            app.tick_loading();
            last_tick = Instant::now();
        }

        // Check for background messages (non-blocking)
        if background::drain_messages(app, rx, ctx) {
            app.needs_redraw = true;
        }

        if app.needs_redraw {
            terminal.draw(|f| ui::render(f, app))?;
            app.needs_redraw = false;
        }

        // Poll for events with fast timeout (snappy animations)
        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    input::handle_key_event(app, key, ctx)?;
                }
                Event::Resize(_, _) => app.needs_redraw = true,
                _ => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

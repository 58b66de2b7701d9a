//! redfeed — a subreddit feed for the terminal.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌─────────────┐  Action    ┌──────────┐  draw()  ┌──────────┐
//! │ dispatch.rs │ ─────────► │  app.rs  │ ───────► │  ui.rs   │
//! │ (tokio task)│  (channel) │ (store + │          │ (render) │
//! └─────────────┘            │  screen) │          └──────────┘
//!        ▲                   └──────────┘
//!        │ fetch_posts()          ▲
//!        └────── screen.rs ───────┤ handle_key_event()
//!                            ┌──────────┐
//!                            │ input.rs │
//!                            └──────────┘
//! ```
//!
//! * **`source/`** — the `PostSource` trait, the `Post` model and the Reddit
//!   listing source.
//! * **`dispatch`** — fire-and-forget fetches on a tokio runtime, reporting
//!   back over a channel.
//! * **`store`** — the `FeedState` snapshot and its reducer.
//! * **`staleness`** / **`rows`** — the re-fetch rule and the row projection.
//! * **`screen`** — mount, snapshot reactions, refresh and scrolling.
//! * **`app`** — owns the state and applies actions one at a time.
//! * **`ui`** / **`input`** — drawing and key handling.
//! * **`main`** — wires everything together: parse args, set up logging and
//!   the terminal, and run the event loop.

mod app;
mod config;
mod dispatch;
mod error;
mod input;
mod logging;
mod navigation;
mod rows;
mod screen;
mod session;
mod source;
mod staleness;
mod store;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use app::App;
use config::Config;
use dispatch::Dispatcher;
use session::Token;
use source::RedditSource;

// ---------------------------------------------------------------------------
// RAII terminal guard
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
///
/// Constructing this struct enters raw mode + alternate screen.  When the
/// value is dropped (normally or during stack unwinding) it restores the
/// terminal.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode().context("enabling raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Install a panic hook that restores the terminal before printing the
/// panic message.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        tracing::error!(%info, "panic");
        original_hook(info);
    }));
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let config = Config::parse();

    // Dropping the guard flushes the log file, so it lives until the end.
    let _log_guard = logging::init(&config.log_dir, config.debug)?;
    install_panic_hook();
    tracing::info!(topic = %config.topic, api_url = %config.api_url, "starting");

    // -- fetch plumbing ------------------------------------------------------
    let runtime = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
    let source = RedditSource::new(&config.api_url, &config.user_agent, config.limit)
        .context("building HTTP client")?;
    let (dispatcher, mut rx) = Dispatcher::new(Arc::new(source), runtime.handle().clone());

    let token = config.token.as_deref().and_then(Token::new);
    let mut app = App::new(&config.topic, config.stale_after(), token, dispatcher);

    // -- terminal setup (RAII — Drop restores on exit or panic) --------------
    let mut guard = TerminalGuard::new()?;
    app.mount();

    // -- main event loop -----------------------------------------------------
    // Each iteration:
    //   1. Apply any actions published by fetch tasks.
    //   2. Render the UI.
    //   3. Poll for keyboard input (non-blocking, up to tick_rate).
    let tick_rate = Duration::from_millis(config.tick_ms);

    loop {
        while let Ok(action) = rx.try_recv() {
            app.apply(action, Utc::now());
        }

        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key_event(&mut app, key);
            }
        }

        if app.quit {
            break;
        }
    }

    drop(guard);
    // In-flight fetches have nobody left to report to.
    runtime.shutdown_background();
    tracing::info!("exiting");
    Ok(())
}

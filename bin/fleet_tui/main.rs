/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Interactive TUI for the fleet overview API.
//!
//! Displays the fleet as a navigable tree — Server → (Stack |
//! Deployment) → Service → Container — with a free-text filter that
//! cascades through every level.
//!
//! # Invariants
//!
//! - **Pure projection**: the visible row list is recomputed from the
//!   aggregation core's snapshot on every state change; there is no
//!   incremental list surgery.
//! - **Expansion-gated polling**: service lists are fetched only for
//!   stacks named in the snapshot's active set, on a fixed 10 s
//!   cadence; collapsing (or filtering out) a stack stops its polling
//!   on the next scheduler tick, and re-expanding fetches immediately.
//! - **Serial fetches**: all HTTP requests are issued one at a time
//!   from the event loop; results land before the next draw.
//! - **Atomic input**: every key event is applied to the view state
//!   before the next aggregation pass, so rapid toggles are never
//!   dropped.
//! - **Best-effort degradation**: root-list fetch failures keep the
//!   previous snapshot and surface in the header; service fetch
//!   failures keep the last known list and are only logged.
//!
//! Logging goes to `--log-file` (env-filtered via `RUST_LOG`) so the
//! alternate screen stays clean; without the flag, logging is off.
//!
//! ```bash
//! fleet-tui --addr 127.0.0.1:9120 --tag prod
//! ```

mod app;
mod format;
mod render;
mod theme;

use std::io;
use std::io::IsTerminal;
use std::time::Duration;

use anyhow::Context;
pub(crate) use app::*;
use clap::Parser;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use crossterm::ExecutableCommand;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::EnvFilter;

/// Command-line arguments for the fleet TUI.
#[derive(Debug, Parser)]
#[command(name = "fleet-tui", about = "TUI for the fleet overview API")]
pub(crate) struct Args {
    /// Fleet API address (e.g., 127.0.0.1:9120 or https://fleet.example.com)
    #[arg(long, short)]
    pub(crate) addr: String,

    /// Refresh interval for server/stack/deployment lists, in milliseconds
    #[arg(long, default_value_t = 30_000)]
    pub(crate) refresh_ms: u64,

    /// Restrict the server list to these tags (repeatable)
    #[arg(long = "tag")]
    pub(crate) tags: Vec<String>,

    /// Append tracing output to this file (filtered by RUST_LOG)
    #[arg(long)]
    pub(crate) log_file: Option<String>,
}

// Terminal setup / teardown

/// Put the terminal into "TUI mode".
///
/// Enables raw mode, switches to the alternate screen, and clears it,
/// returning a `ratatui::Terminal` backed by crossterm.
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    Ok(terminal)
}

/// Restore the terminal back to normal shell mode.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if !io::stdout().is_terminal() {
        eprintln!("This TUI requires a real terminal.");
        return Ok(());
    }

    if let Some(path) = &args.log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("cannot open log file {}", path))?;
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::sync::Arc::new(file))
            .with_ansi(false)
            .init();
    }

    // Show an indicatif spinner on stderr while fetching initial data.
    // This runs before the alternate screen so it's visible as a normal
    // terminal line.
    let mut app = App::new(&args.addr, args.tags.clone());
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .expect("valid template"),
    );
    spinner.set_message(format!("fleet-tui — Connecting to {} ...", app.base_url()));
    spinner.enable_steady_tick(Duration::from_millis(80));

    app.refresh().await;
    spinner.finish_and_clear();

    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, &args, app).await;
    restore_terminal(&mut terminal)?;
    Ok(result?)
}

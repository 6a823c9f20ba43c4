mod app;
mod commands;
mod components;
mod config;
mod error;
mod event;
mod fetch;
mod fs;
mod handler;
mod nav;
mod server;
mod tui;
mod ui;
mod vpath;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use crate::app::App;
use crate::commands::Keymap;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::event::{Event, EventHandler};
use crate::fetch::Fetcher;
use crate::fs::FileAccess;
use crate::nav::Effect;
use crate::tui::{install_panic_hook, Tui};

/// Keyboard-driven dual-pane directory browser with an embedded HTTP file
/// service.
#[derive(Parser, Debug)]
#[command(name = "paneview", version, about)]
struct Cli {
    /// Root directory to browse (defaults to current directory)
    #[arg(default_value = ".")]
    root: PathBuf,

    /// Port for the HTTP API (loopback only)
    #[arg(short, long)]
    port: Option<u16>,

    /// Run the HTTP API only, without the terminal UI
    #[arg(long)]
    serve: bool,

    /// Open the served URL in the default browser (with --serve)
    #[arg(long)]
    open: bool,

    /// Append logs to this file; without it, TUI mode does not log
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Explicit config file path
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> error::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref());

    let root = cli
        .root
        .canonicalize()
        .map_err(|_| AppError::InvalidRoot(format!("{} does not exist", cli.root.display())))?;
    if !root.is_dir() {
        return Err(AppError::InvalidRoot(format!(
            "{} is not a directory",
            root.display()
        )));
    }

    let port = cli.port.unwrap_or_else(|| config.port());
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let access = Arc::new(FileAccess::new(root.clone()));

    if cli.serve {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
        tracing::info!("serving {} at http://{}", root.display(), addr);
        if cli.open {
            let _ = open::that(format!("http://{addr}"));
        }
        return server::serve((*access).clone(), addr).await;
    }

    // TUI mode: keep the alternate screen clean by logging to a file, if any.
    if let Some(path) = &cli.log_file {
        let file = std::fs::OpenOptions::new().create(true).append(true).open(path)?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .init();
    }

    // The HTTP service runs alongside the TUI over the same confined root.
    let server_access = (*access).clone();
    tokio::spawn(async move {
        if let Err(e) = server::serve(server_access, addr).await {
            tracing::error!("http service failed: {e}");
        }
    });

    install_panic_hook();
    let mut tui = Tui::new()?;
    let mut events = EventHandler::new(Duration::from_millis(16));
    let fetcher = Fetcher::new(access.clone(), events.sender(), config.preview_head_bytes());
    let settle_delay = Duration::from_millis(config.settle_ms());
    let mut app = App::new(
        Keymap::with_overrides(&config.keys),
        root.display().to_string(),
        format!("http://{addr}"),
    );

    loop {
        run_effects(&mut app, &fetcher, &access, settle_delay);

        tui.terminal_mut().draw(|frame| ui::render(&mut app, frame))?;

        match events.next().await? {
            Event::Key(key) => handler::handle_key_event(&mut app, key),
            Event::Tick => app.clear_expired_status(),
            Event::Resize(_, _) => {}
            Event::LeftListing(result) => match result {
                Ok(listing) => app.nav.on_left_listing(listing),
                Err(e) => {
                    app.nav.on_left_error();
                    app.set_status_message(format!("left pane: {e}"));
                }
            },
            Event::RightListing { path, result } => match result {
                Ok(listing) => app.nav.on_right_listing(listing),
                Err(e) => {
                    app.nav.on_right_error(&path);
                    app.set_status_message(format!("right pane: {e}"));
                }
            },
            Event::Settle { target } => app.nav.on_settle(&target),
            Event::Preview { path, content } => app.nav.on_preview(&path, content),
        }

        if app.should_quit {
            break;
        }
    }

    tui.restore()?;
    Ok(())
}

/// Execute the side effects recorded by controller operations: fetches and
/// timers go through the fetch client, open-file resolves the confined path
/// and hands it to the OS opener.
fn run_effects(app: &mut App, fetcher: &Fetcher, access: &Arc<FileAccess>, settle_delay: Duration) {
    for effect in app.nav.take_effects() {
        match effect {
            Effect::FetchLeft(path) => fetcher.fetch_left(path),
            Effect::FetchRight(path) => fetcher.fetch_right(path),
            Effect::StartSettle(target) => fetcher.schedule_settle(target, settle_delay),
            Effect::FetchPreview(path) => fetcher.fetch_preview(path),
            Effect::OpenFile(path) => {
                let access = access.clone();
                tokio::spawn(async move {
                    match access.resolve(&path).await {
                        Ok(abs) => {
                            if let Err(e) = open::that(&abs) {
                                tracing::warn!("failed to open {}: {e}", abs.display());
                            }
                        }
                        Err(e) => tracing::warn!("cannot open {path}: {e}"),
                    }
                });
            }
        }
    }
}

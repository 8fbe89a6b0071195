//! # causerie
//!
//! Line-mode development shell around the client core.  Renders the timeline
//! with date separators, sends whatever is typed, and exposes the few
//! operations a graphical shell would wire to gestures:
//!
//! - `/more`  — backfill one page of older history
//! - `/retry` — re-submit the last failed send
//! - `/dark`  — toggle and persist the dark-mode preference
//! - `/quit`  — leave
//!
//! By default the shell runs against the embedded store; set
//! `CAUSERIE_BACKEND=rest` to talk to the hosted service configured through
//! the `CAUSERIE_SERVICE_*` variables.

use std::io::Write;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use tokio::io::AsyncBufReadExt;
use tracing::info;

use causerie_client::backend::{LocalBackend, MessageBackend, RestBackend};
use causerie_client::config::ServiceConfig;
use causerie_client::events::{EventReceiver, UiEvent};
use causerie_client::scroll::ScrollMetrics;
use causerie_client::state::AppState;
use causerie_client::sync::SyncController;
use causerie_client::timeline::Timeline;
use causerie_client::{events, init_tracing};
use causerie_shared::types::PendingId;
use causerie_store::Database;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    info!("Starting Causerie dev shell v{}", env!("CARGO_PKG_VERSION"));

    // The local database always opens: even in REST mode it persists the
    // dark-mode preference.
    let db = Arc::new(Mutex::new(
        Database::new().context("could not open the local store")?,
    ));
    let app = {
        let guard = db.lock().map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        AppState::load(&guard).context("could not load preferences")?
    };

    let (tx, rx) = events::channel();

    match std::env::var("CAUSERIE_BACKEND").as_deref() {
        Ok("rest") => {
            let config = ServiceConfig::from_env();
            info!(?config, "Using the hosted service backend");
            let controller = SyncController::new(RestBackend::new(config), tx);
            run(controller, rx, db, app).await
        }
        _ => {
            info!("Using the embedded store backend");
            let controller = SyncController::new(LocalBackend::from_shared(db.clone()), tx);
            run(controller, rx, db, app).await
        }
    }
}

async fn run<B: MessageBackend>(
    mut controller: SyncController<B>,
    mut rx: EventReceiver,
    db: Arc<Mutex<Database>>,
    mut app: AppState,
) -> Result<()> {
    controller.load_initial().await.context("initial load failed")?;

    let mut last_failed = None;
    pump_events(&mut rx, &mut last_failed);
    render(controller.timeline(), app.dark_mode);

    println!("type a message, or /more /retry /dark /quit");
    prompt()?;

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "/quit" => break,
            "/more" => {
                let state = controller.on_scroll(&top_of_view());
                if !controller.load_more_if_needed(&state).await {
                    println!("(no older history)");
                }
                pump_events(&mut rx, &mut last_failed);
                render(controller.timeline(), app.dark_mode);
            }
            "/retry" => {
                match last_failed.take() {
                    Some(id) => {
                        if let Err(e) = controller.retry(id).await {
                            eprintln!("retry failed: {e}");
                        }
                    }
                    None => println!("(nothing to retry)"),
                }
                pump_events(&mut rx, &mut last_failed);
                render(controller.timeline(), app.dark_mode);
            }
            "/dark" => {
                let guard = db.lock().map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
                let enabled = app.toggle_dark_mode(&guard)?;
                println!("dark mode: {}", if enabled { "on" } else { "off" });
            }
            "" => {}
            text => {
                if let Err(e) = controller.send(text).await {
                    eprintln!("send failed: {e}");
                }
                pump_events(&mut rx, &mut last_failed);
                render(controller.timeline(), app.dark_mode);
            }
        }
        prompt()?;
    }

    controller.close();
    Ok(())
}

/// Drain pending UI effects; remember the last failed send for `/retry`.
fn pump_events(rx: &mut EventReceiver, last_failed: &mut Option<PendingId>) {
    while let Ok(event) = rx.try_recv() {
        if let UiEvent::SendFailed(payload) = event {
            println!("! send failed ({}); /retry to resend", payload.reason);
            *last_failed = Some(payload.pending_id);
        }
    }
}

fn render(timeline: &Timeline, dark_mode: bool) {
    println!();
    for group in timeline.date_groups() {
        if !group.label.is_empty() {
            println!("── {} ──", group.label);
        }
        for message in &group.messages {
            let marker = if message.failed {
                "  [failed]"
            } else if message.pending {
                "  [sending]"
            } else {
                ""
            };
            println!("{:>8}  {}{}", message.time_label, message.text, marker);
        }
    }
    if dark_mode {
        println!("({} messages, dark)", timeline.len());
    } else {
        println!("({} messages)", timeline.len());
    }
}

/// Metrics equivalent to having scrolled all the way up.
fn top_of_view() -> ScrollMetrics {
    ScrollMetrics {
        scroll_top: 0.0,
        scroll_height: 2000.0,
        client_height: 500.0,
    }
}

fn prompt() -> Result<()> {
    print!("> ");
    std::io::stdout().flush()?;
    Ok(())
}

//! # causerie-client
//!
//! Synchronization core of the Causerie chat client: the ordered timeline
//! cache, cursor-based history pagination, optimistic send with
//! reconciliation, scroll-anchored auto-follow, and the backend abstraction
//! over the hosted (or embedded) message store.
//!
//! The rendering layer is an external collaborator: it feeds scroll metrics
//! and key events in, and applies the [`events::UiEvent`] effects the core
//! emits.

pub mod backend;
pub mod composer;
pub mod config;
pub mod events;
pub mod pages;
pub mod scroll;
pub mod state;
pub mod sync;
pub mod timeline;

use tracing_subscriber::{fmt, EnvFilter};

pub use sync::{Phase, SyncController};

/// Initialize the tracing subscriber for an embedding shell.
///
/// Respects `RUST_LOG`; falls back to a per-crate default filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("causerie_client=debug,causerie_store=info,warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

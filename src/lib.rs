//! MailWave: a newsletter and blog REST backend, plus the small server rendered UI that
//! consumes it.

pub mod app;
pub mod client;
pub mod config;
mod error;
pub mod model;
pub mod templ_manager;
pub mod ui;
pub mod web;

// re-export
pub use app::{App, AppState};
pub use client::ApiClient;
pub use error::{Error, Result};
pub use web::serve::{build_router, serve, serve_with_shutdown};

use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

/// Human readable logs for development. Respects `RUST_LOG`, defaults to `debug`.
///
/// Does nothing if a global subscriber is already set, so tests may call it repeatedly.
pub fn init_dbg_tracing() {
    let _ = tracing_subscriber::fmt()
        .without_time()
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .compact()
        .try_init();
}

/// JSON lines for production. Respects `RUST_LOG`, defaults to `info`.
pub fn init_production_tracing() {
    let _ = tracing_subscriber::fmt()
        .json()
        .with_current_span(true)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

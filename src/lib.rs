mod app;
pub mod config;
mod error;
pub mod sheets;
pub mod signup_form;
mod templ_manager;
pub mod utils;
pub mod web;

// re-exports
pub use app::{App, AppState};
pub use error::{Error, Result};
pub use sheets::SheetsClient;
pub use templ_manager::TemplateManager;
pub use web::serve;

use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

/// Human readable, compact output for local development. `RUST_LOG` is ignored.
pub fn init_dbg_tracing() {
    tracing_subscriber::fmt()
        .without_time()
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_env_filter(EnvFilter::new("debug"))
        .compact()
        .init();
}

/// Filtered by `RUST_LOG`, defaults to `info`.
pub fn init_production_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();
}

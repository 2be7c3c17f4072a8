// src/lib.rs
// Public library surface shared by the web binary, the ingest CLI and integration tests.

pub mod ads;
pub mod api;
pub mod config;
pub mod ingest;
pub mod metrics;
pub mod models;
pub mod store;
pub mod summarize;
pub mod timeparse;

// ---- Re-exports for stable public API ----
pub use crate::ads::{get_ads_for_placement, AdCatalog, AdRequest};
pub use crate::api::{create_router, AppState};
pub use crate::summarize::{build_summarizer, DynSummarizer, Summarizer};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the `fmt` subscriber with `RUST_LOG` filtering (default `default_filter`).
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

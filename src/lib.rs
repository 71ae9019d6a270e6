//! PanelForge: the aggregation and suggestion core of a clinical gene-panel
//! builder.
//!
//! A user assembles a custom panel by combining curated panels from two
//! PanelApp-style registries and a local file registry, filtering by
//! confidence, and adding manual genes. The core merges those sources into one
//! deterministic, confidence-ranked gene table and suggests HPO phenotype
//! terms derived from the selected panel names, refined by accept/reject
//! feedback. The interactive UI, chart rendering, and scheduling live in the
//! consuming application.

pub mod aggregate;
pub mod confidence;
pub mod config;
pub mod error;
pub mod hpo;
pub mod keywords;
pub mod models;
pub mod parallel;
pub mod registry;
pub mod session;
pub mod summary;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for the hosting process.
///
/// Honors `RUST_LOG` when set; defaults to `info` for this crate otherwise.
/// Call once at startup from the embedding application.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("panelforge=info")),
        )
        .init();
}

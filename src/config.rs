//! Process-level configuration.
//!
//! The embedding application loads/overrides these values; the core never
//! reads environment or files for configuration itself. Cache capacities and
//! worker counts mirror the reference deployment.

use std::path::PathBuf;

pub const CRATE_NAME: &str = "panelforge";
pub const CRATE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Configuration injected into [`crate::registry::PanelSourceAdapter`] and
/// [`crate::hpo::suggest::SuggestionEngine`].
#[derive(Debug, Clone)]
pub struct PanelForgeConfig {
    /// Base URL of the UK panel registry (trailing slash optional).
    pub uk_base_url: String,
    /// Base URL of the Australian panel registry.
    pub au_base_url: String,
    /// Base URL of the HPO ontology search service.
    pub ontology_base_url: String,
    /// Directory of internal panel files (`<name>[_<count>]_v<version>.txt`).
    pub internal_panel_dir: PathBuf,

    /// Bounded cache capacities.
    pub panel_cache_capacity: usize,
    pub term_cache_capacity: usize,
    pub disorder_cache_capacity: usize,

    /// Parallel fetch bounds.
    pub panel_fetch_workers: usize,
    pub term_fetch_workers: usize,

    /// Per-request HTTP timeouts, seconds.
    pub registry_timeout_secs: u64,
    pub ontology_timeout_secs: u64,

    /// Keyword extraction tuning.
    pub min_keyword_score: u32,
    pub max_keywords: usize,
    /// Keywords processed per `suggest()` call (bounds external calls).
    pub max_keywords_per_suggest: usize,
    /// Live-search page size for suggestion lookups.
    pub search_page_size: usize,

    /// Confidence assigned to manually entered genes. Policy: 0 (unrated);
    /// manual genes carry no curation evidence and are rendered as their own
    /// category downstream.
    pub manual_gene_confidence: u8,
}

impl Default for PanelForgeConfig {
    fn default() -> Self {
        Self {
            uk_base_url: "https://panelapp.genomicsengland.co.uk/api/v1".into(),
            au_base_url: "https://panelapp-aus.org/api/v1".into(),
            ontology_base_url: "https://ontology.jax.org/api/hp".into(),
            internal_panel_dir: PathBuf::from("data/internal_panels"),
            panel_cache_capacity: 200,
            term_cache_capacity: 500,
            disorder_cache_capacity: 100,
            panel_fetch_workers: 5,
            term_fetch_workers: 10,
            registry_timeout_secs: 10,
            ontology_timeout_secs: 5,
            min_keyword_score: 2,
            max_keywords: 8,
            max_keywords_per_suggest: 6,
            search_page_size: 100,
            manual_gene_confidence: 0,
        }
    }
}

//! Panel source adapter: one façade over the two remote registries and the
//! local file registry, with memoized fetches and a bounded parallel batch
//! path.
//!
//! Failure isolation contract: one panel failing to fetch yields an empty
//! result for that panel plus a logged error. It never unwinds the batch.

pub mod cache;
pub mod local;
pub mod remote;

use crate::config::PanelForgeConfig;
use crate::error::FetchError;
use crate::models::{Origin, PanelListEntry, PanelSelection, PanelSource};
use crate::parallel::run_parallel;
use cache::BoundedCache;
use local::LocalPanelStore;
use remote::{extract_hp_terms, HttpPanelRegistry, PanelDetail, PanelRegistryClient};

/// One selection's fetch outcome, ready for aggregation. A failed fetch
/// produces an empty `detail` (the batch-isolation fallback).
#[derive(Debug, Clone)]
pub struct FetchedPanel {
    pub selection: PanelSelection,
    pub source: PanelSource,
    pub detail: PanelDetail,
}

pub struct PanelSourceAdapter {
    uk: Box<dyn PanelRegistryClient>,
    au: Box<dyn PanelRegistryClient>,
    local: LocalPanelStore,
    panel_cache: BoundedCache<(Origin, u32), PanelDetail>,
    disorder_cache: BoundedCache<(Origin, u32), Vec<String>>,
    panel_fetch_workers: usize,
}

impl PanelSourceAdapter {
    pub fn new(config: &PanelForgeConfig) -> Self {
        Self::with_clients(
            Box::new(HttpPanelRegistry::new(
                &config.uk_base_url,
                config.registry_timeout_secs,
            )),
            Box::new(HttpPanelRegistry::new(
                &config.au_base_url,
                config.registry_timeout_secs,
            )),
            LocalPanelStore::new(config.internal_panel_dir.clone()),
            config,
        )
    }

    /// Construct with injected clients (tests use mocks here).
    pub fn with_clients(
        uk: Box<dyn PanelRegistryClient>,
        au: Box<dyn PanelRegistryClient>,
        local: LocalPanelStore,
        config: &PanelForgeConfig,
    ) -> Self {
        Self {
            uk,
            au,
            local,
            panel_cache: BoundedCache::new(config.panel_cache_capacity),
            disorder_cache: BoundedCache::new(config.disorder_cache_capacity),
            panel_fetch_workers: config.panel_fetch_workers,
        }
    }

    /// List selectable panels for one origin.
    pub fn list_panels(&self, origin: Origin) -> Result<Vec<PanelListEntry>, FetchError> {
        match origin {
            Origin::Uk => self.uk.list_panels(),
            Origin::Au => self.au.list_panels(),
            Origin::Internal => Ok(self
                .local
                .scan()
                .into_iter()
                .map(|p| PanelListEntry {
                    id: p.panel_id,
                    name: p.display_name(),
                    version: Some(p.version.to_string()),
                })
                .collect()),
            Origin::Manual => Ok(Vec::new()),
        }
    }

    /// Fetch one panel's rows and metadata, memoized per (origin, panel_id).
    /// Only successful fetches are cached; a transient failure is retried on
    /// the next request.
    pub fn fetch(&self, origin: Origin, panel_id: u32) -> Result<PanelDetail, FetchError> {
        if origin == Origin::Manual {
            return Ok(PanelDetail::default());
        }
        if let Some(hit) = self.panel_cache.get(&(origin, panel_id)) {
            return Ok(hit);
        }
        let detail = match origin {
            Origin::Uk => self.uk.panel_detail(panel_id)?,
            Origin::Au => self.au.panel_detail(panel_id)?,
            Origin::Internal => self.local.panel_detail(panel_id)?,
            Origin::Manual => unreachable!("handled above"),
        };
        self.panel_cache.insert((origin, panel_id), detail.clone());
        Ok(detail)
    }

    /// Fetch every selected panel on a bounded worker pool. Results are
    /// correlated back to their selection; order matches the input.
    pub fn fetch_selected(&self, selections: &[PanelSelection]) -> Vec<FetchedPanel> {
        run_parallel(
            selections.to_vec(),
            self.panel_fetch_workers,
            |selection| {
                let detail = match self.fetch(selection.origin, selection.panel_id) {
                    Ok(detail) => detail,
                    Err(e) => {
                        tracing::error!(
                            "Failed to fetch {} panel {}: {e}",
                            selection.origin,
                            selection.panel_id
                        );
                        PanelDetail::default()
                    }
                };
                FetchedPanel {
                    selection: *selection,
                    source: PanelSource {
                        origin: selection.origin,
                        panel_id: Some(selection.panel_id),
                        panel_name: detail.metadata.name.clone(),
                        version: detail.metadata.version.clone(),
                    },
                    detail,
                }
            },
        )
    }

    /// HPO term ids embedded in a panel's disorder strings, memoized.
    /// Failure yields an empty list, logged.
    pub fn panel_disorders(&self, origin: Origin, panel_id: u32) -> Vec<String> {
        self.disorder_cache.get_or_fetch((origin, panel_id), || {
            match self.fetch(origin, panel_id) {
                Ok(detail) => extract_hp_terms(&detail.relevant_disorders),
                Err(e) => {
                    tracing::error!("Error fetching disorders for panel {panel_id}: {e}");
                    Vec::new()
                }
            }
        })
    }

    /// Bulk invalidation, called by the external scheduled refresh.
    pub fn clear_caches(&self) {
        self.panel_cache.clear();
        self.disorder_cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GeneRecord, PanelMetadata};
    use remote::MockPanelRegistry;

    fn detail(name: &str, version: &str, genes: &[(&str, u8)]) -> PanelDetail {
        PanelDetail {
            rows: genes
                .iter()
                .map(|(symbol, conf)| GeneRecord::bare(*symbol, *conf))
                .collect(),
            metadata: PanelMetadata {
                id: None,
                name: name.into(),
                version: Some(version.into()),
                ..PanelMetadata::default()
            },
            relevant_disorders: Vec::new(),
        }
    }

    fn test_adapter(uk: MockPanelRegistry, au: MockPanelRegistry) -> PanelSourceAdapter {
        let dir = std::env::temp_dir().join("panelforge-no-internal-panels");
        PanelSourceAdapter::with_clients(
            Box::new(uk),
            Box::new(au),
            LocalPanelStore::new(dir),
            &PanelForgeConfig::default(),
        )
    }

    #[test]
    fn fetch_selected_correlates_results_to_selections() {
        let uk = MockPanelRegistry::new()
            .with_panel(285, detail("Epilepsy panel", "4.1", &[("SCN1A", 3)]));
        let au = MockPanelRegistry::new()
            .with_panel(250, detail("Genetic Epilepsy", "1.2", &[("KCNQ2", 2)]));
        let adapter = test_adapter(uk, au);

        let selections = vec![
            PanelSelection {
                origin: Origin::Uk,
                panel_id: 285,
            },
            PanelSelection {
                origin: Origin::Au,
                panel_id: 250,
            },
        ];
        let fetched = adapter.fetch_selected(&selections);

        assert_eq!(fetched.len(), 2);
        assert_eq!(fetched[0].source.key(), "UK_285");
        assert_eq!(fetched[0].detail.rows[0].gene_symbol, "SCN1A");
        assert_eq!(fetched[1].source.key(), "AUS_250");
        assert_eq!(fetched[1].source.panel_name, "Genetic Epilepsy");
    }

    #[test]
    fn one_failed_fetch_does_not_abort_the_batch() {
        let uk = MockPanelRegistry::new()
            .with_panel(285, detail("Epilepsy panel", "4.1", &[("SCN1A", 3)]));
        let au = MockPanelRegistry::failing();
        let adapter = test_adapter(uk, au);

        let selections = vec![
            PanelSelection {
                origin: Origin::Uk,
                panel_id: 285,
            },
            PanelSelection {
                origin: Origin::Au,
                panel_id: 250,
            },
        ];
        let fetched = adapter.fetch_selected(&selections);

        assert_eq!(fetched.len(), 2);
        assert_eq!(fetched[0].detail.rows.len(), 1);
        // Failed unit degrades to an empty detail, never an error.
        assert!(fetched[1].detail.rows.is_empty());
        assert!(fetched[1].source.panel_name.is_empty());
    }

    #[test]
    fn fetch_is_memoized_per_origin_and_id() {
        let uk = MockPanelRegistry::new()
            .with_panel(285, detail("Epilepsy panel", "4.1", &[("SCN1A", 3)]));
        let adapter = test_adapter(uk, MockPanelRegistry::new());

        let first = adapter.fetch(Origin::Uk, 285).unwrap();
        let second = adapter.fetch(Origin::Uk, 285).unwrap();
        assert_eq!(first, second);

        adapter.clear_caches();
        let third = adapter.fetch(Origin::Uk, 285).unwrap();
        assert_eq!(first, third);
    }

    #[test]
    fn disorder_lookup_failure_yields_empty_list() {
        let adapter = test_adapter(MockPanelRegistry::failing(), MockPanelRegistry::new());
        assert!(adapter.panel_disorders(Origin::Uk, 285).is_empty());
    }

    #[test]
    fn manual_origin_fetches_nothing() {
        let adapter = test_adapter(MockPanelRegistry::new(), MockPanelRegistry::new());
        let detail = adapter.fetch(Origin::Manual, 0).unwrap();
        assert!(detail.rows.is_empty());
        assert!(adapter.list_panels(Origin::Manual).unwrap().is_empty());
    }
}

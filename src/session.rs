//! Session controller surface.
//!
//! Transport-agnostic state for one user session: the panel selections per
//! origin, the confidence filter, the manual gene text, and the suggestion
//! feedback state. The UI layer binds to this and calls the orchestration
//! helpers; everything here is in-memory and discarded with the session.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::aggregate::{aggregate, AggregatedGeneTable};
use crate::config::PanelForgeConfig;
use crate::hpo::feedback::SuggestionSessionState;
use crate::hpo::suggest::{SuggestionEngine, SuggestionOutcome};
use crate::keywords::KeywordExtractor;
use crate::models::{Origin, PanelSelection};
use crate::registry::PanelSourceAdapter;
use crate::summary::generate_summary;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelSession {
    pub uk_ids: Vec<u32>,
    pub au_ids: Vec<u32>,
    pub internal_ids: Vec<u32>,
    pub confidence_filter: BTreeSet<u8>,
    /// Raw manual gene input, one symbol per line.
    pub manual_genes_text: String,
    pub suggestions: SuggestionSessionState,
    #[serde(skip, default)]
    config: PanelForgeConfigSnapshot,
}

/// The handful of config values the session needs after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PanelForgeConfigSnapshot {
    manual_gene_confidence: u8,
    min_keyword_score: u32,
    max_keywords: usize,
}

impl Default for PanelForgeConfigSnapshot {
    fn default() -> Self {
        let cfg = PanelForgeConfig::default();
        Self {
            manual_gene_confidence: cfg.manual_gene_confidence,
            min_keyword_score: cfg.min_keyword_score,
            max_keywords: cfg.max_keywords,
        }
    }
}

impl PanelSession {
    pub fn new(config: &PanelForgeConfig) -> Self {
        Self {
            uk_ids: Vec::new(),
            au_ids: Vec::new(),
            internal_ids: Vec::new(),
            // Green-only is the clinically conservative default.
            confidence_filter: [3u8].into(),
            manual_genes_text: String::new(),
            suggestions: SuggestionSessionState::new(),
            config: PanelForgeConfigSnapshot {
                manual_gene_confidence: config.manual_gene_confidence,
                min_keyword_score: config.min_keyword_score,
                max_keywords: config.max_keywords,
            },
        }
    }

    /// All panel selections, in stable origin order.
    pub fn selections(&self) -> Vec<PanelSelection> {
        let mut selections = Vec::new();
        for &panel_id in &self.uk_ids {
            selections.push(PanelSelection {
                origin: Origin::Uk,
                panel_id,
            });
        }
        for &panel_id in &self.au_ids {
            selections.push(PanelSelection {
                origin: Origin::Au,
                panel_id,
            });
        }
        for &panel_id in &self.internal_ids {
            selections.push(PanelSelection {
                origin: Origin::Internal,
                panel_id,
            });
        }
        selections
    }

    /// Manual symbols: newline-split, trimmed, uppercased, first-seen order.
    pub fn manual_gene_list(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        self.manual_genes_text
            .lines()
            .map(|line| line.trim().to_uppercase())
            .filter(|symbol| !symbol.is_empty())
            .filter(|symbol| seen.insert(symbol.clone()))
            .collect()
    }

    pub fn has_selection(&self) -> bool {
        !self.selections().is_empty() || !self.manual_gene_list().is_empty()
    }

    /// Fetch everything selected and aggregate into the final table.
    /// An empty selection yields an explicit empty table.
    pub fn build_table(&self, adapter: &PanelSourceAdapter) -> AggregatedGeneTable {
        let fetched = adapter.fetch_selected(&self.selections());
        aggregate(
            &fetched,
            &self.confidence_filter,
            &self.manual_gene_list(),
            self.config.manual_gene_confidence,
        )
    }

    /// Export summary string for the current selection.
    pub fn export_summary(&self, adapter: &PanelSourceAdapter) -> String {
        let fetched = adapter.fetch_selected(&self.selections());
        generate_summary(&fetched, &self.confidence_filter, &self.manual_gene_list())
    }

    /// One suggestion round: panel names → keywords → ranked suggestions,
    /// with each empty stage mapped to its own user-facing state.
    pub fn suggestion_round(
        &self,
        adapter: &PanelSourceAdapter,
        engine: &SuggestionEngine,
        max_per_keyword: usize,
    ) -> SuggestionOutcome {
        let selections = self.selections();
        if selections.is_empty() {
            return SuggestionOutcome::NoPanelsSelected;
        }

        let fetched = adapter.fetch_selected(&selections);
        let panel_names: Vec<String> = fetched
            .iter()
            .map(|p| p.source.panel_name.clone())
            .filter(|name| !name.is_empty())
            .collect();
        if panel_names.is_empty() {
            return SuggestionOutcome::NoPanelNames;
        }

        let extractor = KeywordExtractor::new(
            engine.dictionary(),
            self.config.min_keyword_score,
            self.config.max_keywords,
        );
        let keywords = extractor.extract(&panel_names);
        if keywords.is_empty() {
            return SuggestionOutcome::NoKeywords;
        }

        let suggestions = engine.suggest(
            &keywords,
            &self.suggestions.exclusion_set(),
            max_per_keyword,
        );
        if suggestions.is_empty() {
            return SuggestionOutcome::AllReviewed;
        }
        SuggestionOutcome::Ready(suggestions)
    }

    /// Accept a suggested term, resolving its display name if needed.
    pub fn accept_term(&mut self, engine: &SuggestionEngine, term_id: &str) -> bool {
        if self.suggestions.accepted().contains(term_id) {
            return false;
        }
        let details = engine.term_details_cached(term_id);
        self.suggestions.accept(term_id, &details.name)
    }

    pub fn reject_term(&mut self, term_id: &str) -> bool {
        self.suggestions.reject(term_id)
    }

    /// Re-surface previously skipped suggestions.
    pub fn reset_suggestions(&mut self) {
        self.suggestions.reset_rejected();
    }

    /// Pre-populate phenotype terms embedded in the AU panels' disorder
    /// metadata. Returns the number of newly added terms.
    pub fn auto_generate_from_panels(
        &mut self,
        adapter: &PanelSourceAdapter,
        engine: &SuggestionEngine,
    ) -> usize {
        let mut term_ids: Vec<String> = Vec::new();
        for &panel_id in &self.au_ids {
            for term_id in adapter.panel_disorders(Origin::Au, panel_id) {
                if !term_ids.contains(&term_id) {
                    term_ids.push(term_id);
                }
            }
        }
        if term_ids.is_empty() {
            return 0;
        }
        let before = self.suggestions.accepted().len();
        let details = engine.resolve_terms(&term_ids);
        self.suggestions.auto_populate(&details);
        self.suggestions.accepted().len() - before
    }

    /// Full session reset: selections, filter, manual genes, feedback state.
    pub fn reset(&mut self) {
        self.uk_ids.clear();
        self.au_ids.clear();
        self.internal_ids.clear();
        self.confidence_filter = [3u8].into();
        self.manual_genes_text.clear();
        self.suggestions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hpo::dictionary::MedicalTermMap;
    use crate::hpo::ontology::MockOntologyClient;
    use crate::models::{GeneRecord, PanelMetadata};
    use crate::registry::local::LocalPanelStore;
    use crate::registry::remote::{MockPanelRegistry, PanelDetail};

    fn epilepsy_detail() -> PanelDetail {
        PanelDetail {
            rows: vec![
                GeneRecord::bare("SCN1A", 3),
                GeneRecord::bare("DEPDC5", 2),
            ],
            metadata: PanelMetadata {
                id: Some(285),
                name: "Genetic Epilepsy".into(),
                version: Some("4.1".into()),
                ..PanelMetadata::default()
            },
            relevant_disorders: vec!["Epileptic encephalopathy HP:0001250".into()],
        }
    }

    fn adapter_with_uk(uk: MockPanelRegistry, au: MockPanelRegistry) -> PanelSourceAdapter {
        PanelSourceAdapter::with_clients(
            Box::new(uk),
            Box::new(au),
            LocalPanelStore::new(std::env::temp_dir().join("panelforge-session-tests")),
            &PanelForgeConfig::default(),
        )
    }

    fn test_engine() -> SuggestionEngine {
        let ontology = MockOntologyClient::new()
            .with_term("HP:0001250", "Seizure", "def")
            .with_term("HP:0002197", "Generalized-onset seizure", "def")
            .with_search("epilepsy", vec![("HP:0011097", "Epileptic spasm")]);
        SuggestionEngine::with_client(
            &PanelForgeConfig::default(),
            Box::new(ontology),
            MedicalTermMap::fixture(),
        )
    }

    #[test]
    fn empty_session_yields_no_panels_state_and_empty_table() {
        let cfg = PanelForgeConfig::default();
        let session = PanelSession::new(&cfg);
        let adapter = adapter_with_uk(MockPanelRegistry::new(), MockPanelRegistry::new());
        let engine = test_engine();

        assert!(!session.has_selection());
        assert!(session.build_table(&adapter).is_empty());
        assert_eq!(
            session.suggestion_round(&adapter, &engine, 4),
            SuggestionOutcome::NoPanelsSelected
        );
    }

    #[test]
    fn manual_only_session_builds_table_without_fetches() {
        let cfg = PanelForgeConfig::default();
        let mut session = PanelSession::new(&cfg);
        session.manual_genes_text = "tp53\nTP53\n asxl1 \n".into();
        let adapter = adapter_with_uk(MockPanelRegistry::new(), MockPanelRegistry::new());

        let table = session.build_table(&adapter);
        assert_eq!(table.gene_symbols(), vec!["ASXL1", "TP53"]);
    }

    #[test]
    fn full_round_trip_suggestion_flow() {
        let cfg = PanelForgeConfig::default();
        let mut session = PanelSession::new(&cfg);
        session.uk_ids = vec![285];
        let adapter = adapter_with_uk(
            MockPanelRegistry::new().with_panel(285, epilepsy_detail()),
            MockPanelRegistry::new(),
        );
        let engine = test_engine();

        // Round 1: dictionary terms surface first.
        let outcome = session.suggestion_round(&adapter, &engine, 4);
        let suggestions = match outcome {
            SuggestionOutcome::Ready(s) => s,
            other => panic!("Expected Ready, got: {other:?}"),
        };
        assert_eq!(suggestions[0].term_id, "HP:0001250");

        // Accept one, reject one; neither may reappear.
        assert!(session.accept_term(&engine, "HP:0001250"));
        assert!(session.reject_term("HP:0002197"));
        let outcome = session.suggestion_round(&adapter, &engine, 4);
        if let SuggestionOutcome::Ready(suggestions) = &outcome {
            assert!(suggestions
                .iter()
                .all(|s| s.term_id != "HP:0001250" && s.term_id != "HP:0002197"));
        } else {
            panic!("Expected Ready, got: {outcome:?}");
        }

        // Exhaust the rest, then reset re-surfaces only the rejected term.
        session.reject_term("HP:0011097");
        assert_eq!(
            session.suggestion_round(&adapter, &engine, 4),
            SuggestionOutcome::AllReviewed
        );
        session.reset_suggestions();
        if let SuggestionOutcome::Ready(suggestions) =
            session.suggestion_round(&adapter, &engine, 4)
        {
            assert!(suggestions.iter().any(|s| s.term_id == "HP:0002197"));
            assert!(suggestions.iter().all(|s| s.term_id != "HP:0001250"));
        } else {
            panic!("Expected Ready after reset");
        }
    }

    #[test]
    fn accept_term_resolves_name_and_is_idempotent() {
        let cfg = PanelForgeConfig::default();
        let mut session = PanelSession::new(&cfg);
        let engine = test_engine();

        assert!(session.accept_term(&engine, "HP:0001250"));
        assert!(!session.accept_term(&engine, "HP:0001250"));
        assert_eq!(session.suggestions.term_name("HP:0001250"), Some("Seizure"));
    }

    #[test]
    fn auto_generate_pulls_disorder_terms_from_au_panels() {
        let cfg = PanelForgeConfig::default();
        let mut session = PanelSession::new(&cfg);
        session.au_ids = vec![250];
        let adapter = adapter_with_uk(
            MockPanelRegistry::new(),
            MockPanelRegistry::new().with_panel(250, epilepsy_detail()),
        );
        let engine = test_engine();

        let added = session.auto_generate_from_panels(&adapter, &engine);
        assert_eq!(added, 1);
        assert!(session.suggestions.is_auto_generated("HP:0001250"));
        assert_eq!(session.suggestions.term_name("HP:0001250"), Some("Seizure"));

        // A fresh round must not re-suggest the auto-generated term.
        let outcome = session.suggestion_round(&adapter, &engine, 4);
        if let SuggestionOutcome::Ready(suggestions) = outcome {
            assert!(suggestions.iter().all(|s| s.term_id != "HP:0001250"));
        }
    }

    #[test]
    fn failed_panel_names_map_to_no_panel_names_state() {
        let cfg = PanelForgeConfig::default();
        let mut session = PanelSession::new(&cfg);
        session.uk_ids = vec![285];
        let adapter = adapter_with_uk(MockPanelRegistry::failing(), MockPanelRegistry::new());
        let engine = test_engine();

        assert_eq!(
            session.suggestion_round(&adapter, &engine, 4),
            SuggestionOutcome::NoPanelNames
        );
    }

    #[test]
    fn boilerplate_only_names_map_to_no_keywords_state() {
        let cfg = PanelForgeConfig::default();
        let mut session = PanelSession::new(&cfg);
        session.uk_ids = vec![7];
        let detail = PanelDetail {
            rows: vec![],
            metadata: PanelMetadata {
                id: Some(7),
                name: "Comprehensive gene panel".into(),
                version: None,
                ..PanelMetadata::default()
            },
            relevant_disorders: vec![],
        };
        let adapter = adapter_with_uk(
            MockPanelRegistry::new().with_panel(7, detail),
            MockPanelRegistry::new(),
        );
        let engine = test_engine();

        assert_eq!(
            session.suggestion_round(&adapter, &engine, 4),
            SuggestionOutcome::NoKeywords
        );
    }

    #[test]
    fn reset_restores_pristine_session() {
        let cfg = PanelForgeConfig::default();
        let mut session = PanelSession::new(&cfg);
        session.uk_ids = vec![285];
        session.manual_genes_text = "BRCA1".into();
        session.confidence_filter = [3u8, 2].into();
        session.suggestions.reject("HP:0001250");

        session.reset();
        assert!(!session.has_selection());
        assert_eq!(session.confidence_filter, BTreeSet::from([3u8]));
        assert!(session.suggestions.rejected().is_empty());
    }
}

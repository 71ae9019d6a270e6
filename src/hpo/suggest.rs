//! Keyword-driven HPO suggestion engine.
//!
//! Three passes per keyword, in strictly falling relevance: direct dictionary
//! mapping, live ontology search, and lexical variations of the keyword when
//! the first two passes come up short. Term ids are deduplicated across the
//! whole call (a term suggested for one keyword is never re-suggested for a
//! later one), and anything in the caller's exclusion set (already accepted,
//! rejected, or auto-generated) is skipped outright.

use std::collections::BTreeSet;

use crate::config::PanelForgeConfig;
use crate::hpo::dictionary::MedicalTermMap;
use crate::hpo::ontology::{fetch_terms_parallel, HttpOntologyClient, OntologyClient};
use crate::keywords::Keyword;
use crate::models::{HpoSuggestion, SuggestionSource, TermDetails};
use crate::registry::cache::BoundedCache;

/// Outcome of one suggestion round, one state per distinct user-facing
/// message. `Failed` is the catch-all the embedding layer maps its own
/// rendering failures into; the engine itself degrades per keyword instead.
#[derive(Debug, Clone, PartialEq)]
pub enum SuggestionOutcome {
    NoPanelsSelected,
    NoPanelNames,
    NoKeywords,
    AllReviewed,
    Ready(Vec<HpoSuggestion>),
    Failed(String),
}

impl SuggestionOutcome {
    /// Human-readable status line for the non-Ready states.
    pub fn message(&self) -> String {
        match self {
            SuggestionOutcome::NoPanelsSelected => {
                "Select panels to see intelligent HPO suggestions".into()
            }
            SuggestionOutcome::NoPanelNames => {
                "No panel names found - check panel selections".into()
            }
            SuggestionOutcome::NoKeywords => {
                "No relevant medical keywords found in panel names".into()
            }
            SuggestionOutcome::AllReviewed => "All HPO suggestions reviewed!".into(),
            SuggestionOutcome::Ready(suggestions) => {
                format!("{} suggestions available", suggestions.len())
            }
            SuggestionOutcome::Failed(reason) => format!("Error loading HPO suggestions: {reason}"),
        }
    }
}

pub struct SuggestionEngine {
    ontology: Box<dyn OntologyClient>,
    dictionary: MedicalTermMap,
    term_cache: BoundedCache<String, TermDetails>,
    max_keywords_per_call: usize,
    page_size: usize,
    term_fetch_workers: usize,
}

impl SuggestionEngine {
    pub fn new(config: &PanelForgeConfig, dictionary: MedicalTermMap) -> Self {
        Self::with_client(
            config,
            Box::new(HttpOntologyClient::new(
                &config.ontology_base_url,
                config.ontology_timeout_secs,
            )),
            dictionary,
        )
    }

    /// Construct with an injected client (tests use mocks here).
    pub fn with_client(
        config: &PanelForgeConfig,
        ontology: Box<dyn OntologyClient>,
        dictionary: MedicalTermMap,
    ) -> Self {
        Self {
            ontology,
            dictionary,
            term_cache: BoundedCache::new(config.term_cache_capacity),
            max_keywords_per_call: config.max_keywords_per_suggest,
            page_size: config.search_page_size,
            term_fetch_workers: config.term_fetch_workers,
        }
    }

    pub fn dictionary(&self) -> &MedicalTermMap {
        &self.dictionary
    }

    /// Produce ranked, deduplicated suggestions for the given keywords.
    ///
    /// `exclude_term_ids` carries the session's accepted, rejected, and
    /// auto-generated ids; none of them ever reappears in the output.
    pub fn suggest(
        &self,
        keywords: &[Keyword],
        exclude_term_ids: &BTreeSet<String>,
        max_per_keyword: usize,
    ) -> Vec<HpoSuggestion> {
        let mut seen: BTreeSet<String> = BTreeSet::new();
        let mut suggestions: Vec<HpoSuggestion> = Vec::new();

        for keyword in keywords.iter().take(self.max_keywords_per_call) {
            let before = suggestions.len();

            // Pass 1: direct dictionary mapping.
            for term_id in self.dictionary.terms_for(&keyword.token) {
                if exclude_term_ids.contains(term_id) || !seen.insert(term_id.clone()) {
                    continue;
                }
                let details = self.term_details_cached(term_id);
                suggestions.push(HpoSuggestion::new(
                    term_id.clone(),
                    details.name,
                    keyword.token.clone(),
                    SuggestionSource::Mapping,
                ));
            }

            // Pass 2: live search.
            let mut emitted = 0usize;
            for hit in self.search_all_pages(&keyword.token) {
                if emitted >= max_per_keyword {
                    break;
                }
                if exclude_term_ids.contains(&hit.id) || !seen.insert(hit.id.clone()) {
                    continue;
                }
                suggestions.push(HpoSuggestion::new(
                    hit.id,
                    hit.name,
                    keyword.token.clone(),
                    SuggestionSource::Database,
                ));
                emitted += 1;
            }

            // Pass 3: lexical variations, only when the keyword is short of
            // its target count.
            if suggestions.len() - before < max_per_keyword {
                'variations: for variant in lexical_variations(&keyword.token) {
                    for hit in self.search_first_page(&variant) {
                        if suggestions.len() - before >= max_per_keyword {
                            break 'variations;
                        }
                        if exclude_term_ids.contains(&hit.id) || !seen.insert(hit.id.clone()) {
                            continue;
                        }
                        suggestions.push(HpoSuggestion::new(
                            hit.id,
                            hit.name,
                            keyword.token.clone(),
                            SuggestionSource::Variation,
                        ));
                    }
                }
            }
        }

        // Deterministic final order: relevance, then longer (more specific)
        // keywords, then term id.
        suggestions.sort_by(|a, b| {
            b.relevance
                .cmp(&a.relevance)
                .then_with(|| b.origin_keyword.len().cmp(&a.origin_keyword.len()))
                .then_with(|| a.term_id.cmp(&b.term_id))
        });
        suggestions
    }

    /// Resolve term details in parallel with placeholder fallbacks.
    pub fn resolve_terms(&self, term_ids: &[String]) -> Vec<TermDetails> {
        fetch_terms_parallel(
            self.ontology.as_ref(),
            &self.term_cache,
            term_ids,
            self.term_fetch_workers,
        )
    }

    /// Memoized single-term detail lookup with placeholder fallback.
    pub fn term_details_cached(&self, term_id: &str) -> TermDetails {
        self.term_cache.get_or_fetch(term_id.to_string(), || {
            match self.ontology.term_details(term_id) {
                Ok(details) => details,
                Err(e) => {
                    tracing::error!("Failed to fetch HPO term {term_id}: {e}");
                    TermDetails::placeholder(term_id)
                }
            }
        })
    }

    /// Bulk invalidation, called by the external scheduled refresh.
    pub fn clear_caches(&self) {
        self.term_cache.clear();
    }

    /// First page plus a second when the first is full. Network failure is
    /// logged and treated as no hits for this keyword.
    fn search_all_pages(&self, query: &str) -> Vec<crate::hpo::ontology::TermHit> {
        let mut hits = match self.ontology.search(query, 0, self.page_size) {
            Ok(hits) => hits,
            Err(e) => {
                tracing::error!("Error searching HPO terms for keyword '{query}': {e}");
                return Vec::new();
            }
        };
        if hits.len() == self.page_size {
            match self.ontology.search(query, 1, self.page_size) {
                Ok(more) => hits.extend(more),
                Err(e) => {
                    tracing::error!("Error fetching page 2 for keyword '{query}': {e}");
                }
            }
        }
        hits
    }

    fn search_first_page(&self, query: &str) -> Vec<crate::hpo::ontology::TermHit> {
        match self.ontology.search(query, 0, self.page_size) {
            Ok(hits) => hits,
            Err(e) => {
                tracing::error!("Error searching HPO variation '{query}': {e}");
                Vec::new()
            }
        }
    }
}

/// Lexical variations of a keyword: pluralization toggle and common medical
/// suffix substitutions. The original token is never included.
pub fn lexical_variations(token: &str) -> Vec<String> {
    let mut variants: Vec<String> = Vec::new();
    let mut push = |candidate: String| {
        if candidate != token && !variants.contains(&candidate) {
            variants.push(candidate);
        }
    };

    match token.strip_suffix('s') {
        Some(singular) if !singular.is_empty() => push(singular.to_string()),
        _ => push(format!("{token}s")),
    }

    const SUFFIX_SUBS: &[(&str, &str)] = &[
        ("ical", "ic"),
        ("ic", "ical"),
        ("osis", "otic"),
        ("otic", "osis"),
        ("pathy", "pathic"),
        ("pathic", "pathy"),
    ];
    for (from, to) in SUFFIX_SUBS {
        if let Some(stem) = token.strip_suffix(from) {
            if !stem.is_empty() {
                push(format!("{stem}{to}"));
            }
            // First matching suffix wins; "ical" is listed before "ic" so the
            // longer suffix is preferred.
            break;
        }
    }

    variants
}

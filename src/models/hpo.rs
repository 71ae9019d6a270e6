use serde::{Deserialize, Serialize};

/// Where a suggested term came from. Relevance ranks dictionary hits above
/// live-search hits above lexical-variation hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionSource {
    Mapping,
    Database,
    Variation,
}

impl SuggestionSource {
    pub fn relevance(&self) -> u8 {
        match self {
            SuggestionSource::Mapping => 10,
            SuggestionSource::Database => 7,
            SuggestionSource::Variation => 5,
        }
    }
}

/// A candidate ontology term surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HpoSuggestion {
    pub term_id: String,
    pub term_name: String,
    /// The extracted keyword that produced this suggestion.
    pub origin_keyword: String,
    pub source: SuggestionSource,
    pub relevance: u8,
}

impl HpoSuggestion {
    pub fn new(
        term_id: impl Into<String>,
        term_name: impl Into<String>,
        origin_keyword: impl Into<String>,
        source: SuggestionSource,
    ) -> Self {
        Self {
            term_id: term_id.into(),
            term_name: term_name.into(),
            origin_keyword: origin_keyword.into(),
            source,
            relevance: source.relevance(),
        }
    }

    /// Display label in the `Name (HP:NNNNNNN)` form the dropdown layer uses.
    pub fn label(&self) -> String {
        format!("{} ({})", self.term_name, self.term_id)
    }
}

/// Resolved detail for one ontology term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermDetails {
    pub id: String,
    pub name: String,
    pub definition: String,
}

impl TermDetails {
    /// Fallback used when a term's detail fetch fails: the id stands in for
    /// the name so downstream display never breaks on a missing term.
    pub fn placeholder(term_id: &str) -> Self {
        Self {
            id: term_id.to_string(),
            name: term_id.to_string(),
            definition: "Unable to fetch definition".into(),
        }
    }
}

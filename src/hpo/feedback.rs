//! Suggestion feedback loop.
//!
//! Per-session record of what the user did with suggested terms. Accepted
//! terms mirror the chosen-term list, rejected terms are suppressed from
//! later suggestion rounds, and auto-generated terms (pre-populated from
//! panel disorder metadata) are excluded so the engine never recommends a
//! term the system already added. All transitions are idempotent.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::models::TermDetails;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestionSessionState {
    accepted: BTreeSet<String>,
    rejected: BTreeSet<String>,
    auto_generated: BTreeSet<String>,
    /// Resolved display names for accepted/auto-generated terms.
    names: BTreeMap<String, String>,
}

impl SuggestionSessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a term. Returns false (no-op) when already accepted.
    pub fn accept(&mut self, term_id: &str, term_name: &str) -> bool {
        if !self.accepted.insert(term_id.to_string()) {
            return false;
        }
        self.names.insert(term_id.to_string(), term_name.to_string());
        true
    }

    /// Reject a term; it never reappears in suggestions until a reset.
    /// Idempotent.
    pub fn reject(&mut self, term_id: &str) -> bool {
        self.rejected.insert(term_id.to_string())
    }

    /// Clear rejections only; accepted terms are untouched. Lets the user
    /// re-surface previously skipped suggestions after exhausting the list.
    pub fn reset_rejected(&mut self) {
        self.rejected.clear();
    }

    /// Full session reset.
    pub fn clear(&mut self) {
        self.accepted.clear();
        self.rejected.clear();
        self.auto_generated.clear();
        self.names.clear();
    }

    /// Pre-populate terms derived from panel metadata. They count as
    /// accepted and carry the auto-generated marker.
    pub fn auto_populate(&mut self, terms: &[TermDetails]) {
        for term in terms {
            self.auto_generated.insert(term.id.clone());
            if self.accepted.insert(term.id.clone()) {
                self.names.insert(term.id.clone(), term.name.clone());
            }
        }
    }

    /// Everything the suggestion engine must not re-suggest.
    pub fn exclusion_set(&self) -> BTreeSet<String> {
        let mut set = self.accepted.clone();
        set.extend(self.rejected.iter().cloned());
        set.extend(self.auto_generated.iter().cloned());
        set
    }

    pub fn accepted(&self) -> &BTreeSet<String> {
        &self.accepted
    }

    pub fn rejected(&self) -> &BTreeSet<String> {
        &self.rejected
    }

    pub fn is_auto_generated(&self, term_id: &str) -> bool {
        self.auto_generated.contains(term_id)
    }

    pub fn term_name(&self, term_id: &str) -> Option<&str> {
        self.names.get(term_id).map(String::as_str)
    }

    /// Accepted terms with their resolved names, in id order.
    pub fn accepted_terms(&self) -> Vec<(String, String)> {
        self.accepted
            .iter()
            .map(|id| {
                let name = self.names.get(id).cloned().unwrap_or_else(|| id.clone());
                (id.clone(), name)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accept_is_idempotent() {
        let mut state = SuggestionSessionState::new();
        assert!(state.accept("HP:0001250", "Seizure"));
        assert!(!state.accept("HP:0001250", "Seizure"));
        assert_eq!(state.accepted().len(), 1);
        assert_eq!(state.term_name("HP:0001250"), Some("Seizure"));
    }

    #[test]
    fn reject_is_idempotent_and_excluded() {
        let mut state = SuggestionSessionState::new();
        assert!(state.reject("HP:0000252"));
        assert!(!state.reject("HP:0000252"));
        assert!(state.exclusion_set().contains("HP:0000252"));
    }

    #[test]
    fn reset_clears_rejected_but_keeps_accepted() {
        let mut state = SuggestionSessionState::new();
        state.accept("HP:0001250", "Seizure");
        state.reject("HP:0000252");
        state.reset_rejected();

        assert!(state.rejected().is_empty());
        assert_eq!(state.accepted().len(), 1);
        assert!(state.exclusion_set().contains("HP:0001250"));
        assert!(!state.exclusion_set().contains("HP:0000252"));
    }

    #[test]
    fn auto_populated_terms_are_accepted_and_marked() {
        let mut state = SuggestionSessionState::new();
        state.auto_populate(&[
            TermDetails {
                id: "HP:0001250".into(),
                name: "Seizure".into(),
                definition: String::new(),
            },
            TermDetails {
                id: "HP:0001251".into(),
                name: "Ataxia".into(),
                definition: String::new(),
            },
        ]);

        assert_eq!(state.accepted().len(), 2);
        assert!(state.is_auto_generated("HP:0001250"));
        let exclusion = state.exclusion_set();
        assert!(exclusion.contains("HP:0001250"));
        assert!(exclusion.contains("HP:0001251"));
    }

    #[test]
    fn auto_populate_does_not_overwrite_user_accepted_name() {
        let mut state = SuggestionSessionState::new();
        state.accept("HP:0001250", "Seizure");
        state.auto_populate(&[TermDetails::placeholder("HP:0001250")]);
        assert_eq!(state.term_name("HP:0001250"), Some("Seizure"));
        assert!(state.is_auto_generated("HP:0001250"));
    }

    #[test]
    fn accepted_terms_fall_back_to_id_for_unresolved_names() {
        let mut state = SuggestionSessionState::new();
        state.accept("HP:0009999", "HP:0009999");
        let terms = state.accepted_terms();
        assert_eq!(terms, vec![("HP:0009999".to_string(), "HP:0009999".to_string())]);
    }

    #[test]
    fn clear_resets_everything() {
        let mut state = SuggestionSessionState::new();
        state.accept("HP:0001250", "Seizure");
        state.reject("HP:0000252");
        state.clear();
        assert_eq!(state, SuggestionSessionState::default());
    }
}

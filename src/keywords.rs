//! Medical keyword extraction from panel names.
//!
//! Panel names are the only free text available for phenotype suggestion, so
//! extraction is aggressive about discarding boilerplate: generic panel
//! vocabulary, version tokens, and anything shorter than three letters.
//! Surviving tokens are scored against the medical-term dictionary and
//! accumulated across names, so a term repeated across the selected panels
//! outranks a one-off.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::hpo::dictionary::MedicalTermMap;

/// Generic panel/boilerplate vocabulary excluded from keyword output.
const STOP_WORDS: &[&str] = &[
    "panel",
    "gene",
    "genes",
    "list",
    "testing",
    "analysis",
    "version",
    "updated",
    "comprehensive",
    "extended",
    "broad",
    "focused",
    "clinical",
    "diagnostic",
    "genomic",
    "inherited",
    "familial",
    "congenital",
    "syndrome",
    "syndromes",
    "disorder",
    "disorders",
    "disease",
    "diseases",
    "condition",
    "conditions",
    "defect",
    "defects",
    "abnormality",
    "abnormalities",
];

const DICTIONARY_BONUS: u32 = 5;
const LENGTH_BONUS: u32 = 1;
const LENGTH_BONUS_THRESHOLD: usize = 6;

/// A normalized token with its accumulated relevance score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    pub token: String,
    pub score: u32,
}

pub struct KeywordExtractor<'a> {
    dictionary: &'a MedicalTermMap,
    min_score: u32,
    max_keywords: usize,
}

impl<'a> KeywordExtractor<'a> {
    pub fn new(dictionary: &'a MedicalTermMap, min_score: u32, max_keywords: usize) -> Self {
        Self {
            dictionary,
            min_score,
            max_keywords,
        }
    }

    /// Extract ranked keywords from the selected panel names.
    pub fn extract(&self, panel_names: &[String]) -> Vec<Keyword> {
        let token_pattern = Regex::new(r"[a-z]{3,}").unwrap();
        let mut scores: std::collections::BTreeMap<String, u32> = std::collections::BTreeMap::new();

        for name in panel_names {
            if name.is_empty() {
                continue;
            }
            let cleaned: String = name
                .to_lowercase()
                .chars()
                .map(|c| {
                    if matches!(c, '_' | '-' | '/' | ',' | ';' | ':' | '(' | ')' | '&') {
                        ' '
                    } else {
                        c
                    }
                })
                .collect();

            for m in token_pattern.find_iter(&cleaned) {
                let token = m.as_str();
                if STOP_WORDS.contains(&token) {
                    continue;
                }
                *scores.entry(token.to_string()).or_insert(0) += self.score_token(token);
            }
        }

        let mut keywords: Vec<Keyword> = scores
            .into_iter()
            .map(|(token, score)| Keyword { token, score })
            .filter(|k| k.score >= self.min_score)
            .collect();
        // BTreeMap iteration already orders tokens ascending; the stable sort
        // keeps that as the tie-break.
        keywords.sort_by(|a, b| b.score.cmp(&a.score));
        keywords.truncate(self.max_keywords);
        keywords
    }

    fn score_token(&self, token: &str) -> u32 {
        let mut score = 1;
        if self.dictionary.contains(token) {
            score += DICTIONARY_BONUS;
        }
        if token.len() >= LENGTH_BONUS_THRESHOLD {
            score += LENGTH_BONUS;
        }
        score
    }
}

//! Static medical-term → HPO-id mapping.
//!
//! An immutable, injected lookup table: keys are lowercased medical keywords,
//! values the ontology term ids they map to directly. Dictionary hits outrank
//! live search results in the suggestion engine, and membership contributes
//! the +5 keyword-score bonus. The table can be replaced wholesale from a
//! JSON file; the built-in default covers the common clinical panel
//! vocabulary.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::FetchError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MedicalTermMap {
    map: BTreeMap<String, Vec<String>>,
}

impl MedicalTermMap {
    /// Load a `{ "term": ["HP:..."] }` JSON table.
    pub fn load(path: &Path) -> Result<Self, FetchError> {
        let json = std::fs::read_to_string(path)?;
        let raw: BTreeMap<String, Vec<String>> =
            serde_json::from_str(&json).map_err(|e| FetchError::ResponseParsing(e.to_string()))?;
        Ok(Self::from_entries(raw))
    }

    fn from_entries(raw: BTreeMap<String, Vec<String>>) -> Self {
        let map = raw
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v))
            .collect();
        Self { map }
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.map.contains_key(&keyword.to_lowercase())
    }

    pub fn terms_for(&self, keyword: &str) -> &[String] {
        self.map
            .get(&keyword.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Built-in default table.
    pub fn builtin() -> Self {
        let entries: &[(&str, &[&str])] = &[
            ("anemia", &["HP:0001903"]),
            ("arrhythmia", &["HP:0011675"]),
            ("ataxia", &["HP:0001251"]),
            ("autism", &["HP:0000717"]),
            ("blindness", &["HP:0000618"]),
            ("cardiomyopathy", &["HP:0001638"]),
            ("cataract", &["HP:0000518"]),
            ("deafness", &["HP:0000365"]),
            ("dementia", &["HP:0000726"]),
            ("diabetes", &["HP:0000819"]),
            ("dystonia", &["HP:0001332"]),
            ("encephalopathy", &["HP:0001298"]),
            ("epilepsy", &["HP:0001250", "HP:0002197"]),
            ("hearing", &["HP:0000365"]),
            ("hypotonia", &["HP:0001252"]),
            ("ichthyosis", &["HP:0008064"]),
            ("immunodeficiency", &["HP:0002721"]),
            ("intellectual", &["HP:0001249"]),
            ("leukodystrophy", &["HP:0002415"]),
            ("macrocephaly", &["HP:0000256"]),
            ("microcephaly", &["HP:0000252"]),
            ("myopathy", &["HP:0003198"]),
            ("nephropathy", &["HP:0000112"]),
            ("neuropathy", &["HP:0009830"]),
            ("nystagmus", &["HP:0000639"]),
            ("obesity", &["HP:0001513"]),
            ("osteoporosis", &["HP:0000939"]),
            ("parkinsonism", &["HP:0001300"]),
            ("retinopathy", &["HP:0000488"]),
            ("scoliosis", &["HP:0002650"]),
            ("seizure", &["HP:0001250"]),
            ("seizures", &["HP:0001250"]),
            ("spasticity", &["HP:0001257"]),
            ("thrombocytopenia", &["HP:0001873"]),
        ];
        Self {
            map: entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.iter().map(|s| s.to_string()).collect()))
                .collect(),
        }
    }

    /// Small fixture table for tests (no file I/O).
    pub fn fixture() -> Self {
        let mut map = BTreeMap::new();
        map.insert(
            "epilepsy".to_string(),
            vec!["HP:0001250".to_string(), "HP:0002197".to_string()],
        );
        map.insert("seizures".to_string(), vec!["HP:0001250".to_string()]);
        map.insert("ataxia".to_string(), vec!["HP:0001251".to_string()]);
        map.insert(
            "cardiomyopathy".to_string(),
            vec!["HP:0001638".to_string()],
        );
        Self { map }
    }
}

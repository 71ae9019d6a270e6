//! HTTP clients for the two remote panel registries.
//!
//! Both registries speak the same PanelApp-style API: a paginated list
//! endpoint (`GET /panels/` chasing `next` links) and a per-panel detail
//! endpoint with nested `gene_data` objects. The client flattens those into
//! [`GeneRecord`]s, normalizing confidence on the way in and rendering
//! OMIM/HGNC identifiers as markdown links; the rendered gene table consumes
//! those links as-is, so the format is an external contract.

use regex::Regex;
use serde::Deserialize;

use crate::confidence;
use crate::error::FetchError;
use crate::models::{GeneRecord, PanelListEntry, PanelMetadata};

/// A fetched panel: flattened gene rows, display metadata, and the raw
/// disorder strings (scanned later for embedded HP ids).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelDetail {
    pub rows: Vec<GeneRecord>,
    pub metadata: PanelMetadata,
    pub relevant_disorders: Vec<String>,
}

/// One remote registry. Implemented by the HTTP client and by test mocks.
pub trait PanelRegistryClient: Send + Sync {
    fn list_panels(&self) -> Result<Vec<PanelListEntry>, FetchError>;
    fn panel_detail(&self, panel_id: u32) -> Result<PanelDetail, FetchError>;
}

// ─── Wire schema ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct PanelListPage {
    #[serde(default)]
    results: Vec<PanelListEntry>,
    next: Option<String>,
}

#[derive(Deserialize)]
struct PanelDetailResponse {
    id: Option<u32>,
    name: Option<String>,
    version: Option<String>,
    #[serde(default)]
    status: String,
    #[serde(default)]
    disease_group: String,
    #[serde(default)]
    disease_sub_group: String,
    #[serde(default)]
    genes: Vec<GeneEntry>,
    #[serde(default)]
    relevant_disorders: Vec<String>,
}

#[derive(Deserialize)]
struct GeneEntry {
    gene_data: Option<GeneData>,
    #[serde(default)]
    entity_type: String,
    #[serde(default)]
    mode_of_inheritance: String,
    /// Registries emit this as a string ("3") or a number; accept both.
    confidence_level: Option<serde_json::Value>,
}

#[derive(Deserialize, Default)]
struct GeneData {
    #[serde(default)]
    gene_symbol: String,
    #[serde(default)]
    hgnc_id: String,
    #[serde(default)]
    omim_gene: Vec<String>,
    #[serde(default)]
    biotype: String,
}

// ─── Link formatting (external table contract) ───────────────────────────────

fn format_omim_links(omim_ids: &[String]) -> String {
    let links: Vec<String> = omim_ids
        .iter()
        .filter(|id| !id.is_empty())
        .map(|id| format!("[{id}](https://omim.org/entry/{id})"))
        .collect();
    links.join(" | ")
}

fn format_hgnc_link(hgnc_id: &str) -> String {
    if hgnc_id.is_empty() {
        return String::new();
    }
    format!("[{hgnc_id}](https://www.genenames.org/data/gene-symbol-report/#!/hgnc_id/{hgnc_id})")
}

fn raw_confidence(value: Option<&serde_json::Value>) -> String {
    match value {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

impl PanelDetailResponse {
    fn into_detail(self) -> PanelDetail {
        let rows = self
            .genes
            .into_iter()
            .map(|g| {
                let data = g.gene_data.unwrap_or_default();
                GeneRecord {
                    gene_symbol: data.gene_symbol,
                    confidence_level: confidence::normalize(&raw_confidence(
                        g.confidence_level.as_ref(),
                    )),
                    omim_id: format_omim_links(&data.omim_gene),
                    hgnc_id: format_hgnc_link(&data.hgnc_id),
                    entity_type: g.entity_type,
                    biotype: data.biotype,
                    mode_of_inheritance: g.mode_of_inheritance,
                }
            })
            .collect();

        PanelDetail {
            rows,
            metadata: PanelMetadata {
                id: self.id,
                name: self.name.unwrap_or_default(),
                version: self.version,
                status: self.status,
                disease_group: self.disease_group,
                disease_sub_group: self.disease_sub_group,
            },
            relevant_disorders: self.relevant_disorders,
        }
    }
}

/// Scan disorder strings for embedded HPO ids, deduplicated in first-seen
/// order.
pub fn extract_hp_terms(disorders: &[String]) -> Vec<String> {
    let pattern = Regex::new(r"HP:\d{7}").unwrap();
    let mut seen = std::collections::HashSet::new();
    let mut terms = Vec::new();
    for disorder in disorders {
        for m in pattern.find_iter(disorder) {
            if seen.insert(m.as_str().to_string()) {
                terms.push(m.as_str().to_string());
            }
        }
    }
    terms
}

// ─── HTTP client ─────────────────────────────────────────────────────────────

/// Blocking HTTP client for one registry instance.
pub struct HttpPanelRegistry {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl HttpPanelRegistry {
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        }
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| FetchError::from_reqwest(e, url, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(FetchError::Http {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .map_err(|e| FetchError::ResponseParsing(e.to_string()))
    }
}

impl PanelRegistryClient for HttpPanelRegistry {
    fn list_panels(&self) -> Result<Vec<PanelListEntry>, FetchError> {
        let mut panels = Vec::new();
        let mut url = Some(format!("{}/panels/", self.base_url));

        while let Some(page_url) = url {
            let page: PanelListPage = self.get_json(&page_url)?;
            panels.extend(page.results);
            url = page.next;
        }

        Ok(panels)
    }

    fn panel_detail(&self, panel_id: u32) -> Result<PanelDetail, FetchError> {
        let url = format!("{}/panels/{}/", self.base_url, panel_id);
        let response: PanelDetailResponse = self.get_json(&url)?;
        Ok(response.into_detail())
    }
}

// ─── Mock client for tests ───────────────────────────────────────────────────

/// In-memory registry with configurable panels and failure injection.
pub struct MockPanelRegistry {
    panels: std::collections::HashMap<u32, PanelDetail>,
    fail: bool,
}

impl MockPanelRegistry {
    pub fn new() -> Self {
        Self {
            panels: std::collections::HashMap::new(),
            fail: false,
        }
    }

    pub fn with_panel(mut self, panel_id: u32, detail: PanelDetail) -> Self {
        self.panels.insert(panel_id, detail);
        self
    }

    /// Every call fails with a connection error, for batch-isolation tests.
    pub fn failing() -> Self {
        Self {
            panels: std::collections::HashMap::new(),
            fail: true,
        }
    }
}

impl Default for MockPanelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PanelRegistryClient for MockPanelRegistry {
    fn list_panels(&self) -> Result<Vec<PanelListEntry>, FetchError> {
        if self.fail {
            return Err(FetchError::Connection("mock registry".into()));
        }
        let mut entries: Vec<PanelListEntry> = self
            .panels
            .iter()
            .map(|(id, detail)| PanelListEntry {
                id: *id,
                name: detail.metadata.name.clone(),
                version: detail.metadata.version.clone(),
            })
            .collect();
        entries.sort_by_key(|e| e.id);
        Ok(entries)
    }

    fn panel_detail(&self, panel_id: u32) -> Result<PanelDetail, FetchError> {
        if self.fail {
            return Err(FetchError::Connection("mock registry".into()));
        }
        self.panels.get(&panel_id).cloned().ok_or(FetchError::Http {
            status: 404,
            body: format!("panel {panel_id} not found"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_response_flattens_nested_gene_data() {
        let json = serde_json::json!({
            "id": 285,
            "name": "Epilepsy panel",
            "version": "4.1",
            "genes": [
                {
                    "gene_data": {
                        "gene_symbol": "SCN1A",
                        "hgnc_id": "HGNC:10585",
                        "omim_gene": ["182389"],
                        "biotype": "protein_coding"
                    },
                    "entity_type": "gene",
                    "mode_of_inheritance": "MONOALLELIC",
                    "confidence_level": "3"
                },
                {
                    "gene_data": { "gene_symbol": "PCDH19" },
                    "confidence_level": 2
                }
            ],
            "relevant_disorders": ["Early infantile epileptic encephalopathy HP:0001250"]
        });
        let response: PanelDetailResponse = serde_json::from_value(json).unwrap();
        let detail = response.into_detail();

        assert_eq!(detail.metadata.name, "Epilepsy panel");
        assert_eq!(detail.rows.len(), 2);
        assert_eq!(detail.rows[0].gene_symbol, "SCN1A");
        assert_eq!(detail.rows[0].confidence_level, 3);
        assert_eq!(
            detail.rows[0].omim_id,
            "[182389](https://omim.org/entry/182389)"
        );
        assert!(detail.rows[0].hgnc_id.contains("HGNC:10585"));
        // Numeric confidence is accepted too.
        assert_eq!(detail.rows[1].confidence_level, 2);
    }

    #[test]
    fn omim_links_joined_with_pipes() {
        let links = format_omim_links(&["100001".into(), "100002".into()]);
        assert_eq!(
            links,
            "[100001](https://omim.org/entry/100001) | [100002](https://omim.org/entry/100002)"
        );
        assert_eq!(format_omim_links(&[]), "");
    }

    #[test]
    fn hp_terms_extracted_and_deduplicated() {
        let disorders = vec![
            "Seizures HP:0001250 with ataxia HP:0001251".to_string(),
            "Recurrent seizures HP:0001250".to_string(),
            "No embedded term here".to_string(),
        ];
        let terms = extract_hp_terms(&disorders);
        assert_eq!(terms, vec!["HP:0001250", "HP:0001251"]);
    }

    #[test]
    fn hp_regex_requires_exactly_seven_digits() {
        let disorders = vec!["HP:123 HP:12345678 HP:0000365".to_string()];
        let terms = extract_hp_terms(&disorders);
        // HP:12345678 matches on its first seven digits; the short form does not.
        assert!(terms.contains(&"HP:1234567".to_string()));
        assert!(terms.contains(&"HP:0000365".to_string()));
        assert!(!terms.contains(&"HP:123".to_string()));
    }

    #[test]
    fn mock_registry_404_for_unknown_panel() {
        let mock = MockPanelRegistry::new();
        let err = mock.panel_detail(999).unwrap_err();
        match err {
            FetchError::Http { status, .. } => assert_eq!(status, 404),
            other => panic!("Expected Http error, got: {other}"),
        }
    }

    #[test]
    fn http_registry_trims_trailing_slash() {
        let client = HttpPanelRegistry::new("https://registry.example/api/v1/", 10);
        assert_eq!(client.base_url, "https://registry.example/api/v1");
    }
}

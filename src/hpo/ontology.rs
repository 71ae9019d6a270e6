//! Ontology search service client.
//!
//! JAX-style endpoints: `GET /search?q={text}&page={n}&limit={k}` returning
//! `{terms: [{id, name}]}` and `GET /terms/{id}` returning term details.
//! Implemented behind a trait so the suggestion engine is testable without a
//! network.

use serde::Deserialize;

use crate::error::FetchError;
use crate::models::TermDetails;
use crate::parallel::run_parallel;
use crate::registry::cache::BoundedCache;

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TermHit {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

pub trait OntologyClient: Send + Sync {
    fn search(&self, query: &str, page: usize, limit: usize) -> Result<Vec<TermHit>, FetchError>;
    fn term_details(&self, term_id: &str) -> Result<TermDetails, FetchError>;
}

// ─── Wire schema ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    terms: Vec<TermHit>,
}

#[derive(Deserialize)]
struct TermResponse {
    name: Option<String>,
    definition: Option<String>,
}

// ─── HTTP client ─────────────────────────────────────────────────────────────

pub struct HttpOntologyClient {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl HttpOntologyClient {
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
}

impl OntologyClient for HttpOntologyClient {
    fn search(&self, query: &str, page: usize, limit: usize) -> Result<Vec<TermHit>, FetchError> {
        // Single-character queries return the whole ontology; don't bother.
        if query.trim().len() < 2 {
            return Ok(Vec::new());
        }
        let url = format!(
            "{}/search?q={}&page={}&limit={}",
            self.base_url,
            query.trim(),
            page,
            limit
        );
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| FetchError::from_reqwest(e, &url, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(FetchError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: SearchResponse = response
            .json()
            .map_err(|e| FetchError::ResponseParsing(e.to_string()))?;
        Ok(parsed
            .terms
            .into_iter()
            .filter(|t| !t.id.is_empty())
            .collect())
    }

    fn term_details(&self, term_id: &str) -> Result<TermDetails, FetchError> {
        let url = format!("{}/terms/{}", self.base_url, term_id);
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| FetchError::from_reqwest(e, &url, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(FetchError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: TermResponse = response
            .json()
            .map_err(|e| FetchError::ResponseParsing(e.to_string()))?;
        Ok(TermDetails {
            id: term_id.to_string(),
            name: parsed.name.unwrap_or_else(|| term_id.to_string()),
            definition: parsed
                .definition
                .unwrap_or_else(|| "No definition available".into()),
        })
    }
}

/// Resolve term details in parallel (bounded workers), memoized per term id.
/// A failed unit degrades to a placeholder so batch callers always get one
/// entry per requested id.
pub fn fetch_terms_parallel(
    client: &dyn OntologyClient,
    cache: &BoundedCache<String, TermDetails>,
    term_ids: &[String],
    max_workers: usize,
) -> Vec<TermDetails> {
    run_parallel(term_ids.to_vec(), max_workers, |term_id| {
        cache.get_or_fetch(term_id.clone(), || match client.term_details(term_id) {
            Ok(details) => details,
            Err(e) => {
                tracing::error!("Failed to fetch HPO term {term_id}: {e}");
                TermDetails::placeholder(term_id)
            }
        })
    })
}

// ─── Mock client for tests ───────────────────────────────────────────────────

/// In-memory ontology with configurable search results and term details.
pub struct MockOntologyClient {
    search_results: std::collections::HashMap<String, Vec<TermHit>>,
    details: std::collections::HashMap<String, TermDetails>,
    fail: bool,
}

impl MockOntologyClient {
    pub fn new() -> Self {
        Self {
            search_results: std::collections::HashMap::new(),
            details: std::collections::HashMap::new(),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            search_results: std::collections::HashMap::new(),
            details: std::collections::HashMap::new(),
            fail: true,
        }
    }

    pub fn with_search(mut self, query: &str, hits: Vec<(&str, &str)>) -> Self {
        self.search_results.insert(
            query.to_lowercase(),
            hits.into_iter()
                .map(|(id, name)| TermHit {
                    id: id.into(),
                    name: name.into(),
                })
                .collect(),
        );
        self
    }

    pub fn with_term(mut self, id: &str, name: &str, definition: &str) -> Self {
        self.details.insert(
            id.to_string(),
            TermDetails {
                id: id.into(),
                name: name.into(),
                definition: definition.into(),
            },
        );
        self
    }
}

impl Default for MockOntologyClient {
    fn default() -> Self {
        Self::new()
    }
}

impl OntologyClient for MockOntologyClient {
    fn search(&self, query: &str, page: usize, limit: usize) -> Result<Vec<TermHit>, FetchError> {
        if self.fail {
            return Err(FetchError::Connection("mock ontology".into()));
        }
        let all = self
            .search_results
            .get(&query.to_lowercase())
            .cloned()
            .unwrap_or_default();
        Ok(all.into_iter().skip(page * limit).take(limit).collect())
    }

    fn term_details(&self, term_id: &str) -> Result<TermDetails, FetchError> {
        if self.fail {
            return Err(FetchError::Connection("mock ontology".into()));
        }
        self.details.get(term_id).cloned().ok_or(FetchError::Http {
            status: 404,
            body: format!("term {term_id} not found"),
        })
    }
}

use serde::{Deserialize, Serialize};

/// One gene's membership in one panel.
///
/// `gene_symbol` is the identity key (case-insensitive). Every record emitted
/// by an adapter has a non-empty symbol; rows with empty symbols are dropped
/// before aggregation. Descriptive fields are carried as-is from whichever
/// source the record was retained from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneRecord {
    pub gene_symbol: String,
    /// Ordinal 0–3 after normalization (Green=3, Amber=2, Red=1, unrated=0).
    pub confidence_level: u8,
    /// OMIM ids pre-rendered as markdown links (external table contract).
    #[serde(default)]
    pub omim_id: String,
    /// HGNC id pre-rendered as a markdown link.
    #[serde(default)]
    pub hgnc_id: String,
    #[serde(default)]
    pub entity_type: String,
    #[serde(default)]
    pub biotype: String,
    #[serde(default)]
    pub mode_of_inheritance: String,
}

impl GeneRecord {
    /// A record carrying only a symbol and confidence, used for internal
    /// panel files and manual entries where no descriptive data exists.
    pub fn bare(gene_symbol: impl Into<String>, confidence_level: u8) -> Self {
        Self {
            gene_symbol: gene_symbol.into(),
            confidence_level,
            omim_id: String::new(),
            hgnc_id: String::new(),
            entity_type: String::new(),
            biotype: String::new(),
            mode_of_inheritance: String::new(),
        }
    }

    /// Case-normalized identity key used for deduplication.
    pub fn symbol_key(&self) -> String {
        self.gene_symbol.trim().to_uppercase()
    }
}

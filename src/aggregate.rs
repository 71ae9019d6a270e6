//! Gene aggregation: union, filter, deduplicate.
//!
//! Rows from every selected panel are filtered by the confidence selection,
//! concatenated with manual entries, and deduplicated case-insensitively by
//! gene symbol with confidence precedence. The per-source symbol sets kept
//! for the intersection diagram are deliberately *unfiltered*: the diagram
//! reflects full panel membership while the table obeys the confidence
//! filter. The sort is explicit so repeated runs always retain the same row
//! per symbol.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::models::{GeneRecord, PanelSource};
use crate::registry::FetchedPanel;

/// Result of merging gene records across all selected sources.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregatedGeneTable {
    /// One retained record per gene symbol, sorted
    /// (confidence desc, symbol asc).
    pub rows: Vec<GeneRecord>,
    /// Unfiltered per-source gene-symbol sets for the intersection diagram,
    /// keyed by [`PanelSource::key`].
    pub source_sets: BTreeMap<String, BTreeSet<String>>,
    /// Display metadata per source key, for chart titling.
    pub sources: BTreeMap<String, PanelSource>,
}

impl AggregatedGeneTable {
    /// Explicit "no genes" result for an empty selection.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Final deduplicated symbol list for the export collaborator.
    pub fn gene_symbols(&self) -> Vec<String> {
        self.rows.iter().map(|r| r.gene_symbol.clone()).collect()
    }
}

/// Merge fetched panels and manual genes into one deduplicated table.
///
/// Manual symbols bypass the confidence filter and enter uppercased with the
/// configured manual confidence. Rows with empty symbols are discarded.
pub fn aggregate(
    fetched: &[FetchedPanel],
    confidence_filter: &BTreeSet<u8>,
    manual_gene_symbols: &[String],
    manual_confidence: u8,
) -> AggregatedGeneTable {
    let mut working: Vec<GeneRecord> = Vec::new();
    let mut source_sets: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    let mut sources: BTreeMap<String, PanelSource> = BTreeMap::new();

    for panel in fetched {
        let key = panel.source.key();
        let set: BTreeSet<String> = panel
            .detail
            .rows
            .iter()
            .filter(|row| !row.gene_symbol.trim().is_empty())
            .map(|row| row.gene_symbol.clone())
            .collect();
        // Source sets stay unfiltered; a panel that fetched empty still gets
        // an entry so the diagram names every selected source.
        source_sets.insert(key.clone(), set);
        sources.insert(key, panel.source.clone());

        working.extend(
            panel
                .detail
                .rows
                .iter()
                .filter(|row| !row.gene_symbol.trim().is_empty())
                .filter(|row| confidence_filter.contains(&row.confidence_level))
                .cloned(),
        );
    }

    let manual: Vec<GeneRecord> = manual_gene_symbols
        .iter()
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .map(|symbol| GeneRecord::bare(symbol, manual_confidence))
        .collect();
    if !manual.is_empty() {
        let manual_source = PanelSource::manual();
        let key = manual_source.key();
        source_sets.insert(
            key.clone(),
            manual.iter().map(|r| r.gene_symbol.clone()).collect(),
        );
        sources.insert(key, manual_source);
        working.extend(manual);
    }

    // Deduplicate: stable sort by (confidence desc, symbol asc), keep the
    // first occurrence per case-normalized symbol. The retained row's
    // descriptive fields win; lower-confidence duplicates are dropped whole.
    working.sort_by(|a, b| {
        b.confidence_level
            .cmp(&a.confidence_level)
            .then_with(|| a.gene_symbol.cmp(&b.gene_symbol))
    });
    let mut seen: BTreeSet<String> = BTreeSet::new();
    let rows: Vec<GeneRecord> = working
        .into_iter()
        .filter(|row| seen.insert(row.symbol_key()))
        .collect();

    AggregatedGeneTable {
        rows,
        source_sets,
        sources,
    }
}

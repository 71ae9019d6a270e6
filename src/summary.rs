//! Export-facing formatting: the compact panel summary grammar and dropdown
//! option labels.
//!
//! The summary string is consumed verbatim by the export collaborator, so the
//! grammar is fixed: `Source(id)/Name_vVersion_ConfidenceSuffix`, comma-joined,
//! with manual genes appended as bare symbols.

use std::collections::BTreeSet;

use crate::models::{Origin, PanelListEntry};
use crate::registry::FetchedPanel;

/// Compact notation for the selected confidence levels:
/// Green/Orange/Red single or combined.
pub fn confidence_suffix(filter: &BTreeSet<u8>) -> &'static str {
    let g = filter.contains(&3);
    let o = filter.contains(&2);
    let r = filter.contains(&1);
    match (g, o, r) {
        (true, false, false) => "_G",
        (false, true, false) => "_O",
        (false, false, true) => "_R",
        (true, true, false) => "_GO",
        (true, false, true) => "_GR",
        (false, true, true) => "_OR",
        (true, true, true) => "_GOR",
        (false, false, false) => "",
    }
}

fn sanitize_name(name: &str) -> String {
    name.replace([' ', '/', ','], "_")
}

/// One summary token per fetched panel. Panels that failed to fetch (empty
/// name) are skipped; the export should not name a source it has no data for.
fn panel_token(panel: &FetchedPanel, suffix: &str) -> Option<String> {
    if panel.source.panel_name.is_empty() {
        return None;
    }
    let id = panel.selection.panel_id;
    let name = sanitize_name(&panel.source.panel_name);
    let version = panel
        .source
        .version
        .as_ref()
        .map(|v| format!("_v{v}"))
        .unwrap_or_default();
    let token = match panel.selection.origin {
        Origin::Uk => format!("PanelApp_UK({id})/{name}{version}{suffix}"),
        Origin::Au => format!("PanelApp_AUS({id})/{name}{version}{suffix}"),
        Origin::Internal => format!("Internal({id})/{name}{version}"),
        Origin::Manual => return None,
    };
    Some(token)
}

/// Formatted summary encoding selected panels, versions, confidence notation,
/// and manual genes.
pub fn generate_summary(
    fetched: &[FetchedPanel],
    confidence_filter: &BTreeSet<u8>,
    manual_genes: &[String],
) -> String {
    let suffix = confidence_suffix(confidence_filter);
    let mut parts: Vec<String> = fetched
        .iter()
        .filter_map(|panel| panel_token(panel, suffix))
        .collect();
    parts.extend(manual_genes.iter().cloned());
    parts.join(",")
}

/// Dropdown label for a registry panel: `Name vVersion (ID n)`.
pub fn panel_option_label(entry: &PanelListEntry) -> String {
    match &entry.version {
        Some(version) => format!("{} v{} (ID {})", entry.name, version, entry.id),
        None => format!("{} (ID {})", entry.name, entry.id),
    }
}

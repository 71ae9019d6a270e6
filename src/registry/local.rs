//! Local file-based panel registry.
//!
//! Internal panels live in a directory of UTF-8 text files, one gene symbol
//! per line, named `<name_tokens>[_<gene_count>]_v<version>.txt`. No registry
//! assigns these files an id, so panel identity is a deterministic hash of
//! the name portion of the filename, so the same panel name maps to the same
//! synthetic id across reloads. Files without a parsable version token are
//! skipped with a warning, never fatally.

use std::path::PathBuf;

use md5::{Digest, Md5};

use crate::error::FetchError;
use crate::models::{GeneRecord, PanelMetadata};
use crate::registry::remote::PanelDetail;

/// Confidence assigned to internal panel rows: the file registry only holds
/// curated gene lists.
const INTERNAL_CONFIDENCE: u8 = 3;

/// Parsed identity of one internal panel file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalPanel {
    pub panel_id: u32,
    pub panel_name: String,
    pub version: u32,
    /// Gene count encoded in the filename, 0 when absent.
    pub gene_count_from_filename: u32,
    pub file_name: String,
    pub base_name: String,
}

impl InternalPanel {
    /// Display name with underscores restored to spaces.
    pub fn display_name(&self) -> String {
        self.panel_name.replace('_', " ")
    }
}

/// Synthetic stable id: MD5 of the name portion, first 8 hex chars as an
/// integer, folded into the 2000..10998 range.
pub fn stable_panel_id(panel_name: &str) -> u32 {
    let digest = Md5::digest(panel_name.as_bytes());
    let hex = format!("{digest:x}");
    let leading = u32::from_str_radix(&hex[..8], 16).expect("md5 hex digits");
    leading % 8999 + 2000
}

/// Parse `<name_tokens>[_<gene_count>]_v<version>.txt`. Returns `None` when
/// no `v<int>` token exists.
pub fn parse_filename(file_name: &str) -> Option<InternalPanel> {
    let base_name = file_name.strip_suffix(".txt")?;
    let parts: Vec<&str> = base_name.split('_').collect();

    let version_idx = parts.iter().position(|part| {
        part.len() > 1 && part.starts_with('v') && part[1..].chars().all(|c| c.is_ascii_digit())
    })?;
    let version: u32 = parts[version_idx][1..].parse().ok()?;

    let (gene_count_from_filename, name_end) = if version_idx > 0
        && !parts[version_idx - 1].is_empty()
        && parts[version_idx - 1].chars().all(|c| c.is_ascii_digit())
    {
        (parts[version_idx - 1].parse().unwrap_or(0), version_idx - 1)
    } else {
        (0, version_idx)
    };

    let panel_name = parts[..name_end].join("_");
    Some(InternalPanel {
        panel_id: stable_panel_id(&panel_name),
        panel_name,
        version,
        gene_count_from_filename,
        file_name: file_name.to_string(),
        base_name: base_name.to_string(),
    })
}

/// Directory-backed internal panel store.
pub struct LocalPanelStore {
    directory: PathBuf,
}

impl LocalPanelStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Scan the directory for parsable panel files, sorted by panel id.
    /// A missing directory yields an empty list (logged), not an error.
    pub fn scan(&self) -> Vec<InternalPanel> {
        let entries = match std::fs::read_dir(&self.directory) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(
                    "Internal panel directory {} unavailable: {e}",
                    self.directory.display()
                );
                return Vec::new();
            }
        };

        let mut file_names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.ends_with(".txt"))
            .collect();
        file_names.sort();

        let mut panels = Vec::new();
        for file_name in file_names {
            match parse_filename(&file_name) {
                Some(panel) => panels.push(panel),
                None => {
                    tracing::warn!("Could not parse version from {file_name}, skipping");
                }
            }
        }
        panels.sort_by_key(|p| p.panel_id);
        panels
    }

    /// Load one internal panel's gene rows by synthetic id.
    pub fn panel_detail(&self, panel_id: u32) -> Result<PanelDetail, FetchError> {
        let panel = self
            .scan()
            .into_iter()
            .find(|p| p.panel_id == panel_id)
            .ok_or_else(|| FetchError::Http {
                status: 404,
                body: format!("internal panel {panel_id} not found"),
            })?;

        let rows = self.read_genes(&panel)?;
        Ok(PanelDetail {
            rows,
            metadata: PanelMetadata {
                id: Some(panel.panel_id),
                name: panel.display_name(),
                version: Some(panel.version.to_string()),
                ..PanelMetadata::default()
            },
            relevant_disorders: Vec::new(),
        })
    }

    fn read_genes(&self, panel: &InternalPanel) -> Result<Vec<GeneRecord>, FetchError> {
        let path = self.directory.join(&panel.file_name);
        let content = std::fs::read_to_string(&path)?;
        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|symbol| GeneRecord::bare(symbol, INTERNAL_CONFIDENCE))
            .collect())
    }
}

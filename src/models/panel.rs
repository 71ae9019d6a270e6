use serde::{Deserialize, Serialize};

/// Registry or source category a panel belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Uk,
    Au,
    Internal,
    Manual,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Uk => "UK",
            Origin::Au => "AUS",
            Origin::Internal => "INT",
            Origin::Manual => "Manual",
        }
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's request to include one panel from one origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PanelSelection {
    pub origin: Origin,
    pub panel_id: u32,
}

/// Where an aggregated gene record came from.
///
/// Manual entries carry no panel id or version and are never deduplicated
/// against each other at the source level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelSource {
    pub origin: Origin,
    pub panel_id: Option<u32>,
    pub panel_name: String,
    pub version: Option<String>,
}

impl PanelSource {
    pub fn manual() -> Self {
        Self {
            origin: Origin::Manual,
            panel_id: None,
            panel_name: "Manual".into(),
            version: None,
        }
    }

    /// Stable key used for the visualizer's named gene sets
    /// (`UK_{id}`, `AUS_{id}`, `INT-{id}`, `Manual`).
    pub fn key(&self) -> String {
        match (self.origin, self.panel_id) {
            (Origin::Manual, _) => "Manual".to_string(),
            (Origin::Internal, Some(id)) => format!("INT-{id}"),
            (origin, Some(id)) => format!("{}_{}", origin.as_str(), id),
            (origin, None) => origin.as_str().to_string(),
        }
    }
}

/// Metadata returned alongside a panel's gene rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PanelMetadata {
    pub id: Option<u32>,
    pub name: String,
    pub version: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub disease_group: String,
    #[serde(default)]
    pub disease_sub_group: String,
}

/// One row of a registry's paginated panel list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelListEntry {
    pub id: u32,
    pub name: String,
    pub version: Option<String>,
}

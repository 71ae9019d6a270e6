//! Entity types shared across the core.

pub mod gene;
pub mod hpo;
pub mod panel;

pub use gene::GeneRecord;
pub use hpo::{HpoSuggestion, SuggestionSource, TermDetails};
pub use panel::{Origin, PanelListEntry, PanelMetadata, PanelSelection, PanelSource};

//! Phenotype (HPO) term suggestion: keyword→term resolution against a static
//! medical-term dictionary plus live ontology search, refined by per-session
//! accept/reject feedback.

pub mod dictionary;
pub mod feedback;
pub mod ontology;
pub mod suggest;

pub use dictionary::MedicalTermMap;
pub use feedback::SuggestionSessionState;
pub use ontology::{HttpOntologyClient, MockOntologyClient, OntologyClient, TermHit};
pub use suggest::{SuggestionEngine, SuggestionOutcome};

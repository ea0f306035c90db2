//! Core data models for the address validation system.

pub mod profile;
pub mod query;
pub mod record;

pub use profile::{Classification, ConfidenceLevel, ProviderMetadata, ValidationProfile};
pub use query::{AddressQuery, ComponentLabel, ParsedComponent};
pub use record::{RecordKind, ReferenceRecord};

//! Alder - offline UK address validation against a gazetteer reference index.
//!
//! This library provides shared types and modules for the ingest and query binaries.

pub mod index;
pub mod models;
pub mod validate;

pub use index::{ReferenceIndex, ReferenceIndexBuilder, SharedIndex};
pub use models::{ParsedComponent, ValidationProfile};
pub use validate::AddressValidator;

//! Reference index: ingest, storage, sharing, and persistence.

pub mod builder;
pub mod shared;
pub mod snapshot;
pub mod store;

pub use builder::{BuildError, ReferenceIndexBuilder};
pub use shared::{IndexNotReady, SharedIndex};
pub use snapshot::IndexSnapshot;
pub use store::{ReferenceIndex, ReferenceStore};

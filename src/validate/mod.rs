//! Validation pipeline: normalize, match, score, standardize, duplicates.

pub mod duplicate;
pub mod matcher;
pub mod normalize;
pub mod scorer;
pub mod service;
pub mod standardize;

pub use duplicate::{DuplicateDetector, HashDuplicateIndex, NoDuplicates};
pub use matcher::{find_match, MatchResult};
pub use normalize::normalize;
pub use scorer::{score, RiskAssessment};
pub use service::AddressValidator;
pub use standardize::standardized_address;

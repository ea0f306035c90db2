//! Validation service wiring the pipeline stages together.

use std::sync::Arc;

use tracing::debug;

use crate::index::{IndexNotReady, SharedIndex};
use crate::models::{ParsedComponent, ProviderMetadata, ValidationProfile};

use super::duplicate::{DuplicateDetector, HashDuplicateIndex};
use super::matcher::find_match;
use super::normalize::normalize;
use super::scorer::{self, DUPLICATE_ADDRESSES_TRACKED};
use super::standardize::standardized_address;

/// Address validation service.
///
/// Owns the shared reference index and the duplicate-candidate index side
/// by side; a validation is normalize → match → score → standardize →
/// duplicate-check, producing a fresh [`ValidationProfile`] per call.
pub struct AddressValidator {
    index: Arc<SharedIndex>,
    duplicates: Box<dyn DuplicateDetector>,
}

impl AddressValidator {
    pub fn new(index: Arc<SharedIndex>) -> Self {
        Self {
            index,
            duplicates: Box::new(HashDuplicateIndex::new()),
        }
    }

    pub fn with_duplicate_detector(
        index: Arc<SharedIndex>,
        duplicates: Box<dyn DuplicateDetector>,
    ) -> Self {
        Self { index, duplicates }
    }

    pub fn index(&self) -> &SharedIndex {
        &self.index
    }

    /// Validate one address. Fails only when the reference index has not
    /// finished its first build; every other anomaly is absorbed into the
    /// profile (flags, classification, absence markers).
    pub fn validate(
        &self,
        raw_text: &str,
        components: &[ParsedComponent],
    ) -> Result<ValidationProfile, IndexNotReady> {
        let snapshot = self.index.snapshot()?;

        let query = normalize(components, raw_text);
        debug!(
            "Normalized query: term={:?} postcode={:?} district={:?}",
            query.search_term, query.postcode, query.postcode_district
        );

        let matched = find_match(snapshot.as_ref(), &query).record;
        let mut assessment = scorer::score(&query, matched);

        let standardized = standardized_address(&query, matched);

        let is_duplicate = self.duplicates.observe(&standardized);
        if is_duplicate {
            assessment.add(DUPLICATE_ADDRESSES_TRACKED, 30);
        }

        Ok(ValidationProfile {
            is_valid: matched.is_some(),
            standardized_address: standardized,
            classification: assessment.classification,
            is_duplicate,
            populated_place: matched.and_then(|r| r.populated_place.clone()),
            district_borough: matched.and_then(|r| r.district_borough.clone()),
            county: matched.and_then(|r| r.county_unitary.clone()),
            risk_score: assessment.risk_score,
            risk_flags: assessment.risk_flags,
            confidence_level: assessment.confidence_level,
            provider_metadata: ProviderMetadata::from_match(matched),
        })
    }
}

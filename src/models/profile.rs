//! Validation output contract.

use serde::{Deserialize, Serialize};

use super::ReferenceRecord;

/// Business/residential classification of a matched address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Classification {
    Residential,
    Business,
    Unknown,
}

/// How much of the postcode could be verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

/// Matched-record provenance, with explicit absence markers so an
/// unmatched query still yields a well-formed object rather than an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderMetadata {
    /// Gazetteer record ID, absent when unmatched.
    pub record_id: Option<String>,
    /// Raw local type, `"N/A"` when unmatched.
    pub local_type: String,
    /// Record country, defaulting to `"UK"` when unmatched.
    pub country: String,
}

impl ProviderMetadata {
    pub fn from_match(record: Option<&ReferenceRecord>) -> Self {
        match record {
            Some(r) => Self {
                record_id: Some(r.id.clone()),
                local_type: r.kind.as_local_type().to_string(),
                country: r.country.clone().unwrap_or_else(|| "UK".to_string()),
            },
            None => Self {
                record_id: None,
                local_type: "N/A".to_string(),
                country: "UK".to_string(),
            },
        }
    }
}

/// The validation verdict, immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationProfile {
    pub is_valid: bool,
    pub standardized_address: String,
    pub classification: Classification,
    pub is_duplicate: bool,

    /// Town or city associated with the matched record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub populated_place: Option<String>,
    /// Local authority district or London borough.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district_borough: Option<String>,
    /// County or unitary authority.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,

    /// Accumulated risk, clamped to `[0, 100]`.
    pub risk_score: u8,
    /// Reason codes in rule evaluation order, no duplicates.
    pub risk_flags: Vec<String>,
    pub confidence_level: ConfidenceLevel,
    pub provider_metadata: ProviderMetadata,
}

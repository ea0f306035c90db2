//! Deterministic risk scoring and classification rules.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{AddressQuery, Classification, ConfidenceLevel, ReferenceRecord};

pub const ADDRESS_NOT_IN_DATABASE: &str = "ADDRESS_NOT_IN_DATABASE";
pub const GEOGRAPHIC_AREA_MISMATCH: &str = "GEOGRAPHIC_AREA_MISMATCH";
pub const PARTIAL_POSTCODE_DISTRICT: &str = "PARTIAL_POSTCODE_DISTRICT";
pub const MISSING_OR_INVALID_POSTCODE: &str = "MISSING_OR_INVALID_POSTCODE";
pub const DUPLICATE_ADDRESSES_TRACKED: &str = "DUPLICATE_ADDRESSES_TRACKED";

/// Full UK postcode, e.g. `ZE2 9PL`.
static FULL_POSTCODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{1,2}[0-9][A-Z0-9]? [0-9][A-Z]{2}$").unwrap());

/// Outward district only, e.g. `ZE2` or `GU22`.
static DISTRICT_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{1,2}[0-9][A-Z0-9]?$").unwrap());

/// Result of applying the scoring rules to a match (or its absence).
#[derive(Debug, Clone)]
pub struct RiskAssessment {
    pub classification: Classification,
    pub risk_score: u8,
    pub risk_flags: Vec<String>,
    pub confidence_level: ConfidenceLevel,
}

impl RiskAssessment {
    /// Add `delta` to the score, clamped to 100, and record the flag.
    /// Flags accumulate in rule evaluation order and are distinct by
    /// construction (each rule fires at most once).
    pub fn add(&mut self, flag: &str, delta: u8) {
        self.risk_flags.push(flag.to_string());
        self.risk_score = self.risk_score.saturating_add(delta).min(100);
    }
}

/// Apply the fixed-order rule set. Pure function of its inputs.
pub fn score(query: &AddressQuery, matched: Option<&ReferenceRecord>) -> RiskAssessment {
    let Some(record) = matched else {
        return RiskAssessment {
            classification: Classification::Unknown,
            risk_score: 90,
            risk_flags: vec![ADDRESS_NOT_IN_DATABASE.to_string()],
            confidence_level: ConfidenceLevel::Low,
        };
    };

    let mut assessment = RiskAssessment {
        classification: if record.kind.is_residential() {
            Classification::Residential
        } else {
            Classification::Business
        },
        risk_score: 0,
        risk_flags: Vec::new(),
        confidence_level: ConfidenceLevel::Low,
    };

    if area_context_mismatch(query, record) {
        assessment.add(GEOGRAPHIC_AREA_MISMATCH, 40);
    }

    // Postcode quality tier, evaluated in order. HIGH requires the full
    // pattern; a bare district (or a matched record carrying one when the
    // query has no postcode at all) is MEDIUM; anything else is LOW.
    if FULL_POSTCODE.is_match(&query.postcode) {
        assessment.confidence_level = ConfidenceLevel::High;
    } else if DISTRICT_ONLY.is_match(&query.postcode)
        || (query.postcode.is_empty() && record.postcode_district.is_some())
    {
        assessment.add(PARTIAL_POSTCODE_DISTRICT, 10);
        assessment.confidence_level = ConfidenceLevel::Medium;
    } else {
        assessment.add(MISSING_OR_INVALID_POSTCODE, 30);
        assessment.confidence_level = ConfidenceLevel::Low;
    }

    assessment
}

/// The user stated a locality that matches neither the record's populated
/// place nor its district borough. A record with no populated hierarchy
/// cannot confirm any stated locality, so a non-empty context mismatches.
fn area_context_mismatch(query: &AddressQuery, record: &ReferenceRecord) -> bool {
    let Some(context) = query.area_context.as_deref() else {
        return false;
    };
    if context.is_empty() {
        return false;
    }

    ![
        record.populated_place.as_deref(),
        record.district_borough.as_deref(),
    ]
    .iter()
    .flatten()
    .any(|candidate| candidate.eq_ignore_ascii_case(context))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordKind;

    fn matched_record() -> ReferenceRecord {
        ReferenceRecord {
            id: "os1".to_string(),
            name1: "MELBY ROAD".to_string(),
            kind: RecordKind::NamedRoad,
            postcode_district: Some("ZE2".to_string()),
            populated_place: Some("Walls".to_string()),
            district_borough: Some("Shetland".to_string()),
            county_unitary: None,
            country: Some("Scotland".to_string()),
        }
    }

    fn query_with_postcode(postcode: &str) -> AddressQuery {
        AddressQuery {
            search_term: "MELBY ROAD".to_string(),
            postcode: postcode.to_string(),
            postcode_district: postcode
                .split_whitespace()
                .next()
                .unwrap_or_default()
                .to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_unmatched_query_invariants() {
        let assessment = score(&query_with_postcode("ZZ9 9ZZ"), None);
        assert_eq!(assessment.classification, Classification::Unknown);
        assert_eq!(assessment.risk_score, 90);
        assert_eq!(assessment.risk_flags, vec![ADDRESS_NOT_IN_DATABASE]);
        assert_eq!(assessment.confidence_level, ConfidenceLevel::Low);
    }

    #[test]
    fn test_full_postcode_is_high_confidence_no_flags() {
        let assessment = score(&query_with_postcode("ZE2 9PL"), Some(&matched_record()));
        assert_eq!(assessment.classification, Classification::Residential);
        assert_eq!(assessment.confidence_level, ConfidenceLevel::High);
        assert_eq!(assessment.risk_score, 0);
        assert!(assessment.risk_flags.is_empty());
    }

    #[test]
    fn test_district_only_postcode_is_medium() {
        let assessment = score(&query_with_postcode("ZE2"), Some(&matched_record()));
        assert_eq!(assessment.confidence_level, ConfidenceLevel::Medium);
        assert_eq!(assessment.risk_score, 10);
        assert_eq!(assessment.risk_flags, vec![PARTIAL_POSTCODE_DISTRICT]);
    }

    #[test]
    fn test_empty_postcode_with_record_district_is_medium() {
        let assessment = score(&query_with_postcode(""), Some(&matched_record()));
        assert_eq!(assessment.confidence_level, ConfidenceLevel::Medium);
        assert_eq!(assessment.risk_flags, vec![PARTIAL_POSTCODE_DISTRICT]);
    }

    #[test]
    fn test_empty_postcode_without_record_district_is_low() {
        let mut record = matched_record();
        record.postcode_district = None;
        let assessment = score(&query_with_postcode(""), Some(&record));
        assert_eq!(assessment.confidence_level, ConfidenceLevel::Low);
        assert_eq!(assessment.risk_score, 30);
        assert_eq!(assessment.risk_flags, vec![MISSING_OR_INVALID_POSTCODE]);
    }

    #[test]
    fn test_malformed_postcode_is_low_not_medium() {
        let assessment = score(&query_with_postcode("ZE2 9PLX"), Some(&matched_record()));
        assert_eq!(assessment.confidence_level, ConfidenceLevel::Low);
        assert_eq!(assessment.risk_flags, vec![MISSING_OR_INVALID_POSTCODE]);
    }

    #[test]
    fn test_area_context_match_is_case_insensitive() {
        let mut query = query_with_postcode("ZE2 9PL");
        query.area_context = Some("WALLS".to_string());
        let assessment = score(&query, Some(&matched_record()));
        assert!(assessment.risk_flags.is_empty());
    }

    #[test]
    fn test_area_context_mismatch_adds_forty() {
        let mut query = query_with_postcode("ZE2 9PL");
        query.area_context = Some("LERWICK".to_string());
        let assessment = score(&query, Some(&matched_record()));
        assert_eq!(assessment.risk_flags, vec![GEOGRAPHIC_AREA_MISMATCH]);
        assert_eq!(assessment.risk_score, 40);
        // Postcode tier still applies independently.
        assert_eq!(assessment.confidence_level, ConfidenceLevel::High);
    }

    #[test]
    fn test_area_context_matches_borough() {
        let mut query = query_with_postcode("ZE2 9PL");
        query.area_context = Some("Shetland".to_string());
        let assessment = score(&query, Some(&matched_record()));
        assert!(assessment.risk_flags.is_empty());
    }

    #[test]
    fn test_area_context_with_empty_hierarchy_mismatches() {
        let mut record = matched_record();
        record.populated_place = None;
        record.district_borough = None;
        let mut query = query_with_postcode("ZE2 9PL");
        query.area_context = Some("LERWICK".to_string());
        let assessment = score(&query, Some(&record));
        assert_eq!(assessment.risk_flags, vec![GEOGRAPHIC_AREA_MISMATCH]);
    }

    #[test]
    fn test_accumulated_flags_keep_rule_order() {
        let mut record = matched_record();
        record.postcode_district = None;
        let mut query = query_with_postcode("");
        query.area_context = Some("LERWICK".to_string());
        let assessment = score(&query, Some(&record));
        assert_eq!(
            assessment.risk_flags,
            vec![GEOGRAPHIC_AREA_MISMATCH, MISSING_OR_INVALID_POSTCODE]
        );
        assert_eq!(assessment.risk_score, 70);
    }

    #[test]
    fn test_score_never_exceeds_one_hundred() {
        let mut assessment = RiskAssessment {
            classification: Classification::Residential,
            risk_score: 90,
            risk_flags: Vec::new(),
            confidence_level: ConfidenceLevel::Low,
        };
        assessment.add(DUPLICATE_ADDRESSES_TRACKED, 30);
        assert_eq!(assessment.risk_score, 100);
    }
}

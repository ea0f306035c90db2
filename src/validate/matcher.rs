//! Tiered deterministic match against the reference index.

use crate::index::ReferenceStore;
use crate::models::{AddressQuery, ReferenceRecord};

/// Outcome of a match attempt: at most one record.
#[derive(Debug, Clone)]
pub struct MatchResult<'a> {
    pub record: Option<&'a ReferenceRecord>,
}

impl<'a> MatchResult<'a> {
    pub fn found(&self) -> bool {
        self.record.is_some()
    }
}

/// Run the two-tier match. Read-only; safe for unlimited concurrent
/// callers against the same index snapshot.
///
/// Tier 1: name prefix + postcode-district prefix, when both query parts
/// are present. Tier 2: exact name. First success wins; within a tier the
/// store's stable index order breaks ties.
pub fn find_match<'a, S: ReferenceStore>(store: &'a S, query: &AddressQuery) -> MatchResult<'a> {
    if query.search_term.is_empty() {
        return MatchResult { record: None };
    }

    if !query.postcode_district.is_empty() {
        if let Some(record) = store.lookup_by_prefix(&query.search_term, &query.postcode_district) {
            return MatchResult {
                record: Some(record),
            };
        }
    }

    MatchResult {
        record: store.lookup_exact(&query.search_term),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::ReferenceIndex;
    use crate::models::RecordKind;

    fn record(id: &str, name1: &str, district: Option<&str>) -> ReferenceRecord {
        ReferenceRecord {
            id: id.to_string(),
            name1: name1.to_string(),
            kind: RecordKind::NamedRoad,
            postcode_district: district.map(String::from),
            populated_place: None,
            district_borough: None,
            county_unitary: None,
            country: None,
        }
    }

    fn query(search_term: &str, district: &str) -> AddressQuery {
        AddressQuery {
            search_term: search_term.to_string(),
            postcode_district: district.to_string(),
            ..Default::default()
        }
    }

    fn sample_index() -> ReferenceIndex {
        ReferenceIndex::from_records(
            vec![
                record("os1", "MELBY ROAD", Some("ZE2")),
                record("os2", "MELBY ROAD", Some("TR12")),
                record("os3", "YORK ROAD", Some("GU22")),
            ],
            0,
        )
    }

    #[test]
    fn test_tier1_prefix_match_with_district() {
        let index = sample_index();
        let result = find_match(&index, &query("MELBY", "TR1"));
        assert_eq!(result.record.unwrap().id, "os2");
    }

    #[test]
    fn test_tier2_exact_fallback_when_district_misses() {
        let index = sample_index();
        // District ZZ9 matches nothing, so the exact-name tier applies
        // and the first MELBY ROAD in index order wins.
        let result = find_match(&index, &query("MELBY ROAD", "ZZ9"));
        assert_eq!(result.record.unwrap().id, "os1");
    }

    #[test]
    fn test_tier2_exact_match_without_district() {
        let index = sample_index();
        let result = find_match(&index, &query("YORK ROAD", ""));
        assert_eq!(result.record.unwrap().id, "os3");
    }

    #[test]
    fn test_prefix_alone_does_not_match_without_district() {
        let index = sample_index();
        // Without a district the prefix tier is skipped; "YORK" is not an
        // exact name, so there is no match.
        assert!(!find_match(&index, &query("YORK", "")).found());
    }

    #[test]
    fn test_empty_search_term_never_matches() {
        let index = sample_index();
        assert!(!find_match(&index, &query("", "ZE2")).found());
    }

    #[test]
    fn test_match_is_deterministic_across_calls() {
        let index = sample_index();
        let q = query("MELBY", "ZE");
        let first = find_match(&index, &q).record.unwrap().id.clone();
        for _ in 0..10 {
            assert_eq!(find_match(&index, &q).record.unwrap().id, first);
        }
    }
}

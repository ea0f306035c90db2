//! Canonical rendering of the validated address.

use crate::models::{AddressQuery, ReferenceRecord};

/// Marker used when no postcode could be resolved at all.
const UNKNOWN_POSTCODE: &str = "UNKNOWN";

/// Assemble the standardized address string:
/// `HOUSE_NUMBER NAME, POSTCODE`, uppercased, with stray separators
/// trimmed when parts are absent.
///
/// The name is the matched record's `name1` when there is a match, else
/// the query's search term. The postcode is the query postcode when
/// present, else the matched record's district, else `UNKNOWN`.
pub fn standardized_address(query: &AddressQuery, matched: Option<&ReferenceRecord>) -> String {
    let name = match matched {
        Some(record) => record.name1.as_str(),
        None => query.search_term.as_str(),
    };

    let postcode = resolve_postcode(query, matched);
    let house_number = query.house_number.as_deref().unwrap_or("").trim();

    format!("{} {}, {}", house_number, name, postcode)
        .trim_matches([',', ' '])
        .to_uppercase()
}

fn resolve_postcode<'a>(query: &'a AddressQuery, matched: Option<&'a ReferenceRecord>) -> &'a str {
    if !query.postcode.is_empty() {
        return &query.postcode;
    }
    matched
        .and_then(|record| record.postcode_district.as_deref())
        .unwrap_or(UNKNOWN_POSTCODE)
}

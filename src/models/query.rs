//! Parser boundary types and the normalized address query.

use serde::{Deserialize, Serialize};

/// Component label vocabulary of the external address parser.
///
/// The parser emits an ordered list of `(value, label)` pairs; labels
/// outside this vocabulary collapse to `Other` and are ignored by the
/// normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentLabel {
    Road,
    Suburb,
    City,
    Neighborhood,
    Village,
    Hamlet,
    StateDistrict,
    Postcode,
    HouseNumber,
    House,
    Unit,
    State,
    Country,
    #[serde(other)]
    Other,
}

impl ComponentLabel {
    /// Labels whose values are concatenated into the search term, in the
    /// order they appear in the parser output.
    pub fn is_geo_bearing(&self) -> bool {
        matches!(
            self,
            ComponentLabel::Road
                | ComponentLabel::Suburb
                | ComponentLabel::City
                | ComponentLabel::Neighborhood
                | ComponentLabel::Village
                | ComponentLabel::Hamlet
                | ComponentLabel::StateDistrict
        )
    }
}

/// One labeled token from the external address parser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedComponent {
    pub value: String,
    pub label: ComponentLabel,
}

impl ParsedComponent {
    pub fn new(value: impl Into<String>, label: ComponentLabel) -> Self {
        Self {
            value: value.into(),
            label,
        }
    }
}

/// Canonical search key derived once per validation call.
///
/// All fields are uppercased; emptiness is represented by empty strings
/// for the always-present fields and `None` for the optional ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressQuery {
    /// Concatenated geo-bearing tokens, or the deterministic fallback.
    pub search_term: String,

    /// Concatenated postcode tokens, possibly empty.
    pub postcode: String,

    /// First whitespace-delimited segment of `postcode`, or empty.
    pub postcode_district: String,

    pub house_number: Option<String>,

    /// Best-guess user-stated locality, used only for mismatch detection.
    pub area_context: Option<String>,
}

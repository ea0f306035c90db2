//! Gazetteer record structure for the reference index.

use serde::{Deserialize, Serialize};

/// Category of a gazetteer record, mapped from the raw `LOCAL_TYPE` column.
///
/// Only these kinds are ingested; rows with any other local type are
/// dropped at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordKind {
    Postcode,
    NamedRoad,
    Village,
    Hamlet,
    OtherSettlement,
}

impl RecordKind {
    /// Parse a raw `LOCAL_TYPE` value. Returns `None` for unrecognized types.
    pub fn from_local_type(raw: &str) -> Option<Self> {
        match raw.trim() {
            "Postcode" => Some(RecordKind::Postcode),
            "Named Road" => Some(RecordKind::NamedRoad),
            "Village" => Some(RecordKind::Village),
            "Hamlet" => Some(RecordKind::Hamlet),
            "Other Settlement" => Some(RecordKind::OtherSettlement),
            _ => None,
        }
    }

    /// The raw `LOCAL_TYPE` spelling, used in provider metadata output.
    pub fn as_local_type(&self) -> &'static str {
        match self {
            RecordKind::Postcode => "Postcode",
            RecordKind::NamedRoad => "Named Road",
            RecordKind::Village => "Village",
            RecordKind::Hamlet => "Hamlet",
            RecordKind::OtherSettlement => "Other Settlement",
        }
    }

    /// Whether an address resolving to this kind is residential.
    ///
    /// Every ingested kind is residential today; the match stays explicit
    /// so a future non-residential kind (e.g. commercial sites) changes
    /// classification rather than silently inheriting it.
    pub fn is_residential(&self) -> bool {
        match self {
            RecordKind::Postcode
            | RecordKind::NamedRoad
            | RecordKind::Village
            | RecordKind::Hamlet
            | RecordKind::OtherSettlement => true,
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_local_type())
    }
}

/// One gazetteer entry, projected down to the columns the match and
/// scoring logic consume.
///
/// Invariant: `name1` is non-empty and uppercased at build time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceRecord {
    /// Stable source identifier, unique within a gazetteer release.
    pub id: String,

    /// Place/road/postcode name, uppercase-normalized for matching.
    pub name1: String,

    pub kind: RecordKind,

    /// Outward postcode prefix (e.g. `ZE2`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postcode_district: Option<String>,

    /// Administrative hierarchy, each level optional.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub populated_place: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district_borough: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub county_unitary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_type_parsing() {
        assert_eq!(
            RecordKind::from_local_type("Named Road"),
            Some(RecordKind::NamedRoad)
        );
        assert_eq!(
            RecordKind::from_local_type(" Postcode "),
            Some(RecordKind::Postcode)
        );
        assert_eq!(RecordKind::from_local_type("City"), None);
        assert_eq!(RecordKind::from_local_type(""), None);
    }

    #[test]
    fn test_local_type_round_trip() {
        for raw in [
            "Postcode",
            "Named Road",
            "Village",
            "Hamlet",
            "Other Settlement",
        ] {
            let kind = RecordKind::from_local_type(raw).unwrap();
            assert_eq!(kind.as_local_type(), raw);
        }
    }
}

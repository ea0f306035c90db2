//! Normalization of parser output into a canonical search key.

use crate::models::{AddressQuery, ComponentLabel, ParsedComponent};

/// Derive an [`AddressQuery`] from the external parser's labeled tokens
/// plus the raw input text. Pure function, no I/O.
pub fn normalize(components: &[ParsedComponent], raw_text: &str) -> AddressQuery {
    let mut search_parts: Vec<String> = Vec::new();
    let mut postcode_parts: Vec<String> = Vec::new();
    let mut house_number = None;

    for component in components {
        if component.label.is_geo_bearing() {
            search_parts.push(component.value.to_uppercase());
        }
        match component.label {
            ComponentLabel::Postcode => postcode_parts.push(component.value.to_uppercase()),
            ComponentLabel::HouseNumber => {
                if house_number.is_none() {
                    house_number = Some(component.value.trim().to_string());
                }
            }
            _ => {}
        }
    }

    let mut search_term = search_parts.join(" ").trim().to_string();
    if search_term.is_empty() {
        search_term = fallback_search_term(raw_text);
    }

    let postcode = postcode_parts.join(" ").trim().to_string();
    let postcode_district = postcode
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_string();

    AddressQuery {
        search_term,
        postcode,
        postcode_district,
        house_number,
        area_context: area_context(components),
    }
}

/// When no geo-bearing token exists: the text before the first comma,
/// else the first whitespace-delimited token. Uppercased either way.
fn fallback_search_term(raw_text: &str) -> String {
    let term = match raw_text.split_once(',') {
        Some((before, _)) => before,
        None => raw_text.split_whitespace().next().unwrap_or_default(),
    };
    term.trim().to_uppercase()
}

/// First non-empty of the city, suburb, and state-district labels.
fn area_context(components: &[ParsedComponent]) -> Option<String> {
    for label in [
        ComponentLabel::City,
        ComponentLabel::Suburb,
        ComponentLabel::StateDistrict,
    ] {
        if let Some(value) = components
            .iter()
            .find(|c| c.label == label && !c.value.trim().is_empty())
        {
            return Some(value.value.trim().to_uppercase());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(value: &str, label: ComponentLabel) -> ParsedComponent {
        ParsedComponent::new(value, label)
    }

    #[test]
    fn test_geo_tokens_joined_in_parser_order() {
        let query = normalize(
            &[
                component("melby road", ComponentLabel::Road),
                component("walls", ComponentLabel::Village),
                component("ze2 9pl", ComponentLabel::Postcode),
            ],
            "Melby Road, Walls, ZE2 9PL",
        );

        assert_eq!(query.search_term, "MELBY ROAD WALLS");
        assert_eq!(query.postcode, "ZE2 9PL");
        assert_eq!(query.postcode_district, "ZE2");
    }

    #[test]
    fn test_fallback_takes_text_before_first_comma() {
        let query = normalize(
            &[component("7", ComponentLabel::HouseNumber)],
            "Dragon Breath Lane, ZZ9 9ZZ",
        );
        assert_eq!(query.search_term, "DRAGON BREATH LANE");
    }

    #[test]
    fn test_fallback_takes_first_token_without_comma() {
        let query = normalize(&[], "Woodend WF10");
        assert_eq!(query.search_term, "WOODEND");
    }

    #[test]
    fn test_empty_input_normalizes_to_empty_query() {
        let query = normalize(&[], "");
        assert_eq!(query.search_term, "");
        assert_eq!(query.postcode, "");
        assert_eq!(query.postcode_district, "");
        assert!(query.area_context.is_none());
    }

    #[test]
    fn test_multiple_postcode_tokens_joined() {
        let query = normalize(
            &[
                component("york road", ComponentLabel::Road),
                component("gu22", ComponentLabel::Postcode),
                component("7xx", ComponentLabel::Postcode),
            ],
            "York Road, GU22 7XX",
        );
        assert_eq!(query.postcode, "GU22 7XX");
        assert_eq!(query.postcode_district, "GU22");
    }

    #[test]
    fn test_area_context_prefers_city_over_suburb() {
        let query = normalize(
            &[
                component("high street", ComponentLabel::Road),
                component("headingley", ComponentLabel::Suburb),
                component("leeds", ComponentLabel::City),
            ],
            "High Street, Headingley, Leeds",
        );
        assert_eq!(query.area_context.as_deref(), Some("LEEDS"));
    }

    #[test]
    fn test_area_context_falls_back_to_state_district() {
        let query = normalize(
            &[
                component("high street", ComponentLabel::Road),
                component("lancaster", ComponentLabel::StateDistrict),
            ],
            "High Street, Lancaster",
        );
        assert_eq!(query.area_context.as_deref(), Some("LANCASTER"));
    }

    #[test]
    fn test_house_number_passthrough() {
        let query = normalize(
            &[
                component("12", ComponentLabel::HouseNumber),
                component("york road", ComponentLabel::Road),
            ],
            "12 York Road",
        );
        assert_eq!(query.house_number.as_deref(), Some("12"));
    }

    #[test]
    fn test_unknown_labels_ignored() {
        let query = normalize(
            &[
                component("flat 3", ComponentLabel::Unit),
                component("york road", ComponentLabel::Road),
            ],
            "Flat 3 York Road",
        );
        assert_eq!(query.search_term, "YORK ROAD");
    }
}

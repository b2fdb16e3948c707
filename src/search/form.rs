//! Search form assembly.

use crate::portal;
use crate::search::criteria::SearchCriteria;

/// Renders a criteria value into the portal's fixed form schema.
///
/// Every key in [`portal::SEARCH_FORM_KEYS`] is emitted exactly once and in
/// schema order; fields the criteria does not use ship as empty strings, the
/// portal rejects submissions with keys missing. Extension fields are
/// applied last and may override anything, including the token.
pub fn build_search_form(criteria: &SearchCriteria, form_token: &str) -> Vec<(String, String)> {
    let mut form: Vec<(String, String)> = portal::SEARCH_FORM_KEYS
        .iter()
        .map(|&key| {
            let value = match key {
                k if k == portal::CSRF_FORM_FIELD => form_token.to_string(),
                "type" => criteria.search_type().as_str().to_string(),
                "search" => criteria.search_term().to_string(),
                "openedFrom" => criteria.opened_from().unwrap_or_default().to_string(),
                "openedTo" => criteria.opened_to().unwrap_or_default().to_string(),
                "closedFrom" => criteria.closed_from().unwrap_or_default().to_string(),
                "closedTo" => criteria.closed_to().unwrap_or_default().to_string(),
                "courtTypes" => criteria.court_type_ids().join(","),
                "partyTypes" => criteria.party_type_ids().join(","),
                "divisions" => criteria.division_ids().join(","),
                _ => String::new(),
            };
            (key.to_string(), value)
        })
        .collect();

    for (key, value) in criteria.extra_fields() {
        match form.iter_mut().find(|(existing, _)| existing == key) {
            Some(slot) => slot.1 = value.clone(),
            None => form.push((key.clone(), value.clone())),
        }
    }
    form
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::criteria::SearchType;

    fn value_of<'a>(form: &'a [(String, String)], key: &str) -> &'a str {
        &form.iter().find(|(k, _)| k == key).expect("key present").1
    }

    #[test]
    fn test_every_schema_key_ships_in_order() {
        let criteria = SearchCriteria::new("Doe, John", SearchType::Name);
        let form = build_search_form(&criteria, "tok");
        let keys: Vec<&str> = form.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, portal::SEARCH_FORM_KEYS);
    }

    #[test]
    fn test_unused_fields_are_empty_not_missing() {
        let criteria = SearchCriteria::new("Doe, John", SearchType::Name);
        let form = build_search_form(&criteria, "tok");
        assert_eq!(value_of(&form, "caseTypes"), "");
        assert_eq!(value_of(&form, "openedFrom"), "");
        assert_eq!(value_of(&form, "attorneyFileNumber"), "");
    }

    #[test]
    fn test_defaults_render_comma_joined() {
        let criteria = SearchCriteria::new("Doe, John", SearchType::Name);
        let form = build_search_form(&criteria, "tok");
        assert_eq!(value_of(&form, "courtTypes"), "22,2,20,21,7,10");
        assert_eq!(value_of(&form, "partyTypes"), "1,2,3,4,5");
        assert_eq!(value_of(&form, "divisions"), "1");
    }

    #[test]
    fn test_term_type_and_token_land_in_place() {
        let criteria = SearchCriteria::new("24TR123456", SearchType::CaseNumber)
            .opened_between(Some("2024-01-01"), Some("2024-06-30"));
        let form = build_search_form(&criteria, "tok-77");
        assert_eq!(value_of(&form, "__RequestVerificationToken"), "tok-77");
        assert_eq!(value_of(&form, "type"), "CaseNumber");
        assert_eq!(value_of(&form, "search"), "24TR123456");
        assert_eq!(value_of(&form, "openedFrom"), "2024-01-01");
        assert_eq!(value_of(&form, "openedTo"), "2024-06-30");
    }

    #[test]
    fn test_extras_override_known_keys_without_duplicating() {
        let criteria = SearchCriteria::new("Doe, John", SearchType::Name)
            .extra_field("caseStatus", "Open")
            .extra_field("customFlag", "1");
        let form = build_search_form(&criteria, "tok");
        assert_eq!(value_of(&form, "caseStatus"), "Open");
        assert_eq!(value_of(&form, "customFlag"), "1");
        assert_eq!(form.len(), portal::SEARCH_FORM_KEYS.len() + 1);
        let status_keys = form.iter().filter(|(k, _)| k == "caseStatus").count();
        assert_eq!(status_keys, 1);
    }
}

//! Search criteria model.

use std::collections::BTreeMap;

use crate::portal;

/// Which index the portal searches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    Name,
    CaseNumber,
    Attorney,
}

impl SearchType {
    /// Wire value of the form's `type` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::Name => "Name",
            SearchType::CaseNumber => "CaseNumber",
            SearchType::Attorney => "Attorney",
        }
    }
}

/// One search submission, fixed once built.
///
/// List filters are seeded with the portal's defaults at construction, so a
/// criteria value never carries an absent filter. Setters replace values
/// wholesale; the extension map is applied to the form last and can override
/// any field the builder produced.
#[derive(Debug, Clone)]
pub struct SearchCriteria {
    search_term: String,
    search_type: SearchType,
    court_types: Vec<String>,
    party_types: Vec<String>,
    divisions: Vec<String>,
    opened_from: Option<String>,
    opened_to: Option<String>,
    closed_from: Option<String>,
    closed_to: Option<String>,
    max_results: u32,
    extra: BTreeMap<String, String>,
}

impl SearchCriteria {
    pub fn new(search_term: impl Into<String>, search_type: SearchType) -> Self {
        Self {
            search_term: search_term.into(),
            search_type,
            court_types: to_owned(portal::DEFAULT_COURT_TYPES),
            party_types: to_owned(portal::DEFAULT_PARTY_TYPES),
            divisions: to_owned(portal::DEFAULT_DIVISIONS),
            opened_from: None,
            opened_to: None,
            closed_from: None,
            closed_to: None,
            max_results: 50,
            extra: BTreeMap::new(),
        }
    }

    pub fn court_types(mut self, ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.court_types = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn party_types(mut self, ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.party_types = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn divisions(mut self, ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.divisions = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Opened date range, `YYYY-MM-DD`, passed to the portal verbatim.
    pub fn opened_between(mut self, from: Option<&str>, to: Option<&str>) -> Self {
        self.opened_from = from.map(str::to_string);
        self.opened_to = to.map(str::to_string);
        self
    }

    /// Closed date range, `YYYY-MM-DD`.
    pub fn closed_between(mut self, from: Option<&str>, to: Option<&str>) -> Self {
        self.closed_from = from.map(str::to_string);
        self.closed_to = to.map(str::to_string);
        self
    }

    /// Cap on rows fetched when a search fans out into a results grid.
    pub fn max_results(mut self, max: u32) -> Self {
        self.max_results = max;
        self
    }

    /// Raw form override, applied after every built field. An unknown key is
    /// appended; a known key replaces the built value.
    pub fn extra_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn search_type(&self) -> SearchType {
        self.search_type
    }

    pub(crate) fn court_type_ids(&self) -> &[String] {
        &self.court_types
    }

    pub(crate) fn party_type_ids(&self) -> &[String] {
        &self.party_types
    }

    pub(crate) fn division_ids(&self) -> &[String] {
        &self.divisions
    }

    pub(crate) fn opened_from(&self) -> Option<&str> {
        self.opened_from.as_deref()
    }

    pub(crate) fn opened_to(&self) -> Option<&str> {
        self.opened_to.as_deref()
    }

    pub(crate) fn closed_from(&self) -> Option<&str> {
        self.closed_from.as_deref()
    }

    pub(crate) fn closed_to(&self) -> Option<&str> {
        self.closed_to.as_deref()
    }

    pub fn result_cap(&self) -> u32 {
        self.max_results
    }

    pub(crate) fn extra_fields(&self) -> &BTreeMap<String, String> {
        &self.extra
    }
}

fn to_owned(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_seeded_at_construction() {
        let criteria = SearchCriteria::new("Doe, John", SearchType::Name);
        assert_eq!(criteria.court_type_ids(), ["22", "2", "20", "21", "7", "10"]);
        assert_eq!(criteria.party_type_ids(), ["1", "2", "3", "4", "5"]);
        assert_eq!(criteria.division_ids(), ["1"]);
        assert_eq!(criteria.result_cap(), 50);
        assert_eq!(criteria.opened_from(), None);
    }

    #[test]
    fn test_setters_replace_wholesale() {
        let criteria = SearchCriteria::new("24TR123456", SearchType::CaseNumber)
            .court_types(["2"])
            .opened_between(Some("2024-01-01"), None)
            .max_results(10);
        assert_eq!(criteria.court_type_ids(), ["2"]);
        assert_eq!(criteria.opened_from(), Some("2024-01-01"));
        assert_eq!(criteria.opened_to(), None);
        assert_eq!(criteria.result_cap(), 10);
        assert_eq!(criteria.search_type().as_str(), "CaseNumber");
    }

    #[test]
    fn test_wire_values_match_the_portal() {
        assert_eq!(SearchType::Name.as_str(), "Name");
        assert_eq!(SearchType::CaseNumber.as_str(), "CaseNumber");
        assert_eq!(SearchType::Attorney.as_str(), "Attorney");
    }
}

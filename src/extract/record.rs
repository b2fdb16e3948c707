//! Output data model for extracted case records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One fully-extracted court case.
///
/// `detail` holds whatever labelled fields the page offered, keyed by a
/// normalized form of the on-screen label (`"Date Filed:"` becomes
/// `date_filed`). Sections the page did not render are simply absent from
/// the serialized form, except `docket_history` which is always present so
/// downstream consumers can tell "no docket" from "not fetched".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_number: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub detail: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parties: Vec<Party>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub charges: Vec<BTreeMap<String, String>>,
    #[serde(default)]
    pub docket_history: Vec<DocketEntry>,
    pub url: String,
}

/// A party to the case, as listed in the parties grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Party {
    pub name: String,
    #[serde(rename = "type")]
    pub party_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attorney: Option<String>,
}

/// One row of the docket-history grid.
///
/// `id` is the portal's row identifier (used by its expand widget); rows
/// without one keep an empty id rather than being dropped, since the entry
/// text is still meaningful.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocketEntry {
    pub id: String,
    #[serde(flatten)]
    pub columns: BTreeMap<String, String>,
}

//! Summary fragment parser.
//!
//! The details page loads a summary fragment over XHR: definition lists with
//! labelled fields, plus richer parties and charges grids than the base page
//! renders. Fragment data is authoritative, so merging overwrites base-page
//! fields and replaces base-page sections when the fragment has them.

use std::collections::BTreeMap;

use scraper::{Html, Selector};

use crate::extract::record::{CaseRecord, Party};
use crate::extract::{element_text, snake_key};
use crate::portal;

/// Parsed contents of one summary fragment. `detail` keeps document order
/// so that repeated labels overwrite the way the portal renders them.
#[derive(Debug, Default, PartialEq)]
pub struct SummaryFragment {
    pub detail: Vec<(String, String)>,
    pub parties: Vec<Party>,
    pub charges: Vec<BTreeMap<String, String>>,
}

impl SummaryFragment {
    /// Folds the fragment into a base-page record. Labelled fields win over
    /// base-page values; parties and charges replace wholesale but only when
    /// the fragment actually carried some. Docket history is not summary
    /// data and is left alone.
    pub fn merge_into(self, record: &mut CaseRecord) {
        for (key, value) in self.detail {
            record.detail.insert(key, value);
        }
        if !self.parties.is_empty() {
            record.parties = self.parties;
        }
        if !self.charges.is_empty() {
            record.charges = self.charges;
        }
    }
}

pub fn parse_summary_fragment(html: &str) -> SummaryFragment {
    let doc = Html::parse_fragment(html);
    SummaryFragment {
        detail: definition_pairs(&doc),
        parties: parties_grid(&doc),
        charges: charges_grid(&doc),
    }
}

/// dt/dd pairs from every horizontal definition list. The portal pads empty
/// slots with non-breaking spaces; those are not values.
fn definition_pairs(doc: &Html) -> Vec<(String, String)> {
    let list_sel = Selector::parse("dl.dl-horizontal").expect("list selector is valid");
    let dt_sel = Selector::parse("dt").expect("dt selector is valid");
    let dd_sel = Selector::parse("dd").expect("dd selector is valid");

    let mut pairs = Vec::new();
    for list in doc.select(&list_sel) {
        let labels = list.select(&dt_sel);
        let values = list.select(&dd_sel);
        for (dt, dd) in labels.zip(values) {
            let key = snake_key(&element_text(&dt));
            let value = element_text(&dd);
            if key.is_empty() || value.is_empty() || value == "\u{a0}" || value == "&#160;" {
                continue;
            }
            pairs.push((key, value));
        }
    }
    pairs
}

fn parties_grid(doc: &Html) -> Vec<Party> {
    let table_sel = Selector::parse(&format!("table#{}", portal::PARTIES_TABLE_ID))
        .expect("parties table selector is valid");
    let Some(table) = doc.select(&table_sel).next() else {
        return Vec::new();
    };
    let row_sel = Selector::parse("tbody tr").expect("row selector is valid");
    let cell_sel = Selector::parse("td").expect("cell selector is valid");
    let link_sel = Selector::parse("a").expect("link selector is valid");

    let mut parties = Vec::new();
    for row in table.select(&row_sel) {
        let cells: Vec<_> = row.select(&cell_sel).collect();
        if cells.len() < 2 {
            continue;
        }
        // The name cell usually wraps the name in a profile link.
        let name = cells[1]
            .select(&link_sel)
            .next()
            .map(|link| element_text(&link))
            .unwrap_or_else(|| element_text(&cells[1]));
        let attorney = cells
            .get(2)
            .map(|cell| element_text(cell))
            .filter(|text| !text.is_empty());
        parties.push(Party {
            name,
            party_type: element_text(&cells[0]),
            attorney,
        });
    }
    parties
}

/// Charges keyed by the grid's own headers, falling back to positional
/// `field_N` keys when the header row is missing or mismatched. Blank cells
/// are dropped either way.
fn charges_grid(doc: &Html) -> Vec<BTreeMap<String, String>> {
    let table_sel = Selector::parse(&format!("table#{}", portal::CHARGES_TABLE_ID))
        .expect("charges table selector is valid");
    let Some(table) = doc.select(&table_sel).next() else {
        return Vec::new();
    };
    let header_sel = Selector::parse("thead th").expect("header selector is valid");
    let headers: Vec<String> = table
        .select(&header_sel)
        .map(|cell| snake_key(&element_text(&cell)))
        .collect();

    let row_sel = Selector::parse("tbody tr").expect("row selector is valid");
    let cell_sel = Selector::parse("td").expect("cell selector is valid");

    let mut charges = Vec::new();
    for row in table.select(&row_sel) {
        let cells: Vec<_> = row.select(&cell_sel).collect();
        if cells.is_empty() {
            continue;
        }
        let mut charge = BTreeMap::new();
        if !headers.is_empty() && headers.len() == cells.len() {
            for (header, cell) in headers.iter().zip(&cells) {
                let text = element_text(cell);
                if !header.is_empty() && !text.is_empty() {
                    charge.insert(header.clone(), text);
                }
            }
        } else {
            for (i, cell) in cells.iter().enumerate() {
                let text = element_text(cell);
                if !text.is_empty() {
                    charge.insert(format!("field_{i}"), text);
                }
            }
        }
        if !charge.is_empty() {
            charges.push(charge);
        }
    }
    charges
}

//! Case details page parser.
//!
//! Details pages vary across portal versions, so extraction is a set of
//! independent best-effort passes: every labelled table row, the parties and
//! charges sections when rendered, and any docket table. Nothing here fails;
//! a page with none of the expected markup just produces a sparse record.

use regex::Regex;
use scraper::{Html, Selector};

use crate::extract::docket::parse_docket_history;
use crate::extract::record::{CaseRecord, Party};
use crate::extract::{element_text, snake_key};
use crate::portal;

/// Extracts one record from a full details page. `url` is the final URL the
/// page was served from and is carried on the record verbatim.
pub fn parse_case_details(html: &str, url: &str) -> CaseRecord {
    let doc = Html::parse_document(html);
    let mut record = CaseRecord {
        url: url.to_string(),
        ..CaseRecord::default()
    };

    record.case_number = case_number(&doc);
    harvest_detail_tables(&doc, &mut record);
    harvest_parties(&doc, &mut record);
    harvest_charges(&doc, &mut record);
    if let Some(history) = parse_docket_history(&doc) {
        record.docket_history = history;
    }
    record
}

/// Pulls the portal-internal case id and digest out of the page's inline
/// scripts. Both are required for fragment requests, so a page missing
/// either yields `None`.
pub fn fragment_keys(html: &str) -> Option<(String, String)> {
    let cid_re = Regex::new(portal::CASE_ID_VAR_RE).expect("case id pattern is valid");
    let digest_re = Regex::new(portal::CASE_DIGEST_VAR_RE).expect("digest pattern is valid");
    let cid = cid_re.captures(html)?.get(1)?.as_str().to_string();
    let digest = digest_re.captures(html)?.get(1)?.as_str().to_string();
    Some((cid, digest))
}

/// Case number, in declining order of trust: the `<title>` prefix when it
/// looks like a case number, then the page heading, then the inline-script
/// assignment.
fn case_number(doc: &Html) -> Option<String> {
    let shape = Regex::new(portal::CASE_NUMBER_SHAPE_RE).expect("case number shape is valid");

    let title_sel = Selector::parse("title").expect("title selector is valid");
    if let Some(title) = doc.select(&title_sel).next() {
        let text = element_text(&title);
        if let Some(prefix) = text.split('-').next() {
            let candidate = prefix.trim();
            if shape.is_match(candidate) {
                return Some(candidate.to_string());
            }
        }
    }

    let heading_sel = Selector::parse("h2.case-heading").expect("heading selector is valid");
    if let Some(heading) = doc.select(&heading_sel).next() {
        let text = element_text(&heading);
        if !text.is_empty() {
            return Some(text);
        }
    }

    let script_sel = Selector::parse("script").expect("script selector is valid");
    let var_re = Regex::new(portal::CASE_NUMBER_VAR_RE).expect("case number pattern is valid");
    for script in doc.select(&script_sel) {
        let body: String = script.text().collect();
        if let Some(caps) = var_re.captures(&body) {
            return caps.get(1).map(|m| m.as_str().to_string());
        }
    }
    None
}

/// Every `table.table` on the page is treated as label/value rows, except
/// the docket grid which has its own grammar. Repeated labels keep the last
/// value seen, matching the portal's own render order.
fn harvest_detail_tables(doc: &Html, record: &mut CaseRecord) {
    let table_sel = Selector::parse("table.table").expect("detail table selector is valid");
    let row_sel = Selector::parse("tr").expect("row selector is valid");
    let cell_sel = Selector::parse("th, td").expect("cell selector is valid");

    for table in doc.select(&table_sel) {
        if table.value().attr("id") == Some(portal::DOCKETS_TABLE_ID) {
            continue;
        }
        for row in table.select(&row_sel) {
            let cells: Vec<_> = row.select(&cell_sel).collect();
            if cells.len() < 2 {
                continue;
            }
            let label = snake_key(&element_text(&cells[0]));
            let value = element_text(&cells[1]);
            if !label.is_empty() && !value.is_empty() {
                record.detail.insert(label, value);
            }
        }
    }
}

fn harvest_parties(doc: &Html, record: &mut CaseRecord) {
    let Some(section) = first_section(doc, "div#parties", "section.parties") else {
        return;
    };
    let row_sel = Selector::parse("tr").expect("row selector is valid");
    let cell_sel = Selector::parse("td").expect("cell selector is valid");
    for row in section.select(&row_sel) {
        let cells: Vec<_> = row.select(&cell_sel).collect();
        if cells.len() < 2 {
            continue;
        }
        record.parties.push(Party {
            name: element_text(&cells[0]),
            party_type: element_text(&cells[1]),
            attorney: None,
        });
    }
}

fn harvest_charges(doc: &Html, record: &mut CaseRecord) {
    let Some(section) = first_section(doc, "div#charges", "section.charges") else {
        return;
    };
    let row_sel = Selector::parse("tr").expect("row selector is valid");
    let cell_sel = Selector::parse("td").expect("cell selector is valid");
    for row in section.select(&row_sel) {
        let mut charge = std::collections::BTreeMap::new();
        for (i, cell) in row.select(&cell_sel).enumerate() {
            let text = element_text(&cell);
            if !text.is_empty() {
                charge.insert(format!("column_{i}"), text);
            }
        }
        if !charge.is_empty() {
            record.charges.push(charge);
        }
    }
}

fn first_section<'a>(
    doc: &'a Html,
    primary: &str,
    fallback: &str,
) -> Option<scraper::ElementRef<'a>> {
    let primary_sel = Selector::parse(primary).expect("section selector is valid");
    let fallback_sel = Selector::parse(fallback).expect("section selector is valid");
    doc.select(&primary_sel)
        .next()
        .or_else(|| doc.select(&fallback_sel).next())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAILS_PAGE: &str = r#"
        <html>
        <head><title>24TR123456 - Case Details</title></head>
        <body>
          <table class="table">
            <tr><th>Date Filed:</th><td>01/15/2024</td></tr>
            <tr><th>Judge:</th><td>Lane, L.</td></tr>
            <tr><th>Status:</th><td></td></tr>
          </table>
          <table class="table">
            <tr><th>Judge:</th><td>Reyes, P.</td></tr>
          </table>
          <table class="table" id="gridDockets">
            <thead><tr><th></th><th>Date</th><th>Entry</th></tr></thead>
            <tbody>
              <tr><td><img rel="31"></td><td>01/20/2024</td><td>FIRST APPEARANCE</td></tr>
            </tbody>
          </table>
          <div id="parties">
            <table><tr><td>DOE, JOHN</td><td>Defendant</td></tr></table>
          </div>
          <div id="charges">
            <table><tr><td>SPEEDING</td><td></td><td>17-MPH OVER</td></tr></table>
          </div>
          <script>var cid = 4077; var caseDigest = 'a1b2c3';</script>
        </body>
        </html>"#;

    #[test]
    fn test_title_prefix_wins_as_case_number() {
        let record = parse_case_details(DETAILS_PAGE, "https://p.example/x");
        assert_eq!(record.case_number.as_deref(), Some("24TR123456"));
    }

    #[test]
    fn test_caption_title_falls_back_to_heading() {
        let html = r#"
            <title>Case Details</title>
            <h2 class="case-heading">24CR000321</h2>"#;
        let record = parse_case_details(html, "https://p.example/x");
        assert_eq!(record.case_number.as_deref(), Some("24CR000321"));
    }

    #[test]
    fn test_script_variable_is_last_resort() {
        let html = r#"
            <title>Case Details</title>
            <script>var caseNumber = '24TR999888';</script>"#;
        let record = parse_case_details(html, "https://p.example/x");
        assert_eq!(record.case_number.as_deref(), Some("24TR999888"));
    }

    #[test]
    fn test_no_case_number_stays_none() {
        let record = parse_case_details("<title>Details</title>", "https://p.example/x");
        assert_eq!(record.case_number, None);
    }

    #[test]
    fn test_labelled_rows_become_detail_fields() {
        let record = parse_case_details(DETAILS_PAGE, "https://p.example/x");
        assert_eq!(record.detail["date_filed"], "01/15/2024");
        // Later tables overwrite earlier ones; empty values never land.
        assert_eq!(record.detail["judge"], "Reyes, P.");
        assert!(!record.detail.contains_key("status"));
    }

    #[test]
    fn test_docket_grid_is_not_a_detail_table() {
        let record = parse_case_details(DETAILS_PAGE, "https://p.example/x");
        assert!(!record.detail.contains_key("date"));
        assert_eq!(record.docket_history.len(), 1);
        assert_eq!(record.docket_history[0].id, "31");
        assert_eq!(record.docket_history[0].columns["entry"], "FIRST APPEARANCE");
    }

    #[test]
    fn test_parties_and_charges_sections() {
        let record = parse_case_details(DETAILS_PAGE, "https://p.example/x");
        assert_eq!(record.parties.len(), 1);
        assert_eq!(record.parties[0].name, "DOE, JOHN");
        assert_eq!(record.parties[0].party_type, "Defendant");
        assert_eq!(record.parties[0].attorney, None);
        assert_eq!(record.charges.len(), 1);
        assert_eq!(record.charges[0]["column_0"], "SPEEDING");
        assert_eq!(record.charges[0]["column_2"], "17-MPH OVER");
        assert!(!record.charges[0].contains_key("column_1"));
    }

    #[test]
    fn test_sparse_page_yields_sparse_record() {
        let record = parse_case_details("<p>maintenance window</p>", "https://p.example/x");
        assert_eq!(record.case_number, None);
        assert!(record.detail.is_empty());
        assert!(record.parties.is_empty());
        assert!(record.charges.is_empty());
        assert!(record.docket_history.is_empty());
        assert_eq!(record.url, "https://p.example/x");
    }

    #[test]
    fn test_fragment_keys_need_both_variables() {
        assert_eq!(
            fragment_keys(DETAILS_PAGE),
            Some(("4077".to_string(), "a1b2c3".to_string()))
        );
        assert_eq!(fragment_keys("<script>var cid = 4077;</script>"), None);
        assert_eq!(fragment_keys("<script>var caseDigest = 'zz';</script>"), None);
    }
}

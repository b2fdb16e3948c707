//! Docket-history table grammar.
//!
//! The same `gridDockets` table appears on full details pages and inside the
//! docket fragment, so both paths share this parser. Header cells name the
//! columns; when the header row is missing or disagrees with a row's cell
//! count, cells fall back to positional `column_N` keys rather than being
//! guessed into the wrong column.

use scraper::{Html, Selector};
use tracing::warn;

use crate::extract::{element_text, snake_key};
use crate::extract::record::DocketEntry;
use crate::portal;

/// Parses the docket table out of a full document, `None` when absent.
pub fn parse_docket_history(doc: &Html) -> Option<Vec<DocketEntry>> {
    let table_sel = Selector::parse(&format!("table#{}", portal::DOCKETS_TABLE_ID))
        .expect("docket table selector is valid");
    let table = doc.select(&table_sel).next()?;

    let header_sel = Selector::parse("thead th").expect("header selector is valid");
    let headers: Vec<String> = table
        .select(&header_sel)
        .map(|cell| snake_key(&element_text(&cell)))
        .collect();

    let row_sel = Selector::parse("tbody tr").expect("row selector is valid");
    let cell_sel = Selector::parse("td").expect("cell selector is valid");
    let img_sel = Selector::parse("img").expect("img selector is valid");

    let mut history = Vec::new();
    for row in table.select(&row_sel) {
        let cells: Vec<_> = row.select(&cell_sel).collect();
        if cells.is_empty() {
            continue;
        }

        // The expand icon in the first cell carries the row id, either as a
        // rel attribute or as an id like `img_8812`.
        let id = cells[0]
            .select(&img_sel)
            .next()
            .and_then(|img| {
                let attrs = img.value();
                attrs.attr("rel").map(str::to_string).or_else(|| {
                    attrs.attr("id").map(|raw| {
                        raw.strip_prefix(portal::DOCKET_IMG_ID_PREFIX)
                            .unwrap_or(raw)
                            .to_string()
                    })
                })
            })
            .unwrap_or_default();

        let mut entry = DocketEntry { id, ..DocketEntry::default() };
        if !headers.is_empty() && headers.len() == cells.len() {
            for (header, cell) in headers.iter().zip(&cells) {
                // The expand column has a blank header; id is reserved.
                if header.is_empty() || header == "id" {
                    continue;
                }
                entry.columns.insert(header.clone(), element_text(cell));
            }
        } else {
            for (i, cell) in cells.iter().enumerate() {
                entry.columns.insert(format!("column_{i}"), element_text(cell));
            }
        }
        history.push(entry);
    }
    Some(history)
}

/// Parses a standalone docket fragment; a missing table yields an empty
/// history (the portal serves an empty fragment for docketless cases).
pub fn parse_docket_fragment(html: &str) -> Vec<DocketEntry> {
    let doc = Html::parse_fragment(html);
    parse_docket_history(&doc).unwrap_or_else(|| {
        warn!("docket fragment carried no docket table");
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCKET_PAGE: &str = r#"
        <table id="gridDockets" class="table">
          <thead>
            <tr><th></th><th>Date</th><th>Docket Entry</th></tr>
          </thead>
          <tbody>
            <tr>
              <td><img id="img_8812" src="expand.gif"></td>
              <td>01/20/2024</td>
              <td>ARRAIGNMENT SET</td>
            </tr>
            <tr>
              <td><img rel="9001" src="expand.gif"></td>
              <td>02/03/2024</td>
              <td>CONTINUANCE GRANTED</td>
            </tr>
          </tbody>
        </table>"#;

    #[test]
    fn test_headers_name_the_columns() {
        let doc = Html::parse_document(DOCKET_PAGE);
        let history = parse_docket_history(&doc).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].columns["date"], "01/20/2024");
        assert_eq!(history[0].columns["docket_entry"], "ARRAIGNMENT SET");
        assert!(!history[0].columns.contains_key(""));
    }

    #[test]
    fn test_row_id_prefers_rel_over_img_id() {
        let doc = Html::parse_document(DOCKET_PAGE);
        let history = parse_docket_history(&doc).unwrap();
        assert_eq!(history[0].id, "8812");
        assert_eq!(history[1].id, "9001");
    }

    #[test]
    fn test_header_mismatch_falls_back_to_positions() {
        let html = r#"
            <table id="gridDockets">
              <thead><tr><th>Date</th><th>Entry</th></tr></thead>
              <tbody>
                <tr>
                  <td><img rel="7710" src="expand.gif"></td>
                  <td>03/01/2024</td><td>MOTION FILED</td><td>GRANTED</td>
                </tr>
                <tr><td>03/05/2024</td><td>ORDER SIGNED</td><td>ENTERED</td></tr>
              </tbody>
            </table>"#;
        let doc = Html::parse_document(html);
        let history = parse_docket_history(&doc).unwrap();
        // Id recovery does not depend on the header grammar.
        assert_eq!(history[0].id, "7710");
        assert_eq!(history[0].columns["column_1"], "03/01/2024");
        assert_eq!(history[0].columns["column_3"], "GRANTED");
        assert_eq!(history[1].id, "");
        assert_eq!(history[1].columns["column_0"], "03/05/2024");
        assert_eq!(history[1].columns["column_2"], "ENTERED");
    }

    #[test]
    fn test_rows_without_cells_are_skipped() {
        let html = r#"
            <table id="gridDockets">
              <tbody>
                <tr><th>not a data row</th></tr>
                <tr><td>only cell</td></tr>
              </tbody>
            </table>"#;
        let doc = Html::parse_document(html);
        let history = parse_docket_history(&doc).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].columns["column_0"], "only cell");
    }

    #[test]
    fn test_missing_table_is_none() {
        let doc = Html::parse_document("<p>no dockets here</p>");
        assert!(parse_docket_history(&doc).is_none());
    }

    #[test]
    fn test_fragment_without_table_is_empty() {
        assert!(parse_docket_fragment("<div>empty</div>").is_empty());
    }

    #[test]
    fn test_parse_is_deterministic() {
        let doc = Html::parse_document(DOCKET_PAGE);
        let first = parse_docket_history(&doc).unwrap();
        let second = parse_docket_history(&doc).unwrap();
        assert_eq!(first, second);
    }
}

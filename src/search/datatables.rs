//! DataTables wire protocol for the paginated results endpoint.
//!
//! The results grid is driven by a server-side DataTables endpoint: the
//! request is a flat urlencoded body describing the window, sort, and the
//! full column layout, and the reply is a JSON envelope of positional rows.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ScrapeError;
use crate::portal;

/// Sort direction of the results grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDir {
    Asc,
    Desc,
}

impl OrderDir {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderDir::Asc => "asc",
            OrderDir::Desc => "desc",
        }
    }
}

/// One window of the result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub start: u32,
    pub length: u32,
    pub order_column: usize,
    pub order_dir: OrderDir,
}

impl Default for PageRequest {
    /// First page of fifty, newest filings first.
    fn default() -> Self {
        Self {
            start: 0,
            length: 50,
            order_column: portal::RESULT_SORT_COLUMN,
            order_dir: OrderDir::Desc,
        }
    }
}

impl PageRequest {
    /// First page holding at most `length` rows.
    pub fn first(length: u32) -> Self {
        Self {
            length,
            ..Self::default()
        }
    }
}

/// Renders the DataTables request body. `draw` is the caller's request
/// sequence number, echoed back in the page so replies can be correlated.
///
/// The endpoint requires the complete column layout on every request. All
/// six columns are declared searchable with empty per-column filters; column
/// zero is the expand widget and is never orderable.
pub fn build_page_request(draw: u64, page: &PageRequest) -> Vec<(String, String)> {
    let mut body = vec![
        ("draw".to_string(), draw.to_string()),
        ("start".to_string(), page.start.to_string()),
        ("length".to_string(), page.length.to_string()),
        ("search[value]".to_string(), String::new()),
        ("search[regex]".to_string(), "false".to_string()),
        ("order[0][column]".to_string(), page.order_column.to_string()),
        ("order[0][dir]".to_string(), page.order_dir.as_str().to_string()),
    ];
    for i in 0..portal::RESULT_COLUMN_COUNT {
        body.push((format!("columns[{i}][data]"), i.to_string()));
        body.push((format!("columns[{i}][searchable]"), "true".to_string()));
        body.push((
            format!("columns[{i}][orderable]"),
            if i == 0 { "false" } else { "true" }.to_string(),
        ));
        body.push((format!("columns[{i}][search][value]"), String::new()));
        body.push((format!("columns[{i}][search][regex]"), "false".to_string()));
    }
    body
}

/// One positional row of the results grid.
pub type ResultRow = Vec<Value>;

/// DataTables reply envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedPage {
    pub draw: u64,
    #[serde(rename = "recordsTotal")]
    pub records_total: u64,
    #[serde(rename = "recordsFiltered")]
    pub records_filtered: u64,
    #[serde(rename = "data")]
    pub rows: Vec<ResultRow>,
}

/// Decodes a page, strictly. A body that is not a complete envelope fails
/// rather than degrading: a truncated decode would be indistinguishable from
/// a short result set.
pub fn parse_page(body: &str, url: &str) -> Result<PaginatedPage, ScrapeError> {
    serde_json::from_str(body).map_err(|source| ScrapeError::MalformedJsonResponse {
        url: url.to_string(),
        source,
    })
}

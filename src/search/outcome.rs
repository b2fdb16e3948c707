//! Search response classification.

use scraper::{Html, Selector};

use crate::portal;

/// Diagnostic carried by [`SearchOutcome::NoResults`].
pub const NO_RESULTS_MESSAGE: &str = "No results found or search failed";

/// What came back from a search submission.
///
/// The portal answers a search POST with one of three page shapes; callers
/// branch on this instead of sniffing HTML themselves.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// A results grid; rows are fetched separately through the paginated
    /// JSON endpoint.
    ResultsTable { html: String, url: String },
    /// The portal skipped the grid and redirected straight to the only
    /// matching case. `url` is the details page the redirect landed on.
    CaseDetailsRedirect { html: String, url: String },
    /// Recognized neither shape. Includes expired-session responses, so the
    /// body is kept for the caller to inspect.
    NoResults { message: String, html: String },
}

/// Classifies a search response body against its final URL.
///
/// The grid marker wins over the details route: a page that renders the
/// results grid is a results page no matter what URL served it. Checks are
/// ordered, exhaustive, and side-effect free.
pub fn classify(body: &str, final_url: &str) -> SearchOutcome {
    let doc = Html::parse_document(body);
    let grid_sel = Selector::parse(&format!("#{}", portal::RESULTS_TABLE_ID))
        .expect("results grid selector is valid");

    if doc.select(&grid_sel).next().is_some() {
        return SearchOutcome::ResultsTable {
            html: body.to_string(),
            url: final_url.to_string(),
        };
    }
    if final_url.contains(portal::DETAILS_ROUTE_MARKER) {
        return SearchOutcome::CaseDetailsRedirect {
            html: body.to_string(),
            url: final_url.to_string(),
        };
    }
    SearchOutcome::NoResults {
        message: NO_RESULTS_MESSAGE.to_string(),
        html: body.to_string(),
    }
}

//! Portal contract for Tyler Technologies "Benchmark" court sites.
//!
//! Every route, cookie name, form key, markup marker, and inline-script
//! pattern the portal exposes lives here. When a portal update moves a
//! table id or renames a form field, this is the only module to touch.

/// Production portal for the Atlanta Municipal Court.
pub const DEFAULT_BASE_URL: &str = "https://benchmark.atlantaga.gov";

// ── Routes ──────────────────────────────────────────────────────────────────

/// Landing page that seeds the anti-forgery cookie and form token.
pub const SEARCH_LANDING_PATH: &str = "/BenchmarkWeb/Home.aspx/Search";

/// Form-POST target for a case search submission.
pub const SEARCH_SUBMIT_PATH: &str = "/BenchmarkWeb/CourtCase.aspx/CaseSearch";

/// DataTables endpoint that pages through the result set as JSON.
pub const RESULTS_DATA_PATH: &str = "/BenchmarkWeb/Search.aspx/CaseSearch";

/// Path segment present in the final URL when a search lands directly on a
/// case details page instead of a results grid.
pub const DETAILS_ROUTE_MARKER: &str = "/CourtCase.aspx/Details/";

/// Summary fragment for one case, keyed by the portal-internal case id.
pub fn details_summary_path(case_id: &str) -> String {
    format!("/BenchmarkWeb/CourtCase.aspx/DetailsSummary/{case_id}")
}

/// Docket-history fragment for one case.
pub fn case_dockets_path(case_id: &str) -> String {
    format!("/BenchmarkWeb/CourtCase.aspx/CaseDockets/{case_id}")
}

/// Referer the portal expects on fragment requests.
pub fn case_details_referer(case_id: &str, digest: &str) -> String {
    format!("/BenchmarkWeb/CourtCase.aspx/Details/{case_id}?digest={digest}")
}

// ── Anti-forgery markers ────────────────────────────────────────────────────

/// The session cookie is named with this prefix plus a per-site suffix.
pub const CSRF_COOKIE_PREFIX: &str = "__RequestVerificationToken_";

/// Hidden input on the landing page carrying the matching form token.
pub const CSRF_FORM_FIELD: &str = "__RequestVerificationToken";

// ── Search form schema ──────────────────────────────────────────────────────

/// Complete key set of a search submission, in submission order. The portal
/// expects every key on every POST; unused keys are sent with empty values.
pub const SEARCH_FORM_KEYS: &[&str] = &[
    CSRF_FORM_FIELD,
    "type",
    "search",
    "openedFrom",
    "openedTo",
    "closedFrom",
    "closedTo",
    "courtTypes",
    "caseTypes",
    "partyTypes",
    "divisions",
    "statutes",
    "partyBirthYear",
    "partyDOB",
    "caseStatus",
    "propertyAddress",
    "propertyCity",
    "propertyZip",
    "propertySubDivision",
    "lawFirm",
    "unpaidPrincipleBalanceFrom",
    "unpaidPrincipleBalanceTo",
    "electionDemandFrom",
    "electionDemandTo",
    "attorneyFileNumber",
];

/// Court-type ids searched when the caller does not narrow the set.
pub const DEFAULT_COURT_TYPES: &[&str] = &["22", "2", "20", "21", "7", "10"];

/// Party-type ids searched by default.
pub const DEFAULT_PARTY_TYPES: &[&str] = &["1", "2", "3", "4", "5"];

/// Division ids searched by default.
pub const DEFAULT_DIVISIONS: &[&str] = &["1"];

// ── Results grid ────────────────────────────────────────────────────────────

/// Table id that marks a search-results page.
pub const RESULTS_TABLE_ID: &str = "gridSearchResults";

/// The results grid always carries this many positional columns.
pub const RESULT_COLUMN_COUNT: usize = 6;

/// Column the grid is sorted on by default (date filed).
pub const RESULT_SORT_COLUMN: usize = 4;

// ── Case details markup ─────────────────────────────────────────────────────

/// Docket-history table id, on both the details page and its fragment.
pub const DOCKETS_TABLE_ID: &str = "gridDockets";

/// Parties table id inside the summary fragment.
pub const PARTIES_TABLE_ID: &str = "gridParties";

/// Charges table id inside the summary fragment.
pub const CHARGES_TABLE_ID: &str = "gridCharges";

/// Docket expand-icon ids are the row id with this prefix.
pub const DOCKET_IMG_ID_PREFIX: &str = "img_";

// ── Inline script patterns ──────────────────────────────────────────────────

/// Portal-internal case id assigned in an inline script on details pages.
pub const CASE_ID_VAR_RE: &str = r"var cid = (\d+)";

/// Per-case digest that must accompany fragment requests.
pub const CASE_DIGEST_VAR_RE: &str = r"var caseDigest = '([^']+)'";

/// Canonical case number assigned in an inline script.
pub const CASE_NUMBER_VAR_RE: &str = r"var caseNumber = '([^']+)'";

/// Shape a plausible case number must match (letters then digits somewhere,
/// e.g. `24TR123456`). Used to reject page titles that are really captions.
pub const CASE_NUMBER_SHAPE_RE: &str = r"[A-Z]+.*\d+";

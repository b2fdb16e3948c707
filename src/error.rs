//! Error taxonomy for the scrape pipeline.

use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can go wrong between a search request and a parsed record.
///
/// Parse-side problems are deliberately absent: missing markup degrades to
/// empty fields so that a portal facelift never turns a whole batch into
/// errors. Only transport, session bootstrap, and undecodable JSON are fatal.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The landing page response carried no session cookie with the
    /// anti-forgery prefix.
    #[error("no anti-forgery cookie with prefix '{prefix}' after fetching {url}")]
    MissingCsrfCookie { prefix: &'static str, url: String },

    /// The landing page markup carried no hidden anti-forgery input.
    #[error("no anti-forgery token field on landing page {url}")]
    MissingCsrfToken { url: String },

    /// A URL could not be parsed or joined against the portal base.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    /// Transport-level failure (connect, timeout, TLS, redirect loop).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The portal answered with a non-success status.
    #[error("unexpected status {status} from {url}")]
    HttpStatus { status: StatusCode, url: String },

    /// The paginated results endpoint returned something that does not
    /// decode as a DataTables page. Never degraded: a truncated page cannot
    /// be told apart from a short one.
    #[error("malformed JSON from results endpoint {url}: {source}")]
    MalformedJsonResponse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The caller cancelled the in-flight operation.
    #[error("operation cancelled")]
    Cancelled,
}

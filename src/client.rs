//! Portal client: session bootstrap, search, pagination, and record
//! extraction stitched into one surface.
//!
//! A client owns one portal session. The first search bootstraps the
//! anti-forgery material from the landing page and caches it for the life
//! of the session; every later call reuses it until the portal rejects a
//! submission or the caller resets.

use chrono::Local;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::ScrapeError;
use crate::extract::details::{fragment_keys, parse_case_details};
use crate::extract::docket::parse_docket_fragment;
use crate::extract::record::CaseRecord;
use crate::extract::summary::parse_summary_fragment;
use crate::http::{CancelHandle, HttpClient, DEFAULT_TIMEOUT};
use crate::portal;
use crate::search::criteria::{SearchCriteria, SearchType};
use crate::search::datatables::{build_page_request, parse_page, PageRequest, PaginatedPage, ResultRow};
use crate::search::form::build_search_form;
use crate::search::outcome::{classify, SearchOutcome};
use crate::session::{extract_form_token, CsrfTokens, SessionContext};

/// What a resolved search produced: raw grid rows when the portal answered
/// with a results table, full records when it went straight to a case.
/// Both serialize as a plain JSON array.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SearchResults {
    Rows(Vec<ResultRow>),
    Cases(Vec<CaseRecord>),
}

impl SearchResults {
    pub fn len(&self) -> usize {
        match self {
            SearchResults::Rows(rows) => rows.len(),
            SearchResults::Cases(cases) => cases.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Client for one Benchmark portal session.
pub struct BenchmarkClient {
    http: HttpClient,
    session: SessionContext,
}

impl BenchmarkClient {
    pub fn new(base_url: &str) -> Result<Self, ScrapeError> {
        let base = Url::parse(base_url)?;
        let session = SessionContext::new(base);
        let http = HttpClient::new(session.jar(), DEFAULT_TIMEOUT);
        Ok(Self { http, session })
    }

    /// Client for the production Atlanta Municipal Court portal.
    pub fn default_portal() -> Self {
        Self::new(portal::DEFAULT_BASE_URL).expect("default portal url is valid")
    }

    /// Handle that aborts this client's in-flight requests from elsewhere.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.http.cancel_handle()
    }

    /// Cached anti-forgery material, if a bootstrap has completed.
    pub async fn csrf_tokens(&self) -> Option<CsrfTokens> {
        self.session.csrf_tokens().await
    }

    /// Forgets the cached anti-forgery material so the next search starts a
    /// fresh bootstrap. Useful when the portal starts answering searches
    /// with its error page.
    pub async fn reset_session(&self) {
        self.session.reset().await;
    }

    /// Submits a search and classifies the portal's answer. Does not fetch
    /// grid rows; see [`Self::results_page`] or [`Self::search_to_records`].
    pub async fn search(&self, criteria: &SearchCriteria) -> Result<SearchOutcome, ScrapeError> {
        let tokens = self.ensure_tokens().await?;
        let form = build_search_form(criteria, &tokens.form_token);
        let submit = self.session.endpoint(portal::SEARCH_SUBMIT_PATH)?;
        let referer = self.session.endpoint(portal::SEARCH_LANDING_PATH)?;
        let origin = self.session.origin();

        info!(
            "searching: {} ({})",
            criteria.search_term(),
            criteria.search_type().as_str()
        );

        let sent = self
            .http
            .post_form(
                submit.as_str(),
                &form,
                &[("Referer", referer.as_str()), ("Origin", origin.as_str())],
            )
            .await;

        let resp = match sent {
            Ok(resp) => resp,
            Err(err) => {
                if matches!(err, ScrapeError::HttpStatus { .. }) {
                    // The portal refuses stale tokens with an error status;
                    // drop ours so the next search re-bootstraps instead of
                    // resubmitting the same dead token.
                    warn!("search submission rejected; clearing session tokens");
                    self.session.reset().await;
                }
                return Err(err);
            }
        };

        Ok(classify(&resp.body, &resp.final_url))
    }

    /// Fetches one window of grid rows through the paginated JSON endpoint.
    /// Only meaningful after a search that produced a results table; the
    /// portal keys the result set to the session.
    pub async fn results_page(&self, page: &PageRequest) -> Result<PaginatedPage, ScrapeError> {
        let draw = self.session.next_draw();
        let body = build_page_request(draw, page);
        let data_url = self.session.endpoint(portal::RESULTS_DATA_PATH)?;
        let referer = self.session.endpoint(portal::SEARCH_SUBMIT_PATH)?;
        let origin = self.session.origin();

        let resp = self
            .http
            .post_form(
                data_url.as_str(),
                &body,
                &[
                    ("Accept", "application/json, text/javascript, */*; q=0.01"),
                    ("X-Requested-With", "XMLHttpRequest"),
                    ("Referer", referer.as_str()),
                    ("Origin", origin.as_str()),
                ],
            )
            .await?;

        let page = parse_page(&resp.body, &resp.final_url)?;
        info!("retrieved {} of {} records", page.rows.len(), page.records_total);
        Ok(page)
    }

    /// Fetches a details page and enriches the record with the summary and
    /// docket fragments the page would load over XHR.
    ///
    /// A page without fragment keys still yields its base record, with an
    /// explicitly empty docket history. A fragment request that fails at the
    /// transport level fails the whole call.
    pub async fn case_details(&self, url: &str) -> Result<CaseRecord, ScrapeError> {
        let resp = self.http.get(url, &[], &[]).await?;
        let mut record = parse_case_details(&resp.body, &resp.final_url);

        let Some((case_id, digest)) = fragment_keys(&resp.body) else {
            warn!(
                "case id and digest not found on {}; skipping fragments",
                resp.final_url
            );
            record.docket_history = Vec::new();
            return Ok(record);
        };
        debug!("found case id {case_id}; fetching detail fragments");

        let time = Local::now().format("%I:%M:%S %p").to_string();
        let referer = self
            .session
            .endpoint(&portal::case_details_referer(&case_id, &digest))?;
        let summary_url = self.session.endpoint(&portal::details_summary_path(&case_id))?;
        let dockets_url = self.session.endpoint(&portal::case_dockets_path(&case_id))?;
        let query = [("digest", digest.as_str()), ("time", time.as_str())];
        let headers = [
            ("Accept", "*/*"),
            ("X-Requested-With", "XMLHttpRequest"),
            ("Referer", referer.as_str()),
        ];

        let (summary, dockets) = tokio::join!(
            self.http.get(summary_url.as_str(), &headers, &query),
            self.http.get(dockets_url.as_str(), &headers, &query),
        );

        parse_summary_fragment(&summary?.body).merge_into(&mut record);
        record.docket_history = parse_docket_fragment(&dockets?.body);
        Ok(record)
    }

    /// Search and resolve in one call: grid rows for a results table, one
    /// full record for a single-case redirect, empty for no results.
    pub async fn search_to_records(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<SearchResults, ScrapeError> {
        match self.search(criteria).await? {
            SearchOutcome::ResultsTable { .. } => {
                let page = self
                    .results_page(&PageRequest::first(criteria.result_cap()))
                    .await?;
                Ok(SearchResults::Rows(page.rows))
            }
            SearchOutcome::CaseDetailsRedirect { url, .. } => {
                info!("single match; following details page {url}");
                Ok(SearchResults::Cases(vec![self.case_details(&url).await?]))
            }
            SearchOutcome::NoResults { message, .. } => {
                info!("{message}");
                Ok(SearchResults::Cases(Vec::new()))
            }
        }
    }

    async fn ensure_tokens(&self) -> Result<CsrfTokens, ScrapeError> {
        let mut slot = self.session.csrf_slot().await;
        if let Some(tokens) = slot.as_ref() {
            return Ok(tokens.clone());
        }

        let landing = self.session.endpoint(portal::SEARCH_LANDING_PATH)?;
        debug!("bootstrapping session from {landing}");
        let resp = self.http.get(landing.as_str(), &[], &[]).await?;

        let cookie_name = self.session.csrf_cookie_name(&landing).ok_or_else(|| {
            ScrapeError::MissingCsrfCookie {
                prefix: portal::CSRF_COOKIE_PREFIX,
                url: resp.final_url.clone(),
            }
        })?;
        let form_token = extract_form_token(&resp.body).ok_or_else(|| {
            ScrapeError::MissingCsrfToken {
                url: resp.final_url.clone(),
            }
        })?;

        let tokens = CsrfTokens {
            cookie_name,
            form_token,
        };
        info!("session established (cookie {})", tokens.cookie_name);
        *slot = Some(tokens.clone());
        Ok(tokens)
    }
}

/// Looks up many case numbers concurrently, one isolated session each, with
/// bounded parallelism. Results arrive in completion order, each tagged with
/// the case number it belongs to; one portal failure never aborts the rest.
pub async fn lookup_cases(
    base_url: &str,
    case_numbers: &[String],
    concurrency: usize,
) -> Vec<(String, Result<SearchResults, ScrapeError>)> {
    stream::iter(case_numbers.iter().cloned())
        .map(|number| {
            let base = base_url.to_string();
            async move {
                let result = match BenchmarkClient::new(&base) {
                    Ok(client) => {
                        let criteria = SearchCriteria::new(number.clone(), SearchType::CaseNumber);
                        client.search_to_records(&criteria).await
                    }
                    Err(err) => Err(err),
                };
                (number, result)
            }
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_results_serialize_as_plain_arrays() {
        let rows = SearchResults::Rows(vec![vec![serde_json::json!(null), serde_json::json!("24TR1")]]);
        assert_eq!(serde_json::to_string(&rows).unwrap(), r#"[[null,"24TR1"]]"#);
        let cases = SearchResults::Cases(Vec::new());
        assert_eq!(serde_json::to_string(&cases).unwrap(), "[]");
    }

    #[test]
    fn test_results_len_spans_both_shapes() {
        assert_eq!(SearchResults::Rows(vec![vec![], vec![]]).len(), 2);
        assert!(SearchResults::Cases(Vec::new()).is_empty());
    }

    #[test]
    fn test_client_rejects_garbage_base_url() {
        assert!(matches!(
            BenchmarkClient::new("not a url"),
            Err(ScrapeError::Url(_))
        ));
    }
}

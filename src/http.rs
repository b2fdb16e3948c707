// Copyright 2026 Benchscrape Contributors
// SPDX-License-Identifier: Apache-2.0

//! Async HTTP transport wrapping reqwest.
//!
//! Not a browser, just HTTP with a cookie jar. Handles redirects, timeouts,
//! retry on 5xx and backoff on 429 for GETs, and cooperative cancellation.
//! Search POSTs are never retried: resubmitting a form the server may have
//! already acted on is worse than surfacing the failure.

use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::Jar;
use reqwest::StatusCode;
use tokio::sync::watch;

use crate::error::ScrapeError;

/// Per-request timeout applied to every round trip.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const MAX_RETRIES: u32 = 2;

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                          AppleWebKit/537.36 (KHTML, like Gecko) \
                          Chrome/141.0.0.0 Safari/537.36";

/// Response from a completed round trip.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Original requested URL.
    pub url: String,
    /// Final URL after redirects.
    pub final_url: String,
    /// HTTP status code.
    pub status: StatusCode,
    /// Response body as text.
    pub body: String,
}

/// Cancels every in-flight and future request of the client it came from.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

/// HTTP client for the scrape pipeline. Cookies set by the portal are kept
/// in the shared jar and replayed on every request.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    cancel: Arc<watch::Sender<bool>>,
}

impl HttpClient {
    /// Creates a client with browser-shaped default headers and the given
    /// cookie jar.
    pub fn new(jar: Arc<Jar>, timeout: Duration) -> Self {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            reqwest::header::HeaderValue::from_static("en-US,en;q=0.9"),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .cookie_provider(jar)
            .build()
            .unwrap_or_default();

        let (tx, _rx) = watch::channel(false);
        Self {
            client,
            cancel: Arc::new(tx),
        }
    }

    /// Handle that aborts this client's requests from another task.
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            tx: Arc::clone(&self.cancel),
        }
    }

    /// GET with retry on 5xx and backoff on 429. Non-success statuses after
    /// the retry budget become [`ScrapeError::HttpStatus`].
    pub async fn get(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        query: &[(&str, &str)],
    ) -> Result<HttpResponse, ScrapeError> {
        let mut retries = 0u32;

        loop {
            let mut builder = self.client.get(url);
            if !query.is_empty() {
                builder = builder.query(query);
            }
            for &(name, value) in headers {
                builder = builder.header(name, value);
            }

            match self.run_guarded(builder.send()).await {
                Ok(resp) => {
                    let status = resp.status();

                    if status.is_server_error() && retries < MAX_RETRIES {
                        retries += 1;
                        self.pause(backoff_delay(retries)).await?;
                        continue;
                    }

                    if status == StatusCode::TOO_MANY_REQUESTS && retries < MAX_RETRIES {
                        retries += 1;
                        let retry_after = resp
                            .headers()
                            .get("retry-after")
                            .and_then(|v| v.to_str().ok())
                            .and_then(|s| s.parse::<u64>().ok())
                            .unwrap_or(2);
                        self.pause(Duration::from_secs(retry_after.min(10))).await?;
                        continue;
                    }

                    return read_response(url, resp).await;
                }
                Err(ScrapeError::Http(e)) => {
                    if retries < MAX_RETRIES {
                        retries += 1;
                        self.pause(backoff_delay(retries)).await?;
                        continue;
                    }
                    return Err(ScrapeError::Http(e));
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// POST form data (url-encoded), single attempt. Redirects are followed,
    /// so a 302 into a details page comes back as that page with its final
    /// URL.
    pub async fn post_form(
        &self,
        url: &str,
        form_fields: &[(String, String)],
        extra_headers: &[(&str, &str)],
    ) -> Result<HttpResponse, ScrapeError> {
        let mut builder = self.client.post(url);
        for &(name, value) in extra_headers {
            builder = builder.header(name, value);
        }
        builder = builder.form(form_fields);

        let resp = self.run_guarded(builder.send()).await?;
        read_response(url, resp).await
    }

    /// Races a request against the cancel flag. Losing the race drops the
    /// request future, which hangs up the connection.
    async fn run_guarded<F>(&self, fut: F) -> Result<reqwest::Response, ScrapeError>
    where
        F: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
    {
        let mut cancelled = self.cancel.subscribe();
        if *cancelled.borrow() {
            return Err(ScrapeError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = cancelled.wait_for(|flag| *flag) => Err(ScrapeError::Cancelled),
            resp = fut => Ok(resp?),
        }
    }

    /// Sleeps between attempts unless the cancel flag trips first, so a
    /// cancellation never has to wait out a backoff window.
    async fn pause(&self, delay: Duration) -> Result<(), ScrapeError> {
        let mut cancelled = self.cancel.subscribe();
        if *cancelled.borrow() {
            return Err(ScrapeError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = cancelled.wait_for(|flag| *flag) => Err(ScrapeError::Cancelled),
            _ = tokio::time::sleep(delay) => Ok(()),
        }
    }
}

async fn read_response(url: &str, resp: reqwest::Response) -> Result<HttpResponse, ScrapeError> {
    let status = resp.status();
    let final_url = resp.url().to_string();
    if !status.is_success() {
        return Err(ScrapeError::HttpStatus {
            status,
            url: final_url,
        });
    }
    let body = resp.text().await.unwrap_or_default();
    Ok(HttpResponse {
        url: url.to_string(),
        final_url,
        status,
        body,
    })
}

fn backoff_delay(retries: u32) -> Duration {
    Duration::from_millis(500 * 2u64.pow(retries - 1))
}

//! Per-portal session state.
//!
//! One session owns the cookie jar, the cached anti-forgery material, and
//! the DataTables draw sequence. Everything here is shared behind `&self`
//! so a client can fan requests out across tasks.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use reqwest::cookie::{CookieStore, Jar};
use scraper::{Html, Selector};
use tokio::sync::{Mutex, MutexGuard};
use url::Url;

use crate::error::ScrapeError;
use crate::portal;

/// Anti-forgery material captured from the landing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrfTokens {
    /// Session cookie name; the portal appends a per-site suffix to the
    /// well-known prefix.
    pub cookie_name: String,
    /// Matching token submitted in the search form body.
    pub form_token: String,
}

/// Session state shared by every request of one client.
pub struct SessionContext {
    base_url: Url,
    jar: Arc<Jar>,
    csrf: Mutex<Option<CsrfTokens>>,
    draw: AtomicU64,
}

impl SessionContext {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            jar: Arc::new(Jar::default()),
            csrf: Mutex::new(None),
            draw: AtomicU64::new(0),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn jar(&self) -> Arc<Jar> {
        Arc::clone(&self.jar)
    }

    /// Absolute URL for a portal path.
    pub fn endpoint(&self, path: &str) -> Result<Url, ScrapeError> {
        Ok(self.base_url.join(path)?)
    }

    /// Value for Origin headers, serialized without a trailing slash.
    pub fn origin(&self) -> String {
        self.base_url.origin().ascii_serialization()
    }

    /// Next draw sequence number. Starts at 1 and never repeats within a
    /// session, so every paginated reply can be matched to its request.
    pub fn next_draw(&self) -> u64 {
        self.draw.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Exclusive access to the cached tokens. Bootstrap holds this guard
    /// across the landing fetch, so concurrent searches wait on the one
    /// in-flight bootstrap instead of racing their own.
    pub(crate) async fn csrf_slot(&self) -> MutexGuard<'_, Option<CsrfTokens>> {
        self.csrf.lock().await
    }

    pub async fn csrf_tokens(&self) -> Option<CsrfTokens> {
        self.csrf.lock().await.clone()
    }

    /// Drops the cached tokens. The next search re-runs bootstrap; cookies
    /// stay in the jar and are replaced by whatever the portal sets then.
    pub async fn reset(&self) {
        *self.csrf.lock().await = None;
    }

    /// Scans the jar for the anti-forgery cookie visible at `at`.
    pub fn csrf_cookie_name(&self, at: &Url) -> Option<String> {
        let header = self.jar.cookies(at)?;
        let cookies = header.to_str().ok()?.to_string();
        cookies.split("; ").find_map(|pair| {
            let name = pair.split('=').next()?;
            name.starts_with(portal::CSRF_COOKIE_PREFIX)
                .then(|| name.to_string())
        })
    }
}

/// Pulls the hidden anti-forgery input's value out of landing page markup.
/// An input with an empty value counts as missing.
pub fn extract_form_token(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let sel = Selector::parse(&format!("input[name=\"{}\"]", portal::CSRF_FORM_FIELD))
        .expect("token selector is valid");
    doc.select(&sel)
        .next()
        .and_then(|input| input.value().attr("value"))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> SessionContext {
        SessionContext::new(Url::parse("https://benchmark.example.gov").unwrap())
    }

    #[test]
    fn test_token_extracted_from_hidden_input() {
        let html = r#"<form><input name="__RequestVerificationToken" type="hidden" value="tok-1"></form>"#;
        assert_eq!(extract_form_token(html), Some("tok-1".to_string()));
    }

    #[test]
    fn test_missing_or_empty_token_is_none() {
        assert_eq!(extract_form_token("<form></form>"), None);
        let empty = r#"<input name="__RequestVerificationToken" value="">"#;
        assert_eq!(extract_form_token(empty), None);
    }

    #[test]
    fn test_draw_starts_at_one_and_increments() {
        let session = session();
        assert_eq!(session.next_draw(), 1);
        assert_eq!(session.next_draw(), 2);
        assert_eq!(session.next_draw(), 3);
    }

    #[test]
    fn test_endpoint_joins_portal_paths() {
        let session = session();
        let url = session.endpoint(portal::SEARCH_LANDING_PATH).unwrap();
        assert_eq!(
            url.as_str(),
            "https://benchmark.example.gov/BenchmarkWeb/Home.aspx/Search"
        );
    }

    #[test]
    fn test_origin_has_no_trailing_slash() {
        assert_eq!(session().origin(), "https://benchmark.example.gov");
    }

    #[test]
    fn test_cookie_scan_matches_prefix_only() {
        let session = session();
        let at = session.base_url().clone();
        session
            .jar()
            .add_cookie_str("other=1; Path=/", &at);
        assert_eq!(session.csrf_cookie_name(&at), None);
        session
            .jar()
            .add_cookie_str("__RequestVerificationToken_L2NvdXJ0=abc; Path=/", &at);
        assert_eq!(
            session.csrf_cookie_name(&at).as_deref(),
            Some("__RequestVerificationToken_L2NvdXJ0")
        );
    }

    #[tokio::test]
    async fn test_reset_clears_cached_tokens() {
        let session = session();
        *session.csrf_slot().await = Some(CsrfTokens {
            cookie_name: "__RequestVerificationToken_x".into(),
            form_token: "tok".into(),
        });
        assert!(session.csrf_tokens().await.is_some());
        session.reset().await;
        assert_eq!(session.csrf_tokens().await, None);
    }
}

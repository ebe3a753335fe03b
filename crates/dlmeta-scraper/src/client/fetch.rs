//! Single page fetch with response classification.

use reqwest::header;
use reqwest::StatusCode;

use super::{DlsiteClient, ACCEPT_HTML, ACCEPT_LANGUAGE, ADULT_COOKIE};
use crate::document::Document;
use crate::error::ScraperError;
use crate::types::Site;

/// One fetched and parsed product page.
#[derive(Debug)]
pub struct DocumentResult {
    pub document: Document,
    /// Sub-site the page was actually served from, which may differ from the
    /// one requested when the marketplace redirected.
    pub site: Site,
    /// URL after transport-level redirects.
    pub final_url: String,
}

impl DlsiteClient {
    /// Fetches and parses one page.
    ///
    /// Returns `Ok(None)` on HTTP 404 so callers can tell "no such page" from
    /// a failure. Redirects are followed; the sub-site is read back from the
    /// final URL, keeping `fallback_site` when the URL does not name one.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::UpstreamRequest`] — any other non-2xx status.
    /// - [`ScraperError::Http`] — network/TLS failure or unreadable body.
    pub async fn fetch_document(
        &self,
        url: &str,
        fallback_site: Site,
    ) -> Result<Option<DocumentResult>, ScraperError> {
        tracing::debug!(url, site = %fallback_site, "fetching product page");

        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, ACCEPT_HTML)
            .header(header::ACCEPT_LANGUAGE, ACCEPT_LANGUAGE)
            .header(header::COOKIE, ADULT_COOKIE)
            .header(header::CACHE_CONTROL, "no-cache")
            .header(header::PRAGMA, "no-cache")
            .send()
            .await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            tracing::debug!(url, "product page not found");
            return Ok(None);
        }

        if !status.is_success() {
            return Err(ScraperError::UpstreamRequest {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_owned(),
                url: url.to_owned(),
            });
        }

        // Read the final URL before consuming the response body.
        let final_url = response.url().to_string();
        let site = self.marketplace.detect_site(&final_url, fallback_site);
        if final_url != url {
            tracing::debug!(url, final_url = %final_url, site = %site, "request was redirected");
        }

        let body = response.text().await?;
        Ok(Some(DocumentResult {
            document: Document::parse(&body),
            site,
            final_url,
        }))
    }
}

//! Sub-site resolution.
//!
//! The sub-site hosting a product cannot be predicted from its code, so it is
//! found empirically: request the product on a guessed sub-site, see where
//! the marketplace actually served it from, and re-request there until the
//! (site, locale) pair is stable or the hop budget runs out.

use super::{DlsiteClient, DocumentResult, MAX_HOPS};
use crate::code::ProductCode;
use crate::error::ScraperError;
use crate::types::{Locale, Site};
use crate::urls::locale_param;

impl DlsiteClient {
    /// Fetches `code` in `locale`, starting from `starting_site` and following
    /// the marketplace to whichever sub-site it reports.
    ///
    /// Returns `Ok(None)` when the page 404s or when [`MAX_HOPS`] requests
    /// never settle on a stable (site, locale) pair.
    ///
    /// # Errors
    ///
    /// Propagates transport and upstream errors from [`Self::fetch_document`].
    pub async fn fetch_document_for_site(
        &self,
        code: &ProductCode,
        locale: Locale,
        starting_site: Site,
    ) -> Result<Option<DocumentResult>, ScraperError> {
        let mut site = starting_site;

        for hop in 1..=MAX_HOPS {
            let url = self.marketplace.build_product_url(code, locale, site);
            let Some(result) = self.fetch_document(&url, site).await? else {
                tracing::debug!(code = %code, site = %site, hop, "product not found on sub-site");
                return Ok(None);
            };

            let landed_locale = locale_param(&result.final_url);
            // A redirect that drops the locale parameter is not a mismatch.
            let locale_matches = landed_locale
                .as_deref()
                .is_none_or(|landed| landed == locale.as_str());

            if result.site == site && locale_matches {
                tracing::debug!(code = %code, site = %site, hop, "sub-site resolved");
                return Ok(Some(result));
            }

            tracing::debug!(
                code = %code,
                requested = %site,
                landed = %result.site,
                landed_locale = landed_locale.as_deref().unwrap_or(""),
                hop,
                "landed on a different sub-site or locale; hopping"
            );
            site = result.site;
        }

        tracing::warn!(
            code = %code,
            starting_site = %starting_site,
            max_hops = MAX_HOPS,
            "sub-site resolution did not stabilize"
        );
        Ok(None)
    }

    /// Tries every candidate sub-site for `code`, in priority order, and
    /// returns the first page that resolves.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::ProductNotFound`] — every candidate 404'd or failed
    ///   to stabilize.
    /// - Transport and upstream errors from [`Self::fetch_document_for_site`].
    pub async fn resolve_product_page(
        &self,
        code: &ProductCode,
        locale: Locale,
    ) -> Result<DocumentResult, ScraperError> {
        for &site in code.candidate_sites() {
            if let Some(result) = self.fetch_document_for_site(code, locale, site).await? {
                return Ok(result);
            }
        }

        Err(ScraperError::ProductNotFound {
            code: code.to_string(),
        })
    }
}

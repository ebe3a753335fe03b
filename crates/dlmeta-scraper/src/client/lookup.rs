//! End-to-end product lookup.

use dlmeta_core::ProductMetadata;

use super::{DlsiteClient, DocumentResult};
use crate::code::ProductCode;
use crate::error::ScraperError;
use crate::extract::{
    clean_title, extract_circle, extract_edition_links, extract_release_date, extract_tags,
    extract_title,
};
use crate::types::{CircleInfo, EditionLinks, Locale, Site};
use crate::urls::Marketplace;

/// Everything the lookup needs from the primary (default-locale) page.
///
/// Extracted eagerly so the parsed page is released before the secondary
/// fetches are awaited.
#[derive(Debug)]
struct PrimaryPage {
    site: Site,
    final_url: String,
    /// Cleaned; may be empty.
    title: String,
    release_date: Option<String>,
    tags: Option<String>,
    circle: CircleInfo,
    editions: EditionLinks,
}

impl PrimaryPage {
    fn extract(result: &DocumentResult, marketplace: &Marketplace) -> Self {
        let doc = Some(&result.document);
        Self {
            site: result.site,
            final_url: result.final_url.clone(),
            title: clean_title(&extract_title(doc)),
            release_date: extract_release_date(doc),
            tags: extract_tags(doc),
            circle: extract_circle(doc, marketplace),
            editions: extract_edition_links(doc, marketplace),
        }
    }

    /// Title for a secondary URL that points back at this very page.
    fn reused_title(&self, url: &str) -> Option<Option<String>> {
        (url == self.final_url).then(|| non_empty(self.title.clone()))
    }
}

impl DlsiteClient {
    /// Resolves a raw product code into its metadata record.
    ///
    /// Normalizes the code, resolves the hosting sub-site with the default
    /// locale, then fetches the Japanese and English editions concurrently
    /// (pinned to the resolved sub-site unless the page advertises explicit
    /// edition links).
    ///
    /// # Errors
    ///
    /// - [`ScraperError::EmptyCode`] — blank input.
    /// - [`ScraperError::ProductNotFound`] — no candidate sub-site serves it.
    /// - [`ScraperError::UpstreamRequest`] / [`ScraperError::Http`] — any
    ///   fetch failed, including either secondary fetch. A 404 on a secondary
    ///   fetch is not an error; that locale's title is simply absent.
    pub async fn fetch_metadata(&self, raw_code: &str) -> Result<ProductMetadata, ScraperError> {
        let code = ProductCode::parse(raw_code)?;

        let primary = {
            let result = self.resolve_product_page(&code, Locale::DEFAULT).await?;
            PrimaryPage::extract(&result, &self.marketplace)
        };
        tracing::info!(code = %code, site = %primary.site, "resolved product page");

        let jp_url = self.secondary_url(&primary, &code, Locale::Japanese);
        let en_url = self.secondary_url(&primary, &code, Locale::English);

        let (title_jp, title_en) = tokio::try_join!(
            self.fetch_secondary_title(&jp_url, &primary),
            self.fetch_secondary_title(&en_url, &primary),
        )?;

        let PrimaryPage {
            title,
            release_date,
            tags,
            circle,
            ..
        } = primary;

        let metadata = ProductMetadata {
            title_default: non_empty(title).unwrap_or_else(|| code.to_string()),
            rj_code: code.into_string(),
            title_jp,
            title_en,
            release_date,
            tags,
            circle_name: non_empty(circle.name.trim().to_owned()),
            circle_link: circle.link,
        };
        tracing::debug!(
            code = %metadata.rj_code,
            has_all_titles = metadata.has_all_titles(),
            "assembled product metadata"
        );
        Ok(metadata)
    }

    fn secondary_url(&self, primary: &PrimaryPage, code: &ProductCode, locale: Locale) -> String {
        self.marketplace.ensure_locale_url(
            primary.editions.for_locale(locale),
            locale,
            code,
            primary.site,
        )
    }

    async fn fetch_secondary_title(
        &self,
        url: &str,
        primary: &PrimaryPage,
    ) -> Result<Option<String>, ScraperError> {
        if let Some(title) = primary.reused_title(url) {
            tracing::debug!(url, "secondary URL is the primary page; reusing it");
            return Ok(title);
        }

        let result = self.fetch_document(url, primary.site).await?;
        Ok(result.and_then(|page| non_empty(clean_title(&extract_title(Some(&page.document))))))
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

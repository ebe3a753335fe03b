//! URL construction and inspection for marketplace product pages.

use dlmeta_core::config::DEFAULT_BASE_URL;
use url::Url;

use crate::code::ProductCode;
use crate::error::ScraperError;
use crate::types::{Locale, Site};

/// The marketplace host that sub-site URLs and relative links are anchored at.
///
/// Production uses `https://www.dlsite.com`; tests point this at a mock server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marketplace {
    /// Scheme + host (+ port), no trailing slash.
    host: String,
    host_name: Option<String>,
}

impl Default for Marketplace {
    fn default() -> Self {
        Self {
            host: DEFAULT_BASE_URL.to_owned(),
            host_name: Some("www.dlsite.com".to_owned()),
        }
    }
}

impl Marketplace {
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidBaseUrl`] if `base_url` is not an
    /// absolute URL with a host.
    pub fn new(base_url: &str) -> Result<Self, ScraperError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let parsed = Url::parse(trimmed).map_err(|e| ScraperError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        let Some(host_name) = parsed.host_str().map(str::to_owned) else {
            return Err(ScraperError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: "URL has no host".to_owned(),
            });
        };

        Ok(Self {
            host: trimmed.to_owned(),
            host_name: Some(host_name),
        })
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Base of every product URL on `site`.
    #[must_use]
    pub fn product_base(&self, site: Site) -> String {
        format!("{}/{site}/work/=/product_id", self.host)
    }

    /// `{base}/{code}.html?locale={locale}`.
    #[must_use]
    pub fn build_product_url(&self, code: &ProductCode, locale: Locale, site: Site) -> String {
        format!("{}/{code}.html?locale={locale}", self.product_base(site))
    }

    /// Makes an `href` found on a page absolute.
    ///
    /// Protocol-relative links get `https:`, root-relative links get the
    /// marketplace host, anything else is returned unchanged.
    #[must_use]
    pub fn resolve_link(&self, href: Option<&str>) -> Option<String> {
        let href = href.filter(|h| !h.is_empty())?;
        if href.starts_with("//") {
            return Some(format!("https:{href}"));
        }
        if href.starts_with('/') {
            return Some(format!("{}{href}", self.host));
        }
        Some(href.to_owned())
    }

    /// Forces `locale` onto a discovered product link.
    ///
    /// Falls back to [`Self::build_product_url`] for `fallback_code` on
    /// `fallback_site` when the link is absent or does not parse as an
    /// absolute URL, so the result is always a usable absolute URL.
    #[must_use]
    pub fn ensure_locale_url(
        &self,
        link: Option<&str>,
        locale: Locale,
        fallback_code: &ProductCode,
        fallback_site: Site,
    ) -> String {
        self.resolve_link(link)
            .and_then(|resolved| Url::parse(&resolved).ok())
            .filter(|url| !url.cannot_be_a_base())
            .map_or_else(
                || self.build_product_url(fallback_code, locale, fallback_site),
                |url| with_locale(url, locale).to_string(),
            )
    }

    /// Sub-site a (post-redirect) URL was served from.
    ///
    /// Only the `/aix/`, `/ai/` and `/pro/` path segments are distinguishing;
    /// anything else, including URLs on foreign hosts, keeps `fallback`.
    #[must_use]
    pub fn detect_site(&self, url: &str, fallback: Site) -> Site {
        let Ok(parsed) = Url::parse(url) else {
            return fallback;
        };
        if parsed.host_str().map(str::to_owned) != self.host_name {
            return fallback;
        }

        let path = parsed.path();
        if path.contains("/aix/") {
            Site::Aix
        } else if path.contains("/ai/") {
            Site::Ai
        } else if path.contains("/pro/") {
            Site::Pro
        } else {
            fallback
        }
    }
}

/// Value of the `locale` query parameter, if the URL parses and has one.
#[must_use]
pub fn locale_param(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .query_pairs()
        .find(|(key, _)| key == "locale")
        .map(|(_, value)| value.into_owned())
}

/// Replaces the first `locale` parameter in place (dropping duplicates) or
/// appends one.
fn with_locale(mut url: Url, locale: Locale) -> Url {
    let mut replaced = false;
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter_map(|(key, value)| {
            if key != "locale" {
                return Some((key.into_owned(), value.into_owned()));
            }
            if replaced {
                return None;
            }
            replaced = true;
            Some((key.into_owned(), locale.as_str().to_owned()))
        })
        .collect();

    {
        let mut query = url.query_pairs_mut();
        query.clear();
        for (key, value) in &pairs {
            query.append_pair(key, value);
        }
        if !replaced {
            query.append_pair("locale", locale.as_str());
        }
    }
    url
}

#[cfg(test)]
#[path = "urls_test.rs"]
mod tests;

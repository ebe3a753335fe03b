//! HTTP client for marketplace product pages.

mod fetch;
mod lookup;
mod resolve;

use std::time::Duration;

use dlmeta_core::config::DEFAULT_USER_AGENT;
use dlmeta_core::AppConfig;
use reqwest::Client;

use crate::error::ScraperError;
use crate::urls::Marketplace;

pub use fetch::DocumentResult;

/// Maximum number of requests spent settling one candidate sub-site.
///
/// The marketplace may bounce a product between sub-sites; three hops cover
/// "wrong guess, redirected, confirmed" with one to spare.
pub const MAX_HOPS: usize = 3;

pub(super) const ACCEPT_HTML: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8";
pub(super) const ACCEPT_LANGUAGE: &str = "zh-CN,zh;q=0.9,en;q=0.8,ja;q=0.7";
/// Skips the age-confirmation interstitial.
pub(super) const ADULT_COOKIE: &str = "adult_checked=1";

/// Client that resolves product codes into [`dlmeta_core::ProductMetadata`].
///
/// Holds no per-product state: every lookup re-resolves the hosting
/// sub-site from scratch.
pub struct DlsiteClient {
    pub(super) client: Client,
    pub(super) marketplace: Marketplace,
}

impl DlsiteClient {
    /// Creates a client pointed at the production marketplace.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        Self::with_marketplace(timeout_secs, user_agent, Marketplace::default())
    }

    /// Creates a client whose sub-site URLs and link resolution are anchored
    /// at `base_url` (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidBaseUrl`] if `base_url` is not an
    /// absolute URL, or [`ScraperError::Http`] if the `reqwest::Client`
    /// cannot be constructed.
    pub fn with_base_url(
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, ScraperError> {
        Self::with_marketplace(timeout_secs, user_agent, Marketplace::new(base_url)?)
    }

    /// Creates a client from process configuration.
    ///
    /// # Errors
    ///
    /// See [`Self::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        Self::with_base_url(
            config.request_timeout_secs,
            &config.user_agent,
            &config.base_url,
        )
    }

    fn with_marketplace(
        timeout_secs: u64,
        user_agent: &str,
        marketplace: Marketplace,
    ) -> Result<Self, ScraperError> {
        let user_agent = if user_agent.trim().is_empty() {
            DEFAULT_USER_AGENT
        } else {
            user_agent
        };
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            marketplace,
        })
    }

    #[must_use]
    pub fn marketplace(&self) -> &Marketplace {
        &self.marketplace
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("DLSITE_CODE_EMPTY")]
    EmptyCode,

    #[error("DLSITE_PRODUCT_NOT_FOUND")]
    ProductNotFound { code: String },

    /// Non-2xx, non-404 response. The message prefix is relied on by callers
    /// that classify upstream failures.
    #[error("DLsite request failed: {status} {status_text}")]
    UpstreamRequest {
        status: u16,
        status_text: String,
        url: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid marketplace base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl ScraperError {
    /// `true` for the domain-level "no such product" outcome.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ProductNotFound { .. })
    }

    /// `true` when the marketplace answered with an unexpected status.
    #[must_use]
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::UpstreamRequest { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_message_carries_status_and_reason() {
        let err = ScraperError::UpstreamRequest {
            status: 503,
            status_text: "Service Unavailable".to_string(),
            url: "https://www.dlsite.com/maniax/work/=/product_id/RJ1.html".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "DLsite request failed: 503 Service Unavailable"
        );
        assert!(err.is_upstream());
        assert!(!err.is_not_found());
    }

    #[test]
    fn not_found_and_empty_code_messages() {
        let not_found = ScraperError::ProductNotFound {
            code: "RJ1".to_string(),
        };
        assert_eq!(not_found.to_string(), "DLSITE_PRODUCT_NOT_FOUND");
        assert!(not_found.is_not_found());
        assert_eq!(ScraperError::EmptyCode.to_string(), "DLSITE_CODE_EMPTY");
        assert!(!ScraperError::EmptyCode.is_upstream());
    }
}

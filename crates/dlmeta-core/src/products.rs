use serde::{Deserialize, Serialize};

/// Metadata resolved for one marketplace product.
///
/// Field names are the wire contract consumed by existing callers; optional
/// fields are omitted from JSON when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductMetadata {
    /// Normalized product code, e.g. `"RJ01527759"`.
    pub rj_code: String,
    /// Title in the default (Simplified Chinese) locale. Falls back to the
    /// product code when the page has no usable title.
    pub title_default: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_jp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_en: Option<String>,
    /// `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    /// Comma-joined genre tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circle_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circle_link: Option<String>,
}

impl ProductMetadata {
    /// Splits [`Self::tags`] back into individual tags.
    #[must_use]
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags
            .as_deref()
            .map(|tags| tags.split(',').filter(|t| !t.is_empty()).collect())
            .unwrap_or_default()
    }

    /// Returns `true` when the marketplace advertised a title for every locale.
    #[must_use]
    pub fn has_all_titles(&self) -> bool {
        self.title_jp.is_some() && self.title_en.is_some()
    }
}

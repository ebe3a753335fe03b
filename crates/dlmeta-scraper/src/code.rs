//! Product code normalization.

use std::fmt;

use crate::error::ScraperError;
use crate::types::Site;

/// Category marker a product code starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodePrefix {
    /// Doujin works; the default category for bare numeric input.
    Rj,
    /// Commercial (pro) titles.
    Vj,
    /// Books.
    Bj,
}

impl CodePrefix {
    pub const ALL: [CodePrefix; 3] = [CodePrefix::Rj, CodePrefix::Vj, CodePrefix::Bj];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CodePrefix::Rj => "RJ",
            CodePrefix::Vj => "VJ",
            CodePrefix::Bj => "BJ",
        }
    }

    /// Sub-sites to try, in priority order. The first one that resolves wins.
    #[must_use]
    pub fn candidate_sites(self) -> &'static [Site] {
        match self {
            CodePrefix::Rj => &[Site::Maniax, Site::Ai, Site::Aix],
            CodePrefix::Vj => &[Site::Pro],
            CodePrefix::Bj => &[Site::Maniax],
        }
    }
}

/// A normalized marketplace product code, e.g. `RJ01527759`.
///
/// Always upper-case and always starts with one of [`CodePrefix::ALL`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProductCode(String);

impl ProductCode {
    /// Normalizes raw user input into a product code.
    ///
    /// Input is trimmed and upper-cased; anything not already carrying a
    /// recognized prefix is assumed to be an `RJ` code.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::EmptyCode`] if the input is blank.
    pub fn parse(raw: &str) -> Result<Self, ScraperError> {
        let trimmed = raw.trim().to_uppercase();
        if trimmed.is_empty() {
            return Err(ScraperError::EmptyCode);
        }

        if CodePrefix::ALL
            .iter()
            .any(|prefix| trimmed.starts_with(prefix.as_str()))
        {
            return Ok(Self(trimmed));
        }

        Ok(Self(format!("{}{trimmed}", CodePrefix::Rj.as_str())))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn prefix(&self) -> CodePrefix {
        CodePrefix::ALL
            .into_iter()
            .find(|prefix| self.0.starts_with(prefix.as_str()))
            .unwrap_or(CodePrefix::Rj)
    }

    #[must_use]
    pub fn candidate_sites(&self) -> &'static [Site] {
        self.prefix().candidate_sites()
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ProductCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProductCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// String form of [`ProductCode::parse`].
///
/// # Errors
///
/// Returns [`ScraperError::EmptyCode`] if the input is blank.
pub fn normalize_code(raw: &str) -> Result<String, ScraperError> {
    ProductCode::parse(raw).map(ProductCode::into_string)
}

/// Candidate sub-sites for an already-normalized code.
#[must_use]
pub fn candidate_sites(code: &ProductCode) -> &'static [Site] {
    code.candidate_sites()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_uppercases() {
        assert_eq!(normalize_code("  rj01527759 \n").unwrap(), "RJ01527759");
    }

    #[test]
    fn bare_number_gets_default_prefix() {
        assert_eq!(normalize_code("01527759").unwrap(), "RJ01527759");
    }

    #[test]
    fn recognized_prefixes_kept() {
        assert_eq!(normalize_code("vj01002419").unwrap(), "VJ01002419");
        assert_eq!(normalize_code("BJ123").unwrap(), "BJ123");
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(normalize_code(""), Err(ScraperError::EmptyCode)));
        assert!(matches!(normalize_code("   \t"), Err(ScraperError::EmptyCode)));
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in ["rj01527759", "01341035", "vj01002419", "bj42", " x9 ", "RJRJ1"] {
            let once = normalize_code(raw).unwrap();
            let twice = normalize_code(&once).unwrap();
            assert_eq!(once, twice, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn normalized_codes_always_carry_a_recognized_prefix() {
        for raw in ["123", "abc", "vj1", "ZZ9", "bj"] {
            let code = ProductCode::parse(raw).unwrap();
            assert!(
                CodePrefix::ALL
                    .iter()
                    .any(|p| code.as_str().starts_with(p.as_str())),
                "{code} lacks a recognized prefix"
            );
        }
    }

    #[test]
    fn rj_candidates_in_priority_order() {
        let code = ProductCode::parse("RJ012345").unwrap();
        assert_eq!(code.candidate_sites(), &[Site::Maniax, Site::Ai, Site::Aix]);
    }

    #[test]
    fn vj_candidates_only_pro() {
        let code = ProductCode::parse("VJ01002419").unwrap();
        assert_eq!(candidate_sites(&code), &[Site::Pro]);
    }

    #[test]
    fn bj_candidates_default_to_maniax() {
        let code = ProductCode::parse("BJ01000001").unwrap();
        assert_eq!(code.prefix(), CodePrefix::Bj);
        assert_eq!(code.candidate_sites(), &[Site::Maniax]);
    }

    #[test]
    fn codes_sharing_a_prefix_share_candidate_order() {
        let a = ProductCode::parse("RJ01341035").unwrap();
        let b = ProductCode::parse("466244").unwrap();
        assert_eq!(a.candidate_sites(), b.candidate_sites());
    }
}

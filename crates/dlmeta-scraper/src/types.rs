//! Marketplace vocabulary: sub-sites, locales and the small records the
//! extractors hand back.
//!
//! ## Sub-sites
//! The marketplace serves the same product catalogue under four path
//! prefixes (`/maniax/`, `/ai/`, `/aix/`, `/pro/`). Which one hosts a given
//! `RJ` code is not derivable from the code, and the marketplace silently
//! redirects a request made against the wrong sub-site.
//!
//! ## Locales
//! Pages are localized through a `locale` query parameter. Simplified
//! Chinese is the default because it is the locale the primary fetch uses;
//! Japanese and English are fetched as secondary editions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Site {
    Maniax,
    Ai,
    Aix,
    Pro,
}

impl Site {
    pub const ALL: [Site; 4] = [Site::Maniax, Site::Ai, Site::Aix, Site::Pro];

    /// Path segment used in product URLs (`/{segment}/work/=/product_id/...`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Site::Maniax => "maniax",
            Site::Ai => "ai",
            Site::Aix => "aix",
            Site::Pro => "pro",
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Site {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Site::ALL
            .into_iter()
            .find(|site| site.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown site \"{s}\" (expected maniax, ai, aix or pro)"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locale {
    #[serde(rename = "zh_CN")]
    Chinese,
    #[serde(rename = "ja_JP")]
    Japanese,
    #[serde(rename = "en_US")]
    English,
}

impl Locale {
    /// Locale of the primary document.
    pub const DEFAULT: Locale = Locale::Chinese;

    pub const ALL: [Locale; 3] = [Locale::Chinese, Locale::Japanese, Locale::English];

    /// Value of the `locale` query parameter.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Locale::Chinese => "zh_CN",
            Locale::Japanese => "ja_JP",
            Locale::English => "en_US",
        }
    }

    /// Short tag (`cn`, `jp`, `en`).
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Locale::Chinese => "cn",
            Locale::Japanese => "jp",
            Locale::English => "en",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = String;

    /// Accepts either the short tag (`jp`) or the query value (`ja_JP`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Locale::ALL
            .into_iter()
            .find(|locale| locale.tag().eq_ignore_ascii_case(s) || locale.as_str() == s)
            .ok_or_else(|| format!("unknown locale \"{s}\" (expected cn, jp or en)"))
    }
}

/// Alternate-locale edition links advertised on a product page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditionLinks {
    pub jp: Option<String>,
    pub en: Option<String>,
}

impl EditionLinks {
    /// Link advertised for `locale`, if any. The default locale never has one.
    #[must_use]
    pub fn for_locale(&self, locale: Locale) -> Option<&str> {
        match locale {
            Locale::Japanese => self.jp.as_deref(),
            Locale::English => self.en.as_deref(),
            Locale::Chinese => None,
        }
    }
}

/// Publisher ("circle" or "maker") shown on a product page.
///
/// An empty `name` means the page had no parsable publisher; `link` is only
/// set when the publisher element carried an anchor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CircleInfo {
    pub name: String,
    pub link: Option<String>,
}

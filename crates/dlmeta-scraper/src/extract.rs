//! Field extraction from marketplace product pages.
//!
//! Every extractor accepts a possibly-absent document and degrades to an
//! empty/absent result instead of failing. Header-label matching spans the
//! Japanese, Chinese and English page layouts; when the marketplace renames
//! a label the field silently goes missing rather than erroring.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::document::{collapse_whitespace, Document, Element};
use crate::types::{CircleInfo, EditionLinks};
use crate::urls::Marketplace;

static RELEASE_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)販売日|発売日|贩卖日|贩售日|发售日|公開日|公開開始日|release")
        .expect("valid release label regex")
});
static MAKER_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Circle|サークル|社团|社團|メーカー|社名").expect("valid maker label regex")
});
static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{4})[^0-9]?([0-9]{1,2})[^0-9]?([0-9]{1,2})").expect("valid date regex")
});
static DECORATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]|【[^】]*】").expect("valid decoration regex"));

/// Raw work title (`h1#work_name`), or an empty string.
#[must_use]
pub fn extract_title(doc: Option<&Document>) -> String {
    doc.and_then(|doc| doc.select_first("h1#work_name"))
        .map(|el| el.text())
        .unwrap_or_default()
}

/// Release date as `YYYY-MM-DD`.
///
/// Tries the cell next to a release-date header first, then every link in
/// the work outline (or the whole page when there is no outline).
#[must_use]
pub fn extract_release_date(doc: Option<&Document>) -> Option<String> {
    let doc = doc?;
    let mut candidates: Vec<String> = Vec::new();

    if let Some(cell) = find_cell_by_header(doc, &RELEASE_LABEL_RE) {
        candidates.push(cell.text());
    }

    let outline_anchors = match doc.select_first("#work_outline") {
        Some(outline) => outline.select_all("a"),
        None => doc.select_all("a"),
    };
    candidates.extend(outline_anchors.iter().map(Element::text));

    candidates.iter().find_map(|text| parse_date(text))
}

/// Genre tags from `div.main_genre`, de-duplicated and comma-joined.
#[must_use]
pub fn extract_tags(doc: Option<&Document>) -> Option<String> {
    let container = doc?.select_first("div.main_genre")?;

    let mut seen = HashSet::new();
    let tags: Vec<String> = container
        .select_all("a")
        .iter()
        .map(Element::text)
        .filter(|tag| !tag.is_empty() && seen.insert(tag.clone()))
        .collect();

    (!tags.is_empty()).then(|| tags.join(","))
}

/// Publisher name and profile link.
///
/// Looks for `#work_maker`, then the cell next to a circle/maker header.
#[must_use]
pub fn extract_circle(doc: Option<&Document>, marketplace: &Marketplace) -> CircleInfo {
    let Some(doc) = doc else {
        return CircleInfo::default();
    };

    let Some(maker) = doc
        .select_first("#work_maker")
        .or_else(|| find_cell_by_header(doc, &MAKER_LABEL_RE))
    else {
        return CircleInfo::default();
    };

    match maker.select_first("a") {
        Some(anchor) => CircleInfo {
            name: anchor.text(),
            link: marketplace.resolve_link(anchor.attr("href")),
        },
        None => CircleInfo {
            name: maker.text(),
            link: None,
        },
    }
}

/// Japanese and English edition links from the edition link list.
///
/// Each anchor is classified by its text or URL; the first link found for a
/// language wins.
#[must_use]
pub fn extract_edition_links(doc: Option<&Document>, marketplace: &Marketplace) -> EditionLinks {
    let mut editions = EditionLinks::default();
    let Some(doc) = doc else {
        return editions;
    };

    let Some(container) = doc
        .select_first("div.work_edition_linklist")
        .or_else(|| doc.select_first(r#"div[class*="work_edition_linklist"]"#))
    else {
        return editions;
    };

    for anchor in container.select_all("a") {
        let text = anchor.text();
        let Some(link) = marketplace.resolve_link(anchor.attr("href")) else {
            continue;
        };
        if text.is_empty() {
            continue;
        }

        if editions.jp.is_none() && is_japanese_link(&text, &link) {
            editions.jp = Some(link);
        } else if editions.en.is_none() && is_english_link(&text, &link) {
            editions.en = Some(link);
        }
    }

    editions
}

/// Strips `[...]` and `【...】` decorations (sale/availability badges) and
/// collapses whitespace.
#[must_use]
pub fn clean_title(raw: &str) -> String {
    collapse_whitespace(&DECORATION_RE.replace_all(raw, ""))
}

/// Parses a year/month/day triple separated by `年月日`, `.`, `/` or `-`.
pub(crate) fn parse_date(text: &str) -> Option<String> {
    let normalized: String = text
        .chars()
        .map(|c| match c {
            '年' | '月' | '日' => ' ',
            '.' | '/' => '-',
            other => other,
        })
        .collect();

    let caps = DATE_RE.captures(&normalized)?;
    let year = caps.get(1)?.as_str();
    let month = caps.get(2)?.as_str();
    let day = caps.get(3)?.as_str();
    Some(format!("{year}-{month:0>2}-{day:0>2}"))
}

fn find_cell_by_header<'a>(doc: &'a Document, label: &Regex) -> Option<Element<'a>> {
    doc.select_all("th")
        .into_iter()
        .find(|th| label.is_match(&th.text()))
        .and_then(|th| th.next_element_sibling())
}

fn is_japanese_link(text: &str, url: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("jp") || lower.contains("日本") || url.contains("locale=ja")
}

fn is_english_link(text: &str, url: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("english")
        || lower.contains("en")
        || lower.contains("英语")
        || lower.contains("英語")
        || url.contains("locale=en")
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;

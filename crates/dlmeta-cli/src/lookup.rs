//! `lookup` command: resolve a code and print the record.

use std::fmt::Write as _;

use dlmeta_core::ProductMetadata;
use dlmeta_scraper::DlsiteClient;

pub(crate) async fn run_lookup(
    client: &DlsiteClient,
    code: &str,
    summary: bool,
) -> anyhow::Result<()> {
    let metadata = client.fetch_metadata(code).await?;

    if summary {
        print!("{}", render_summary(&metadata));
    } else {
        println!("{}", serde_json::to_string_pretty(&metadata)?);
    }
    Ok(())
}

/// One `label: value` line per populated field.
pub(crate) fn render_summary(metadata: &ProductMetadata) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "code:     {}", metadata.rj_code);
    let _ = writeln!(out, "title:    {}", metadata.title_default);
    if let Some(title) = &metadata.title_jp {
        let _ = writeln!(out, "title_jp: {title}");
    }
    if let Some(title) = &metadata.title_en {
        let _ = writeln!(out, "title_en: {title}");
    }
    if let Some(date) = &metadata.release_date {
        let _ = writeln!(out, "released: {date}");
    }
    if let Some(name) = &metadata.circle_name {
        match &metadata.circle_link {
            Some(link) => {
                let _ = writeln!(out, "circle:   {name} <{link}>");
            }
            None => {
                let _ = writeln!(out, "circle:   {name}");
            }
        }
    }
    let tags = metadata.tag_list();
    if !tags.is_empty() {
        let _ = writeln!(out, "tags:     {}", tags.join(" / "));
    }
    out
}

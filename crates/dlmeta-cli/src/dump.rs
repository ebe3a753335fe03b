//! `dump-page` command: write a resolved product page's raw HTML, mainly for
//! capturing parser fixtures.

use std::path::Path;

use anyhow::Context;
use dlmeta_scraper::{DlsiteClient, Locale, ProductCode, Site};

pub(crate) async fn run_dump_page(
    client: &DlsiteClient,
    code: &str,
    site: Option<Site>,
    locale: Locale,
    out: Option<&Path>,
) -> anyhow::Result<()> {
    let code = ProductCode::parse(code)?;

    let (html, resolved_site, final_url) = {
        let result = match site {
            Some(site) => client
                .fetch_document_for_site(&code, locale, site)
                .await?
                .with_context(|| format!("{code} did not resolve starting from {site}"))?,
            None => client.resolve_product_page(&code, locale).await?,
        };
        (result.document.html(), result.site, result.final_url)
    };

    tracing::info!(code = %code, site = %resolved_site, url = %final_url, "fetched product page");

    match out {
        Some(path) => {
            std::fs::write(path, &html)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("wrote {} bytes to {}", html.len(), path.display());
        }
        None => println!("{html}"),
    }
    Ok(())
}

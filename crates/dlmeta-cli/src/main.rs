mod dump;
mod lookup;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dlmeta_scraper::{DlsiteClient, Locale, Site};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "dlmeta-cli")]
#[command(about = "Resolve DLsite product codes into metadata")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Look up a product and print its metadata record as JSON
    Lookup {
        /// Product code, e.g. RJ01527759 (a bare number defaults to RJ)
        code: String,

        /// Print a short human-readable summary instead of JSON
        #[arg(long)]
        summary: bool,
    },
    /// Fetch one product page and write its raw HTML
    DumpPage {
        /// Product code, e.g. RJ01527759
        code: String,

        /// Start resolution on this sub-site instead of trying every candidate
        #[arg(long)]
        site: Option<Site>,

        /// Page locale (cn, jp, en or the full zh_CN/ja_JP/en_US form)
        #[arg(long, default_value = "cn")]
        locale: Locale,

        /// Write the HTML to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = dlmeta_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("dlmeta-cli ready; run with --help for commands");
        return Ok(());
    };

    let client = DlsiteClient::from_config(&config)?;
    match command {
        Commands::Lookup { code, summary } => lookup::run_lookup(&client, &code, summary).await,
        Commands::DumpPage {
            code,
            site,
            locale,
            out,
        } => dump::run_dump_page(&client, &code, site, locale, out.as_deref()).await,
    }
}

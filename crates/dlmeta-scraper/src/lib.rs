//! Product metadata resolution for the DLsite marketplace.
//!
//! Given a product code, finds the sub-site that hosts it, fetches the
//! product page in the default locale plus the Japanese and English editions,
//! and extracts titles, release date, tags and publisher.

pub mod client;
pub mod code;
pub mod document;
pub mod error;
pub mod extract;
pub mod types;
pub mod urls;

pub use client::{DlsiteClient, DocumentResult, MAX_HOPS};
pub use code::{candidate_sites, normalize_code, CodePrefix, ProductCode};
pub use dlmeta_core::ProductMetadata;
pub use error::ScraperError;
pub use extract::clean_title;
pub use types::{CircleInfo, EditionLinks, Locale, Site};
pub use urls::Marketplace;

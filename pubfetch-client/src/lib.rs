#![deny(
    clippy::panic,
    clippy::absolute_paths,
    clippy::print_stderr,
    clippy::print_stdout
)]

//! # pubfetch client
//!
//! Async access to the NCBI E-utilities (search, fetch, citing articles, field
//! listing), PubMed's own formatted citations and post-parse enrichment of [`pubfetch_parser::ArticleRecord`]s.
//!
//! ## Example
//!
//! ```no_run
//! use pubfetch_client::{ClientConfig, EUtilsClient, Enricher, ImpactFactorTable};
//! use pubfetch_parser::SchemaVariant;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = EUtilsClient::with_config(ClientConfig::new().with_email("me@example.org"));
//!
//!     let pmids = client.search_ids(SchemaVariant::PubMed, "ngs AND disease", Some(10)).await?;
//!     let records = client.fetch_records(SchemaVariant::PubMed, &pmids, 10).await?;
//!
//!     let enricher = Enricher::new(client.clone())
//!         .with_impact_factors(ImpactFactorTable::from_path("impact_factors.csv")?)
//!         .with_citations(true);
//!     for record in enricher.enrich_all(records).await? {
//!         println!("{}", record.title);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod enrich;
pub mod error;
pub mod eutils;
pub mod input;
pub mod rate_limit;
pub mod retry;

// Re-export main types for convenience
pub use cache::{CacheConfig, MemoryCache};
pub use config::ClientConfig;
pub use enrich::{
    Enricher, GoogleTranslator, ImpactFactorSource, ImpactFactorTable, TRANSLATE_FAILED,
    TranslationCache, Translator,
};
pub use error::{PubFetchError, Result};
pub use eutils::{CitationText, ESEARCH_PAGE_SIZE, EUtilsClient, FieldInfo, NcbiCitation};
pub use input::{SearchInput, resolve_term};
pub use rate_limit::RateLimiter;
pub use retry::{Backoff, RetryConfig, RetryableError, with_retry};

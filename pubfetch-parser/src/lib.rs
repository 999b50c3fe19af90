#![deny(
    clippy::panic,
    clippy::absolute_paths,
    clippy::print_stderr,
    clippy::print_stdout
)]

//! # pubfetch parser
//!
//! Turns PubMed metadata XML and PMC full-text JATS XML into flat, normalized
//! [`ArticleRecord`]s.
//!
//! The crate is pure and synchronous: no network access, no shared mutable state.
//! Documents are streamed with quick-xml and one article subtree is materialized at
//! a time, so [`parse_records`] can be fed arbitrarily large `efetch` payloads.
//!
//! ```no_run
//! use pubfetch_parser::{SchemaVariant, XmlSource, parse_records};
//!
//! # fn main() -> pubfetch_parser::Result<()> {
//! for record in parse_records(XmlSource::detect("efetch.xml"), SchemaVariant::PubMed)? {
//!     let record = record?;
//!     println!("{} {}", record.pmid.as_deref().unwrap_or("."), record.title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod abstract_text;
pub mod assembler;
pub mod authors;
pub mod common;
pub mod dates;
pub mod error;
pub mod pmc;
pub mod pubmed;
pub mod reader;
pub mod record;
pub mod schema;

// Re-export main types for convenience
pub use authors::{AffiliationEntry, AffiliationIndex, AuthorSummary};
pub use error::{ParseError, Result};
pub use pmc::{PMC_SCHEMA, parse_pmc_xml};
pub use pubmed::{PUBMED_SCHEMA, parse_pubmed_xml};
pub use reader::{Records, XmlSource, parse_records};
pub use record::{ABSENT, ArticleRecord, Author, Citations, Enrichment, ImpactFactor};
pub use schema::{SchemaDescriptor, SchemaVariant};

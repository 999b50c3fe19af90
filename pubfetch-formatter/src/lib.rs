#![deny(
    clippy::panic,
    clippy::absolute_paths,
    clippy::print_stderr,
    clippy::print_stdout
)]

//! # pubfetch formatter
//!
//! Output formatting for parsed [`ArticleRecord`](pubfetch_parser::ArticleRecord)s:
//!
//! - **Export**: field-filtered XLSX (styled, with URL cells), CSV/TSV (with hyperlink
//!   formulas), JSON and JSON lines
//! - **Citations**: AMA, MLA, APA and NLM citation strings

pub mod citation;
pub mod error;
pub mod export;

// Re-export main types for convenience
pub use citation::{Cite, CitationStyle};
pub use error::{ExportError, Result};
pub use export::{
    FIELD_ORDER, OutputFormat, Row, TRAILING_FIELDS, export_records, parse_field_list, record_row,
    write_records,
};

use std::result;

use thiserror::Error;

/// Error types for PubMed/PMC record parsing
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The document is not well-formed XML
    #[error("XML parsing failed: {0}")]
    XmlError(String),

    /// A required container element is missing from one article
    #[error("Missing required element <{path}> in <{container}>")]
    MissingElement { container: String, path: String },

    /// The XML source could not be read
    #[error("IO error reading {path}: {message}")]
    IoError { path: String, message: String },
}

impl ParseError {
    pub(crate) fn xml(err: impl ToString) -> Self {
        ParseError::XmlError(err.to_string())
    }

    /// Whether the error only affects a single article and the document can keep streaming
    pub fn is_article_local(&self) -> bool {
        matches!(self, ParseError::MissingElement { .. })
    }
}

pub type Result<T> = result::Result<T, ParseError>;

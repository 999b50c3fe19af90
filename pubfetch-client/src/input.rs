//! Interpreting the search argument: an id file, a literal id list, or a query

use std::fs;
use std::path::Path;

use pubfetch_parser::SchemaVariant;
use tracing::debug;

use crate::error::Result;

/// What the user asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchInput {
    /// Ids to fetch directly, skipping ESearch
    Ids(Vec<String>),
    /// A query term for ESearch
    Term(String),
}

/// Classify the search argument
///
/// - a path to an existing file is read as whitespace-separated ids;
/// - a comma-separated list of ids is used literally (`PMC` prefixes are accepted for
///   the PMC database);
/// - anything else is a query term.
pub fn resolve_term(input: &str, db: SchemaVariant) -> Result<SearchInput> {
    let path = Path::new(input);
    if path.is_file() {
        let ids: Vec<String> = fs::read_to_string(path)?
            .split_whitespace()
            .map(str::to_string)
            .collect();
        debug!(path = %path.display(), ids = ids.len(), "Read ids from file");
        return Ok(SearchInput::Ids(ids));
    }

    let parts: Vec<&str> = input.split(',').map(str::trim).collect();
    if parts.iter().all(|part| is_id(part, db)) {
        return Ok(SearchInput::Ids(parts.into_iter().map(str::to_string).collect()));
    }

    Ok(SearchInput::Term(input.to_string()))
}

fn is_id(part: &str, db: SchemaVariant) -> bool {
    let digits = match db {
        SchemaVariant::Pmc => part.strip_prefix("PMC").unwrap_or(part),
        SchemaVariant::PubMed => part,
    };
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

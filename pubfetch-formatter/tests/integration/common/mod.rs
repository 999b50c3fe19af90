//! Shared fixtures for the export and citation tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use pubfetch_parser::{ArticleRecord, SchemaVariant, parse_records};

/// Resolve a fixture under `test_data/`, from either the workspace root or the crate root
pub fn fixture_path(filename: &str) -> PathBuf {
    let workspace = Path::new("pubfetch-formatter/tests/integration/test_data").join(filename);
    if workspace.exists() {
        return workspace;
    }
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/integration/test_data")
        .join(filename)
}

pub fn read_fixture(filename: &str) -> String {
    let path = fixture_path(filename);
    fs::read_to_string(&path).unwrap_or_else(|_| panic!("Failed to read fixture: {path:?}"))
}

/// The two records of `pubmed_citation.xml`: a six-author NEJM article and a
/// two-author article with a collective author and no DOI, issue or PMC id
pub fn citation_records() -> Vec<ArticleRecord> {
    parse_records(read_fixture("pubmed_citation.xml"), SchemaVariant::PubMed)
        .expect("fixture should open")
        .collect::<Result<Vec<_>, _>>()
        .expect("fixture should parse")
}

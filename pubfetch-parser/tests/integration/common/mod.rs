//! Common test utilities for PubMed and PMC XML parsing tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// Resolve a fixture under `test_data/`, from either the workspace root or the crate root
pub fn fixture_path(subdir: &str, filename: &str) -> PathBuf {
    let workspace = Path::new("pubfetch-parser/tests/integration/test_data")
        .join(subdir)
        .join(filename);
    if workspace.exists() {
        return workspace;
    }
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/integration/test_data")
        .join(subdir)
        .join(filename)
}

pub fn read_fixture(subdir: &str, filename: &str) -> String {
    let path = fixture_path(subdir, filename);
    fs::read_to_string(&path).unwrap_or_else(|_| panic!("Failed to read fixture: {path:?}"))
}

pub fn pubmed_sample() -> String {
    read_fixture("pubmed_xml", "efetch_sample.xml")
}

pub fn pmc_sample() -> String {
    read_fixture("pmc_xml", "efetch_sample.xml")
}

/// Wrap `PubmedArticle` bodies in a `PubmedArticleSet`
pub fn pubmed_set(articles: &[&str]) -> String {
    format!(
        "<?xml version=\"1.0\"?>\n<PubmedArticleSet>{}</PubmedArticleSet>",
        articles.concat()
    )
}

/// A minimal valid `PubmedArticle` with the given PMID, title and extra `Article` children
pub fn pubmed_article(pmid: &str, title: &str, article_extra: &str) -> String {
    format!(
        r#"<PubmedArticle>
  <MedlineCitation>
    <PMID>{pmid}</PMID>
    <Article>
      <ArticleTitle>{title}</ArticleTitle>
      {article_extra}
    </Article>
  </MedlineCitation>
</PubmedArticle>"#
    )
}
